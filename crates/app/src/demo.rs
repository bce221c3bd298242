use ring_sequencer_core::{Animation, Result, Swing};

const ALL_RINGS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// Rainbow base layer with pulsing inner bands and a staggered snake on the
/// outer arc.
pub fn sandstorm() -> Result<Animation> {
    let mut animation = Animation::new("sandstorm", 126.0, 50.0)?;
    animation.sync(|s| {
        s.beats(0.0, 120.0, |s| {
            s.phase(3.0, |s| {
                s.elements(&ALL_RINGS, |s| {
                    s.rainbow();
                    s.segment("b1", |s| {
                        s.cycle_beats(4.0, 0.0, 4.0, |s| {
                            s.fade_out_in(Swing {
                                min: Some(0.5),
                                max: None,
                            });
                            Ok(())
                        })
                    })?;
                    s.segment("b2", |s| {
                        s.cycle_beats(8.0, 0.0, 8.0, |s| {
                            s.const_color(0.3, 1.0, 0.3);
                            s.fade_in_out(Swing::new(0.5, 0.9));
                            Ok(())
                        })
                    })?;
                    s.segment("arc", |s| {
                        s.cycle_beats(2.0, 0.0, 2.0, |s| {
                            s.phase(1.0, |s| {
                                s.snake_in_out(Default::default());
                                Ok(())
                            })
                        })
                    })
                })
            })
        })
    })?;
    Ok(animation)
}
