use std::sync::Arc;

use ring_sequencer_core::{
    Animation, EffectKind, FloatFunction, Hsv, Script, SequencerError, StageConfig, Swing,
};

#[test]
fn single_ring_color_over_twenty_beats() {
    let mut animation = Animation::new("t", 120.0, 10.0).unwrap();
    animation
        .sync(|s| {
            s.beats(0.0, 20.0, |s| {
                s.elements(&[1], |s| {
                    s.const_color(0.5, 1.0, 1.0);
                    Ok(())
                })
            })
        })
        .unwrap();

    let sequence = animation.sequence();
    let ring = sequence.ring(1).unwrap();
    let effect = &ring.effects[0];
    match &effect.kind {
        EffectKind::ConstColor(c) => assert_eq!(c.color, Hsv::new(0.5, 1.0, 1.0)),
        other => panic!("expected const_color, got {}", other.name()),
    }
    assert_eq!(effect.effect_config.start_time_ms, 0.0);
    assert_eq!(effect.effect_config.end_time_ms, 10_000.0);
    assert_eq!(ring.duration_ms, 10_000.0);
    assert_eq!(ring.num_repeats, 0);
}

#[test]
fn eight_beat_cycle_inside_thirty_two_beats() {
    let mut animation = Animation::new("t", 120.0, 30.0).unwrap();
    animation
        .sync(|s| {
            s.beats(0.0, 32.0, |s| {
                s.element(4, |s| {
                    s.cycle_beats(8.0, 0.0, 4.0, |s| {
                        s.fade_in_out(Swing::default());
                        Ok(())
                    })
                })
            })
        })
        .unwrap();

    let sequence = animation.sequence();
    let repeat = sequence.ring(4).unwrap().effects[0]
        .effect_config
        .repeat
        .expect("cycle should set repeat metadata");
    assert_eq!(repeat.count, 4.0);
    assert_eq!(repeat.start_fraction, 0.0);
    assert_eq!(repeat.end_fraction, 0.5);
}

#[test]
fn one_effect_shared_by_every_targeted_ring() {
    let mut animation = Animation::new("t", 128.0, 30.0).unwrap();
    animation
        .sync(|s| {
            s.elements(&[1, 2], |s| {
                s.const_color(0.0, 1.0, 0.3);
                Ok(())
            })?;
            s.element(2, |s| {
                s.fade_out(Default::default());
                Ok(())
            })
        })
        .unwrap();

    let sequence = animation.sequence();
    let ring1 = &sequence.ring(1).unwrap().effects;
    let ring2 = &sequence.ring(2).unwrap().effects;
    assert_eq!(ring1.len(), 1);
    assert_eq!(ring2.len(), 2);
    assert!(Arc::ptr_eq(&ring1[0], &ring2[0]));
    match &ring2[1].kind {
        EffectKind::Brightness(b) => assert_eq!(b.mult_factor, FloatFunction::linear(1.0, 0.0)),
        other => panic!("expected brightness, got {}", other.name()),
    }
}

#[test]
fn errors_surface_from_deep_scopes() {
    let mut animation = Animation::new("t", 120.0, 30.0).unwrap();
    let err = animation
        .sync(|s| {
            s.beats(0.0, 16.0, |s| {
                s.element(1, |s| {
                    s.const_color(0.1, 1.0, 1.0);
                    s.beats(4.0, 2.0, |_| Ok(()))
                })
            })
        })
        .unwrap_err();
    assert!(matches!(err, SequencerError::InvalidRange { .. }));
    // Effects emitted before the failure stay recorded.
    assert_eq!(animation.recorded().len(), 1);
}

#[test]
fn script_emitter_before_sync_fails() {
    let script = Script::parse(
        r#"{
            "name": "early",
            "bpm": 120,
            "duration_seconds": 4,
            "nodes": [
                { "type": "const_color", "hue": 0.1, "sat": 1, "val": 1 },
                { "type": "sync", "body": [] }
            ]
        }"#,
    )
    .unwrap();
    let err = script.compile(&StageConfig::default()).unwrap_err();
    assert!(matches!(err, SequencerError::NoActiveAnimation));
}

#[test]
fn staggered_sandstorm_script_serializes_for_the_renderer() {
    let script = Script::parse(
        r#"{
            "name": "sandstorm",
            "bpm": 120,
            "duration_seconds": 50,
            "nodes": [
                { "type": "sync", "body": [
                    { "type": "beats", "start": 0, "end": 120, "body": [
                        { "type": "phase", "multiplier": 3, "body": [
                            { "type": "elements", "target": "all", "body": [
                                { "type": "rainbow" },
                                { "type": "segment", "name": "b1", "body": [
                                    { "type": "cycle_beats", "beats_per_cycle": 4, "start": 0, "end": 4,
                                      "body": [ { "type": "fade_out_in", "min": 0.5 } ] }
                                ] }
                            ] }
                        ] }
                    ] }
                ] }
            ]
        }"#,
    )
    .unwrap();

    let stage = StageConfig::default();
    let animation = script.compile(&stage).unwrap();
    let sequence = animation.sequence();
    stage.validate(&sequence).unwrap();
    assert_eq!(sequence.len(), 12);

    // 12 staggered rainbows plus one shared fade.
    assert_eq!(animation.recorded().len(), 13);

    let json: serde_json::Value = serde_json::from_str(&sequence.to_json(false).unwrap()).unwrap();
    let ring4 = &json["ring4"]["effects"];
    assert_eq!(ring4[0]["rainbow"]["hue_start"]["const_value"]["value"], 0.75);
    assert_eq!(ring4[1]["effect_config"]["segments"], "b1");
    assert_eq!(ring4[1]["effect_config"]["repeat_num"], 30.0);
    assert!(ring4[0]["effect_config"].get("repeat_num").is_none());
    assert_eq!(json["ring1"]["duration_ms"], 50_000.0);
}
