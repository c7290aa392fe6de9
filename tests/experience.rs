//! End-to-end run of the stock experience against a recording render
//! target: greeting, gate, reveal, candle, celebration, and the focus
//! interactions afterwards.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use birthday_reveal::config::ExperienceConfig;
use birthday_reveal::director::{Director, CAKE_ID, CANDLE_ID, TABLE_ID};
use birthday_reveal::phase::Phase;
use birthday_reveal::types::{CameraPose, Effect, InputEvent, RenderTarget};

#[derive(Default)]
struct Recording {
    transforms: HashMap<String, (Vec3, Quat, Vec3)>,
    visible: HashMap<String, bool>,
    lights: HashMap<String, f32>,
    opacity: Vec<f32>,
}

impl RenderTarget for Recording {
    fn set_transform(&mut self, id: &str, position: Vec3, rotation: Quat, scale: Vec3) {
        self.transforms
            .insert(id.to_string(), (position, rotation, scale));
    }
    fn set_visible(&mut self, id: &str, visible: bool) {
        self.visible.insert(id.to_string(), visible);
    }
    fn set_light_intensity(&mut self, name: &str, value: f32) {
        self.lights.insert(name.to_string(), value);
    }
    fn set_background_opacity(&mut self, value: f32) {
        self.opacity.push(value);
    }
}

fn camera() -> CameraPose {
    CameraPose {
        position: Vec3::new(0.0, 1.0, 3.0),
        rotation: Quat::IDENTITY,
    }
}

const DT: f32 = 1.0 / 60.0;

#[test]
fn full_scripted_run() {
    let mut director = Director::new(ExperienceConfig::default());
    let mut target = Recording::default();
    let cam = camera();

    // Nothing moves before the first trigger.
    director.tick(0.0, DT, &cam, &mut target);
    assert_eq!(director.phase(), Phase::Idle);

    // Trigger from Idle: audio attempt plus Typing.
    let fx = director.handle_event(InputEvent::Trigger);
    assert_eq!(fx, vec![Effect::StartAudio]);
    assert_eq!(director.phase(), Phase::Typing);

    // Let the script type itself out; the ready delay then advances us.
    let mut now = 0.0;
    let mut saw_continue_hint = false;
    while director.phase() == Phase::Typing {
        now += 0.05;
        assert!(now < 120.0, "typing never finished");
        let fx = director.tick(now, DT, &cam, &mut target);
        saw_continue_hint |= fx.contains(&Effect::ShowContinueHint);
    }
    assert!(saw_continue_hint);
    assert_eq!(director.phase(), Phase::AwaitingContinue);
    assert!(director.typewriter().is_complete());
    // The full script is visible once typing is done.
    let lines = director.typewriter().visible_lines();
    assert_eq!(lines, director.config().script.lines);

    // Second trigger opens the gate.
    let fx = director.handle_event(InputEvent::Trigger);
    assert!(fx.contains(&Effect::ShowGatePrompt));
    assert_eq!(director.phase(), Phase::Gate);

    // Every "no" reveals one more message, capped at the list length,
    // after which the control disappears and "no" goes silent.
    let cap = director.config().gate.no_messages.len();
    for i in 1..=cap {
        let fx = director.handle_event(InputEvent::No);
        assert_eq!(fx, vec![Effect::RevealNoMessage { count: i }]);
    }
    assert!(!director.no_control_visible());
    assert!(director.handle_event(InputEvent::No).is_empty());
    assert_eq!(director.no_click_count(), cap);

    // "Yes" works regardless of the no-count.
    let fx = director.handle_event(InputEvent::Yes);
    assert_eq!(fx, vec![Effect::StartScene]);
    assert_eq!(director.phase(), Phase::ScenePlaying);

    // First playing tick arms the timeline at elapsed zero: the cake is
    // at its start height, the candle hidden, the overlay opaque.
    director.tick(now, DT, &cam, &mut target);
    let (cake, _, _) = target.transforms[CAKE_ID];
    assert_eq!(cake.y, 10.0);
    let (table, _, _) = target.transforms[TABLE_ID];
    assert_eq!(table.z, 30.0);
    assert_eq!(target.visible[CANDLE_ID], false);

    // Mid-reveal the cake is between its endpoints.
    director.tick(now + 1.5, DT, &cam, &mut target);
    let (cake, _, _) = target.transforms[CAKE_ID];
    assert!(cake.y > 0.0 && cake.y < 10.0);

    // Run past the schedule total: completion exactly once, end values
    // snapped, lighting crossfaded.
    let mut completions = 0;
    for i in 0..20 {
        let fx = director.tick(now + 10.0 + i as f64, DT, &cam, &mut target);
        completions += fx.iter().filter(|f| **f == Effect::ShowCandleHint).count();
    }
    assert_eq!(completions, 1);
    assert_eq!(director.phase(), Phase::SceneComplete);
    let (cake, _, _) = target.transforms[CAKE_ID];
    assert_eq!(cake.y, 0.0);
    assert_eq!(target.visible[CANDLE_ID], true);
    assert_eq!(target.opacity.last().copied(), Some(0.0));
    assert_eq!(target.lights["ambient"], 0.0);

    // Blow out the candle.
    assert!(director.candle_lit());
    let fx = director.handle_event(InputEvent::Trigger);
    assert_eq!(fx, vec![Effect::BlowOutCandle, Effect::StartFireworks]);
    assert_eq!(director.phase(), Phase::Celebration);
    assert!(!director.candle_lit());
    assert!(director.fireworks_active());
}

#[test]
fn focus_interactions_after_the_reveal() {
    let mut director = Director::new(ExperienceConfig::default());
    let mut target = Recording::default();
    let cam = camera();

    // Focus clicks before the scene are no-ops.
    director.handle_event(InputEvent::Click {
        id: "frame1".into(),
    });
    assert_eq!(director.active_object(), None);

    // Fast-forward to the playing scene.
    director.handle_event(InputEvent::Trigger);
    let mut now = 0.0;
    while director.phase() == Phase::Typing {
        now += 0.05;
        director.tick(now, DT, &cam, &mut target);
    }
    director.handle_event(InputEvent::Trigger);
    director.handle_event(InputEvent::Yes);
    assert_eq!(director.phase(), Phase::ScenePlaying);

    // Hover, then pick up frame1.
    director.handle_event(InputEvent::PointerEnter {
        id: "frame1".into(),
    });
    director.handle_event(InputEvent::Click {
        id: "frame1".into(),
    });
    assert_eq!(director.active_object(), Some("frame1"));

    // Picking up the card evicts the frame in the same operation.
    director.handle_event(InputEvent::Click {
        id: "confetti_card".into(),
    });
    assert_eq!(director.active_object(), Some("confetti_card"));

    // The focused card converges on the camera-relative pose; with the
    // camera at y=1 looking level, the height floor keeps it up.
    for _ in 0..600 {
        now += DT as f64;
        director.tick(now, DT, &cam, &mut target);
    }
    let (pos, _, _) = target.transforms["confetti_card"];
    let tuning = &director.config().focus.card;
    assert!(pos.y >= tuning.height_floor - 1e-3);
    assert!((pos.z - (3.0 - tuning.camera_distance)).abs() < 1e-2);

    // Toggling the holder off sends it home.
    director.handle_event(InputEvent::Click {
        id: "confetti_card".into(),
    });
    assert_eq!(director.active_object(), None);
    for _ in 0..600 {
        now += DT as f64;
        director.tick(now, DT, &cam, &mut target);
    }
    let (pos, _, _) = target.transforms["confetti_card"];
    let resting = director
        .objects()
        .iter()
        .find(|o| o.id() == "confetti_card")
        .unwrap()
        .resting();
    assert!(pos.distance(resting.position) < 1e-2);
}
