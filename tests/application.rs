use tickframe::{
    app::{Application, ApplicationComponent},
    ecs::{EntityStore, System, SystemCore, World},
    AppConfig, FrameTimeInfo,
};

struct Pulse {
    true_calls: u32,
}

impl ApplicationComponent for Pulse {
    fn update(&mut self, _time: &FrameTimeInfo) -> bool {
        if self.true_calls == 0 {
            return false;
        }
        self.true_calls -= 1;
        true
    }
}

struct Ticker {
    core: SystemCore,
    frames_left: u32,
    sub_steps: Vec<u32>,
}

impl Ticker {
    fn new(frames_left: u32) -> Self {
        Self {
            core: SystemCore::new(),
            frames_left,
            sub_steps: Vec::new(),
        }
    }
}

impl System for Ticker {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }

    fn update(&mut self, time: &FrameTimeInfo, _entities: &mut EntityStore) -> bool {
        self.sub_steps.push(time.sub_step_count);
        self.frames_left = self.frames_left.saturating_sub(1);
        self.frames_left > 0
    }
}

fn world_with_ticker(frames: u32) -> World {
    let mut world = World::named("ticker");
    world.add_system(Ticker::new(frames));
    world
}

#[test]
fn test_component_only_application_winds_down() {
    let mut app = Application::new();
    app.add_component(Pulse { true_calls: 2 });

    let results: Vec<bool> = (0..4).map(|_| app.run_once()).collect();
    assert_eq!(results, vec![true, true, false, false]);
}

#[test]
fn test_world_keeps_application_alive_until_retired() {
    let mut app = Application::new();
    app.add_component(Pulse { true_calls: 0 });
    let slot = app.add_world(world_with_ticker(3));

    assert!(app.advance(0.0));
    assert!(!app.is_component_active(0));
    assert!(app.advance(0.0));
    assert!(!app.advance(0.0));
    assert!(!app.is_world_active(slot));
    assert!(!app.advance(0.0));

    let ticker = app.world(slot).unwrap().system::<Ticker>().unwrap();
    assert_eq!(ticker.sub_steps.len(), 3);
}

#[test]
fn test_fixed_steps_accumulate_across_frames() {
    let mut app = Application::with_config(AppConfig {
        sub_step_time: 0.125,
        ..AppConfig::default()
    });
    let slot = app.add_world(world_with_ticker(10));

    for delta in [0.0625, 0.0625, 0.25, 0.1875] {
        app.advance(delta);
    }

    let ticker = app.world(slot).unwrap().system::<Ticker>().unwrap();
    assert_eq!(ticker.sub_steps, vec![0, 1, 2, 1]);
    assert_eq!(app.time_info().global_time, 0.5625);
    assert_eq!(app.frame_count(), 4);
}

#[test]
fn test_sub_step_clamp_drops_excess_time() {
    let mut app = Application::with_config(AppConfig {
        sub_step_time: 0.25,
        max_sub_steps: Some(2),
        ..AppConfig::default()
    });
    let slot = app.add_world(world_with_ticker(10));

    app.advance(2.0);
    app.advance(0.25);

    let ticker = app.world(slot).unwrap().system::<Ticker>().unwrap();
    assert_eq!(ticker.sub_steps, vec![2, 1]);
}

#[test]
fn test_time_scale_stretches_delta() {
    let mut app = Application::with_config(AppConfig {
        sub_step_time: 0.5,
        time_scale: 2.0,
        ..AppConfig::default()
    });
    app.add_world(world_with_ticker(10));

    app.advance(0.5);
    assert_eq!(app.time_info().delta_time, 1.0);
    assert_eq!(app.time_info().sub_step_count, 2);
}

#[test]
fn test_run_stops_at_frame_limit() {
    let mut app = Application::with_config(AppConfig {
        max_frames: Some(7),
        ..AppConfig::default()
    });
    app.add_component(Pulse { true_calls: 100 });
    assert_eq!(app.run(), 7);
    assert_eq!(app.frame_count(), 7);
}
