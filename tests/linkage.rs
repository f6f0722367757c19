use tickframe::{
    ecs::{EntityStore, System, SystemCore, World},
    Component, FrameTimeInfo,
};

struct Heat;
impl Component for Heat {}

struct Light;
impl Component for Light {}

struct Watcher {
    core: SystemCore,
    calls: u32,
    retire_on: Option<u32>,
}

impl Watcher {
    fn accepting_heat() -> Self {
        Self {
            core: SystemCore::accepting::<(Heat,)>(),
            calls: 0,
            retire_on: None,
        }
    }
}

impl System for Watcher {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }

    fn update(&mut self, _time: &FrameTimeInfo, _entities: &mut EntityStore) -> bool {
        self.calls += 1;
        self.retire_on != Some(self.calls)
    }
}

fn tick() -> FrameTimeInfo {
    FrameTimeInfo::default()
}

#[test]
fn test_link_follows_component_presence() {
    let mut world = World::new();
    world.add_system(Watcher::accepting_heat());

    let entity = world.add_entity_with_component(Light);
    world.refresh();
    assert!(!world.system::<Watcher>().unwrap().contains_entity(entity.id()));

    world.entity_mut(entity).unwrap().add_component(Heat).unwrap();
    world.refresh();
    assert!(world.system::<Watcher>().unwrap().contains_entity(entity.id()));

    world.entity_mut(entity).unwrap().remove_component::<Heat>().unwrap();
    world.refresh();
    assert!(!world.system::<Watcher>().unwrap().contains_entity(entity.id()));
}

#[test]
fn test_update_links_then_unlinks() {
    let mut world = World::new();
    world.add_system(Watcher::accepting_heat());

    let bare = world.add_entity();
    assert!(world.update(&tick()));
    assert!(!world.system::<Watcher>().unwrap().contains_entity(bare.id()));

    let heated = world.add_entity_with_component(Heat);
    assert!(world.update(&tick()));
    let watcher = world.system::<Watcher>().unwrap();
    assert!(watcher.contains_entity(heated.id()));
    assert_eq!(watcher.core().linked_count(), 1);

    world.entity_mut(heated).unwrap().remove_component::<Heat>().unwrap();
    assert!(world.update(&tick()));
    assert_eq!(world.system::<Watcher>().unwrap().core().linked_count(), 0);
}

#[test]
fn test_retired_system_is_never_relinked() {
    let mut world = World::new();
    world.add_system(Watcher {
        retire_on: Some(4),
        ..Watcher::accepting_heat()
    });
    world.add_entity_with_component(Heat);

    for _ in 0..3 {
        assert!(world.update(&tick()));
    }
    assert!(!world.update(&tick()));
    assert!(!world.is_system_active(0));
    assert!(!world.has_active_systems());

    let late = world.add_entity_with_component(Heat);
    assert!(!world.update(&tick()));
    world.refresh();

    let watcher = world.system::<Watcher>().unwrap();
    assert_eq!(watcher.calls, 4);
    assert!(!watcher.contains_entity(late.id()));
    assert_eq!(watcher.core().linked_count(), 1);
}

#[test]
fn test_disabled_entities_are_partitioned_to_the_back() {
    let mut world = World::new();
    world.add_system(Watcher::accepting_heat());
    let handles: Vec<_> = (0..10).map(|_| world.add_entity_with_component(Heat)).collect();
    for handle in handles.iter().step_by(3) {
        world.entity_mut(*handle).unwrap().disable();
    }

    world.refresh();
    let active = world.active_entity_count();
    assert_eq!(active, 6);
    for (index, entity) in world.entities().enumerate() {
        assert_eq!(entity.is_enabled(), index < active, "entity at {index}");
    }

    let watcher = world.system::<Watcher>().unwrap();
    assert_eq!(watcher.core().linked_count(), 6);
    for handle in handles.iter().step_by(3) {
        assert!(!watcher.contains_entity(handle.id()));
    }
}

#[test]
fn test_systems_link_in_registration_order() {
    struct LightWatcher {
        core: SystemCore,
    }

    impl System for LightWatcher {
        fn core(&self) -> &SystemCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut SystemCore {
            &mut self.core
        }

        fn update(&mut self, _time: &FrameTimeInfo, _entities: &mut EntityStore) -> bool {
            true
        }
    }

    let mut world = World::new();
    world.add_system(Watcher::accepting_heat());
    world.add_system(LightWatcher {
        core: SystemCore::accepting::<(Light,)>(),
    });
    let both = world.add_entity_with_components((Heat, Light)).unwrap();
    let light = world.add_entity_with_component(Light);
    world.refresh();

    let counts: Vec<_> = world.systems().map(|(_, system)| system.core().linked_count()).collect();
    assert_eq!(counts, vec![1, 2]);
    let linked = world.system::<LightWatcher>().unwrap().core().linked_entities();
    assert_eq!(linked, &[both.id(), light.id()]);
}

#[test]
fn test_destroy_clears_links_and_handles() {
    let mut world = World::new();
    world.add_system(Watcher::accepting_heat());
    let handle = world.add_entity_with_component(Heat);
    world.refresh();
    let old_id = world.id();

    world.destroy();
    assert_ne!(world.id(), old_id);
    assert!(world.entity(handle).is_err());
    assert!(world.remove_entity(handle).is_err());
    assert!(!world.update(&tick()));
}
