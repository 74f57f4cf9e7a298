use std::f32::consts::{FRAC_PI_3, PI};

use glam::Vec2;
use thurs_core::{Behavior, CellCoord, EntityId, EntityTag, PlayerView};
use thurs_system_entity_ai::{visible_entities, Entity};
use thurs_system_raycast::RayCaster;
use thurs_world::layout::parse_rows;
use thurs_world::GridMap;

fn hall() -> GridMap {
    parse_rows(&[
        "1111111111",
        "1000000001",
        "1000000001",
        "1000000001",
        "1111111111",
    ])
    .expect("hall parses")
}

fn view(position: Vec2, angle: f32) -> PlayerView {
    PlayerView {
        position,
        angle,
        fov: FRAC_PI_3,
    }
}

fn stationary(id: u32, position: Vec2) -> Entity {
    Entity::new(
        EntityId::new(id),
        position,
        1.0,
        Behavior::Stationary,
        EntityTag::from_rgb(0, 200, 0),
    )
}

#[test]
fn entity_ahead_is_reported_with_bearing_and_scale() {
    let map = hall();
    let caster = RayCaster::default();
    let entities = [stationary(7, Vec2::new(5.5, 2.5))];

    let draws = visible_entities(&map, &caster, &view(Vec2::new(1.5, 2.5), 0.0), &entities);

    assert_eq!(draws.len(), 1);
    let draw = draws[0];
    assert_eq!(draw.id, EntityId::new(7));
    assert!(draw.bearing.abs() < 1e-6);
    assert!((draw.distance - 4.0).abs() < 1e-5);
    assert!((draw.scale - 0.25).abs() < 1e-5);
    assert_eq!(draw.tag, EntityTag::from_rgb(0, 200, 0));
}

#[test]
fn entities_behind_or_outside_the_cone_are_skipped() {
    let map = hall();
    let caster = RayCaster::default();
    let entities = [
        stationary(0, Vec2::new(1.5, 2.5)),
        stationary(1, Vec2::new(3.5, 1.2)),
    ];

    let draws = visible_entities(&map, &caster, &view(Vec2::new(4.5, 2.5), 0.0), &entities);
    assert!(draws.is_empty());

    let draws = visible_entities(&map, &caster, &view(Vec2::new(4.5, 2.5), PI - 0.01), &entities);
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].id, EntityId::new(0));
}

#[test]
fn entities_too_close_are_skipped() {
    let map = hall();
    let caster = RayCaster::default();
    let entities = [stationary(0, Vec2::new(2.65, 2.5))];

    let draws = visible_entities(&map, &caster, &view(Vec2::new(2.5, 2.5), 0.0), &entities);

    assert!(draws.is_empty());
}

#[test]
fn entities_beyond_the_cutoff_are_skipped() {
    let map = hall();
    let caster = RayCaster::new(3.0).expect("valid cutoff");
    let entities = [stationary(0, Vec2::new(5.5, 2.5))];

    let draws = visible_entities(&map, &caster, &view(Vec2::new(1.5, 2.5), 0.0), &entities);

    assert!(draws.is_empty());
}

#[test]
fn results_are_ordered_far_to_near() {
    let map = hall();
    let caster = RayCaster::default();
    let entities = [
        stationary(0, Vec2::new(3.5, 2.5)),
        stationary(1, Vec2::new(8.5, 2.6)),
        stationary(2, Vec2::new(5.5, 2.4)),
    ];

    let draws = visible_entities(&map, &caster, &view(Vec2::new(1.5, 2.5), 0.0), &entities);

    let ids: Vec<u32> = draws.iter().map(|draw| draw.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 0]);
}

#[test]
fn closed_door_hides_entity_until_it_stops_being_opaque() {
    let mut map = parse_rows(&["1111111", "1002001", "1111111"]).expect("corridor parses");
    let caster = RayCaster::default();
    let entities = [stationary(3, Vec2::new(5.5, 1.5))];
    let player = view(Vec2::new(1.5, 1.5), 0.0);

    assert!(visible_entities(&map, &caster, &player, &entities).is_empty());

    if let Some(door) = map.door_mut(CellCoord::new(3, 1)) {
        door.openness = 0.4;
    }
    assert!(visible_entities(&map, &caster, &player, &entities).is_empty());

    if let Some(door) = map.door_mut(CellCoord::new(3, 1)) {
        door.openness = 0.6;
    }
    let draws = visible_entities(&map, &caster, &player, &entities);
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].id, EntityId::new(3));
}

#[test]
fn wall_between_player_and_entity_occludes() {
    let map = parse_rows(&["1111111", "1001001", "1111111"]).expect("corridor parses");
    let caster = RayCaster::default();
    let entities = [stationary(0, Vec2::new(5.5, 1.5))];

    let draws = visible_entities(&map, &caster, &view(Vec2::new(1.5, 1.5), 0.0), &entities);

    assert!(draws.is_empty());
}
