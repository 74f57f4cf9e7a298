use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use thurs_core::{CellCoord, HitKind, PlayerView, Side};
use thurs_system_raycast::RayCaster;
use thurs_world::{layout, GridMap};

fn room() -> GridMap {
    layout::parse_rows(&["111111", "100001", "100001", "100001", "100001", "111111"])
        .expect("layout")
}

#[test]
fn ray_along_positive_x_hits_wall_column() {
    let map = layout::parse_rows(&["00000100", "00000100", "00000100", "00000100"])
        .expect("layout");
    let hit = RayCaster::default().cast(&map, Vec2::new(1.5, 1.5), 0.0);

    assert_eq!(hit.kind, HitKind::Wall);
    assert_eq!(hit.side, Side::Vertical);
    assert_eq!(hit.side.index(), 0);
    assert!((hit.distance - 3.5).abs() < 1e-5, "distance {}", hit.distance);
    assert_eq!(hit.cell, Some(CellCoord::new(5, 1)));
    assert!((hit.wall_fraction - 0.5).abs() < 1e-5);
}

#[test]
fn vertical_rays_report_horizontal_faces() {
    let hit = RayCaster::default().cast(&room(), Vec2::new(2.5, 2.25), FRAC_PI_2);

    assert_eq!(hit.kind, HitKind::Wall);
    assert_eq!(hit.side, Side::Horizontal);
    assert_eq!(hit.cell, Some(CellCoord::new(2, 5)));
    assert!((hit.distance - 2.75).abs() < 1e-4);
}

#[test]
fn every_ray_in_an_enclosed_room_hits_before_cutoff() {
    let map = room();
    let caster = RayCaster::default();

    for origin in [
        Vec2::new(1.5, 1.5),
        Vec2::new(3.2, 2.7),
        Vec2::new(4.9, 4.9),
    ] {
        for step in 0..720 {
            let angle = step as f32 / 720.0 * TAU - PI;
            let hit = caster.cast(&map, origin, angle);
            assert_eq!(hit.kind, HitKind::Wall, "angle {angle} from {origin}");
            assert!(hit.distance <= caster.cutoff());
            assert!(hit.distance >= 0.0);
            assert!((0.0..1.0).contains(&hit.wall_fraction));
        }
    }
}

#[test]
fn axis_aligned_rays_terminate() {
    let map = room();
    let caster = RayCaster::default();
    let origin = Vec2::new(2.5, 2.5);

    let east = caster.cast(&map, origin, 0.0);
    let west = caster.cast(&map, origin, PI);
    let south = caster.cast(&map, origin, FRAC_PI_2);
    let north = caster.cast(&map, origin, -FRAC_PI_2);

    assert!((east.distance - 2.5).abs() < 1e-4);
    assert!((west.distance - 1.5).abs() < 1e-4);
    assert!((south.distance - 2.5).abs() < 1e-4);
    assert!((north.distance - 1.5).abs() < 1e-4);
}

#[test]
fn nan_angle_still_terminates() {
    let hit = RayCaster::default().cast(&room(), Vec2::new(2.5, 2.5), f32::NAN);
    assert!(hit.distance <= RayCaster::default().cutoff() || hit.distance.is_nan());
}

#[test]
fn long_corridor_reports_miss_at_cutoff() {
    let row = "0".repeat(40);
    let map = layout::parse_rows(&[row.as_str()]).expect("layout");
    let hit = RayCaster::default().cast(&map, Vec2::new(1.5, 0.5), 0.0);

    assert!(hit.is_miss());
    assert_eq!(hit.kind, HitKind::Miss);
    assert_eq!(hit.distance, 16.0);
    assert_eq!(hit.cell, None);
}

#[test]
fn shorter_cutoff_turns_distant_walls_into_misses() {
    let map = layout::parse_rows(&["00000100"]).expect("layout");
    let caster = RayCaster::new(2.0).expect("cutoff");
    let hit = caster.cast(&map, Vec2::new(1.5, 0.5), 0.0);
    assert!(hit.is_miss());
    assert_eq!(hit.distance, 2.0);
}

#[test]
fn closed_door_occludes_and_open_door_does_not() {
    let mut map = layout::parse_rows(&["111111", "100201", "111111"]).expect("layout");
    let caster = RayCaster::default();
    let origin = Vec2::new(1.5, 1.5);

    let shut = caster.cast(&map, origin, 0.0);
    assert_eq!(shut.kind, HitKind::Door);
    assert_eq!(shut.cell, Some(CellCoord::new(3, 1)));
    assert!((shut.distance - 1.5).abs() < 1e-5);

    map.door_mut(CellCoord::new(3, 1)).expect("door").openness = 1.0;
    let open = caster.cast(&map, origin, 0.0);
    assert_eq!(open.kind, HitKind::Wall);
    assert_eq!(open.cell, Some(CellCoord::new(5, 1)));

    map.door_mut(CellCoord::new(3, 1)).expect("door").openness = 0.5;
    let half = caster.cast(&map, origin, 0.0);
    assert_eq!(half.kind, HitKind::Wall, "a half-open door is not opaque");
}

#[test]
fn casting_is_repeatable() {
    let map = layout::builtin().expect("builtin");
    let caster = RayCaster::default();
    let origin = Vec2::new(1.5, 1.5);

    let first: Vec<_> = (0..64).map(|i| caster.cast(&map, origin, i as f32 * 0.1)).collect();
    let second: Vec<_> = (0..64)
        .rev()
        .map(|i| caster.cast(&map, origin, i as f32 * 0.1))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    assert_eq!(first, second);
}

#[test]
fn columns_sweep_left_to_right_across_fov() {
    let map = room();
    let caster = RayCaster::default();
    let view = PlayerView {
        position: Vec2::new(2.5, 2.5),
        angle: 0.0,
        fov: PI / 3.0,
    };

    let columns = caster.cast_columns(&map, &view, 9);
    assert_eq!(columns.len(), 9);
    assert!((columns[0].angle - (-PI / 6.0)).abs() < 1e-6);
    assert!((columns[8].angle - PI / 6.0).abs() < 1e-6);
    assert_eq!(columns[4], caster.cast(&map, view.position, 0.0));
    assert!(columns.windows(2).all(|pair| pair[0].angle < pair[1].angle));
}
