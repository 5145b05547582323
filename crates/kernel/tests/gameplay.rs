//! End-to-end frame stepping scenarios against the public kernel API.

use glam::Vec3;
use tilehop_common::{CameraMode, Direction, GameConfig, Intent};
use tilehop_kernel::{
    Obstacle, ResetCause, SceneLayout, SceneObject, TileCoord, World, WorldEvent,
};

const EPS: f32 = 1e-4;

fn empty_world() -> World {
    World::with_layout(GameConfig::default(), SceneLayout::empty()).unwrap()
}

fn resets(world: &World) -> Vec<ResetCause> {
    world
        .events()
        .iter()
        .filter_map(|e| match e {
            WorldEvent::Reset { cause, .. } => Some(*cause),
            _ => None,
        })
        .collect()
}

#[test]
fn oscillation_stays_in_range_for_long_runs() {
    let mut world = World::new(GameConfig::default()).unwrap();
    for _ in 0..7_500 {
        world.step(&[]);
        let h = world.oscillation().height();
        assert!((-4.0..=2.0).contains(&h), "height {h}");
    }
}

#[test]
fn player_always_contained_after_step() {
    let mut world = World::new(GameConfig::default()).unwrap();
    let dirs = [Direction::Right, Direction::Up, Direction::Left, Direction::Down];
    for i in 0..3_000usize {
        let dir = dirs[(i / 37) % dirs.len()];
        world.step(&[Intent::repeat(dir)]);
        let p = world.player().position;
        assert!(world.config().world.contains(p.x, p.z), "escaped to {p}");
        assert!(world.layout().obstacle_at(p.x, p.z).is_none(), "inside obstacle at {p}");
    }
}

#[test]
fn walking_off_top_edge_resets() {
    let mut world = empty_world();
    // From z = 19 up to z < -1 takes a little over 100 steps.
    for _ in 0..110 {
        world.step(&[Intent::step(Direction::Up)]);
    }
    assert_eq!(resets(&world), vec![ResetCause::OutOfBounds]);
    assert_eq!(world.player().facing, Direction::Up);
}

#[test]
fn repeat_steps_do_not_turn_adventure_camera() {
    let mut world = empty_world();
    world.step(&[
        Intent::SwitchCamera(CameraMode::Adventure),
        Intent::step(Direction::Right),
    ]);
    let frame = world.step(&[Intent::repeat(Direction::Up)]);
    assert_eq!(world.player().facing, Direction::Right);
    assert_eq!(frame.view.target.x, 20.0);
    assert!((frame.view.target.z - world.player().position.z).abs() < EPS);
    assert_eq!(frame.view.eye, world.player().position + Vec3::new(0.5, 1.5, 0.5));
}

#[test]
fn follow_view_tracks_player_after_moves() {
    let mut world = empty_world();
    let frame = world.step(&[Intent::step(Direction::Right), Intent::step(Direction::Right)]);
    let p = world.player().position;
    assert_eq!(frame.view.target, p);
    assert_eq!(frame.view.eye, p + Vec3::new(0.0, 3.0, 3.0));
    assert_eq!(frame.player().unwrap().translation(), p);
}

#[test]
fn obstacle_blocks_path_and_resets() {
    let layout = SceneLayout::new([Obstacle::new(0, 17)], []);
    let mut world = World::with_layout(GameConfig::default(), layout).unwrap();
    // The footprint starts below z = 18, five or six 0.2 steps from spawn.
    for _ in 0..6 {
        world.step(&[Intent::step(Direction::Up)]);
    }
    assert_eq!(resets(&world), vec![ResetCause::Obstacle]);
    assert_eq!(world.player().position, Vec3::new(0.0, 0.0, 19.0));
}

#[test]
fn jumping_onto_movable_tile_lands_on_its_top() {
    let layout = SceneLayout::new([], [TileCoord::new(3, 3)]);
    let mut world = World::with_layout(GameConfig::default(), layout).unwrap();
    world.place_player(Vec3::new(3.5, 0.0, 3.5));
    world.step(&[Intent::Jump]);
    for _ in 0..200 {
        if !world.player().is_jumping() {
            break;
        }
        world.step(&[]);
    }
    assert!(!world.player().is_jumping());
    let ground = world.oscillation().height() + 1.0;
    assert!((world.player().position.y - ground).abs() < EPS);
}

#[test]
fn quit_and_close_end_the_loop() {
    let mut world = empty_world();
    let frame = world.step(&[Intent::step(Direction::Down), Intent::Quit]);
    assert!(frame.should_quit());
    // Intents queued alongside the quit still applied.
    assert!((world.player().position.z - 19.2).abs() < EPS);
}

#[test]
fn frame_draw_counts_match_config() {
    let mut world = World::new(GameConfig::default()).unwrap();
    let frame = world.step(&[]);
    let cfg = &world.config().world;
    assert_eq!(frame.count(SceneObject::Floor), cfg.tile_count());
    assert_eq!(frame.count(SceneObject::Water), cfg.water_tile_count());
    assert_eq!(frame.count(SceneObject::Obstacle), cfg.obstacle_count);
    assert_eq!(
        frame.draws.len(),
        1 + cfg.tile_count() + cfg.water_tile_count() + cfg.obstacle_count
    );
    assert_eq!(frame.index, 1);
}

#[test]
fn replay_is_deterministic() {
    let run = |seed: u64| {
        let mut world = World::with_seed(GameConfig::default(), seed).unwrap();
        for i in 0..500u32 {
            let intent = match i % 7 {
                0 => Intent::step(Direction::Right),
                1 | 2 => Intent::repeat(Direction::Up),
                3 => Intent::Jump,
                4 => Intent::SwitchCamera(CameraMode::Tower),
                5 => Intent::step(Direction::Left),
                _ => Intent::Noop,
            };
            world.step(&[intent]);
        }
        (world.state_hash(), world.drain_events())
    };
    let (h1, e1) = run(5);
    let (h2, e2) = run(5);
    assert_eq!(h1, h2);
    assert_eq!(e1, e2);
}

#[test]
fn different_seeds_give_different_layouts() {
    let a = World::with_seed(GameConfig::default(), 1).unwrap();
    let b = World::with_seed(GameConfig::default(), 2).unwrap();
    assert_ne!(a.layout(), b.layout());
}

#[test]
fn tuned_config_changes_step_size() {
    let mut config = GameConfig::default();
    config.world.step = 0.5;
    let mut world = World::with_layout(config, SceneLayout::empty()).unwrap();
    world.step(&[Intent::step(Direction::Right)]);
    assert!((world.player().position.x - 0.5).abs() < EPS);
}
