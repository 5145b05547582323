//! Startup-generated scene layout: obstacle footprints and movable floor tiles.
//!
//! Generated once from a seed and immutable afterwards. The same seed and
//! world config always give the same layout on every platform.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tilehop_common::WorldConfig;

/// Integer floor cell `(x, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub z: i32,
}

impl TileCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell containing the world-space point `(x, z)`.
    pub fn containing(x: f32, z: f32) -> Self {
        Self::new(x.floor() as i32, z.floor() as i32)
    }
}

/// A static unit-footprint block standing on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Obstacle {
    pub cell: TileCoord,
}

impl Obstacle {
    pub fn new(x: i32, z: i32) -> Self {
        Self {
            cell: TileCoord::new(x, z),
        }
    }

    /// Half-open footprint test: `[ox, ox + 1) x [oz, oz + 1)`.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let ox = self.cell.x as f32;
        let oz = self.cell.z as f32;
        x >= ox && x < ox + 1.0 && z >= oz && z < oz + 1.0
    }
}

/// Generous hit-box around a movable tile: true when the player's `(x, z)` is
/// strictly within `tile - 0.9 .. tile + 1.9` on both axes.
pub fn is_on_movable_floor(x: f32, z: f32, tile_x: f32, tile_z: f32) -> bool {
    x > tile_x - 0.9 && x < tile_x + 1.9 && z > tile_z - 0.9 && z < tile_z + 1.9
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    obstacles: Vec<Obstacle>,
    movable: BTreeSet<TileCoord>,
}

impl SceneLayout {
    /// Explicit layout, for tools and tests.
    pub fn new(
        obstacles: impl IntoIterator<Item = Obstacle>,
        movable: impl IntoIterator<Item = TileCoord>,
    ) -> Self {
        Self {
            obstacles: obstacles.into_iter().collect(),
            movable: movable.into_iter().collect(),
        }
    }

    /// An empty floor: no obstacles, every tile static.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scatter movable tiles and obstacles over the grid.
    ///
    /// Cells are distinct; obstacles never share a cell with a movable tile,
    /// and the spawn cell is always left free. `WorldConfig` validation
    /// guarantees enough free cells exist.
    pub fn generate(config: &WorldConfig, seed: u64) -> Self {
        let _span = tracing::debug_span!("layout_generate", seed).entered();
        let mut rng = SplitMix64::new(seed);
        let spawn = TileCoord::containing(config.spawn_x, config.spawn_z);
        let mut taken = BTreeSet::from([spawn]);

        let draw_free = |rng: &mut SplitMix64, taken: &mut BTreeSet<TileCoord>| loop {
            let cell = TileCoord::new(
                rng.below(config.grid_width as u64) as i32,
                rng.below(config.grid_depth as u64) as i32,
            );
            if taken.insert(cell) {
                return cell;
            }
        };

        let movable: BTreeSet<TileCoord> = (0..config.movable_tile_count)
            .map(|_| draw_free(&mut rng, &mut taken))
            .collect();
        let obstacles: Vec<Obstacle> = (0..config.obstacle_count)
            .map(|_| Obstacle {
                cell: draw_free(&mut rng, &mut taken),
            })
            .collect();

        tracing::debug!(
            obstacles = obstacles.len(),
            movable = movable.len(),
            "scene layout generated"
        );
        Self { obstacles, movable }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn movable_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.movable.iter().copied()
    }

    pub fn is_movable(&self, cell: TileCoord) -> bool {
        self.movable.contains(&cell)
    }

    /// First obstacle whose footprint contains `(x, z)`.
    pub fn obstacle_at(&self, x: f32, z: f32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.contains(x, z))
    }

    /// First movable tile (in cell order) whose hit-box contains `(x, z)`.
    pub fn movable_under(&self, x: f32, z: f32) -> Option<TileCoord> {
        self.movable
            .iter()
            .find(|t| is_on_movable_floor(x, z, t.x as f32, t.z as f32))
            .copied()
    }
}

/// Splitmix64: small deterministic generator, identical across platforms.
#[derive(Debug, Clone)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform-enough value in `0..bound` for grid-sized bounds.
    fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_footprint_is_half_open() {
        let o = Obstacle::new(3, 4);
        assert!(o.contains(3.0, 4.0));
        assert!(o.contains(3.99, 4.99));
        assert!(!o.contains(4.0, 4.5));
        assert!(!o.contains(3.5, 5.0));
        assert!(!o.contains(2.99, 4.5));
    }

    #[test]
    fn movable_hit_box_is_generous() {
        assert!(is_on_movable_floor(5.0, 5.0, 5.0, 5.0));
        assert!(is_on_movable_floor(4.2, 6.8, 5.0, 5.0));
        assert!(!is_on_movable_floor(4.1, 5.0, 5.0, 5.0));
        assert!(!is_on_movable_floor(5.0, 6.9, 5.0, 5.0));
    }

    #[test]
    fn generation_is_deterministic() {
        let cfg = WorldConfig::default();
        let a = SceneLayout::generate(&cfg, 42);
        let b = SceneLayout::generate(&cfg, 42);
        assert_eq!(a, b);
        let c = SceneLayout::generate(&cfg, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn generation_respects_counts_and_grid() {
        let cfg = WorldConfig::default();
        for seed in 0..20 {
            let layout = SceneLayout::generate(&cfg, seed);
            assert_eq!(layout.obstacles().len(), cfg.obstacle_count);
            assert_eq!(layout.movable_tiles().count(), cfg.movable_tile_count);
            for o in layout.obstacles() {
                assert!((0..cfg.grid_width).contains(&o.cell.x));
                assert!((0..cfg.grid_depth).contains(&o.cell.z));
                assert!(!layout.is_movable(o.cell));
            }
        }
    }

    #[test]
    fn spawn_cell_is_never_blocked() {
        let cfg = WorldConfig::default();
        for seed in 0..50 {
            let layout = SceneLayout::generate(&cfg, seed);
            assert!(layout.obstacle_at(cfg.spawn_x, cfg.spawn_z).is_none());
            assert!(!layout.is_movable(TileCoord::containing(cfg.spawn_x, cfg.spawn_z)));
        }
    }

    #[test]
    fn obstacles_are_distinct() {
        let layout = SceneLayout::generate(&WorldConfig::default(), 9);
        let unique: BTreeSet<_> = layout.obstacles().iter().map(|o| o.cell).collect();
        assert_eq!(unique.len(), layout.obstacles().len());
    }

    #[test]
    fn movable_under_uses_hit_box() {
        let layout = SceneLayout::new([], [TileCoord::new(2, 2)]);
        assert_eq!(layout.movable_under(3.5, 2.5), Some(TileCoord::new(2, 2)));
        assert_eq!(layout.movable_under(4.0, 2.5), None);
    }
}
