//! Per-tile alpha animations, advanced once per frame.

use bevy::platform::collections::HashMap;

use crate::geometry::{Generation, TileId};
use crate::math;

/// An in-flight alpha transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationEntry {
    /// Alpha the tile is heading toward, in `[0, 1]`.
    pub target_alpha: f32,
    /// Blend factor per reference frame, in `(0, 1]`.
    pub speed: f32,
}

/// Active transitions keyed by tile. A tile has at most one.
#[derive(Debug, Default)]
pub struct AlphaAnimations {
    entries: HashMap<TileId, AnimationEntry>,
}

impl AlphaAnimations {
    /// Starts or replaces the transition for `tile`.
    ///
    /// A replaced transition continues from the tile's current alpha.
    pub fn upsert(&mut self, tile: TileId, entry: AnimationEntry) {
        self.entries.insert(tile, entry);
    }

    /// The active transition for `tile`, if any.
    pub fn get(&self, tile: TileId) -> Option<&AnimationEntry> {
        self.entries.get(&tile)
    }

    /// Number of active transitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is animating.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every transition.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether any transition targets a tile outside `generation`.
    pub fn references_other_generation(&self, generation: u32) -> bool {
        self.entries.keys().any(|id| id.generation != generation)
    }

    /// Advances every transition by `frame_delta` reference frames.
    ///
    /// Transitions within `epsilon` of their target snap to it and are removed.
    /// Entries whose tile is not in `generation` are dropped untouched. Every
    /// tile whose alpha was written is appended to `changed`.
    pub fn tick(
        &mut self,
        generation: &mut Generation,
        frame_delta: f32,
        epsilon: f32,
        changed: &mut Vec<TileId>,
    ) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.retain(|id, entry| {
            let Some(tile) = generation.tile_mut(*id) else {
                return false;
            };
            let delta = entry.target_alpha - tile.alpha;
            if delta.abs() < epsilon {
                if tile.alpha != entry.target_alpha {
                    tile.alpha = entry.target_alpha;
                    changed.push(*id);
                }
                return false;
            }
            let step = math::approach_step(delta, entry.speed, frame_delta);
            if step != 0.0 {
                tile.alpha = (tile.alpha + step).clamp(0.0, 1.0);
                changed.push(*id);
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexSpec;
    use crate::geometry::{GridDimensions, enumerate_grid};

    const HOVER: AnimationEntry = AnimationEntry {
        target_alpha: 0.0,
        speed: 0.2,
    };

    fn grid() -> Generation {
        enumerate_grid(1, GridDimensions { columns: 3, rows: 3 }, &HexSpec::default(), 1.0)
    }

    fn id(index: u32) -> TileId {
        TileId { generation: 1, index }
    }

    fn alpha(g: &Generation, index: u32) -> f32 {
        g.tile(id(index)).map(|t| t.alpha).unwrap()
    }

    #[test]
    fn single_step_matches_example() {
        let mut g = grid();
        let mut anims = AlphaAnimations::default();
        anims.upsert(id(0), HOVER);
        let mut changed = Vec::new();
        anims.tick(&mut g, 1.0, 0.01, &mut changed);
        assert!((alpha(&g, 0) - 0.8).abs() < 1e-6);
        assert_eq!(changed, vec![id(0)]);
        assert_eq!(anims.len(), 1);
    }

    #[test]
    fn empty_set_is_a_no_op() {
        let mut g = grid();
        let mut anims = AlphaAnimations::default();
        let mut changed = Vec::new();
        anims.tick(&mut g, 1.0, 0.01, &mut changed);
        assert!(changed.is_empty());
        assert!(g.tiles().iter().all(|t| t.alpha == 1.0));
    }

    #[test]
    fn converges_snaps_and_removes() {
        let mut g = grid();
        let mut anims = AlphaAnimations::default();
        anims.upsert(id(4), HOVER);
        let mut changed = Vec::new();
        let mut frames = 0;
        while !anims.is_empty() {
            anims.tick(&mut g, 1.0, 0.01, &mut changed);
            frames += 1;
            assert!(frames < 100, "did not converge");
        }
        assert_eq!(alpha(&g, 4), 0.0);

        changed.clear();
        anims.tick(&mut g, 1.0, 0.01, &mut changed);
        assert!(changed.is_empty());
        assert_eq!(alpha(&g, 4), 0.0);
    }

    #[test]
    fn upsert_overwrites_without_resetting_alpha() {
        let mut g = grid();
        let mut anims = AlphaAnimations::default();
        let mut changed = Vec::new();
        anims.upsert(id(2), HOVER);
        anims.tick(&mut g, 1.0, 0.01, &mut changed);
        anims.tick(&mut g, 1.0, 0.01, &mut changed);
        let mid = alpha(&g, 2);

        let back = AnimationEntry {
            target_alpha: 1.0,
            speed: 0.08,
        };
        anims.upsert(id(2), back);
        assert_eq!(anims.len(), 1);
        assert_eq!(anims.get(id(2)), Some(&back));
        assert_eq!(alpha(&g, 2), mid);

        anims.tick(&mut g, 1.0, 0.01, &mut changed);
        let expected = mid + (1.0 - mid) * 0.08;
        assert!((alpha(&g, 2) - expected).abs() < 1e-6);
    }

    #[test]
    fn stale_generation_entries_are_dropped_untouched() {
        let mut g = grid();
        let mut anims = AlphaAnimations::default();
        anims.upsert(TileId { generation: 0, index: 0 }, HOVER);
        assert!(anims.references_other_generation(1));
        let mut changed = Vec::new();
        anims.tick(&mut g, 1.0, 0.01, &mut changed);
        assert!(anims.is_empty());
        assert!(changed.is_empty());
        assert_eq!(alpha(&g, 0), 1.0);
    }

    #[test]
    fn zero_frame_delta_makes_no_progress() {
        let mut g = grid();
        let mut anims = AlphaAnimations::default();
        anims.upsert(id(1), HOVER);
        let mut changed = Vec::new();
        anims.tick(&mut g, 0.0, 0.01, &mut changed);
        assert_eq!(alpha(&g, 1), 1.0);
        assert!(changed.is_empty());
        assert_eq!(anims.len(), 1);
    }
}
