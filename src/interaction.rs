//! Pointer interaction: hit regions, hover transitions, and the animation
//! entries they register.

use bevy::math::Vec2;

use crate::animation::{AlphaAnimations, AnimationEntry};
use crate::config::HexSpec;
use crate::geometry::{Generation, Tile, TileId};
use crate::math;

/// Hit-test slack in logical pixels, so points on a shared edge still land.
const HIT_TOLERANCE: f32 = 1e-3;

/// Receives pointer transitions for individual tiles.
pub trait TileEvents {
    /// The pointer entered `tile`.
    fn on_enter(&mut self, tile: TileId);
    /// The pointer left `tile`.
    fn on_leave(&mut self, tile: TileId);
}

/// Registers a hit region matching the tile's polygon.
pub fn bind_tile(tile: &mut Tile) {
    tile.hit_area = Some(tile.corners);
}

/// Turns hover transitions into alpha animations.
///
/// Enter always fades toward the hover target; leave restores the default
/// alpha only when `restore_on_leave` is set.
pub struct HoverResponder<'a> {
    animations: &'a mut AlphaAnimations,
    spec: &'a HexSpec,
}

impl<'a> HoverResponder<'a> {
    /// Wraps the animation set of the live generation.
    pub fn new(animations: &'a mut AlphaAnimations, spec: &'a HexSpec) -> Self {
        Self { animations, spec }
    }
}

impl TileEvents for HoverResponder<'_> {
    fn on_enter(&mut self, tile: TileId) {
        self.animations.upsert(
            tile,
            AnimationEntry {
                target_alpha: self.spec.hover_target_alpha,
                speed: self.spec.hover_speed,
            },
        );
    }

    fn on_leave(&mut self, tile: TileId) {
        if !self.spec.restore_on_leave {
            return;
        }
        self.animations.upsert(
            tile,
            AnimationEntry {
                target_alpha: self.spec.default_alpha,
                speed: self.spec.return_speed,
            },
        );
    }
}

/// Tracks which bound tile is under the pointer and reports changes.
///
/// A stationary pointer reports nothing; only crossing a tile boundary (or
/// leaving the surface) produces events.
#[derive(Debug, Default)]
pub struct HoverTracker {
    hovered: Option<TileId>,
}

impl HoverTracker {
    /// Tile currently under the pointer.
    pub fn hovered(&self) -> Option<TileId> {
        self.hovered
    }

    /// Forgets the hovered tile without emitting a leave.
    pub fn reset(&mut self) {
        self.hovered = None;
    }

    /// Feeds a pointer position in surface space (`None` once it left the surface).
    pub fn pointer_moved(
        &mut self,
        generation: &Generation,
        position: Option<Vec2>,
        events: &mut impl TileEvents,
    ) {
        let under = position.and_then(|p| hit_test(generation, p));
        if under == self.hovered {
            return;
        }
        if let Some(old) = self.hovered.take() {
            events.on_leave(old);
        }
        if let Some(new) = under {
            events.on_enter(new);
        }
        self.hovered = under;
    }
}

/// The bound tile whose hit region contains `surface_point`.
pub fn hit_test(generation: &Generation, surface_point: Vec2) -> Option<TileId> {
    let tile = generation.tile_at(surface_point)?;
    let area = tile.hit_area.as_ref()?;
    let local = surface_point - generation.offset();
    math::point_in_convex_polygon(local, area, HIT_TOLERANCE).then_some(tile.id)
}
