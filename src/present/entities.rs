use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::config::HexSpec;
use crate::geometry::TileId;
use crate::surface::{Phase, Veil};

/// Marker for the 2D camera the veil renders through.
#[derive(Component)]
pub struct VeilCamera;

/// Parent of every tile visual of one grid generation.
#[derive(Component)]
pub struct VeilLayer;

/// One paint pass (fill or stroke) of a tile.
#[derive(Component, Reflect)]
pub struct TileVisual {
    /// Generation the tile belongs to.
    pub generation: u32,
    /// Row-major slot of the tile.
    pub index: u32,
}

/// Owns the mounted veil, if any.
///
/// Unmounting drops the veil, which tears it down.
#[derive(Resource)]
pub struct VeilHost {
    spec: HexSpec,
    veil: Option<Veil>,
    mounts: u32,
}

impl VeilHost {
    /// Host with a freshly mounted veil.
    pub fn new(spec: HexSpec) -> Self {
        let veil = Veil::mount(spec.clone());
        Self {
            spec,
            veil: Some(veil),
            mounts: 1,
        }
    }

    /// Mounts a new veil unless one is live. Returns whether it mounted.
    pub fn mount(&mut self) -> bool {
        let live = self
            .veil
            .as_ref()
            .is_some_and(|v| *v.phase() != Phase::TornDown);
        if live {
            return false;
        }
        self.veil = Some(Veil::mount(self.spec.clone()));
        self.mounts += 1;
        true
    }

    /// Tears the current veil down. Returns whether one was mounted.
    pub fn unmount(&mut self) -> bool {
        self.veil.take().is_some()
    }

    /// Whether a veil is mounted.
    pub fn is_mounted(&self) -> bool {
        self.veil.is_some()
    }

    /// The mounted veil.
    pub fn veil(&self) -> Option<&Veil> {
        self.veil.as_ref()
    }

    /// Mutable access to the mounted veil.
    pub fn veil_mut(&mut self) -> Option<&mut Veil> {
        self.veil.as_mut()
    }

    /// Counts mounts, so layers of different mounts never compare equal.
    pub fn mounts(&self) -> u32 {
        self.mounts
    }
}

/// What is currently spawned for the live generation.
#[derive(Resource, Default)]
pub struct PresentedLayer {
    /// `(mount, generation)` of the spawned layer.
    pub key: Option<(u32, u32)>,
    /// Layer entity.
    pub root: Option<Entity>,
    /// Per-tile materials with their colors before tile alpha is applied.
    pub materials: HashMap<TileId, Vec<(Handle<ColorMaterial>, Color)>>,
}
