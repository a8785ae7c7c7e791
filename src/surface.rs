//! Drawing surface and the veil engine that owns it.
//!
//! [`Veil`] wires geometry, rendering, hover handling, animation and resize
//! coalescing together behind a small lifecycle:
//!
//! ```text
//! mount ─► Initializing ──attach Ok──► Ready ──┐
//!               │                               ├─ teardown ─► TornDown
//!               └───attach Err──► Inert ────────┘
//! ```
//!
//! Surface setup is asynchronous from the engine's point of view: the host
//! reports the outcome through [`Veil::attach_surface`] whenever it arrives,
//! including after teardown, in which case the late surface is disposed.

use bevy::log::{debug, info, warn};
use bevy::math::Vec2;
use thiserror::Error;

use crate::animation::AlphaAnimations;
use crate::config::HexSpec;
use crate::geometry::{Generation, GridDimensions, TileId, enumerate_grid};
use crate::interaction::{HoverResponder, HoverTracker, bind_tile};
use crate::render::draw_tile;
use crate::resize::ResizeCoalescer;

/// Why a drawing surface could not be created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// The host has nothing to draw into.
    #[error("no rendering context is available")]
    NoRenderContext,
    /// The container had no area when the surface was created.
    #[error("container has zero size ({0}x{1})")]
    ZeroSizedContainer(f32, f32),
    /// The container reported a NaN or infinite size.
    #[error("container size is not finite")]
    NonFiniteSize,
}

/// Retained drawing surface: a container size and at most one tile layer.
#[derive(Debug)]
pub struct Surface {
    size: Vec2,
    layer: Option<Generation>,
    disposed: bool,
}

impl Surface {
    /// Creates a surface sized to its container.
    pub fn new(size: Vec2) -> Result<Self, SurfaceError> {
        if !size.is_finite() {
            return Err(SurfaceError::NonFiniteSize);
        }
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(SurfaceError::ZeroSizedContainer(size.x, size.y));
        }
        Ok(Self {
            size,
            layer: None,
            disposed: false,
        })
    }

    /// Current container size.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Follows the container size.
    pub fn resize_to(&mut self, size: Vec2) {
        if size.is_finite() {
            self.size = size;
        }
    }

    /// The live tile layer.
    pub fn layer(&self) -> Option<&Generation> {
        self.layer.as_ref()
    }

    /// Mutable access to the live tile layer.
    pub fn layer_mut(&mut self) -> Option<&mut Generation> {
        self.layer.as_mut()
    }

    /// Installs `layer`, returning the one it replaces.
    pub fn install(&mut self, layer: Generation) -> Option<Generation> {
        self.layer.replace(layer)
    }

    /// Removes the live layer.
    pub fn take_layer(&mut self) -> Option<Generation> {
        self.layer.take()
    }

    /// Releases the layer and marks the surface unusable.
    pub fn dispose(&mut self) {
        self.layer = None;
        self.disposed = true;
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Lifecycle stage of a [`Veil`].
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Waiting for the surface.
    Initializing,
    /// Rendering and animating.
    Ready,
    /// Surface setup failed; nothing renders.
    Inert(SurfaceError),
    /// Torn down; every call is a no-op.
    TornDown,
}

/// What happened to a surface handed to [`Veil::attach_surface`].
#[derive(Debug, Clone, PartialEq)]
pub enum Attach {
    /// The surface is live and the first grid was built.
    Ready,
    /// Setup failed; the veil stays inert.
    Inert,
    /// The veil was not waiting for a surface; the surface was disposed.
    Discarded,
}

/// The pointer-reactive hex veil.
///
/// Dropping a `Veil` tears it down.
#[derive(Debug)]
pub struct Veil {
    spec: HexSpec,
    phase: Phase,
    surface: Option<Surface>,
    animations: AlphaAnimations,
    hover: HoverTracker,
    resize: ResizeCoalescer,
    ticking: bool,
    observing: bool,
    next_generation: u32,
    regenerations: u64,
    changed: Vec<TileId>,
}

impl Veil {
    /// Mounts a veil that waits for its surface.
    pub fn mount(spec: HexSpec) -> Self {
        info!(hex_size = spec.size, overscan = spec.overscan, "mounting hex veil");
        Self {
            spec,
            phase: Phase::Initializing,
            surface: None,
            animations: AlphaAnimations::default(),
            hover: HoverTracker::default(),
            resize: ResizeCoalescer::default(),
            ticking: false,
            observing: false,
            next_generation: 0,
            regenerations: 0,
            changed: Vec::new(),
        }
    }

    /// Delivers the outcome of surface setup.
    ///
    /// On success the frame callback and resize observation start and the
    /// first grid is built immediately.
    pub fn attach_surface(&mut self, result: Result<Surface, SurfaceError>) -> Attach {
        if self.phase != Phase::Initializing {
            if let Ok(mut late) = result {
                debug!(phase = ?self.phase, "discarding late surface");
                late.dispose();
            }
            return Attach::Discarded;
        }
        match result {
            Ok(surface) => {
                self.surface = Some(surface);
                self.ticking = true;
                self.observing = true;
                self.phase = Phase::Ready;
                info!("hex veil surface ready");
                self.regenerate();
                Attach::Ready
            }
            Err(err) => {
                warn!(%err, "hex veil surface unavailable, staying inert");
                self.phase = Phase::Inert(err);
                Attach::Inert
            }
        }
    }

    /// Reports a new container size.
    ///
    /// The surface keeps its current size until the next frame, which applies
    /// the last size reported and regenerates once.
    pub fn observe_resize(&mut self, size: Vec2) {
        if !self.observing {
            return;
        }
        self.resize.request(size);
    }

    /// Reports the pointer position in surface space, `None` when outside.
    pub fn pointer_moved(&mut self, position: Option<Vec2>) {
        if self.phase != Phase::Ready {
            return;
        }
        let Some(layer) = self.surface.as_ref().and_then(Surface::layer) else {
            return;
        };
        let mut responder = HoverResponder::new(&mut self.animations, &self.spec);
        self.hover.pointer_moved(layer, position, &mut responder);
    }

    /// Frame callback: runs a due regeneration, then advances animations by
    /// `frame_delta` reference frames.
    pub fn frame(&mut self, frame_delta: f32) {
        self.changed.clear();
        if !self.ticking {
            return;
        }
        if let Some(size) = self.resize.on_frame() {
            if let Some(surface) = self.surface.as_mut() {
                surface.resize_to(size);
            }
            self.regenerate();
        }
        let Some(layer) = self.surface.as_mut().and_then(Surface::layer_mut) else {
            return;
        };
        self.animations.tick(
            layer,
            frame_delta,
            self.spec.convergence_epsilon,
            &mut self.changed,
        );
    }

    /// Rebuilds the grid for the current surface size.
    ///
    /// The previous generation, its animations and the hover state are
    /// replaced in one step. Returns `false` (and changes nothing) when the
    /// veil is not ready, the container has no area, or the grid would be
    /// too large.
    pub fn regenerate(&mut self) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let size = surface.size();
        if !(size.x > 0.0 && size.y > 0.0) {
            debug!(width = size.x, height = size.y, "skipping regeneration of empty container");
            return false;
        }
        let dims =
            GridDimensions::for_viewport(size.x, size.y, self.spec.size, self.spec.overscan);
        if dims.is_empty() {
            return false;
        }

        let id = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        let mut generation = enumerate_grid(id, dims, &self.spec, self.spec.default_alpha);
        for tile in generation.tiles_mut() {
            draw_tile(&mut tile.node, &tile.corners, &self.spec);
            bind_tile(tile);
        }

        self.animations.clear();
        self.hover.reset();
        self.changed.clear();
        let previous = surface.install(generation);
        self.regenerations += 1;
        debug!(
            generation = id,
            columns = dims.columns,
            rows = dims.rows,
            replaced = previous.is_some(),
            "regenerated hex grid"
        );
        true
    }

    /// Tears the veil down. Safe to call repeatedly and in any phase.
    ///
    /// Order: stop observing resizes (cancelling a pending regeneration),
    /// stop the frame callback, drop the grid generation, dispose the surface.
    pub fn teardown(&mut self) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.observing = false;
        self.resize.cancel();
        self.ticking = false;
        self.animations.clear();
        self.hover.reset();
        self.changed.clear();
        if let Some(mut surface) = self.surface.take() {
            surface.take_layer();
            surface.dispose();
        }
        self.phase = Phase::TornDown;
        info!("hex veil torn down");
    }

    /// Current lifecycle stage.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether the veil is rendering.
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Validated options.
    pub fn spec(&self) -> &HexSpec {
        &self.spec
    }

    /// The live surface.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// The live grid generation.
    pub fn generation(&self) -> Option<&Generation> {
        self.surface.as_ref().and_then(Surface::layer)
    }

    /// Active animations.
    pub fn animations(&self) -> &AlphaAnimations {
        &self.animations
    }

    /// Tile under the pointer.
    pub fn hovered(&self) -> Option<TileId> {
        self.hover.hovered()
    }

    /// Tiles whose alpha changed during the last frame.
    pub fn changed(&self) -> &[TileId] {
        &self.changed
    }

    /// Whether a resize-triggered regeneration is waiting for the next frame.
    pub fn regeneration_pending(&self) -> bool {
        self.resize.pending().is_some()
    }

    /// Completed regenerations since mount.
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Whether the frame callback is registered.
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }
}

impl Drop for Veil {
    fn drop(&mut self) {
        self.teardown();
    }
}
