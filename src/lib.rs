#![warn(missing_docs)]
//! Pointer-reactive hexagon veil.
//!
//! Covers a viewport with a hexagonal tiling whose tiles fade when the
//! pointer enters them, and rebuilds the tiling (at most once per frame)
//! when the viewport resizes.
//!
//! The engine ([`Veil`]) is plain data driven by explicit calls: attach a
//! surface, report resizes and pointer moves, and call
//! [`frame`](Veil::frame) with the elapsed time. [`VeilPlugin`] does that
//! from Bevy's window and clock and renders the tiles as 2D meshes.

pub mod animation;
pub mod config;
pub mod geometry;
pub mod interaction;
pub mod math;
pub mod present;
pub mod render;
pub mod resize;
pub mod surface;

pub use animation::{AlphaAnimations, AnimationEntry};
pub use config::{ConfigError, HexSpec, VeilConfig};
pub use geometry::{Generation, GridDimensions, Tile, TileId};
pub use interaction::{HoverResponder, HoverTracker, TileEvents};
pub use present::{VeilHost, VeilPlugin};
pub use resize::ResizeCoalescer;
pub use surface::{Attach, Phase, Surface, SurfaceError, Veil};
