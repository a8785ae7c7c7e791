//! User-facing options and their validated, immutable form.

use bevy::color::Color;
use bevy::math::Vec2;
use bevy::prelude::{Reflect, Resource};
use hexx::HexOrientation;
use thiserror::Error;

/// Options for one veil instance.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct VeilConfig {
    /// Hexagon circumradius in logical pixels.
    pub hex_size: f32,
    /// Extra columns and rows enumerated beyond the visible minimum.
    pub overscan: u32,
    /// Hexagon orientation.
    pub orientation: HexOrientation,
    /// Translation of the tile layer relative to the surface origin.
    ///
    /// `None` means one tile up and to the left, `(-hex_size, -hex_size)`.
    pub grid_offset: Option<Vec2>,
    /// Outline thickness in logical pixels.
    pub stroke_width: f32,
    /// Tile body color.
    pub fill_color: Color,
    /// Outline color.
    pub stroke_color: Color,
    /// Opacity applied to the fill on top of the tile alpha.
    pub fill_alpha: f32,
    /// Opacity applied to the outline on top of the tile alpha.
    pub stroke_alpha: f32,
    /// Tile alpha right after a regeneration, and the target of the return transition.
    pub default_alpha: f32,
    /// Alpha a tile animates toward when the pointer enters it.
    pub hover_target_alpha: f32,
    /// Blend factor per reference frame for the hover transition.
    pub hover_speed: f32,
    /// Blend factor per reference frame for the return transition.
    pub return_speed: f32,
    /// Animate back to `default_alpha` when the pointer leaves a tile.
    pub restore_on_leave: bool,
    /// An animation snaps to its target once closer than this.
    pub convergence_epsilon: f32,
    /// Color behind the tiles, revealed as they fade.
    pub clear_color: Color,
}

impl Default for VeilConfig {
    fn default() -> Self {
        Self {
            hex_size: 90.0,
            overscan: 6,
            orientation: HexOrientation::Flat,
            grid_offset: None,
            stroke_width: 1.0,
            fill_color: Color::BLACK,
            stroke_color: Color::srgb_u8(0xc0, 0xc0, 0xc0),
            fill_alpha: 1.0,
            stroke_alpha: 1.0,
            default_alpha: 1.0,
            hover_target_alpha: 0.0,
            hover_speed: 0.2,
            return_speed: 0.08,
            restore_on_leave: false,
            convergence_epsilon: 0.01,
            clear_color: Color::srgb(0.05, 0.09, 0.07),
        }
    }
}

/// Rejected configuration. Each variant names the offending option.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `hex_size` must be strictly positive.
    #[error("hex_size must be greater than zero, got {0}")]
    NonPositiveHexSize(f32),
    /// A numeric option was NaN or infinite.
    #[error("{0} must be a finite number")]
    NonFiniteValue(&'static str),
    /// An alpha option fell outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    AlphaOutOfRange {
        /// Option name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A speed option fell outside `(0, 1]`.
    #[error("{name} must be within (0, 1], got {value}")]
    SpeedOutOfRange {
        /// Option name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// `convergence_epsilon` must be strictly positive.
    #[error("convergence_epsilon must be greater than zero, got {0}")]
    NonPositiveEpsilon(f32),
    /// `stroke_width` must not be negative.
    #[error("stroke_width must not be negative, got {0}")]
    NegativeStrokeWidth(f32),
}

/// Validated, immutable configuration of one veil instance.
#[derive(Clone, Debug, PartialEq)]
pub struct HexSpec {
    /// Hexagon circumradius in logical pixels.
    pub size: f32,
    /// Extra columns and rows beyond the visible minimum.
    pub overscan: u32,
    /// Hexagon orientation.
    pub orientation: HexOrientation,
    /// Layer translation relative to the surface origin.
    pub grid_offset: Vec2,
    /// Outline thickness.
    pub stroke_width: f32,
    /// Tile body color.
    pub fill_color: Color,
    /// Outline color.
    pub stroke_color: Color,
    /// Fill opacity.
    pub fill_alpha: f32,
    /// Outline opacity.
    pub stroke_alpha: f32,
    /// Alpha of freshly generated tiles.
    pub default_alpha: f32,
    /// Hover transition target.
    pub hover_target_alpha: f32,
    /// Hover transition speed.
    pub hover_speed: f32,
    /// Return transition speed.
    pub return_speed: f32,
    /// Whether leaving a tile starts the return transition.
    pub restore_on_leave: bool,
    /// Snap threshold.
    pub convergence_epsilon: f32,
}

impl VeilConfig {
    /// Checks every option and freezes the result into a [`HexSpec`].
    pub fn validate(&self) -> Result<HexSpec, ConfigError> {
        finite("hex_size", self.hex_size)?;
        if self.hex_size <= 0.0 {
            return Err(ConfigError::NonPositiveHexSize(self.hex_size));
        }
        finite("stroke_width", self.stroke_width)?;
        if self.stroke_width < 0.0 {
            return Err(ConfigError::NegativeStrokeWidth(self.stroke_width));
        }
        let grid_offset = self
            .grid_offset
            .unwrap_or(Vec2::splat(-self.hex_size));
        finite("grid_offset.x", grid_offset.x)?;
        finite("grid_offset.y", grid_offset.y)?;

        alpha("fill_alpha", self.fill_alpha)?;
        alpha("stroke_alpha", self.stroke_alpha)?;
        alpha("default_alpha", self.default_alpha)?;
        alpha("hover_target_alpha", self.hover_target_alpha)?;
        speed("hover_speed", self.hover_speed)?;
        speed("return_speed", self.return_speed)?;

        finite("convergence_epsilon", self.convergence_epsilon)?;
        if self.convergence_epsilon <= 0.0 {
            return Err(ConfigError::NonPositiveEpsilon(self.convergence_epsilon));
        }

        Ok(HexSpec {
            size: self.hex_size,
            overscan: self.overscan,
            orientation: self.orientation,
            grid_offset,
            stroke_width: self.stroke_width,
            fill_color: self.fill_color,
            stroke_color: self.stroke_color,
            fill_alpha: self.fill_alpha,
            stroke_alpha: self.stroke_alpha,
            default_alpha: self.default_alpha,
            hover_target_alpha: self.hover_target_alpha,
            hover_speed: self.hover_speed,
            return_speed: self.return_speed,
            restore_on_leave: self.restore_on_leave,
            convergence_epsilon: self.convergence_epsilon,
        })
    }
}

impl Default for HexSpec {
    fn default() -> Self {
        let cfg = VeilConfig::default();
        Self {
            size: cfg.hex_size,
            overscan: cfg.overscan,
            orientation: cfg.orientation,
            grid_offset: Vec2::splat(-cfg.hex_size),
            stroke_width: cfg.stroke_width,
            fill_color: cfg.fill_color,
            stroke_color: cfg.stroke_color,
            fill_alpha: cfg.fill_alpha,
            stroke_alpha: cfg.stroke_alpha,
            default_alpha: cfg.default_alpha,
            hover_target_alpha: cfg.hover_target_alpha,
            hover_speed: cfg.hover_speed,
            return_speed: cfg.return_speed,
            restore_on_leave: cfg.restore_on_leave,
            convergence_epsilon: cfg.convergence_epsilon,
        }
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteValue(name))
    }
}

fn alpha(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::AlphaOutOfRange { name, value })
    }
}

fn speed(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::SpeedOutOfRange { name, value })
    }
}
