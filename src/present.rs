//! Bevy presentation of the veil.
//!
//! Drives [`Veil`](crate::Veil) from Bevy's frame clock, the primary window's
//! resize messages and cursor position, and mirrors its retained surface into
//! `Mesh2d` entities under one layer entity per grid generation.

mod entities;
mod systems;

pub use entities::{PresentedLayer, TileVisual, VeilCamera, VeilHost, VeilLayer};
pub use systems::layer_translation;

use bevy::prelude::*;

use crate::config::VeilConfig;

/// Mounts a hex veil on the primary window.
pub struct VeilPlugin(pub VeilConfig);

impl Plugin for VeilPlugin {
    fn build(&self, app: &mut App) {
        let spec = match self.0.validate() {
            Ok(spec) => spec,
            Err(err) => {
                error!(%err, "invalid hex veil configuration, veil disabled");
                return;
            }
        };
        app.register_type::<VeilConfig>()
            .register_type::<TileVisual>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .insert_resource(VeilHost::new(spec))
            .init_resource::<PresentedLayer>()
            .add_systems(Startup, systems::spawn_camera)
            .add_systems(
                Update,
                (
                    systems::attach_surface,
                    systems::observe_resize,
                    systems::track_pointer,
                    systems::update_cursor_icon,
                    systems::advance_frame,
                    systems::present_layer,
                    systems::present_alpha,
                )
                    .chain(),
            )
            .add_systems(Last, systems::teardown_on_exit);
    }
}
