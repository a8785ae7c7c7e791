//! Hex veil demo.
//!
//! Fills the window with the veil. Space unmounts/remounts it, Tab toggles
//! the world inspector, Esc quits.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use hex_veil::{VeilConfig, VeilHost, VeilPlugin};

/// Demo state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
enum DemoState {
    /// Veil running, inspector hidden.
    #[default]
    Running,
    /// World inspector visible.
    Inspecting,
}

#[cfg(feature = "native")]
mod cli {
    use clap::Parser;
    use hex_veil::VeilConfig;
    use hexx::HexOrientation;

    /// Pointer-reactive hexagon veil.
    #[derive(Parser, Debug)]
    #[command(version, about)]
    pub struct Cli {
        /// Hexagon circumradius in logical pixels.
        #[arg(long, default_value_t = 90.0)]
        pub hex_size: f32,
        /// Extra columns and rows beyond the visible minimum.
        #[arg(long, default_value_t = 6)]
        pub overscan: u32,
        /// Use pointy-topped hexagons.
        #[arg(long)]
        pub pointy: bool,
        /// Fade tiles back in when the pointer leaves them.
        #[arg(long)]
        pub restore_on_leave: bool,
        /// Blend factor per frame when fading out on hover.
        #[arg(long, default_value_t = 0.2)]
        pub hover_speed: f32,
        /// Blend factor per frame when fading back in.
        #[arg(long, default_value_t = 0.08)]
        pub return_speed: f32,
    }

    impl Cli {
        /// Layers the flags over `base`.
        pub fn apply(self, base: VeilConfig) -> VeilConfig {
            VeilConfig {
                hex_size: self.hex_size,
                overscan: self.overscan,
                orientation: if self.pointy {
                    HexOrientation::Pointy
                } else {
                    HexOrientation::Flat
                },
                restore_on_leave: self.restore_on_leave,
                hover_speed: self.hover_speed,
                return_speed: self.return_speed,
                ..base
            }
        }
    }
}

fn load_config() -> VeilConfig {
    #[cfg(feature = "native")]
    {
        use clap::Parser;
        cli::Cli::parse().apply(VeilConfig::default())
    }
    #[cfg(not(feature = "native"))]
    {
        VeilConfig::default()
    }
}

fn main() -> anyhow::Result<()> {
    let config = load_config();
    config.validate()?;

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Veil".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<DemoState>()
    .init_state::<DemoState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(VeilPlugin(config))
    .add_systems(Update, (exit_on_esc, toggle_inspector, toggle_mount))
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(DemoState::Inspecting)));

    app.run();
    Ok(())
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<DemoState>>,
    mut next: ResMut<NextState<DemoState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        next.set(match state.get() {
            DemoState::Running => DemoState::Inspecting,
            DemoState::Inspecting => DemoState::Running,
        });
    }
}

fn toggle_mount(keys: Res<ButtonInput<KeyCode>>, mut host: ResMut<VeilHost>) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    if host.is_mounted() {
        host.unmount();
        info!("hex veil unmounted");
    } else if host.mount() {
        info!(mount = host.mounts(), "hex veil remounted");
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
