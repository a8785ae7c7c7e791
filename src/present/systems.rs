use bevy::app::AppExit;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon, WindowResized};

use super::entities::{PresentedLayer, TileVisual, VeilCamera, VeilHost, VeilLayer};
use crate::geometry::{Generation, TileId};
use crate::math;
use crate::render::paint_meshes;
use crate::surface::{Phase, Surface, SurfaceError, Veil};

/// Depth step between paint passes, so every outline sits above every fill.
const PAINT_Z_STEP: f32 = 0.5;

// ── Startup ─────────────────────────────────────────────────────────

/// Spawns the 2D camera the veil renders through.
pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("VeilCamera"), Camera2d, VeilCamera));
}

// ── Update: engine input ────────────────────────────────────────────

/// Completes surface setup once the primary window can be measured.
pub fn attach_surface(mut host: ResMut<VeilHost>, windows: Query<&Window, With<PrimaryWindow>>) {
    let Some(veil) = host.veil_mut() else { return };
    if *veil.phase() != Phase::Initializing {
        return;
    }
    let result = match windows.single() {
        Ok(window) => Surface::new(window.size()),
        Err(_) => Err(SurfaceError::NoRenderContext),
    };
    veil.attach_surface(result);
}

/// Forwards primary-window resizes to the veil's coalescer.
pub fn observe_resize(
    mut host: ResMut<VeilHost>,
    mut resized: MessageReader<WindowResized>,
    primary: Query<Entity, With<PrimaryWindow>>,
) {
    let sizes: Vec<Vec2> = resized
        .read()
        .filter(|ev| primary.get(ev.window).is_ok())
        .map(|ev| Vec2::new(ev.width, ev.height))
        .collect();
    let Some(veil) = host.veil_mut() else { return };
    for size in sizes {
        veil.observe_resize(size);
    }
}

/// Feeds the cursor position (top-left origin, logical pixels) to the veil.
pub fn track_pointer(mut host: ResMut<VeilHost>, windows: Query<&Window, With<PrimaryWindow>>) {
    let Some(veil) = host.veil_mut() else { return };
    let position = windows.single().ok().and_then(Window::cursor_position);
    veil.pointer_moved(position);
}

/// Cursor shown over the window: a pointing hand while a tile is hovered.
pub fn cursor_for(hovering: bool) -> CursorIcon {
    if hovering {
        SystemCursorIcon::Pointer.into()
    } else {
        CursorIcon::default()
    }
}

/// Swaps the primary window's cursor when hovering starts or stops.
pub fn update_cursor_icon(
    mut commands: Commands,
    host: Res<VeilHost>,
    windows: Query<(Entity, Option<&CursorIcon>), With<PrimaryWindow>>,
) {
    let Ok((window, current)) = windows.single() else {
        return;
    };
    let hovering = host.veil().and_then(Veil::hovered).is_some();
    let wanted = cursor_for(hovering);
    if current != Some(&wanted) {
        commands.entity(window).insert(wanted);
    }
}

/// Runs the veil's frame callback with the elapsed time in reference frames.
pub fn advance_frame(mut host: ResMut<VeilHost>, time: Res<Time>) {
    if let Some(veil) = host.veil_mut() {
        veil.frame(math::frames_elapsed(time.delta_secs()));
    }
}

// ── Update: presentation ────────────────────────────────────────────

/// World translation that puts surface point `offset` at the window's
/// top-left corner under a centred 2D camera.
pub fn layer_translation(surface_size: Vec2, offset: Vec2) -> Vec3 {
    Vec3::new(
        offset.x - surface_size.x / 2.0,
        surface_size.y / 2.0 - offset.y,
        0.0,
    )
}

/// Replaces the spawned layer when the live generation changes, and keeps
/// it anchored to the window's top-left corner.
pub fn present_layer(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    host: Res<VeilHost>,
    mut presented: ResMut<PresentedLayer>,
    mut layers: Query<&mut Transform, With<VeilLayer>>,
) {
    let veil = host.veil();
    let surface = veil.and_then(Veil::surface);
    let live = veil.and_then(Veil::generation);
    let key = live.map(|g| (host.mounts(), g.id()));

    if presented.key != key {
        if let Some(root) = presented.root.take() {
            commands.entity(root).despawn();
        }
        presented.materials.clear();
        presented.key = key;

        if let (Some(generation), Some(surface)) = (live, surface) {
            let (root, tile_materials) = spawn_layer(
                &mut commands,
                &mut meshes,
                &mut materials,
                generation,
                surface.size(),
            );
            presented.root = Some(root);
            presented.materials = tile_materials;
            debug!(
                generation = generation.id(),
                tiles = generation.tiles().len(),
                "presented hex layer"
            );
        }
        return;
    }

    if let (Some(root), Some(surface), Some(generation)) = (presented.root, surface, live)
        && let Ok(mut transform) = layers.get_mut(root)
    {
        transform.translation = layer_translation(surface.size(), generation.offset());
    }
}

fn spawn_layer(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    generation: &Generation,
    surface_size: Vec2,
) -> (Entity, HashMap<TileId, Vec<(Handle<ColorMaterial>, Color)>>) {
    let root = commands
        .spawn((
            Name::new(format!("HexVeilLayer({})", generation.id())),
            VeilLayer,
            Transform::from_translation(layer_translation(surface_size, generation.offset())),
            Visibility::default(),
        ))
        .id();

    let mut tile_materials = HashMap::new();
    for tile in generation.tiles() {
        let mut handles = Vec::new();
        for (pass, paint) in paint_meshes(&tile.node).into_iter().enumerate() {
            let material = materials.add(ColorMaterial {
                color: paint.color.with_alpha(paint.color.alpha() * tile.alpha),
                ..default()
            });
            let entity = commands
                .spawn((
                    TileVisual {
                        generation: tile.id.generation,
                        index: tile.id.index,
                    },
                    Name::new(format!("Tile({},{})", tile.column, tile.row)),
                    Mesh2d(meshes.add(paint.mesh)),
                    MeshMaterial2d(material.clone()),
                    Transform::from_xyz(0.0, 0.0, pass as f32 * PAINT_Z_STEP),
                ))
                .id();
            commands.entity(root).add_child(entity);
            handles.push((material, paint.color));
        }
        tile_materials.insert(tile.id, handles);
    }
    (root, tile_materials)
}

/// Pushes the alpha of tiles that changed this frame into their materials.
pub fn present_alpha(
    host: Res<VeilHost>,
    presented: Res<PresentedLayer>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let Some(veil) = host.veil() else { return };
    let Some(generation) = veil.generation() else {
        return;
    };
    for id in veil.changed() {
        let (Some(tile), Some(paints)) = (generation.tile(*id), presented.materials.get(id))
        else {
            continue;
        };
        for (handle, base) in paints {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = base.with_alpha(base.alpha() * tile.alpha);
            }
        }
    }
}

// ── Last ────────────────────────────────────────────────────────────

/// Tears the veil down when the app is exiting.
pub fn teardown_on_exit(mut exit: MessageReader<AppExit>, mut host: ResMut<VeilHost>) {
    if exit.read().count() > 0 && host.unmount() {
        info!("app exiting, hex veil unmounted");
    }
}
