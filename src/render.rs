//! Tile renderer: a retained display list per tile, and the meshes built from it.

use bevy::asset::RenderAssetUsages;
use bevy::color::{Alpha, Color};
use bevy::math::Vec2;
use bevy::mesh::{Indices, Mesh};
use bevy::render::render_resource::PrimitiveTopology;

use crate::config::HexSpec;
use crate::math::SQRT_3;

/// A single drawing instruction recorded on a [`TileNode`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Starts a closed polygon path through the given points.
    Polygon(Vec<Vec2>),
    /// Fills the current path.
    Fill {
        /// Fill color.
        color: Color,
        /// Fill opacity.
        alpha: f32,
    },
    /// Strokes the current path.
    Stroke {
        /// Line thickness.
        width: f32,
        /// Line color.
        color: Color,
        /// Line opacity.
        alpha: f32,
    },
}

/// Drawing commands of one tile's visual.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileNode {
    commands: Vec<DrawCommand>,
}

impl TileNode {
    /// Drops every recorded command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded commands, in issue order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Redraws a tile: clears `node`, then issues a filled and stroked hexagon.
///
/// Calling this twice with the same inputs leaves the same commands behind.
pub fn draw_tile(node: &mut TileNode, corners: &[Vec2; 6], spec: &HexSpec) {
    node.clear();
    node.push(DrawCommand::Polygon(corners.to_vec()));
    node.push(DrawCommand::Fill {
        color: spec.fill_color,
        alpha: spec.fill_alpha,
    });
    node.push(DrawCommand::Stroke {
        width: spec.stroke_width,
        color: spec.stroke_color,
        alpha: spec.stroke_alpha,
    });
}

/// One paint pass of a node, ready to be spawned.
#[derive(Debug)]
pub struct PaintMesh {
    /// Geometry, y-up.
    pub mesh: Mesh,
    /// Base color with the command's alpha folded in.
    pub color: Color,
}

/// Turns a node's commands into meshes: fills first, then strokes.
///
/// Mesh positions are y-up (surface y is negated) so they can be parented
/// directly under a 2D layer transform.
pub fn paint_meshes(node: &TileNode) -> Vec<PaintMesh> {
    let mut path: &[Vec2] = &[];
    let mut out = Vec::new();
    for command in node.commands() {
        match command {
            DrawCommand::Polygon(points) => path = points.as_slice(),
            DrawCommand::Fill { color, alpha } => {
                if let Some(mesh) = fill_mesh(path) {
                    out.push(PaintMesh {
                        mesh,
                        color: color.with_alpha(color.alpha() * alpha),
                    });
                }
            }
            DrawCommand::Stroke {
                width,
                color,
                alpha,
            } => {
                if let Some(mesh) = stroke_mesh(path, *width) {
                    out.push(PaintMesh {
                        mesh,
                        color: color.with_alpha(color.alpha() * alpha),
                    });
                }
            }
        }
    }
    out
}

/// Triangle-fan fill of a convex polygon.
pub fn fill_mesh(path: &[Vec2]) -> Option<Mesh> {
    if path.len() < 3 {
        return None;
    }
    let center = path.iter().copied().sum::<Vec2>() / path.len() as f32;
    let mut positions = vec![to_mesh_space(center)];
    positions.extend(path.iter().map(|p| to_mesh_space(*p)));

    let n = path.len() as u32;
    let indices = (0..n)
        .flat_map(|i| [0, 1 + i, 1 + (i + 1) % n])
        .collect();
    Some(build_mesh(positions, indices))
}

/// Closed outline of `width` centred on the polygon edges, as a quad ring.
///
/// Corners are mitred along the centre-to-corner direction, exact for regular
/// hexagons.
pub fn stroke_mesh(path: &[Vec2], width: f32) -> Option<Mesh> {
    if path.len() < 3 || width <= 0.0 {
        return None;
    }
    let center = path.iter().copied().sum::<Vec2>() / path.len() as f32;
    // Half width divided by cos(30°), the hexagon's miter ratio.
    let miter = width / SQRT_3;
    let mut positions = Vec::with_capacity(path.len() * 2);
    for p in path {
        let dir = (*p - center).normalize_or_zero();
        positions.push(to_mesh_space(*p - dir * miter));
        positions.push(to_mesh_space(*p + dir * miter));
    }

    let n = path.len() as u32;
    let indices = (0..n)
        .flat_map(|i| {
            let inner = 2 * i;
            let outer = inner + 1;
            let next_inner = 2 * ((i + 1) % n);
            let next_outer = next_inner + 1;
            [inner, outer, next_outer, inner, next_outer, next_inner]
        })
        .collect();
    Some(build_mesh(positions, indices))
}

fn to_mesh_space(p: Vec2) -> [f32; 3] {
    [p.x, -p.y, 0.0]
}

fn build_mesh(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Mesh {
    let count = positions.len();
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0, 0.0, 1.0]; count])
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, vec![[0.0, 0.0]; count])
    .with_inserted_indices(Indices::U32(indices))
}
