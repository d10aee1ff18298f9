//! Primitive to geometry command translation
//!
//! Each primitive becomes `Begin`, one attribute/position command run per
//! vertex and `End`. Positions use the shortest command that reproduces
//! the vertex exactly:
//!
//! | Condition (vs. previous vertex) | Command       |
//! |---------------------------------|---------------|
//! | same X                          | `VertexYZ`    |
//! | same Y                          | `VertexXZ`    |
//! | same Z                          | `VertexXY`    |
//! | every delta within ±511/4096    | `VertexDiff`  |
//! | every axis a multiple of 64     | `VertexShort` |
//! | otherwise                       | `Vertex`      |
//!
//! The first four only apply after the first vertex of a primitive.
//! Positions are snapped to the FX16 grid first, so every command above
//! decodes to exactly the position it was chosen for.

use g3d_common::{Command, FX16, VEC10_SHORT, encode_display_list, quantize};
use tracing::warn;

use crate::mesh::{AttributeTables, ColorKey, PositionKey};
use crate::primitive::Primitive;

// ============================================================================
// Vertex Format Flags
// ============================================================================

/// Vertices carry texture coordinates
pub const FORMAT_TEX_COORD: u8 = 1;
/// Vertices carry normals (lit geometry)
pub const FORMAT_NORMAL: u8 = 2;
/// Vertices carry colors; ignored when [`FORMAT_NORMAL`] is set
pub const FORMAT_COLOR: u8 = 4;

/// Position table units per model unit
pub const POSITION_SCALE: f32 = 4096.0;
/// Texture coordinate table units per texel
pub const TEX_COORD_SCALE: f32 = 16.0;
/// Normal table units per unit length
pub const NORMAL_SCALE: f32 = 512.0;

/// Largest position delta `VertexDiff` can carry, exclusive
const MAX_DIFF: i32 = 512;

/// Position keys per `VertexShort` step
const SHORT_STEP: i32 = 0x40;

// ============================================================================
// Translation
// ============================================================================

/// Translate final primitives into a command list
///
/// A `RestoreMatrix` for the first vertex's matrix precedes the first
/// `Begin`. Colors are only emitted when they differ from the last color
/// emitted anywhere in the list. Primitives the hardware cannot draw are
/// skipped with a warning.
pub fn primitives_to_commands(
    primitives: &[Primitive],
    tables: &AttributeTables,
    format: u8,
) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut last_color: Option<ColorKey> = None;
    let mut matrix_restored = false;

    for prim in primitives {
        let Some(kind) = prim.kind.to_primitive_type() else {
            warn!("Skipping primitive of kind {:?} ({} vertices)", prim.kind, prim.vertex_count());
            continue;
        };
        let Some(first) = prim.vertices.first() else {
            continue;
        };

        if !matrix_restored {
            commands.push(Command::RestoreMatrix(first.matrix));
            matrix_restored = true;
        }
        commands.push(Command::begin(kind));

        let mut prev: Option<PositionKey> = None;
        for vertex in &prim.vertices {
            if format & FORMAT_TEX_COORD != 0 {
                let [s, t] = tables.tex_coords[vertex.tex_coord];
                commands.push(Command::TexCoord {
                    s: s as f32 / TEX_COORD_SCALE,
                    t: t as f32 / TEX_COORD_SCALE,
                });
            }

            if format & FORMAT_NORMAL != 0 {
                let [x, y, z] = tables.normals[vertex.normal].map(|n| n as f32 / NORMAL_SCALE);
                commands.push(Command::Normal { x, y, z });
            } else if format & FORMAT_COLOR != 0 {
                let color = tables.colors[vertex.color];
                if last_color != Some(color) {
                    let [r, g, b] = color.map(|c| (c as u32) << 3);
                    commands.push(Command::Color { r, g, b });
                    last_color = Some(color);
                }
            }

            let position = snap_position(tables.positions[vertex.position]);
            commands.push(position_command(position, prev));
            prev = Some(position);
        }

        commands.push(Command::End);
    }

    commands
}

/// Round a position key onto the FX16 grid
pub fn snap_position(position: PositionKey) -> PositionKey {
    position.map(|v| (quantize(v as f32 / POSITION_SCALE, FX16) * POSITION_SCALE) as i32)
}

/// Whether a position key fits a `VertexShort` component exactly
fn fits_short(v: i32) -> bool {
    let limit = (1i32 << VEC10_SHORT.integer_bits) * POSITION_SCALE as i32;
    v % SHORT_STEP == 0 && (-limit..limit).contains(&v)
}

/// Pick the position command for `position` given the previous vertex
///
/// Both keys are expected on the FX16 grid (see [`snap_position`]).
pub fn position_command(position: PositionKey, prev: Option<PositionKey>) -> Command {
    let [x, y, z] = position.map(|v| v as f32 / POSITION_SCALE);

    if let Some(prev) = prev {
        let delta = [
            position[0] - prev[0],
            position[1] - prev[1],
            position[2] - prev[2],
        ];
        if delta[0] == 0 {
            return Command::VertexYZ { y, z };
        }
        if delta[1] == 0 {
            return Command::VertexXZ { x, z };
        }
        if delta[2] == 0 {
            return Command::VertexXY { x, y };
        }
        if delta.iter().all(|d| d.abs() < MAX_DIFF) {
            let [x, y, z] = delta.map(|d| d as f32 / POSITION_SCALE);
            return Command::VertexDiff { x, y, z };
        }
    }

    if position.iter().all(|&v| fits_short(v)) {
        Command::VertexShort { x, y, z }
    } else {
        Command::Vertex { x, y, z }
    }
}

/// Translate and pack primitives into a display list
pub fn export_display_list(primitives: &[Primitive], tables: &AttributeTables, format: u8) -> Vec<u8> {
    encode_display_list(&primitives_to_commands(primitives, tables, format))
}
