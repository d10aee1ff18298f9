//! Mesh expansion into quantized, indexed primitives
//!
//! Every supported face becomes one `Triangles` or `Quads` primitive whose
//! vertices index shared attribute tables. Attributes are quantized before
//! they are inserted, so vertices that would encode identically share an
//! index and can later be stripped together.

use tracing::debug;

use super::tables::{AttributeTables, ColorKey, NormalKey, PositionKey, TexCoordKey};
use super::types::{ExpandedMesh, Face, MeshData};
use crate::config::ExportSettings;
use crate::primitive::{Primitive, PrimitiveKind, VertexRef};
use crate::translate::{
    FORMAT_COLOR, FORMAT_NORMAL, FORMAT_TEX_COORD, NORMAL_SCALE, POSITION_SCALE, TEX_COORD_SCALE,
};
use g3d_common::{FX16, clamp_normal_component, quantize};

/// Largest shift `pos_scale` will report
const MAX_POS_SCALE: u32 = 31;

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned bounds of a set of positions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModelBounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl ModelBounds {
    /// Bounds of `positions`; all zero when there are none
    pub fn calculate(positions: &[[f32; 3]]) -> Self {
        let Some((first, rest)) = positions.split_first() else {
            return Self::default();
        };
        rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |mut bounds, p| {
                for axis in 0..3 {
                    bounds.min[axis] = bounds.min[axis].min(p[axis]);
                    bounds.max[axis] = bounds.max[axis].max(p[axis]);
                }
                bounds
            },
        )
    }

    /// Smallest right shift after which every coordinate, rounded to the
    /// FX16 grid, is still inside the FX16 range
    pub fn pos_scale(&self) -> u32 {
        let high = self.max.iter().copied().fold(f32::MIN, f32::max);
        let low = self.min.iter().copied().fold(f32::MAX, f32::min);
        let max_coord = high.abs().max(low.abs()) as f64;

        let limit = (1u64 << (FX16.total_bits() - 1)) as f64;
        let steps = |scale: u32| {
            (max_coord / (1u64 << scale) as f64 / FX16.resolution() as f64).round_ties_even()
        };

        let mut scale = 0;
        while scale < MAX_POS_SCALE && steps(scale) >= limit {
            scale += 1;
        }
        scale
    }
}

// ============================================================================
// Quantization
// ============================================================================

/// Position scaled down by `2^pos_scale`, rounded to the FX16 grid and
/// expressed in 1/4096 units
pub fn quantize_position(p: [f32; 3], pos_scale: u32) -> PositionKey {
    let divisor = (1u64 << pos_scale) as f32;
    p.map(|v| (quantize(v / divisor, FX16) * POSITION_SCALE) as i32)
}

/// Unit normal in 1/512 units, clamped to what a 10-bit component holds
///
/// Zero-length input yields a zero normal.
pub fn quantize_normal(n: [f32; 3]) -> NormalKey {
    let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if length <= f32::EPSILON {
        return [0; 3];
    }
    n.map(|v| (clamp_normal_component(v / length) * NORMAL_SCALE).round_ties_even() as i16)
}

/// RGB in [0, 1] to 5-bit channels
pub fn quantize_color(c: [f32; 3]) -> ColorKey {
    c.map(|v| ((v * 31.0) as i32).clamp(0, 31) as u8)
}

/// UV to 1/16 texel units with the V axis flipped to top-left origin
pub fn quantize_tex_coord(uv: [f32; 2], texture_size: [u32; 2]) -> TexCoordKey {
    let width = texture_size[0] as f32;
    let height = texture_size[1] as f32;
    let s = uv[0] * width;
    let t = height - uv[1] * height;
    [
        (s * TEX_COORD_SCALE).round_ties_even() as i32,
        (t * TEX_COORD_SCALE).round_ties_even() as i32,
    ]
}

/// `FORMAT_*` flags for the attributes the exported vertices carry
pub fn vertex_format(mesh: &MeshData, settings: &ExportSettings) -> u8 {
    let mut format = 0;
    if settings.texture_size.is_some() && !mesh.tex_coords.is_empty() {
        format |= FORMAT_TEX_COORD;
    }
    if settings.lighting {
        format |= FORMAT_NORMAL;
    } else if settings.vertex_colors && mesh.has_colors() {
        format |= FORMAT_COLOR;
    }
    format
}

// ============================================================================
// Expansion
// ============================================================================

/// Expand every triangle and quad of `mesh` into its own primitive
pub fn expand_mesh(mesh: &MeshData, settings: &ExportSettings) -> ExpandedMesh {
    let positions: Vec<[f32; 3]> = mesh
        .positions
        .iter()
        .map(|&p| settings.transform_position(p))
        .collect();
    let pos_scale = ModelBounds::calculate(&positions).pos_scale();
    let format = vertex_format(mesh, settings);
    let texture_size = settings.texture_size.unwrap_or([0, 0]);

    let mut tables = AttributeTables::default();
    let mut primitives = Vec::with_capacity(mesh.faces.len());
    let mut skipped_faces = 0;

    for (index, face) in mesh.faces.iter().enumerate() {
        let kind = match face.len() {
            3 => PrimitiveKind::Triangles,
            4 => PrimitiveKind::Quads,
            n => {
                debug!("Skipping face {} with {} vertices", index, n);
                skipped_faces += 1;
                continue;
            }
        };

        let fallback_normal = face_normal(face, &positions);
        let vertices = face
            .iter()
            .map(|corner| {
                let mut vertex = VertexRef {
                    position: tables
                        .positions
                        .insert(quantize_position(positions[corner.position], pos_scale)),
                    ..Default::default()
                };

                if format & FORMAT_TEX_COORD != 0 {
                    let uv = corner
                        .tex_coord
                        .and_then(|i| mesh.tex_coords.get(i))
                        .copied()
                        .unwrap_or([0.0; 2]);
                    vertex.tex_coord = tables.tex_coords.insert(quantize_tex_coord(uv, texture_size));
                }

                if format & FORMAT_NORMAL != 0 {
                    let normal = corner
                        .normal
                        .and_then(|i| mesh.normals.get(i))
                        .map(|&n| settings.transform_direction(n))
                        .unwrap_or(fallback_normal);
                    vertex.normal = tables.normals.insert(quantize_normal(normal));
                } else if format & FORMAT_COLOR != 0 {
                    let color = mesh.colors.get(corner.position).copied().unwrap_or([1.0; 3]);
                    vertex.color = tables.colors.insert(quantize_color(color));
                }

                vertex
            })
            .collect();

        primitives.push(Primitive::new(kind, vertices));
    }

    if pos_scale > 0 {
        debug!("Positions scaled down by 2^{} to fit FX16", pos_scale);
    }

    ExpandedMesh {
        primitives,
        tables,
        format,
        skipped_faces,
        pos_scale,
    }
}

/// Unnormalized normal of the plane through a face's first three corners
fn face_normal(face: &Face, positions: &[[f32; 3]]) -> [f32; 3] {
    let [a, b, c] = [0, 1, 2].map(|i| positions[face[i].position]);
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}
