//! Mesh conversion pipeline (OBJ -> display list)

use std::path::Path;

use anyhow::{Context, Result};
use g3d_common::{Command, encode_display_list};
use tracing::{info, warn};

use crate::config::ExportSettings;
use crate::mesh::{MeshData, expand_mesh, load_obj};
use crate::strip::{StripStats, build_primitives};
use crate::translate::primitives_to_commands;

/// Result of in-memory display list conversion
#[derive(Debug, Clone)]
pub struct ConvertedDisplayList {
    /// Format flags (tex coord, normal, color)
    pub format: u8,
    /// Right shift applied to every position
    pub pos_scale: u32,
    /// Faces dropped for having neither 3 nor 4 vertices
    pub skipped_faces: usize,
    /// Final primitive summary
    pub stats: StripStats,
    /// Unpacked command list
    pub commands: Vec<Command>,
    /// Packed display list
    pub data: Vec<u8>,
}

/// Convert a loaded mesh to a display list
pub fn convert_mesh_to_memory(mesh: &MeshData, settings: &ExportSettings) -> ConvertedDisplayList {
    let expanded = expand_mesh(mesh, settings);
    if expanded.skipped_faces > 0 {
        warn!(
            "Skipped {} faces that are neither triangles nor quads",
            expanded.skipped_faces
        );
    }

    let primitives = build_primitives(expanded.primitives, settings.use_primitive_strip);
    let stats = StripStats::collect(&primitives);
    let commands = primitives_to_commands(&primitives, &expanded.tables, expanded.format);
    let data = encode_display_list(&commands);

    ConvertedDisplayList {
        format: expanded.format,
        pos_scale: expanded.pos_scale,
        skipped_faces: expanded.skipped_faces,
        stats,
        commands,
        data,
    }
}

/// Convert an OBJ file to a raw display list file
pub fn convert_obj(input: &Path, output: &Path, settings: &ExportSettings) -> Result<ConvertedDisplayList> {
    let mesh = load_obj(input)?;
    let converted = convert_mesh_to_memory(&mesh, settings);

    std::fs::write(output, &converted.data)
        .with_context(|| format!("Failed to write display list: {:?}", output))?;

    info!(
        "Converted mesh: {} faces, {} vertices, {} strips, {} lists, {} bytes (pos_scale {})",
        converted.stats.faces,
        converted.stats.vertices,
        converted.stats.strips,
        converted.stats.lists,
        converted.data.len(),
        converted.pos_scale
    );
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::parse_obj;
    use g3d_common::{PrimitiveType, decode_display_list, strip_nops};

    const GRID_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 0
v 1 1 0
v 2 1 0
f 1 2 5 4
f 2 3 6 5
";

    #[test]
    fn test_convert_strips_quads() {
        let mesh = parse_obj(GRID_OBJ.as_bytes()).unwrap();
        let converted = convert_mesh_to_memory(&mesh, &ExportSettings::default());

        assert_eq!(converted.stats.strips, 1);
        assert_eq!(converted.stats.vertices, 6);
        assert!(converted.commands.contains(&Command::begin(PrimitiveType::QuadrilateralStrips)));
        assert_eq!(strip_nops(decode_display_list(&converted.data).unwrap()), converted.commands);
    }

    #[test]
    fn test_off_grid_mesh_decodes_to_commands() {
        let text = "\
v 0.0001 0.0002 0.0003
v 0.0731 -0.0012 0.0049
v 0.0102 0.0911 -0.0377
v 0.0843 0.0905 -0.0331
v 40.123 -7.77 0.001
f 1 2 3
f 3 2 4
f 2 5 4
";
        let mesh = parse_obj(text.as_bytes()).unwrap();
        let converted = convert_mesh_to_memory(&mesh, &ExportSettings::default());

        assert_eq!(converted.pos_scale, 0);
        assert!(converted.commands.iter().any(|c| matches!(c, Command::VertexDiff { .. })));
        assert_eq!(strip_nops(decode_display_list(&converted.data).unwrap()), converted.commands);
    }

    #[test]
    fn test_convert_without_stripping() {
        let mesh = parse_obj(GRID_OBJ.as_bytes()).unwrap();
        let settings = ExportSettings {
            use_primitive_strip: false,
            ..Default::default()
        };
        let converted = convert_mesh_to_memory(&mesh, &settings);

        assert_eq!(converted.stats.strips, 0);
        assert_eq!(converted.stats.lists, 1);
        assert_eq!(converted.stats.vertices, 8);
        assert!(converted.commands.contains(&Command::begin(PrimitiveType::Quadrilateral)));
    }
}
