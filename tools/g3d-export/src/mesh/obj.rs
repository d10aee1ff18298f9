//! OBJ mesh import

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use thiserror::Error;

use super::types::{Face, FaceVertex, MeshData};

/// Errors in OBJ text
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: invalid vertex reference {reference:?}")]
    InvalidReference { line: usize, reference: String },

    #[error("line {line}: {kind} index {index} out of range ({count} defined)")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        count: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Load an OBJ file
pub fn load_obj(input: &Path) -> Result<MeshData> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let mesh = parse_obj(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))?;

    if mesh.positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }
    if mesh.faces.is_empty() {
        bail!("No faces found in OBJ file");
    }

    tracing::debug!(
        "Loaded OBJ: {} positions, {} texcoords, {} normals, {} faces",
        mesh.positions.len(),
        mesh.tex_coords.len(),
        mesh.normals.len(),
        mesh.faces.len()
    );
    Ok(mesh)
}

/// Parse OBJ text
///
/// Supports `v x y z [r g b]`, `vt u v`, `vn x y z` and `f` with `v`,
/// `v/vt`, `v/vt/vn` or `v//vn` corners. Negative indices count back from
/// the last element defined so far. Faces are kept as written; nothing is
/// triangulated.
pub fn parse_obj(reader: impl BufRead) -> Result<MeshData, ObjError> {
    let mut mesh = MeshData::default();
    let mut colors: Vec<Option<[f32; 3]>> = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line_no = number + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                let xyz = parse_floats::<3>(&parts[1..4], line_no)?;
                mesh.positions.push(xyz);
                colors.push(if parts.len() >= 7 {
                    Some(parse_floats::<3>(&parts[4..7], line_no)?)
                } else {
                    None
                });
            }
            "vt" if parts.len() >= 3 => {
                mesh.tex_coords.push(parse_floats::<2>(&parts[1..3], line_no)?);
            }
            "vn" if parts.len() >= 4 => {
                mesh.normals.push(parse_floats::<3>(&parts[1..4], line_no)?);
            }
            "f" if parts.len() >= 2 => {
                let face = parts[1..]
                    .iter()
                    .map(|s| parse_face_vertex(s, line_no, &mesh))
                    .collect::<Result<Face, _>>()?;
                mesh.faces.push(face);
            }
            _ => {}
        }
    }

    // Positions without a color are white once any position has one
    if colors.iter().any(Option::is_some) {
        mesh.colors = colors
            .into_iter()
            .map(|c| c.unwrap_or([1.0; 3]))
            .collect();
    }

    Ok(mesh)
}

fn parse_floats<const N: usize>(tokens: &[&str], line: usize) -> Result<[f32; N], ObjError> {
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token.parse().map_err(|_| ObjError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(out)
}

/// Parse a face corner: "v", "v/vt", "v/vt/vn" or "v//vn"
fn parse_face_vertex(s: &str, line: usize, mesh: &MeshData) -> Result<FaceVertex, ObjError> {
    let invalid = || ObjError::InvalidReference {
        line,
        reference: s.to_string(),
    };
    let mut parts = s.split('/');

    let position = match parts.next() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(invalid()),
    };
    let position = resolve_index(position, mesh.positions.len(), "position", line)
        .ok_or_else(invalid)??;

    let mut optional = |kind: &'static str, count: usize| -> Result<Option<usize>, ObjError> {
        match parts.next() {
            Some(p) if !p.is_empty() => {
                let index = resolve_index(p, count, kind, line).ok_or_else(invalid)??;
                Ok(Some(index))
            }
            _ => Ok(None),
        }
    };
    let tex_coord = optional("texcoord", mesh.tex_coords.len())?;
    let normal = optional("normal", mesh.normals.len())?;

    Ok(FaceVertex {
        position,
        tex_coord,
        normal,
    })
}

/// Resolve a 1-based or negative OBJ index against `count` defined elements
///
/// `None` when the token is not an integer.
fn resolve_index(
    token: &str,
    count: usize,
    kind: &'static str,
    line: usize,
) -> Option<Result<usize, ObjError>> {
    let index: i64 = token.parse().ok()?;
    let resolved = if index > 0 {
        index - 1
    } else {
        count as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= count as i64 {
        return Some(Err(ObjError::IndexOutOfRange {
            line,
            kind,
            index,
            count,
        }));
    }
    Some(Ok(resolved as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_OBJ: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 1
vn 0 0 1
f 1/1/1 2/1/1 3/2/1 4/2/1
";

    #[test]
    fn test_parse_quad_face() {
        let mesh = parse_obj(QUAD_OBJ.as_bytes()).unwrap();
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.tex_coords.len(), 2);
        assert_eq!(mesh.normals, [[0.0, 0.0, 1.0]]);
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.faces[0].len(), 4);
        assert_eq!(
            mesh.faces[0][2],
            FaceVertex {
                position: 2,
                tex_coord: Some(1),
                normal: Some(0)
            }
        );
        assert!(!mesh.has_colors());
    }

    #[test]
    fn test_parse_vertex_colors() {
        let text = "v 0 0 0 1 0 0\nv 1 0 0\nv 0 1 0 0 0.5 1\nf 1 2 3\n";
        let mesh = parse_obj(text.as_bytes()).unwrap();
        assert_eq!(mesh.colors, [[1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.0, 0.5, 1.0]]);
    }

    #[test]
    fn test_parse_negative_and_normal_only_refs() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf -3//-1 -2//1 -1//1\n";
        let mesh = parse_obj(text.as_bytes()).unwrap();
        let face = &mesh.faces[0];
        assert_eq!(face[0].position, 0);
        assert_eq!(face[2].position, 2);
        assert_eq!(face[0].tex_coord, None);
        assert_eq!(face[0].normal, Some(0));
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_obj("v 0 zero 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::InvalidNumber { line: 1, .. }));

        let err = parse_obj("v 0 0 0\nf 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ObjError::IndexOutOfRange {
                line: 2,
                index: 2,
                ..
            }
        ));

        let err = parse_obj("v 0 0 0\nf 1/x 1 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::InvalidReference { line: 2, .. }));
    }
}
