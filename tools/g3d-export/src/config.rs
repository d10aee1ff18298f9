//! Export settings
//!
//! Settings come from an optional TOML file and can be overridden from the
//! command line:
//!
//! ```toml
//! magnify = 0.0625
//! flip_yz = true
//! use_primitive_strip = true
//! lighting = false
//! vertex_colors = true
//! texture_size = [128, 64]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Mesh export settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSettings {
    /// Uniform scale applied to positions before quantization.
    /// Default: 1.0
    #[serde(default = "default_magnify")]
    pub magnify: f32,

    /// Convert Z-up input to Y-up (x, y, z) -> (x, z, -y).
    /// Default: false
    #[serde(default)]
    pub flip_yz: bool,

    /// Merge triangles and quads into strips.
    /// Default: true
    #[serde(default = "default_true")]
    pub use_primitive_strip: bool,

    /// Emit normals for hardware lighting instead of vertex colors.
    /// Default: false
    #[serde(default)]
    pub lighting: bool,

    /// Emit vertex colors when the mesh has them and lighting is off.
    /// Default: true
    #[serde(default = "default_true")]
    pub vertex_colors: bool,

    /// Texture size in texels; texture coordinates are emitted only when set.
    #[serde(default)]
    pub texture_size: Option<[u32; 2]>,
}

fn default_magnify() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            magnify: default_magnify(),
            flip_yz: false,
            use_primitive_strip: true,
            lighting: false,
            vertex_colors: true,
            texture_size: None,
        }
    }
}

impl ExportSettings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse export settings")
    }

    /// Apply magnification and axis conversion to a position
    pub fn transform_position(&self, p: [f32; 3]) -> [f32; 3] {
        let p = self.transform_direction(p);
        [p[0] * self.magnify, p[1] * self.magnify, p[2] * self.magnify]
    }

    /// Apply axis conversion to a direction
    pub fn transform_direction(&self, d: [f32; 3]) -> [f32; 3] {
        if self.flip_yz { [d[0], d[2], -d[1]] } else { d }
    }
}
