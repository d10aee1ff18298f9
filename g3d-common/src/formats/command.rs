//! Geometry engine commands
//!
//! One [`Command`] is one instruction of the geometry command FIFO. The
//! commands the exporter emits have dedicated variants carrying real or
//! integer operands; every other opcode is kept as raw parameter words in
//! [`Command::Other`] so foreign display lists survive a decode/encode pass.

use std::fmt;

use smallvec::SmallVec;

// ============================================================================
// Opcodes
// ============================================================================

/// Geometry engine command opcodes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Nop = 0x00,

    MatrixMode = 0x10,
    PushMatrix = 0x11,
    PopMatrix = 0x12,
    StoreMatrix = 0x13,
    RestoreMatrix = 0x14,
    Identity = 0x15,
    LoadMatrix44 = 0x16,
    LoadMatrix43 = 0x17,
    MultMatrix44 = 0x18,
    MultMatrix43 = 0x19,
    MultMatrix33 = 0x1a,
    Scale = 0x1b,
    Translate = 0x1c,

    Color = 0x20,
    Normal = 0x21,
    TexCoord = 0x22,
    Vertex = 0x23,
    VertexShort = 0x24,
    VertexXY = 0x25,
    VertexXZ = 0x26,
    VertexYZ = 0x27,
    VertexDiff = 0x28,
    PolygonAttr = 0x29,
    TexImageParam = 0x2a,
    TexPlttBase = 0x2b,

    MaterialColor0 = 0x30,
    MaterialColor1 = 0x31,
    LightVector = 0x32,
    LightColor = 0x33,
    Shininess = 0x34,

    Begin = 0x40,
    End = 0x41,

    SwapBuffers = 0x50,

    Viewport = 0x60,

    BoxTest = 0x70,
    PositionTest = 0x71,
    VectorTest = 0x72,
}

impl Opcode {
    /// Number of 32-bit parameter words following the opcode group
    pub const fn param_words(self) -> usize {
        match self {
            Opcode::Nop | Opcode::PushMatrix | Opcode::Identity | Opcode::End => 0,
            Opcode::LoadMatrix44 | Opcode::MultMatrix44 => 16,
            Opcode::LoadMatrix43 | Opcode::MultMatrix43 => 12,
            Opcode::MultMatrix33 => 9,
            Opcode::Scale | Opcode::Translate | Opcode::BoxTest => 3,
            Opcode::Vertex | Opcode::PositionTest => 2,
            Opcode::Shininess => 32,
            _ => 1,
        }
    }

    /// Commands that take no parameters at all
    pub const fn is_parameterless(self) -> bool {
        self.param_words() == 0
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let op = match value {
            0x00 => Opcode::Nop,
            0x10 => Opcode::MatrixMode,
            0x11 => Opcode::PushMatrix,
            0x12 => Opcode::PopMatrix,
            0x13 => Opcode::StoreMatrix,
            0x14 => Opcode::RestoreMatrix,
            0x15 => Opcode::Identity,
            0x16 => Opcode::LoadMatrix44,
            0x17 => Opcode::LoadMatrix43,
            0x18 => Opcode::MultMatrix44,
            0x19 => Opcode::MultMatrix43,
            0x1a => Opcode::MultMatrix33,
            0x1b => Opcode::Scale,
            0x1c => Opcode::Translate,
            0x20 => Opcode::Color,
            0x21 => Opcode::Normal,
            0x22 => Opcode::TexCoord,
            0x23 => Opcode::Vertex,
            0x24 => Opcode::VertexShort,
            0x25 => Opcode::VertexXY,
            0x26 => Opcode::VertexXZ,
            0x27 => Opcode::VertexYZ,
            0x28 => Opcode::VertexDiff,
            0x29 => Opcode::PolygonAttr,
            0x2a => Opcode::TexImageParam,
            0x2b => Opcode::TexPlttBase,
            0x30 => Opcode::MaterialColor0,
            0x31 => Opcode::MaterialColor1,
            0x32 => Opcode::LightVector,
            0x33 => Opcode::LightColor,
            0x34 => Opcode::Shininess,
            0x40 => Opcode::Begin,
            0x41 => Opcode::End,
            0x50 => Opcode::SwapBuffers,
            0x60 => Opcode::Viewport,
            0x70 => Opcode::BoxTest,
            0x71 => Opcode::PositionTest,
            0x72 => Opcode::VectorTest,
            other => return Err(other),
        };
        Ok(op)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Primitive Types
// ============================================================================

/// Primitive type argument of `Begin`
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Triangle = 0,
    Quadrilateral = 1,
    TriangleStrips = 2,
    QuadrilateralStrips = 3,
}

impl PrimitiveType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(PrimitiveType::Triangle),
            1 => Some(PrimitiveType::Quadrilateral),
            2 => Some(PrimitiveType::TriangleStrips),
            3 => Some(PrimitiveType::QuadrilateralStrips),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Triangle => "Triangle",
            PrimitiveType::Quadrilateral => "Quadrilateral",
            PrimitiveType::TriangleStrips => "TriangleStrips",
            PrimitiveType::QuadrilateralStrips => "QuadrilateralStrips",
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// One decoded geometry command
///
/// Real operands are in the command's natural units: vertex components in
/// model units, texture coordinates in texels, normal components in [-1, 1).
/// `VertexDiff` holds the unscaled delta; the codec applies the ×8 factor.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Nop,
    PushMatrix,
    Identity,
    End,
    RestoreMatrix(u32),
    /// Raw primitive type; see [`PrimitiveType`]
    Begin(u32),
    TexCoord { s: f32, t: f32 },
    Vertex { x: f32, y: f32, z: f32 },
    VertexShort { x: f32, y: f32, z: f32 },
    VertexXY { x: f32, y: f32 },
    VertexXZ { x: f32, z: f32 },
    VertexYZ { y: f32, z: f32 },
    VertexDiff { x: f32, y: f32, z: f32 },
    Normal { x: f32, y: f32, z: f32 },
    /// 8-bit channels; only the top five bits reach the hardware
    Color { r: u32, g: u32, b: u32 },
    /// Any other opcode with its raw parameter words
    Other {
        opcode: Opcode,
        params: SmallVec<[u32; 4]>,
    },
}

/// Operand view of a command: real values, integer values or nothing
#[derive(Debug, Clone, PartialEq)]
pub enum Operands {
    None,
    Real(SmallVec<[f32; 3]>),
    Int(SmallVec<[u32; 4]>),
}

impl Command {
    pub fn begin(kind: PrimitiveType) -> Self {
        Command::Begin(kind as u32)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Nop => Opcode::Nop,
            Command::PushMatrix => Opcode::PushMatrix,
            Command::Identity => Opcode::Identity,
            Command::End => Opcode::End,
            Command::RestoreMatrix(_) => Opcode::RestoreMatrix,
            Command::Begin(_) => Opcode::Begin,
            Command::TexCoord { .. } => Opcode::TexCoord,
            Command::Vertex { .. } => Opcode::Vertex,
            Command::VertexShort { .. } => Opcode::VertexShort,
            Command::VertexXY { .. } => Opcode::VertexXY,
            Command::VertexXZ { .. } => Opcode::VertexXZ,
            Command::VertexYZ { .. } => Opcode::VertexYZ,
            Command::VertexDiff { .. } => Opcode::VertexDiff,
            Command::Normal { .. } => Opcode::Normal,
            Command::Color { .. } => Opcode::Color,
            Command::Other { opcode, .. } => *opcode,
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, Command::Nop)
    }

    /// Operands in declaration order
    pub fn operands(&self) -> Operands {
        let real = |values: &[f32]| Operands::Real(SmallVec::from_slice(values));
        let int = |values: &[u32]| Operands::Int(SmallVec::from_slice(values));
        match self {
            Command::Nop | Command::PushMatrix | Command::Identity | Command::End => {
                Operands::None
            }
            Command::RestoreMatrix(index) => int(&[*index]),
            Command::Begin(kind) => int(&[*kind]),
            Command::TexCoord { s, t } => real(&[*s, *t]),
            Command::Vertex { x, y, z }
            | Command::VertexShort { x, y, z }
            | Command::VertexDiff { x, y, z }
            | Command::Normal { x, y, z } => real(&[*x, *y, *z]),
            Command::VertexXY { x, y } => real(&[*x, *y]),
            Command::VertexXZ { x, z } => real(&[*x, *z]),
            Command::VertexYZ { y, z } => real(&[*y, *z]),
            Command::Color { r, g, b } => int(&[*r, *g, *b]),
            Command::Other { params, .. } if params.is_empty() => Operands::None,
            Command::Other { params, .. } => Operands::Int(params.clone()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode())?;
        match self {
            Command::Begin(kind) => match PrimitiveType::from_u32(*kind) {
                Some(kind) => write!(f, " {}", kind.name()),
                None => write!(f, " {kind}"),
            },
            Command::Other { params, .. } => {
                for word in params {
                    write!(f, " {word:#010x}")?;
                }
                Ok(())
            }
            _ => match self.operands() {
                Operands::None => Ok(()),
                Operands::Real(values) => {
                    for v in values {
                        write!(f, " {v}")?;
                    }
                    Ok(())
                }
                Operands::Int(values) => {
                    for v in values {
                        write!(f, " {v}")?;
                    }
                    Ok(())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip_through_u8() {
        for byte in 0u8..=0xFF {
            if let Ok(op) = Opcode::try_from(byte) {
                assert_eq!(op as u8, byte);
            }
        }
        assert_eq!(Opcode::try_from(0x42), Err(0x42));
        assert_eq!(Opcode::try_from(0xFF), Err(0xFF));
    }

    #[test]
    fn test_param_words() {
        assert_eq!(Opcode::Nop.param_words(), 0);
        assert_eq!(Opcode::End.param_words(), 0);
        assert_eq!(Opcode::Vertex.param_words(), 2);
        assert_eq!(Opcode::TexCoord.param_words(), 1);
        assert_eq!(Opcode::LoadMatrix43.param_words(), 12);
        assert_eq!(Opcode::BoxTest.param_words(), 3);
        assert!(Opcode::Identity.is_parameterless());
        assert!(!Opcode::Begin.is_parameterless());
    }

    #[test]
    fn test_operand_kinds() {
        assert_eq!(Command::End.operands(), Operands::None);
        assert_eq!(
            Command::TexCoord { s: 1.0, t: 2.0 }.operands(),
            Operands::Real(SmallVec::from_slice(&[1.0, 2.0]))
        );
        assert_eq!(
            Command::Color { r: 8, g: 16, b: 24 }.operands(),
            Operands::Int(SmallVec::from_slice(&[8, 16, 24]))
        );
        assert_eq!(
            Command::begin(PrimitiveType::QuadrilateralStrips).operands(),
            Operands::Int(SmallVec::from_slice(&[3]))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::begin(PrimitiveType::Triangle).to_string(), "Begin Triangle");
        assert_eq!(Command::Begin(9).to_string(), "Begin 9");
        assert_eq!(Command::End.to_string(), "End");
        assert_eq!(
            Command::TexCoord { s: 10.0, t: 2.5 }.to_string(),
            "TexCoord 10 2.5"
        );
        assert_eq!(Command::RestoreMatrix(0).to_string(), "RestoreMatrix 0");
        let other = Command::Other {
            opcode: Opcode::PolygonAttr,
            params: SmallVec::from_slice(&[0x1F00_80C0]),
        };
        assert_eq!(other.to_string(), "PolygonAttr 0x1f0080c0");
    }
}
