//! Packing commands into opcode groups and back

use tracing::trace;

use super::error::DisplayListError;
use crate::formats::command::{Command, Opcode};
use crate::packing::{
    TEX_COORD, VEC10, VEC10_SHORT, clamp_normal_component, decode_fixed, decode_fx16,
    encode_fixed, encode_fx16, pack_rgb555, pack_vec10, unpack_rgb555, unpack_vec10,
};

/// Opcodes packed per group
pub const GROUP_SIZE: usize = 4;

/// `VertexDiff` deltas are stored multiplied by this factor
const DIFF_SCALE: f32 = 8.0;

// ============================================================================
// Padding Word
// ============================================================================

/// Zero-operand commands that trigger the extra padding word
/// (Identity, PushMatrix and End)
fn is_padding_marker(op: Opcode) -> bool {
    op != Opcode::Nop && op.is_parameterless()
}

/// Whether a group is followed by one extra zero word
///
/// True when Identity, PushMatrix or End sits directly after a command that
/// is neither Nop nor one of those three.
pub fn needs_padding_word(group: [Opcode; GROUP_SIZE]) -> bool {
    (1..GROUP_SIZE).any(|i| {
        let prev = group[i - 1];
        is_padding_marker(group[i]) && prev != Opcode::Nop && !is_padding_marker(prev)
    })
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode commands into a packed display list
///
/// The list is padded with `Nop` to a multiple of four. Each group writes
/// its four opcode bytes followed by the payloads of those four commands.
pub fn encode_display_list(commands: &[Command]) -> Vec<u8> {
    let nop = Command::Nop;
    let padded_len = commands.len().div_ceil(GROUP_SIZE) * GROUP_SIZE;
    let mut out = Vec::with_capacity(padded_len * 4);

    for start in (0..padded_len).step_by(GROUP_SIZE) {
        let group: [&Command; GROUP_SIZE] =
            std::array::from_fn(|i| commands.get(start + i).unwrap_or(&nop));
        let opcodes = group.map(Command::opcode);

        out.extend(opcodes.iter().map(|op| *op as u8));
        for cmd in group {
            write_payload(&mut out, cmd);
        }
        if needs_padding_word(opcodes) {
            out.extend_from_slice(&[0; 4]);
        }
    }

    out
}

#[inline]
fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

#[inline]
fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_payload(out: &mut Vec<u8>, cmd: &Command) {
    match cmd {
        Command::Nop | Command::PushMatrix | Command::Identity | Command::End => {}
        Command::RestoreMatrix(value) | Command::Begin(value) => put_u32(out, *value),
        Command::TexCoord { s, t } => {
            put_u16(out, encode_fixed(*s, TEX_COORD) as u16);
            put_u16(out, encode_fixed(*t, TEX_COORD) as u16);
        }
        Command::Vertex { x, y, z } => {
            put_u16(out, encode_fx16(*x));
            put_u16(out, encode_fx16(*y));
            put_u16(out, encode_fx16(*z));
            put_u16(out, 0);
        }
        Command::VertexXY { x: a, y: b }
        | Command::VertexXZ { x: a, z: b }
        | Command::VertexYZ { y: a, z: b } => {
            put_u16(out, encode_fx16(*a));
            put_u16(out, encode_fx16(*b));
        }
        Command::VertexShort { x, y, z } => put_u32(out, pack_vec10([*x, *y, *z], VEC10_SHORT)),
        Command::VertexDiff { x, y, z } => {
            let scaled = [*x * DIFF_SCALE, *y * DIFF_SCALE, *z * DIFF_SCALE];
            put_u32(out, pack_vec10(scaled, VEC10));
        }
        Command::Normal { x, y, z } => {
            let clamped = [*x, *y, *z].map(clamp_normal_component);
            put_u32(out, pack_vec10(clamped, VEC10));
        }
        Command::Color { r, g, b } => {
            put_u16(out, pack_rgb555(*r, *g, *b));
            put_u16(out, 0);
        }
        Command::Other { opcode, params } => {
            for i in 0..opcode.param_words() {
                put_u32(out, params.get(i).copied().unwrap_or(0));
            }
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Bounds-checked little-endian cursor
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DisplayListError> {
        if self.remaining() < len {
            return Err(DisplayListError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = self.bytes;
        let slice = &bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_u16(&mut self) -> Result<u16, DisplayListError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, DisplayListError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn peek_zero_word(&self) -> bool {
        self.remaining() >= 4 && self.bytes[self.offset..self.offset + 4] == [0; 4]
    }
}

/// Decode a packed display list
///
/// Returns one command per opcode byte, padding `Nop`s included. Fails on a
/// buffer that ends inside a group or payload, or on an opcode byte the
/// geometry engine does not define.
pub fn decode_display_list(bytes: &[u8]) -> Result<Vec<Command>, DisplayListError> {
    let mut reader = Reader { bytes, offset: 0 };
    let mut commands = Vec::with_capacity(bytes.len() / 2);

    while reader.remaining() > 0 {
        let group_offset = reader.offset;
        let raw = reader.take(GROUP_SIZE)?;

        let mut opcodes = [Opcode::Nop; GROUP_SIZE];
        for (i, byte) in raw.iter().enumerate() {
            opcodes[i] = Opcode::try_from(*byte).map_err(|opcode| {
                DisplayListError::UnknownOpcode {
                    opcode,
                    offset: group_offset + i,
                }
            })?;
        }

        for op in opcodes {
            commands.push(read_command(&mut reader, op)?);
        }

        if needs_padding_word(opcodes) && reader.peek_zero_word() {
            trace!(offset = reader.offset, "skipping group padding word");
            reader.offset += 4;
        }
    }

    Ok(commands)
}

fn read_command(reader: &mut Reader<'_>, op: Opcode) -> Result<Command, DisplayListError> {
    let cmd = match op {
        Opcode::Nop => Command::Nop,
        Opcode::PushMatrix => Command::PushMatrix,
        Opcode::Identity => Command::Identity,
        Opcode::End => Command::End,
        Opcode::RestoreMatrix => Command::RestoreMatrix(reader.read_u32()?),
        Opcode::Begin => Command::Begin(reader.read_u32()?),
        Opcode::TexCoord => {
            let s = decode_fixed(reader.read_u16()? as u32, TEX_COORD);
            let t = decode_fixed(reader.read_u16()? as u32, TEX_COORD);
            Command::TexCoord { s, t }
        }
        Opcode::Vertex => {
            let x = decode_fx16(reader.read_u16()?);
            let y = decode_fx16(reader.read_u16()?);
            let z = decode_fx16(reader.read_u16()?);
            reader.read_u16()?;
            Command::Vertex { x, y, z }
        }
        Opcode::VertexXY => {
            let x = decode_fx16(reader.read_u16()?);
            let y = decode_fx16(reader.read_u16()?);
            Command::VertexXY { x, y }
        }
        Opcode::VertexXZ => {
            let x = decode_fx16(reader.read_u16()?);
            let z = decode_fx16(reader.read_u16()?);
            Command::VertexXZ { x, z }
        }
        Opcode::VertexYZ => {
            let y = decode_fx16(reader.read_u16()?);
            let z = decode_fx16(reader.read_u16()?);
            Command::VertexYZ { y, z }
        }
        Opcode::VertexShort => {
            let [x, y, z] = unpack_vec10(reader.read_u32()?, VEC10_SHORT);
            Command::VertexShort { x, y, z }
        }
        Opcode::VertexDiff => {
            let [x, y, z] = unpack_vec10(reader.read_u32()?, VEC10).map(|v| v / DIFF_SCALE);
            Command::VertexDiff { x, y, z }
        }
        Opcode::Normal => {
            let [x, y, z] = unpack_vec10(reader.read_u32()?, VEC10);
            Command::Normal { x, y, z }
        }
        Opcode::Color => {
            let [r, g, b] = unpack_rgb555(reader.read_u32()? as u16);
            Command::Color { r, g, b }
        }
        opcode => {
            let params = (0..opcode.param_words())
                .map(|_| reader.read_u32())
                .collect::<Result<_, _>>()?;
            Command::Other { opcode, params }
        }
    };
    Ok(cmd)
}
