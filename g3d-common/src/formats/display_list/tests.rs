//! Tests for the display list codec

use smallvec::SmallVec;

use super::*;
use crate::formats::command::{Command, Opcode, PrimitiveType};

fn roundtrip(commands: &[Command]) -> Vec<Command> {
    let bytes = encode_display_list(commands);
    strip_nops(decode_display_list(&bytes).unwrap())
}

// ========================================================================
// Encoding Layout Tests
// ========================================================================

#[test]
fn test_texcoord_vertex_end_layout() {
    let commands = [
        Command::TexCoord { s: 10.0, t: 10.0 },
        Command::Vertex { x: 5.0, y: 5.0, z: 5.0 },
        Command::End,
    ];
    let bytes = encode_display_list(&commands);

    #[rustfmt::skip]
    let expected: [u8; 20] = [
        0x22, 0x23, 0x41, 0x00,
        0xA0, 0x00, 0xA0, 0x00,
        0x00, 0x0A, 0x00, 0x0A, 0x00, 0x0A, 0x00, 0x00,
        // End directly after Vertex
        0x00, 0x00, 0x00, 0x00,
    ];
    assert_eq!(bytes, expected);

    let decoded = decode_display_list(&bytes).unwrap();
    assert_eq!(decoded.len(), 4);
    assert_eq!(decoded[3], Command::Nop);

    let decoded = strip_nops(decoded);
    assert_eq!(decoded, commands);
}

#[test]
fn test_empty_list() {
    assert!(encode_display_list(&[]).is_empty());
    assert!(decode_display_list(&[]).unwrap().is_empty());
}

#[test]
fn test_group_padding_word_rules() {
    // PushMatrix after a vertex: padded
    let bytes = encode_display_list(&[
        Command::Vertex { x: 0.0, y: 0.0, z: 0.0 },
        Command::PushMatrix,
        Command::Identity,
        Command::End,
    ]);
    assert_eq!(bytes.len(), 4 + 8 + 4);

    // Markers only follow each other or lead the group: no padding
    let bytes = encode_display_list(&[Command::PushMatrix, Command::Identity, Command::End]);
    assert_eq!(bytes, [0x11, 0x15, 0x41, 0x00]);

    // A Nop in front does not count
    let bytes = encode_display_list(&[Command::Nop, Command::End]);
    assert_eq!(bytes, [0x00, 0x41, 0x00, 0x00]);

    let bytes = encode_display_list(&[Command::begin(PrimitiveType::Triangle), Command::End]);
    assert_eq!(bytes, [0x40, 0x41, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_padding_word_predicate() {
    use Opcode::*;
    assert!(needs_padding_word([Begin, End, Nop, Nop]));
    assert!(needs_padding_word([Color, Normal, Vertex, Identity]));
    assert!(!needs_padding_word([End, Nop, Nop, Nop]));
    assert!(!needs_padding_word([Nop, PushMatrix, Nop, Nop]));
    assert!(!needs_padding_word([Identity, PushMatrix, End, Vertex]));
}

#[test]
fn test_trailing_nop_count() {
    for n in 1..=9usize {
        let commands: Vec<Command> = (0..n)
            .map(|i| match i % 3 {
                0 => Command::Color { r: 248, g: 0, b: 8 },
                1 => Command::Vertex { x: 1.5, y: -2.0, z: 0.25 },
                _ => Command::End,
            })
            .collect();

        let decoded = decode_display_list(&encode_display_list(&commands)).unwrap();
        let pad = (4 - n % 4) % 4;
        assert_eq!(decoded.len(), n + pad, "n = {n}");
        assert_eq!(&decoded[..n], &commands[..]);
        assert!(decoded[n..].iter().all(Command::is_nop));
    }
}

// ========================================================================
// Round-trip Tests
// ========================================================================

#[test]
fn test_roundtrip_all_exporter_commands() {
    let commands = vec![
        Command::RestoreMatrix(0),
        Command::begin(PrimitiveType::TriangleStrips),
        Command::TexCoord { s: 3.5, t: -1.25 },
        Command::Normal { x: 0.5, y: -1.0, z: 511.0 / 512.0 },
        Command::Color { r: 248, g: 128, b: 0 },
        Command::Vertex { x: 1.0, y: -3.5, z: 0.001953125 },
        Command::VertexShort { x: 1.0, y: -0.5, z: 7.984375 },
        Command::VertexXY { x: 0.25, y: -0.125 },
        Command::VertexXZ { x: 2.0, z: -31.5 },
        Command::VertexYZ { y: 0.5, z: 63.0 },
        Command::VertexDiff { x: 100.0 / 4096.0, y: -511.0 / 4096.0, z: 0.0 },
        Command::PushMatrix,
        Command::Identity,
        Command::End,
        Command::RestoreMatrix(7),
    ];
    assert_eq!(roundtrip(&commands), commands);
}

#[test]
fn test_roundtrip_raw_commands() {
    let matrix: SmallVec<[u32; 4]> = (0..12u32).map(|i| i * 0x1000).collect();
    let commands = vec![
        Command::Other {
            opcode: Opcode::PolygonAttr,
            params: SmallVec::from_slice(&[0x1F00_80C0]),
        },
        Command::Other {
            opcode: Opcode::LoadMatrix43,
            params: matrix,
        },
        Command::Other {
            opcode: Opcode::PopMatrix,
            params: SmallVec::from_slice(&[1]),
        },
        Command::begin(PrimitiveType::Quadrilateral),
        Command::End,
    ];
    assert_eq!(roundtrip(&commands), commands);
}

#[test]
fn test_roundtrip_quantizes_once() {
    let commands = [Command::TexCoord { s: 0.05, t: 100.01 }];
    let once = roundtrip(&commands);
    let twice = roundtrip(&once);
    assert_eq!(once, twice);
    assert_eq!(once[0], Command::TexCoord { s: 0.0625, t: 100.0 });
}

#[test]
fn test_normal_is_clamped() {
    let decoded = roundtrip(&[Command::Normal { x: 1.0, y: -1.5, z: 0.0 }]);
    assert_eq!(decoded, [Command::Normal { x: 511.0 / 512.0, y: -1.0, z: 0.0 }]);
}

#[test]
fn test_vertex_wraps_out_of_range() {
    let decoded = roundtrip(&[Command::Vertex { x: 64.0, y: 0.0, z: -64.0 }]);
    assert_eq!(decoded, [Command::Vertex { x: -64.0, y: 0.0, z: -64.0 }]);
}

#[test]
fn test_diff_payload_is_scaled() {
    let bytes = encode_display_list(&[Command::VertexDiff { x: 1.0 / 4096.0, y: 0.0, z: 0.0 }]);
    assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
}

// ========================================================================
// Decoding Error Tests
// ========================================================================

#[test]
fn test_decode_truncated_group() {
    let err = decode_display_list(&[0x41, 0x00]).unwrap_err();
    assert_eq!(
        err,
        DisplayListError::Truncated {
            offset: 0,
            needed: 4,
            available: 2
        }
    );
}

#[test]
fn test_decode_truncated_payload() {
    let err = decode_display_list(&[0x23, 0x00, 0x00, 0x00, 0x00, 0x02]).unwrap_err();
    assert_eq!(
        err,
        DisplayListError::Truncated {
            offset: 6,
            needed: 2,
            available: 0
        }
    );
}

#[test]
fn test_decode_unknown_opcode() {
    let err = decode_display_list(&[0x22, 0x99, 0x00, 0x00, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(
        err,
        DisplayListError::UnknownOpcode {
            opcode: 0x99,
            offset: 1
        }
    );
    assert!(err.to_string().contains("0x99"));
}

#[test]
fn test_decode_without_padding_word() {
    // Lists from other tools may omit the extra word
    #[rustfmt::skip]
    let bytes: [u8; 16] = [
        0x40, 0x41, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00,
        0x20, 0x00, 0x00, 0x00,
        0x1F, 0x00, 0x00, 0x00,
    ];
    let decoded = strip_nops(decode_display_list(&bytes).unwrap());
    assert_eq!(
        decoded,
        [
            Command::begin(PrimitiveType::Quadrilateral),
            Command::End,
            Command::Color { r: 248, g: 0, b: 0 },
        ]
    );
}

// ========================================================================
// Listing Tests
// ========================================================================

#[test]
fn test_format_commands() {
    let listing = format_commands(&[
        Command::begin(PrimitiveType::Triangle),
        Command::Color { r: 8, g: 16, b: 24 },
        Command::End,
    ]);
    assert_eq!(listing, "Begin Triangle\nColor 8 16 24\nEnd\n");
}
