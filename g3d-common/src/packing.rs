//! Fixed-point packing utilities
//!
//! Converts f32 values to the geometry engine's register formats:
//! - f32 → signed/unsigned fixed point with arbitrary integer/fraction widths
//! - f32x3 → three 10-bit fields packed into one 32-bit word
//! - 8-bit RGB → RGB555
//!
//! Out-of-range values wrap to the field width the way the hardware registers
//! truncate them. Nothing here saturates or reports overflow.

// ============================================================================
// Fixed-Point Formats
// ============================================================================

/// Bit layout of one fixed-point field.
///
/// `integer_bits + fractional_bits + (signed as u8)` is the width of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPointSpec {
    pub integer_bits: u8,
    pub fractional_bits: u8,
    pub signed: bool,
}

impl FixedPointSpec {
    pub const fn new(signed: bool, integer_bits: u8, fractional_bits: u8) -> Self {
        Self {
            integer_bits,
            fractional_bits,
            signed,
        }
    }

    /// Total width of the field in bits
    #[inline]
    pub const fn total_bits(&self) -> u32 {
        self.integer_bits as u32 + self.fractional_bits as u32 + self.signed as u32
    }

    /// Mask covering the field
    #[inline]
    pub const fn mask(&self) -> u32 {
        let bits = self.total_bits();
        if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 }
    }

    /// Value of one unit in the last place
    #[inline]
    pub fn resolution(&self) -> f32 {
        1.0 / (1u64 << self.fractional_bits) as f32
    }
}

/// Vertex components (VTX_16, VTX_XY/XZ/YZ): signed 6.9, 16 bits
pub const FX16: FixedPointSpec = FixedPointSpec::new(true, 6, 9);

/// Texture coordinates in texels: signed 11.4, 16 bits
pub const TEX_COORD: FixedPointSpec = FixedPointSpec::new(true, 11, 4);

/// Normals and vertex deltas: signed 0.9, 10 bits
pub const VEC10: FixedPointSpec = FixedPointSpec::new(true, 0, 9);

/// Short vertex components (VTX_10): signed 3.6, 10 bits
pub const VEC10_SHORT: FixedPointSpec = FixedPointSpec::new(true, 3, 6);

/// Largest normal component representable in [`VEC10`]
pub const NORMAL_MAX: f32 = 0.998047;

/// Smallest normal component representable in [`VEC10`]
pub const NORMAL_MIN: f32 = -1.0;

// ============================================================================
// Basic Conversion Functions
// ============================================================================

/// Convert f32 to a fixed-point bit pattern
///
/// Scales by `2^fractional_bits`, rounds to nearest (ties to even) and keeps
/// the low `total_bits()` bits of the two's complement result.
#[inline]
pub fn encode_fixed(value: f32, spec: FixedPointSpec) -> u32 {
    let scale = (1u64 << spec.fractional_bits) as f64;
    let scaled = (value as f64 * scale).round_ties_even();
    (scaled as i64 as u32) & spec.mask()
}

/// Convert a fixed-point bit pattern back to f32
///
/// Bits above the field width are ignored.
#[inline]
pub fn decode_fixed(bits: u32, spec: FixedPointSpec) -> f32 {
    let total = spec.total_bits();
    let raw = (bits & spec.mask()) as i64;
    let value = if spec.signed && total > 0 && raw & (1i64 << (total - 1)) != 0 {
        raw - (1i64 << total)
    } else {
        raw
    };
    (value as f64 / (1u64 << spec.fractional_bits) as f64) as f32
}

/// Quantize f32 to the nearest value representable in `spec`
#[inline]
pub fn quantize(value: f32, spec: FixedPointSpec) -> f32 {
    decode_fixed(encode_fixed(value, spec), spec)
}

/// Encode a vertex component as a 16-bit [`FX16`] value
#[inline]
pub fn encode_fx16(value: f32) -> u16 {
    encode_fixed(value, FX16) as u16
}

/// Decode a 16-bit [`FX16`] value
#[inline]
pub fn decode_fx16(bits: u16) -> f32 {
    decode_fixed(bits as u32, FX16)
}

// ============================================================================
// 10-bit Vector Packing
// ============================================================================

/// Pack three components into one word, 10 bits per axis
///
/// Layout: X in bits 0-9, Y in bits 10-19, Z in bits 20-29. Bits 30-31 are zero.
#[inline]
pub fn pack_vec10(v: [f32; 3], spec: FixedPointSpec) -> u32 {
    let x = encode_fixed(v[0], spec) & 0x3FF;
    let y = encode_fixed(v[1], spec) & 0x3FF;
    let z = encode_fixed(v[2], spec) & 0x3FF;
    x | (y << 10) | (z << 20)
}

/// Unpack a word produced by [`pack_vec10`]
#[inline]
pub fn unpack_vec10(word: u32, spec: FixedPointSpec) -> [f32; 3] {
    [
        decode_fixed(word & 0x3FF, spec),
        decode_fixed((word >> 10) & 0x3FF, spec),
        decode_fixed((word >> 20) & 0x3FF, spec),
    ]
}

/// Clamp a normal component into the range [`VEC10`] can hold
#[inline]
pub fn clamp_normal_component(value: f32) -> f32 {
    value.clamp(NORMAL_MIN, NORMAL_MAX)
}

// ============================================================================
// Color Packing
// ============================================================================

/// Reduce 8-bit channels to RGB555 (red in the low bits)
#[inline]
pub fn pack_rgb555(r: u32, g: u32, b: u32) -> u16 {
    let r = (r >> 3) & 0x1F;
    let g = (g >> 3) & 0x1F;
    let b = (b >> 3) & 0x1F;
    (r | (g << 5) | (b << 10)) as u16
}

/// Expand RGB555 back to 8-bit channels
#[inline]
pub fn unpack_rgb555(color: u16) -> [u32; 3] {
    let c = color as u32;
    [(c & 0x1F) << 3, ((c >> 5) & 0x1F) << 3, ((c >> 10) & 0x1F) << 3]
}
