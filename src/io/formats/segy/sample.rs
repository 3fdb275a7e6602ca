// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SEGY sample encodings.
//!
//! The file header's format code selects the on-disk width and encoding of
//! every trace sample. All encodings decode to, and encode from, `f32`.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::constants::*;
use crate::core::{MbError, Result};

/// On-disk sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Code 1: IBM System/360 hexadecimal float
    IbmFloat,
    /// Code 2: 32-bit integer
    Int32,
    /// Code 3: 16-bit integer
    Int16,
    /// Code 5: IEEE float, big-endian
    IeeeFloat,
    /// Code 6: IEEE float, big-endian
    IeeeFloatAlt,
    /// Code 8: 8-bit integer
    Int8,
    /// Code 11: IEEE float, little-endian
    IeeeFloatLe,
}

impl SampleFormat {
    /// Look up a file-header format code.
    ///
    /// Codes outside the documented set are rejected rather than guessed.
    pub fn from_code(code: i16) -> Result<Self> {
        match code {
            FORMAT_IBM_FLOAT => Ok(SampleFormat::IbmFloat),
            FORMAT_INT32 => Ok(SampleFormat::Int32),
            FORMAT_INT16 => Ok(SampleFormat::Int16),
            FORMAT_IEEE_FLOAT => Ok(SampleFormat::IeeeFloat),
            FORMAT_IEEE_FLOAT_ALT => Ok(SampleFormat::IeeeFloatAlt),
            FORMAT_INT8 => Ok(SampleFormat::Int8),
            FORMAT_IEEE_FLOAT_LE => Ok(SampleFormat::IeeeFloatLe),
            other => Err(MbError::UnsupportedSampleFormat { code: other }),
        }
    }

    /// File-header code for this encoding.
    pub fn code(&self) -> i16 {
        match self {
            SampleFormat::IbmFloat => FORMAT_IBM_FLOAT,
            SampleFormat::Int32 => FORMAT_INT32,
            SampleFormat::Int16 => FORMAT_INT16,
            SampleFormat::IeeeFloat => FORMAT_IEEE_FLOAT,
            SampleFormat::IeeeFloatAlt => FORMAT_IEEE_FLOAT_ALT,
            SampleFormat::Int8 => FORMAT_INT8,
            SampleFormat::IeeeFloatLe => FORMAT_IEEE_FLOAT_LE,
        }
    }

    /// On-disk width of one sample.
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::Int16 => 2,
            SampleFormat::Int8 => 1,
            _ => 4,
        }
    }

    /// Check whether this encoding stores integers.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            SampleFormat::Int32 | SampleFormat::Int16 | SampleFormat::Int8
        )
    }

    /// Decode `out.len()` samples from `bytes`.
    ///
    /// `bytes` must hold exactly `out.len() * bytes_per_sample()` bytes.
    pub fn decode(&self, bytes: &[u8], out: &mut [f32]) {
        let width = self.bytes_per_sample();
        debug_assert_eq!(bytes.len(), out.len() * width);
        for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(width)) {
            *value = match self {
                SampleFormat::IbmFloat => ibm_to_ieee(BigEndian::read_u32(chunk)),
                SampleFormat::Int32 => BigEndian::read_i32(chunk) as f32,
                SampleFormat::Int16 => f32::from(BigEndian::read_i16(chunk)),
                SampleFormat::IeeeFloat | SampleFormat::IeeeFloatAlt => {
                    BigEndian::read_f32(chunk)
                }
                SampleFormat::Int8 => f32::from(chunk[0] as i8),
                SampleFormat::IeeeFloatLe => LittleEndian::read_f32(chunk),
            };
        }
    }

    /// Encode `samples` into `out`.
    ///
    /// `out` must hold exactly `samples.len() * bytes_per_sample()` bytes.
    /// Integer encodings round to nearest and saturate at the type bounds.
    pub fn encode(&self, samples: &[f32], out: &mut [u8]) {
        let width = self.bytes_per_sample();
        debug_assert_eq!(out.len(), samples.len() * width);
        for (&value, chunk) in samples.iter().zip(out.chunks_exact_mut(width)) {
            match self {
                SampleFormat::IbmFloat => BigEndian::write_u32(chunk, ieee_to_ibm(value)),
                SampleFormat::Int32 => BigEndian::write_i32(chunk, value.round() as i32),
                SampleFormat::Int16 => BigEndian::write_i16(chunk, value.round() as i16),
                SampleFormat::IeeeFloat | SampleFormat::IeeeFloatAlt => {
                    BigEndian::write_f32(chunk, value)
                }
                SampleFormat::Int8 => chunk[0] = (value.round() as i8) as u8,
                SampleFormat::IeeeFloatLe => LittleEndian::write_f32(chunk, value),
            }
        }
    }
}

/// Convert an IBM System/360 single-precision float to IEEE.
///
/// Layout: 1 sign bit, 7-bit excess-64 base-16 exponent, 24-bit fraction.
pub fn ibm_to_ieee(bits: u32) -> f32 {
    let fraction = bits & 0x00ff_ffff;
    if fraction == 0 {
        return 0.0;
    }
    let exponent = ((bits >> 24) & 0x7f) as i32 - 64;
    let magnitude = f64::from(fraction) * 2f64.powi(4 * exponent - 24);
    if bits & 0x8000_0000 != 0 {
        -magnitude as f32
    } else {
        magnitude as f32
    }
}

/// Convert an IEEE float to IBM System/360 single precision.
///
/// NaN encodes as zero; values beyond the IBM range saturate.
pub fn ieee_to_ibm(value: f32) -> u32 {
    if value == 0.0 || value.is_nan() {
        return 0;
    }
    let sign = if value.is_sign_negative() {
        0x8000_0000
    } else {
        0
    };
    let magnitude = f64::from(value).abs();
    if magnitude.is_infinite() {
        return sign | 0x7fff_ffff;
    }

    // Normalize so that 1/16 <= fraction < 1.
    let mut exponent = (magnitude.log2() / 4.0).floor() as i32 + 1;
    let mut fraction = magnitude / 16f64.powi(exponent);
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 1.0 / 16.0 {
        fraction *= 16.0;
        exponent -= 1;
    }

    let mut mantissa = (fraction * 16_777_216.0).round() as u32;
    if mantissa >= 0x0100_0000 {
        mantissa >>= 4;
        exponent += 1;
    }

    let biased = exponent + 64;
    if biased > 127 {
        return sign | 0x7fff_ffff;
    }
    if biased < 0 {
        return 0;
    }
    sign | ((biased as u32) << 24) | mantissa
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        for code in SUPPORTED_SAMPLE_FORMATS {
            assert_eq!(SampleFormat::from_code(code).unwrap().code(), code);
        }
        assert_eq!(
            SampleFormat::from_code(4).unwrap_err(),
            MbError::UnsupportedSampleFormat { code: 4 }
        );
        assert!(SampleFormat::from_code(0).is_err());
    }

    #[test]
    fn test_bytes_per_sample() {
        assert_eq!(SampleFormat::IbmFloat.bytes_per_sample(), 4);
        assert_eq!(SampleFormat::Int32.bytes_per_sample(), 4);
        assert_eq!(SampleFormat::Int16.bytes_per_sample(), 2);
        assert_eq!(SampleFormat::IeeeFloat.bytes_per_sample(), 4);
        assert_eq!(SampleFormat::IeeeFloatAlt.bytes_per_sample(), 4);
        assert_eq!(SampleFormat::Int8.bytes_per_sample(), 1);
        assert_eq!(SampleFormat::IeeeFloatLe.bytes_per_sample(), 4);
    }

    #[test]
    fn test_ibm_known_values() {
        assert_eq!(ibm_to_ieee(0x4110_0000), 1.0);
        assert_eq!(ibm_to_ieee(0xC276_A000), -118.625);
        assert_eq!(ibm_to_ieee(0x0000_0000), 0.0);
        assert_eq!(ieee_to_ibm(1.0), 0x4110_0000);
        assert_eq!(ieee_to_ibm(-118.625), 0xC276_A000);
        assert_eq!(ieee_to_ibm(0.0), 0);
    }

    #[test]
    fn test_ibm_round_trip_tolerance() {
        for &v in &[0.1f32, -3.7, 1234.5678, 1.0e-5, 6.02e20, -2.5] {
            let back = ibm_to_ieee(ieee_to_ibm(v));
            assert!(((back - v) / v).abs() < 1.0e-6, "{v} -> {back}");
        }
    }

    #[test]
    fn test_ibm_saturates() {
        assert_eq!(ieee_to_ibm(f32::INFINITY), 0x7fff_ffff);
        assert_eq!(ieee_to_ibm(f32::NEG_INFINITY), 0xffff_ffff);
        assert_eq!(ieee_to_ibm(f32::NAN), 0);
    }

    #[test]
    fn test_big_endian_layout() {
        let mut out = [0u8; 4];
        SampleFormat::IeeeFloat.encode(&[1.0], &mut out);
        assert_eq!(out, [0x3f, 0x80, 0x00, 0x00]);

        SampleFormat::IeeeFloatLe.encode(&[1.0], &mut out);
        assert_eq!(out, [0x00, 0x00, 0x80, 0x3f]);

        let mut out = [0u8; 2];
        SampleFormat::Int16.encode(&[-2.0], &mut out);
        assert_eq!(out, [0xff, 0xfe]);
    }

    #[test]
    fn test_integer_rounds_to_nearest() {
        let mut out = [0u8; 8];
        SampleFormat::Int16.encode(&[1.6, -2.7, 0.4, -0.4], &mut out);
        let mut back = [0f32; 4];
        SampleFormat::Int16.decode(&out, &mut back);
        assert_eq!(back, [2.0, -3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_integer_saturation() {
        let mut out = [0u8; 3];
        SampleFormat::Int8.encode(&[300.0, -300.0, 1.6], &mut out);
        let mut back = [0f32; 3];
        SampleFormat::Int8.decode(&out, &mut back);
        assert_eq!(back, [127.0, -128.0, 2.0]);
    }
}
