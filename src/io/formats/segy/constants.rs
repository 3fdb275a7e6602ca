// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SEGY layout constants.
//!
//! Record sizes and sample-format codes shared by the reader, the writer,
//! format detection and the driver binding.

/// Size of the free-text (EBCDIC or ASCII) header.
pub const ASCII_HEADER_SIZE: usize = 3200;
/// Number of 80-character card images in the text header.
pub const ASCII_HEADER_LINES: usize = 40;
/// Width of one card image.
pub const ASCII_HEADER_LINE_WIDTH: usize = 80;

/// Size of the binary file header.
pub const FILE_HEADER_SIZE: usize = 400;
/// Bytes of the file header occupied by numeric fields.
pub const FILE_HEADER_FIELDS_SIZE: usize = 62;
/// Reserved tail of the file header.
pub const FILE_HEADER_EXTRA_SIZE: usize = FILE_HEADER_SIZE - FILE_HEADER_FIELDS_SIZE;

/// Size of one trace header.
pub const TRACE_HEADER_SIZE: usize = 240;

/// Offset of the file header's sample-format code from the start of the file.
pub const FORMAT_CODE_FILE_OFFSET: u64 = (ASCII_HEADER_SIZE + 24) as u64;

/// Offset of the SEG-Y revision number within the file header.
pub const REVISION_OFFSET: usize = 300;
/// Offset of the fixed-length-trace flag within the file header.
pub const FIXED_LENGTH_OFFSET: usize = 302;
/// Offset of the extended text header count within the file header.
pub const NUM_EXT_HEADERS_OFFSET: usize = 304;

// Sample format codes

/// 4-byte IBM System/360 hexadecimal float.
pub const FORMAT_IBM_FLOAT: i16 = 1;
/// 4-byte two's complement integer.
pub const FORMAT_INT32: i16 = 2;
/// 2-byte two's complement integer.
pub const FORMAT_INT16: i16 = 3;
/// 4-byte IEEE float, big-endian.
pub const FORMAT_IEEE_FLOAT: i16 = 5;
/// 4-byte IEEE float, big-endian (MB-System alias).
pub const FORMAT_IEEE_FLOAT_ALT: i16 = 6;
/// 1-byte two's complement integer.
pub const FORMAT_INT8: i16 = 8;
/// 4-byte IEEE float, little-endian.
pub const FORMAT_IEEE_FLOAT_LE: i16 = 11;

/// Every sample-format code the codec can decode and encode.
pub const SUPPORTED_SAMPLE_FORMATS: [i16; 7] = [
    FORMAT_IBM_FLOAT,
    FORMAT_INT32,
    FORMAT_INT16,
    FORMAT_IEEE_FLOAT,
    FORMAT_IEEE_FLOAT_ALT,
    FORMAT_INT8,
    FORMAT_IEEE_FLOAT_LE,
];
