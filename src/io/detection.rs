// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format detection from file content.
//!
//! A SEGY file is recognized by a plausible sample-format code in its
//! binary file header (byte 3224), which follows the 3200-byte text
//! header. Files too short to hold both headers, or whose code is not a
//! known sample format, fall back to the file extension.
//!
//! # Example
//!
//! ```rust,no_run
//! use sonarcodec::io::detection::detect_format;
//! use sonarcodec::io::registry::FormatId;
//!
//! let format = detect_format("line042.sgy")?;
//! assert_eq!(format, Some(FormatId::SegySegy));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};

use crate::core::{MbError, Result};

use super::formats::segy::constants::{
    ASCII_HEADER_SIZE, FILE_HEADER_SIZE, FORMAT_CODE_FILE_OFFSET, SUPPORTED_SAMPLE_FORMATS,
};
use super::registry::FormatId;

/// Detect the format of a file, or `None` if it is not recognized.
///
/// Fails with `OpenFailed` only when the file cannot be opened at all.
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<Option<FormatId>> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .map_err(|e| MbError::open_failed(path.display().to_string(), e.to_string()))?;

    match detect_from_content(&mut file) {
        Ok(Some(format)) => return Ok(Some(format)),
        Ok(None) => {}
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "content detection failed");
        }
    }

    Ok(detect_from_extension(path))
}

/// Check whether a file looks like SEGY.
pub fn is_segy_file<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format(path), Ok(Some(FormatId::SegySegy)))
}

fn detect_from_content<R: Read + Seek>(reader: &mut R) -> Result<Option<FormatId>> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len < (ASCII_HEADER_SIZE + FILE_HEADER_SIZE) as u64 {
        return Ok(None);
    }
    reader.seek(SeekFrom::Start(FORMAT_CODE_FILE_OFFSET))?;
    let code = reader.read_i16::<BigEndian>()?;
    if SUPPORTED_SAMPLE_FORMATS.contains(&code) {
        Ok(Some(FormatId::SegySegy))
    } else {
        Ok(None)
    }
}

/// Detect the format from the file extension alone.
///
/// Used for files that do not exist yet, such as output paths.
pub fn detect_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatId> {
    let path = path.as_ref();
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| match ext.to_lowercase().as_str() {
            "sgy" | "segy" => Some(FormatId::SegySegy),
            _ => None,
        })
}
