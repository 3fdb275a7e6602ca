// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format registry.
//!
//! Maps numeric format ids to driver instances. Registration is pure: it
//! builds a driver around a static descriptor and touches no file.
//!
//! # Example
//!
//! ```
//! use sonarcodec::io::registry::{register, FormatId};
//!
//! let driver = register(FormatId::SegySegy as i32).unwrap();
//! assert_eq!(driver.descriptor().name, "SEGYSEGY");
//! assert!(register(9999).is_err());
//! ```

use crate::core::{MbError, Result};

use super::formats::segy::SegyDriver;
use super::traits::FormatDriver;

/// Formats known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FormatId {
    /// SEG-Y seismic/subbottom traces
    SegySegy = 160,
}

impl FormatId {
    /// Every known format.
    pub const ALL: [FormatId; 1] = [FormatId::SegySegy];

    /// Look up a numeric format id.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.code() == code)
    }

    /// Numeric format id.
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Build the driver for this format.
    pub fn driver(&self) -> Box<dyn FormatDriver> {
        match self {
            FormatId::SegySegy => Box::new(SegyDriver),
        }
    }
}

impl std::fmt::Display for FormatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatId::SegySegy => f.write_str("SEGYSEGY"),
        }
    }
}

/// Build the driver for a numeric format id.
///
/// Unknown ids yield `BadFormat`.
pub fn register(format_id: i32) -> Result<Box<dyn FormatDriver>> {
    let id = FormatId::from_code(format_id)
        .ok_or_else(|| MbError::bad_format("format id", format_id))?;
    let driver = id.driver();
    tracing::debug!(
        format = format_id,
        name = driver.descriptor().name,
        operations = driver.descriptor().operations.len(),
        "registered format driver"
    );
    Ok(driver)
}

/// Numeric ids of every supported format.
pub fn supported_formats() -> Vec<i32> {
    FormatId::ALL.iter().map(FormatId::code).collect()
}
