// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout sonarcodec.
//!
//! This module provides the foundational types for the library:
//! - [`MbError`] - Error taxonomy shared by drivers, sessions and platforms
//! - [`time`] - Epoch/calendar time conversions
//! - [`DataKind`] - Record classification returned by every read

pub mod error;
pub mod time;

pub use error::{MbError, Result};
pub use time::TimeParts;

/// Kind of record most recently read from a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum DataKind {
    /// No record
    #[default]
    None,
    /// Survey ping (bathymetry, amplitude and/or sidescan)
    Data,
    /// Free-text comment
    Comment,
    /// File or session header
    Header,
    /// Navigation fix
    Nav,
    /// Attitude sample
    Attitude,
    /// Heading sample
    Heading,
    /// Sensor depth sample
    SensorDepth,
    /// Altitude sample
    Altitude,
    /// Sound velocity profile
    VelocityProfile,
    /// Platform / installation parameters
    Installation,
    /// Subbottom trace
    SubbottomSegy,
}

impl DataKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::None => "none",
            DataKind::Data => "data",
            DataKind::Comment => "comment",
            DataKind::Header => "header",
            DataKind::Nav => "nav",
            DataKind::Attitude => "attitude",
            DataKind::Heading => "heading",
            DataKind::SensorDepth => "sensordepth",
            DataKind::Altitude => "altitude",
            DataKind::VelocityProfile => "velocity_profile",
            DataKind::Installation => "installation",
            DataKind::SubbottomSegy => "subbottom_segy",
        }
    }

    /// Check whether this kind carries survey data.
    pub fn is_survey(&self) -> bool {
        matches!(self, DataKind::Data)
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
