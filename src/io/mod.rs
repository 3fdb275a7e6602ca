// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for sonar and seismic data formats.
//!
//! This module provides the format-driver contract, the registry that maps
//! format ids to drivers, and the sessions that apply the same
//! coordinate handling on top of every driver.

pub mod detection;
pub mod formats;
pub mod metadata;
pub mod registry;
pub mod swath;

// Driver contract
pub mod traits;

// Sessions with builder and configuration
pub mod session;

// Re-exports
pub use detection::{detect_format, detect_from_extension, is_segy_file};
pub use metadata::{
    Altitude, AttitudeSample, DetectType, Detects, Gains, NavRecord, NavSample, PingRecord,
    PreprocessParams, PulseType, Pulses, RawSidescan, ScalarSample, SegyNumber, SegyTraceView,
    SidescanType, SonarType, SoundVelocityProfile, TravelTimes,
};
pub use registry::{register, supported_formats, FormatId};
pub use session::{Dimensions, MbioSession, SessionBuilder, SessionConfig, SessionStream};
pub use swath::{Footprint, Swath, BEAM_FLAG_NONE, BEAM_FLAG_NULL, SIDESCAN_NULL};
pub use traits::{FormatDescriptor, FormatDriver, FormatStore, Operation, OperationSet};
