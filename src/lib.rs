// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Sonarcodec
//!
//! Instrument data access for sonar and seismic files.
//!
//! The library is organized in layers:
//! - **Sessions** in [`io::session`](crate::io::session) open a file, pick the
//!   format driver and apply projection and longitude handling on top of it
//! - **Format drivers** implement [`FormatDriver`] and are looked up by
//!   numeric id through [`io::registry`](crate::io::registry)
//! - **SEGY** support lives in [`io::formats::segy`](crate::io::formats::segy)
//! - **Platform geometry** in [`platform`](crate::platform) relates sensor
//!   mounting positions and attitudes
//!
//! ## Architecture
//!
//! - `core/` - error type, record kinds, time conversions
//! - `types/` - growable sample arrays
//! - `geo/` - longitude range policy, local scale, projection interface
//! - `io/` - driver contract, registry, detection, sessions, formats
//! - `platform/` - sensors, offsets, lever arms, platform definition files
//!
//! ## Example: Reading soundings
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sonarcodec::geo::LonFlip;
//! use sonarcodec::io::SessionBuilder;
//!
//! let mut session = SessionBuilder::new()
//!     .lonflip(LonFlip::Negative)
//!     .open_read("line042.sgy")?;
//! while let Ok(kind) = session.read_ping() {
//!     if kind.is_survey() {
//!         let ping = session.extract()?;
//!         println!("{} {} {}", ping.time_d, ping.navlon, ping.navlat);
//!     }
//! }
//! session.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Sensor position
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sonarcodec::platform::PlatformModel;
//!
//! let platform = PlatformModel::read("survey.plf")?;
//! let (lon, lat, depth) = platform.position(1, 0, -70.5, 41.2, 3.0, 45.0, 1.0, -0.5)?;
//! println!("{lon} {lat} {depth}");
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{DataKind, MbError, Result, TimeParts};

// Growable arrays
pub mod types;

// Longitude, scale and projection helpers
pub mod geo;

// Driver contract, registry, sessions and formats
pub mod io;

// Re-export key I/O types
pub use io::registry::{register, FormatId};
pub use io::traits::{FormatDescriptor, FormatDriver, FormatStore, Operation};
pub use io::{MbioSession, PingRecord, SessionBuilder, SessionConfig, Swath};

// Sensor platform model and geometry
pub mod platform;

pub use platform::{Attitude, PlatformModel};
