// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sensor platform model and geometry.
//!
//! A [`PlatformModel`] describes a vehicle, the sensors mounted on it and
//! which sensor supplies each kind of data. It relates readings of one
//! sensor to the physical location and attitude of another.
//!
//! - [`model`] - platform, source table and editing operations
//! - [`sensor`] - sensors, offsets, capabilities and latency
//! - [`attitude`] - heading/roll/pitch composition
//! - [`geometry`] - lever arms, positions and orientations
//! - [`parser`] / [`writer`] - platform definition text files

pub mod attitude;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod sensor;
pub mod writer;

pub use attitude::Attitude;
pub use model::{PlatformModel, PlatformType, SourceChannel, SourceTable, SOURCE_SLOTS};
pub use sensor::{
    Capability1, Capability2, OffsetMode, Sensor, SensorOffset, SensorType, TimeLatency,
};
