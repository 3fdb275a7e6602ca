// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Platform model: metadata, sensors and data-source assignments.

use serde::{Deserialize, Serialize};

use crate::core::time::time_parts;
use crate::core::{MbError, Result, TimeParts};

use super::attitude::Attitude;
use super::sensor::{Capability1, Capability2, OffsetMode, Sensor, SensorOffset, SensorType, TimeLatency};

/// Times at or below this many epoch seconds are treated as unset.
const MIN_VALID_TIME_D: f64 = 100.0;

/// Kind of vehicle carrying the sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlatformType {
    #[default]
    Unknown,
    SurfaceVessel,
    TowBody,
    Rov,
    Auv,
    Aircraft,
    Satellite,
    Mooring,
    Fixed,
}

impl PlatformType {
    pub const ALL: [PlatformType; 9] = [
        PlatformType::Unknown,
        PlatformType::SurfaceVessel,
        PlatformType::TowBody,
        PlatformType::Rov,
        PlatformType::Auv,
        PlatformType::Aircraft,
        PlatformType::Satellite,
        PlatformType::Mooring,
        PlatformType::Fixed,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlatformType::Unknown => "Unknown platform type",
            PlatformType::SurfaceVessel => "Surface vessel",
            PlatformType::TowBody => "Tow body",
            PlatformType::Rov => "ROV",
            PlatformType::Auv => "AUV",
            PlatformType::Aircraft => "Aircraft",
            PlatformType::Satellite => "Satellite",
            PlatformType::Mooring => "Mooring",
            PlatformType::Fixed => "Fixed",
        }
    }
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic data channel a sensor can be the source of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceChannel {
    Bathymetry,
    Backscatter,
    Subbottom,
    Camera,
    Position,
    Depth,
    Heading,
    RollPitch,
    Heave,
}

impl SourceChannel {
    pub const ALL: [SourceChannel; 9] = [
        SourceChannel::Bathymetry,
        SourceChannel::Backscatter,
        SourceChannel::Subbottom,
        SourceChannel::Camera,
        SourceChannel::Position,
        SourceChannel::Depth,
        SourceChannel::Heading,
        SourceChannel::RollPitch,
        SourceChannel::Heave,
    ];

    /// Directive suffix, as in `SOURCE_ROLLPITCH`.
    pub fn keyword(&self) -> &'static str {
        match self {
            SourceChannel::Bathymetry => "BATHYMETRY",
            SourceChannel::Backscatter => "BACKSCATTER",
            SourceChannel::Subbottom => "SUBBOTTOM",
            SourceChannel::Camera => "CAMERA",
            SourceChannel::Position => "POSITION",
            SourceChannel::Depth => "DEPTH",
            SourceChannel::Heading => "HEADING",
            SourceChannel::RollPitch => "ROLLPITCH",
            SourceChannel::Heave => "HEAVE",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword == "SUBCAMERA" {
            return Some(SourceChannel::Camera);
        }
        Self::ALL.into_iter().find(|c| c.keyword() == keyword)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Slots per channel: the primary source and three redundant ones.
pub const SOURCE_SLOTS: usize = 4;

/// Sensor index assigned to each channel slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceTable {
    slots: [[Option<usize>; SOURCE_SLOTS]; 9],
}

impl SourceTable {
    pub fn get(&self, channel: SourceChannel, slot: usize) -> Option<usize> {
        self.slots[channel.index()].get(slot).copied().flatten()
    }

    /// The primary source of a channel.
    pub fn primary(&self, channel: SourceChannel) -> Option<usize> {
        self.get(channel, 0)
    }

    /// Assign a slot, returning `false` if the slot does not exist.
    pub fn set(&mut self, channel: SourceChannel, slot: usize, sensor: Option<usize>) -> bool {
        match self.slots[channel.index()].get_mut(slot) {
            Some(entry) => {
                *entry = sensor;
                true
            }
            None => false,
        }
    }

    /// Every `(channel, slot, value)` in file order.
    pub fn iter(&self) -> impl Iterator<Item = (SourceChannel, usize, Option<usize>)> + '_ {
        SourceChannel::ALL.into_iter().flat_map(move |channel| {
            (0..SOURCE_SLOTS).map(move |slot| (channel, slot, self.get(channel, slot)))
        })
    }
}

/// A vehicle and the sensors mounted on it.
///
/// Sensors and their offsets are addressed by index; both vectors grow on
/// demand and are released when the model is dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformModel {
    pub platform_type: PlatformType,
    pub name: String,
    pub organization: String,
    pub documentation_url: String,
    pub start_time_d: f64,
    pub start_time_i: TimeParts,
    pub end_time_d: f64,
    pub end_time_i: TimeParts,
    pub sensors: Vec<Sensor>,
    pub sources: SourceTable,
}

impl PlatformModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_sensors(&self) -> usize {
        self.sensors.len()
    }

    pub fn sensor(&self, index: usize) -> Option<&Sensor> {
        self.sensors.get(index)
    }

    /// Set the descriptive fields and the validity time range.
    pub fn setinfo(
        &mut self,
        platform_type: PlatformType,
        name: &str,
        organization: &str,
        documentation_url: &str,
        start_time_d: f64,
        end_time_d: f64,
    ) -> Result<()> {
        self.platform_type = platform_type;
        self.name = name.to_string();
        self.organization = organization.to_string();
        self.documentation_url = documentation_url.to_string();
        self.set_start_time(start_time_d)?;
        self.set_end_time(end_time_d)
    }

    pub(crate) fn set_start_time(&mut self, time_d: f64) -> Result<()> {
        self.start_time_i = parts_or_zero(time_d)?;
        self.start_time_d = time_d;
        Ok(())
    }

    pub(crate) fn set_end_time(&mut self, time_d: f64) -> Result<()> {
        self.end_time_i = parts_or_zero(time_d)?;
        self.end_time_d = time_d;
        Ok(())
    }

    /// Append a sensor and return its index.
    ///
    /// `num_offsets` unset offsets are created. A positive
    /// `num_time_latency` starts a zeroed latency model of that length.
    #[allow(clippy::too_many_arguments)]
    pub fn add_sensor(
        &mut self,
        sensor_type: SensorType,
        model: &str,
        manufacturer: &str,
        serial_number: &str,
        capability1: Capability1,
        capability2: Capability2,
        num_offsets: usize,
        num_time_latency: usize,
    ) -> Result<usize> {
        let index = self.sensors.len();
        self.ensure_sensor(index)?;
        let mut offsets = Vec::new();
        offsets
            .try_reserve_exact(num_offsets)
            .map_err(|_| MbError::resource_exhausted("sensor offsets", num_offsets))?;
        offsets.resize(num_offsets, SensorOffset::default());
        let time_latency = if num_time_latency > 0 {
            let mut points = Vec::new();
            points
                .try_reserve_exact(num_time_latency)
                .map_err(|_| MbError::resource_exhausted("time latency model", num_time_latency))?;
            points.resize(num_time_latency, (0.0, 0.0));
            TimeLatency::Model(points)
        } else {
            TimeLatency::None
        };
        self.sensors[index] = Sensor {
            sensor_type,
            model: model.to_string(),
            manufacturer: manufacturer.to_string(),
            serial_number: serial_number.to_string(),
            capability1,
            capability2,
            offsets,
            time_latency,
        };
        tracing::debug!(index, sensor_type = %sensor_type, "added platform sensor");
        Ok(index)
    }

    /// Set one mounting offset of an existing sensor.
    #[allow(clippy::too_many_arguments)]
    pub fn set_sensor_offset(
        &mut self,
        sensor: usize,
        offset: usize,
        position_mode: OffsetMode,
        position: [f64; 3],
        attitude_mode: OffsetMode,
        attitude: Attitude,
    ) -> Result<()> {
        let target = self.offset_mut(sensor, offset)?;
        *target = SensorOffset {
            position_mode,
            position,
            attitude_mode,
            attitude,
        };
        Ok(())
    }

    /// Replace the time-latency model of an existing sensor.
    pub fn set_sensor_timelatency(&mut self, sensor: usize, latency: TimeLatency) -> Result<()> {
        let num_sensors = self.sensors.len();
        let entry = self.sensors.get_mut(sensor).ok_or_else(|| {
            MbError::bad_parameter(
                "set_sensor_timelatency",
                format!("sensor {sensor} out of range ({num_sensors} sensors)"),
            )
        })?;
        entry.time_latency = latency;
        Ok(())
    }

    /// Make `sensor` the source of `channel` in `slot` (0 primary, 1..=3 redundant).
    pub fn set_source_sensor(
        &mut self,
        channel: SourceChannel,
        slot: usize,
        sensor: usize,
    ) -> Result<()> {
        if sensor >= self.sensors.len() {
            return Err(MbError::bad_parameter(
                "set_source_sensor",
                format!("sensor {sensor} out of range ({} sensors)", self.sensors.len()),
            ));
        }
        if !self.sources.set(channel, slot, Some(sensor)) {
            return Err(MbError::bad_parameter(
                "set_source_sensor",
                format!("source slot {slot} out of range"),
            ));
        }
        Ok(())
    }

    /// Grow the sensor list so `index` is valid.
    pub(crate) fn ensure_sensor(&mut self, index: usize) -> Result<&mut Sensor> {
        if index >= self.sensors.len() {
            let additional = index + 1 - self.sensors.len();
            self.sensors
                .try_reserve(additional)
                .map_err(|_| MbError::resource_exhausted("platform sensors", index + 1))?;
            self.sensors.resize_with(index + 1, Sensor::default);
        }
        Ok(&mut self.sensors[index])
    }

    /// Grow the sensor list and the sensor's offsets so both indices are valid.
    pub(crate) fn ensure_offset(&mut self, sensor: usize, offset: usize) -> Result<&mut SensorOffset> {
        let entry = self.ensure_sensor(sensor)?;
        resize_offsets(&mut entry.offsets, offset + 1)?;
        Ok(&mut entry.offsets[offset])
    }

    fn offset_mut(&mut self, sensor: usize, offset: usize) -> Result<&mut SensorOffset> {
        let num_sensors = self.sensors.len();
        let entry = self.sensors.get_mut(sensor).ok_or_else(|| {
            MbError::bad_parameter(
                "set_sensor_offset",
                format!("sensor {sensor} out of range ({num_sensors} sensors)"),
            )
        })?;
        let num_offsets = entry.offsets.len();
        entry.offsets.get_mut(offset).ok_or_else(|| {
            MbError::bad_parameter(
                "set_sensor_offset",
                format!("offset {offset} out of range ({num_offsets} offsets on sensor {sensor})"),
            )
        })
    }
}

/// Grow an offset list to at least `len` entries; never shrinks.
pub(crate) fn resize_offsets(offsets: &mut Vec<SensorOffset>, len: usize) -> Result<()> {
    if len > offsets.len() {
        offsets
            .try_reserve(len - offsets.len())
            .map_err(|_| MbError::resource_exhausted("sensor offsets", len))?;
        offsets.resize(len, SensorOffset::default());
    }
    Ok(())
}

fn parts_or_zero(time_d: f64) -> Result<TimeParts> {
    if time_d > MIN_VALID_TIME_D {
        time_parts(time_d)
    } else {
        Ok([0; 7])
    }
}
