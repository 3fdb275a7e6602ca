// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Lever arms, positions and attitudes of sensors on a platform.
//!
//! Positions are in the body frame: x starboard, y forward, z up, in
//! meters. Angles are degrees. The position and depth references are
//! offset 0 of the sensors assigned to [`SourceChannel::Position`] and
//! [`SourceChannel::Depth`]; the attitude reference is offset 0 of the
//! [`SourceChannel::Heading`] and [`SourceChannel::RollPitch`] sensors.
//!
//! ```
//! use sonarcodec::platform::{Attitude, OffsetMode, PlatformModel, SourceChannel};
//! use sonarcodec::platform::{Capability1, Capability2, SensorType};
//!
//! let mut platform = PlatformModel::new();
//! let gps = platform.add_sensor(SensorType::Position, "", "", "",
//!     Capability1::POSITION, Capability2::empty(), 1, 0)?;
//! let sonar = platform.add_sensor(SensorType::SonarMultibeam, "", "", "",
//!     Capability1::empty(), Capability2::TOPOGRAPHY_MULTIBEAM, 1, 0)?;
//! platform.set_sensor_offset(gps, 0, OffsetMode::Static, [0.0; 3],
//!     OffsetMode::Unset, Attitude::IDENTITY)?;
//! platform.set_sensor_offset(sonar, 0, OffsetMode::Static, [0.0, 2.0, -3.0],
//!     OffsetMode::Unset, Attitude::IDENTITY)?;
//! platform.set_source_sensor(SourceChannel::Position, 0, gps)?;
//! platform.set_source_sensor(SourceChannel::Depth, 0, gps)?;
//!
//! let (x, y, z) = platform.lever(sonar, 0, 0.0, 0.0, 0.0)?;
//! assert!((x - 0.0).abs() < 1e-12 && (y - 2.0).abs() < 1e-12 && (z + 3.0).abs() < 1e-12);
//! # Ok::<(), sonarcodec::core::MbError>(())
//! ```

use crate::core::{MbError, Result};
use crate::geo::coor_scale;

use super::attitude::Attitude;
use super::model::{PlatformModel, SourceChannel};
use super::sensor::{OffsetMode, Sensor, SensorOffset};

impl PlatformModel {
    /// Body-frame offset from the position/depth references to a target sensor.
    ///
    /// The offset difference is rotated by the platform attitude. `z` is
    /// computed against the depth reference; `x` and `y` against the
    /// position reference. Unset position offsets count as zero. When no
    /// heading or roll/pitch source is assigned, the given attitude is used
    /// as the platform attitude.
    pub fn lever(
        &self,
        target: usize,
        target_offset: usize,
        heading: f64,
        roll: f64,
        pitch: f64,
    ) -> Result<(f64, f64, f64)> {
        let attitude = if self.has_attitude_sources() {
            self.orientation(heading, roll, pitch)?
        } else {
            Attitude::new(heading, roll, pitch)
        };
        let target = self.target_offset("lever", target, target_offset)?;
        let position_ref = self.source_sensor("lever", SourceChannel::Position)?.reference_offset();
        let depth_ref = self.source_sensor("lever", SourceChannel::Depth)?.reference_offset();

        let (sr, cr) = attitude.roll.to_radians().sin_cos();
        let (sp, cp) = attitude.pitch.to_radians().sin_cos();
        let (sh, ch) = attitude.heading.to_radians().sin_cos();

        let [dx, dy, dz] = difference(&target, &depth_ref);
        let z = sp * dy - cp * sr * dx + cp * cr * dz;

        let [dx, dy, dz] = difference(&target, &position_ref);
        let x = cp * sh * dy + (ch * cr + sh * sp * sr) * dx - (cr * sh * sp - ch * sr) * dz;
        let y = ch * cp * dy + (ch * sp * sr - cr * sh) * dx - (sh * sr + ch * cr * sp) * dz;

        Ok((x, y, z))
    }

    /// Geographic position and depth of a target sensor.
    ///
    /// `navlon`/`navlat` and `sensordepth` are the readings of the position
    /// and depth references. Depth is positive down.
    #[allow(clippy::too_many_arguments)]
    pub fn position(
        &self,
        target: usize,
        target_offset: usize,
        navlon: f64,
        navlat: f64,
        sensordepth: f64,
        heading: f64,
        roll: f64,
        pitch: f64,
    ) -> Result<(f64, f64, f64)> {
        let (x, y, z) = self.lever(target, target_offset, heading, roll, pitch)?;
        let (mtodeglon, mtodeglat) = coor_scale(navlat);
        Ok((navlon + x * mtodeglon, navlat + y * mtodeglat, sensordepth - z))
    }

    /// Platform attitude from the attitude measured by the reference sensors.
    ///
    /// The mounting rotation of the references (roll and pitch offsets of
    /// the roll/pitch sensor, heading offset of the heading sensor) is
    /// removed when the roll/pitch sensor's attitude offset is static and
    /// nonzero. Otherwise the measurement is returned unchanged.
    pub fn orientation(&self, heading: f64, roll: f64, pitch: f64) -> Result<Attitude> {
        let measured = Attitude::new(heading, roll, pitch);
        let (mode, mount) = self.reference_mount("orientation")?;
        if mode == OffsetMode::Static && !mount.is_zero() {
            Ok(measured.compose(&mount.inverse()))
        } else {
            Ok(measured)
        }
    }

    /// Mounting attitude of a target sensor relative to the attitude references.
    ///
    /// This is the rotation to apply to the measured attitude to obtain the
    /// attitude at the target. It is the identity when every offset is zero.
    pub fn orientation_offset(&self, target: usize, target_offset: usize) -> Result<Attitude> {
        let target = self.target_offset("orientation_offset", target, target_offset)?;
        let (_, mount) = self.reference_mount("orientation_offset")?;
        let target_mount = target.static_attitude();
        if mount.is_zero() {
            return Ok(target_mount);
        }
        Ok(mount.inverse().compose(&target_mount))
    }

    /// Attitude experienced by a target sensor.
    ///
    /// Applies [`PlatformModel::orientation_offset`] to the measured attitude
    /// when the target's attitude offset is static and the relative offset
    /// is nonzero.
    pub fn orientation_target(
        &self,
        target: usize,
        target_offset: usize,
        heading: f64,
        roll: f64,
        pitch: f64,
    ) -> Result<Attitude> {
        let measured = Attitude::new(heading, roll, pitch);
        let relative = self.orientation_offset(target, target_offset)?;
        let target = self.target_offset("orientation_target", target, target_offset)?;
        if target.attitude_mode == OffsetMode::Static && !relative.is_zero() {
            Ok(measured.compose(&relative))
        } else {
            Ok(measured)
        }
    }

    fn has_attitude_sources(&self) -> bool {
        [SourceChannel::Heading, SourceChannel::RollPitch]
            .iter()
            .all(|&channel| {
                self.sources
                    .primary(channel)
                    .is_some_and(|i| i < self.sensors.len())
            })
    }

    /// Mode of the roll/pitch reference offset and the combined mounting attitude.
    fn reference_mount(&self, operation: &str) -> Result<(OffsetMode, Attitude)> {
        let heading = self
            .source_sensor(operation, SourceChannel::Heading)?
            .reference_offset();
        let rollpitch = self
            .source_sensor(operation, SourceChannel::RollPitch)?
            .reference_offset();
        let mount = Attitude::new(
            heading.static_attitude().heading,
            rollpitch.static_attitude().roll,
            rollpitch.static_attitude().pitch,
        );
        Ok((rollpitch.attitude_mode, mount))
    }

    fn source_sensor(&self, operation: &str, channel: SourceChannel) -> Result<&Sensor> {
        self.sources
            .primary(channel)
            .and_then(|i| self.sensors.get(i))
            .ok_or_else(|| {
                MbError::bad_parameter(
                    operation,
                    format!("no {} source sensor", channel.keyword().to_lowercase()),
                )
            })
    }

    fn target_offset(&self, operation: &str, target: usize, offset: usize) -> Result<SensorOffset> {
        let sensor = self.sensors.get(target).ok_or_else(|| {
            MbError::bad_parameter(
                operation,
                format!("target sensor {target} out of range ({} sensors)", self.sensors.len()),
            )
        })?;
        sensor.offsets.get(offset).copied().ok_or_else(|| {
            MbError::bad_parameter(
                operation,
                format!(
                    "offset {offset} out of range ({} offsets on sensor {target})",
                    sensor.offsets.len()
                ),
            )
        })
    }
}

/// `target - reference` over the static position components.
fn difference(target: &SensorOffset, reference: &SensorOffset) -> [f64; 3] {
    let t = target.static_position();
    let r = reference.static_position();
    [t[0] - r[0], t[1] - r[1], t[2] - r[2]]
}
