// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record types exchanged between sessions and format drivers.
//!
//! Every driver speaks in these types, whatever its on-disk layout. Array
//! data (beams, pixels) travels separately in a [`Swath`](super::swath::Swath)
//! whose buffers are reused across pings.

use serde::{Deserialize, Serialize};

use crate::core::{DataKind, TimeParts};
use crate::io::formats::segy::{SampleFormat, TraceHeader};

/// Scalar part of a survey ping: time, navigation and array counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PingRecord {
    /// Kind of the record this ping came from
    pub kind: DataKind,
    /// Broken-down time: year, month, day, hour, minute, second, microsecond
    pub time_i: TimeParts,
    /// Epoch seconds
    pub time_d: f64,
    /// Longitude in degrees (or projected easting inside a driver)
    pub navlon: f64,
    /// Latitude in degrees (or projected northing inside a driver)
    pub navlat: f64,
    /// Speed over ground in km/h
    pub speed: f64,
    /// Heading in degrees
    pub heading: f64,
    /// Number of bathymetry beams
    pub nbath: usize,
    /// Number of amplitude beams
    pub namp: usize,
    /// Number of sidescan pixels
    pub nss: usize,
    /// Comment text (comment records only)
    pub comment: String,
}

/// Navigation and attitude at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavRecord {
    /// Kind of the record this fix came from
    pub kind: DataKind,
    /// Broken-down time
    pub time_i: TimeParts,
    /// Epoch seconds
    pub time_d: f64,
    /// Longitude in degrees
    pub navlon: f64,
    /// Latitude in degrees
    pub navlat: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Heading in degrees
    pub heading: f64,
    /// Sonar draft in meters
    pub draft: f64,
    /// Roll in degrees
    pub roll: f64,
    /// Pitch in degrees
    pub pitch: f64,
    /// Heave in meters
    pub heave: f64,
}

/// Transducer depth and altitude above the seafloor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Altitude {
    /// Kind of the current record
    pub kind: DataKind,
    /// Transducer depth below the surface in meters
    pub transducer_depth: f64,
    /// Altitude of the transducer above the seafloor in meters
    pub altitude: f64,
}

/// Sound velocity profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SoundVelocityProfile {
    /// Kind of the current record
    pub kind: DataKind,
    /// Depths in meters
    pub depth: Vec<f64>,
    /// Sound velocities in m/s
    pub velocity: Vec<f64>,
}

/// Per-beam travel times and angles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TravelTimes {
    /// Kind of the current record
    pub kind: DataKind,
    /// Two-way travel times in seconds
    pub ttimes: Vec<f64>,
    /// Angles from vertical in degrees
    pub angles: Vec<f64>,
    /// Forward angles in degrees
    pub angles_forward: Vec<f64>,
    /// Null angles in degrees
    pub angles_null: Vec<f64>,
    /// Heave per beam in meters
    pub heave: Vec<f64>,
    /// Along-track offset per beam in meters
    pub alongtrack_offset: Vec<f64>,
    /// Sonar draft in meters
    pub draft: f64,
    /// Surface sound velocity in m/s
    pub ssv: f64,
}

impl TravelTimes {
    /// Number of beams.
    pub fn len(&self) -> usize {
        self.ttimes.len()
    }

    /// Check if there are no beams.
    pub fn is_empty(&self) -> bool {
        self.ttimes.is_empty()
    }
}

/// How a bottom detection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectType {
    /// Not known
    #[default]
    Unknown,
    /// Amplitude detect
    Amplitude,
    /// Phase detect
    Phase,
}

/// Per-beam detect types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Detects {
    /// Kind of the current record
    pub kind: DataKind,
    /// Detect type of each beam
    pub detects: Vec<DetectType>,
}

/// Transmit pulse shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PulseType {
    /// Not known
    #[default]
    Unknown,
    /// Continuous wave
    Cw,
    /// Upsweep chirp
    UpChirp,
    /// Downsweep chirp
    DownChirp,
}

/// Per-beam pulse types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pulses {
    /// Kind of the current record
    pub kind: DataKind,
    /// Pulse type of each beam
    pub pulses: Vec<PulseType>,
}

/// Transmit and receive gains.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gains {
    /// Kind of the current record
    pub kind: DataKind,
    /// Transmit gain in dB
    pub transmit_gain: f64,
    /// Pulse length in seconds
    pub pulse_length: f64,
    /// Receive gain in dB
    pub receive_gain: f64,
}

/// Broad sonar class of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SonarType {
    /// Not known
    #[default]
    Unknown,
    /// Single beam echosounder
    Echosounder,
    /// Multibeam echosounder
    Multibeam,
    /// Sidescan sonar
    Sidescan,
    /// Interferometric sonar
    Interferometric,
    /// Lidar
    Lidar,
    /// Camera
    Camera,
    /// Subbottom profiler
    Subbottom,
}

/// Scaling of sidescan sample values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SidescanType {
    /// Linear amplitude
    #[default]
    Linear,
    /// Logarithmic (dB)
    Logarithmic,
}

/// Raw port and starboard sidescan time series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSidescan {
    /// Kind of the current record
    pub kind: DataKind,
    /// Scaling of the samples
    pub sidescan_type: SidescanType,
    /// Sample interval in seconds
    pub sample_interval: f64,
    /// Across-track beam width in degrees
    pub beamwidth_xtrack: f64,
    /// Along-track beam width in degrees
    pub beamwidth_ltrack: f64,
    /// Port samples
    pub port: Vec<f64>,
    /// Starboard samples
    pub stbd: Vec<f64>,
}

/// Line, shot and CDP numbers of a seismic trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegyNumber {
    /// Line number
    pub line: i32,
    /// Shot number
    pub shot: i32,
    /// CDP (reflection point) number
    pub cdp: i32,
}

/// Borrowed view of the current trace as seen through a session.
#[derive(Debug, Clone, Copy)]
pub struct SegyTraceView<'a> {
    /// Sample encoding of the file the trace belongs to
    pub sample_format: SampleFormat,
    /// Kind of the current record
    pub kind: DataKind,
    /// Trace header
    pub header: &'a TraceHeader,
    /// Decoded samples
    pub samples: &'a [f32],
}

/// Timestamped navigation sample used by preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NavSample {
    /// Epoch seconds
    pub time_d: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Speed in km/h
    pub speed: f64,
}

/// Timestamped attitude sample used by preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttitudeSample {
    /// Epoch seconds
    pub time_d: f64,
    /// Roll in degrees
    pub roll: f64,
    /// Pitch in degrees
    pub pitch: f64,
    /// Heave in meters
    pub heave: f64,
}

/// Timestamped scalar sample (heading, sensor depth, altitude).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScalarSample {
    /// Epoch seconds
    pub time_d: f64,
    /// Value
    pub value: f64,
}

/// Ancillary data and options handed to a driver's preprocess slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreprocessParams {
    /// Target sensor index in the platform, if any
    pub target_sensor: Option<usize>,
    /// Static time offset applied to survey timestamps in seconds
    pub timestamp_offset: f64,
    /// Navigation
    pub nav: Vec<NavSample>,
    /// Sensor depth
    pub sensordepth: Vec<ScalarSample>,
    /// Heading
    pub heading: Vec<ScalarSample>,
    /// Altitude
    pub altitude: Vec<ScalarSample>,
    /// Attitude
    pub attitude: Vec<AttitudeSample>,
    /// Recompute bathymetry from travel times when the driver supports it
    pub recalculate_bathymetry: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ping = PingRecord::default();
        assert_eq!(ping.kind, DataKind::None);
        assert_eq!(ping.nbath, 0);
        assert!(ping.comment.is_empty());
        assert_eq!(SonarType::default(), SonarType::Unknown);
    }

    #[test]
    fn test_travel_times_len() {
        let tt = TravelTimes {
            ttimes: vec![0.1, 0.2],
            ..TravelTimes::default()
        };
        assert_eq!(tt.len(), 2);
        assert!(!tt.is_empty());
    }

    #[test]
    fn test_ping_record_serializes_to_toml() {
        let ping = PingRecord {
            kind: DataKind::Data,
            navlon: -122.5,
            nbath: 1,
            ..PingRecord::default()
        };
        let text = toml::to_string(&ping).unwrap();
        let back: PingRecord = toml::from_str(&text).unwrap();
        assert_eq!(back, ping);
    }
}
