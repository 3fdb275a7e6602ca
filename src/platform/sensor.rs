// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sensors, their mounting offsets and time-latency models.

use serde::{Deserialize, Serialize};

use super::attitude::Attitude;

/// Kind of instrument mounted on a platform.
///
/// Codes not in the table are kept as [`SensorType::Other`] so they
/// survive a read/write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SensorType {
    #[default]
    None,
    SonarEchosounder,
    SonarMultiEchosounder,
    SonarSidescan,
    SonarInterferometry,
    SonarMultibeam,
    SonarMultibeamTwoHead,
    SonarSubbottom,
    CameraMono,
    CameraStereo,
    CameraVideo,
    LidarScan,
    LidarSwath,
    Position,
    Compass,
    Vru,
    Imu,
    Ins,
    InsWithPressure,
    Ctd,
    Pressure,
    SoundSpeed,
    Other(i32),
}

const SENSOR_TYPE_TABLE: &[(SensorType, i32, &str)] = &[
    (SensorType::None, 0, "Unknown sensor type"),
    (SensorType::SonarEchosounder, 1, "Sonar echosounder"),
    (SensorType::SonarMultiEchosounder, 2, "Sonar multiechosounder"),
    (SensorType::SonarSidescan, 3, "Sonar sidescan"),
    (SensorType::SonarInterferometry, 4, "Sonar interferometry"),
    (SensorType::SonarMultibeam, 5, "Sonar multibeam"),
    (SensorType::SonarMultibeamTwoHead, 6, "Sonar multibeam two head"),
    (SensorType::SonarSubbottom, 7, "Sonar subbottom"),
    (SensorType::CameraMono, 11, "Camera mono"),
    (SensorType::CameraStereo, 12, "Camera stereo"),
    (SensorType::CameraVideo, 13, "Camera video"),
    (SensorType::LidarScan, 21, "Lidar scanner"),
    (SensorType::LidarSwath, 22, "Lidar swath"),
    (SensorType::Position, 31, "Position"),
    (SensorType::Compass, 41, "Compass"),
    (SensorType::Vru, 42, "Vertical reference unit"),
    (SensorType::Imu, 43, "Inertial measurement unit"),
    (SensorType::Ins, 44, "Inertial navigation system"),
    (SensorType::InsWithPressure, 45, "Inertial navigation system with pressure depth"),
    (SensorType::Ctd, 51, "CTD"),
    (SensorType::Pressure, 52, "Pressure"),
    (SensorType::SoundSpeed, 61, "Sound speed"),
];

impl SensorType {
    pub fn from_code(code: i32) -> Self {
        SENSOR_TYPE_TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(t, _, _)| *t)
            .unwrap_or(SensorType::Other(code))
    }

    pub fn code(&self) -> i32 {
        match self {
            SensorType::Other(code) => *code,
            known => SENSOR_TYPE_TABLE
                .iter()
                .find(|(t, _, _)| t == known)
                .map(|(_, c, _)| *c)
                .unwrap_or(0),
        }
    }

    /// Human-readable name, as written in platform file annotations.
    pub fn name(&self) -> &'static str {
        SENSOR_TYPE_TABLE
            .iter()
            .find(|(t, _, _)| t == self)
            .map(|(_, _, n)| *n)
            .unwrap_or("Unknown sensor type")
    }

    pub fn is_sonar(&self) -> bool {
        matches!(self.code(), 1..=7)
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! capability_mask {
    (
        $(#[$meta:meta])*
        $name:ident, [$($bit:literal => $konst:ident = $label:literal),* $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            $(pub const $konst: $name = $name(1 << $bit);)*

            const NAMES: [&'static str; 32] = {
                let mut names = [""; 32];
                $(names[$bit] = $label;)*
                names
            };

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            /// Names of the set bits, low bit first.
            pub fn names(self) -> impl Iterator<Item = &'static str> {
                (0..32usize).filter(move |&bit| self.0 & (1u32 << bit) != 0).map(|bit| {
                    match Self::NAMES[bit] {
                        "" => UNUSED_BIT_NAMES[bit],
                        name => name,
                    }
                })
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }
    };
}

const UNUSED_BIT_NAMES: [&str; 32] = [
    "unused00", "unused01", "unused02", "unused03", "unused04", "unused05", "unused06", "unused07",
    "unused08", "unused09", "unused10", "unused11", "unused12", "unused13", "unused14", "unused15",
    "unused16", "unused17", "unused18", "unused19", "unused20", "unused21", "unused22", "unused23",
    "unused24", "unused25", "unused26", "unused27", "unused28", "unused29", "unused30", "unused31",
];

capability_mask!(
    /// Physical quantities a sensor measures.
    Capability1,
    [
        0 => POSITION = "position",
        1 => DEPTH = "depth",
        2 => ALTITUDE = "altitude",
        3 => VELOCITY = "velocity",
        4 => ACCELERATION = "acceleration",
        5 => PRESSURE = "pressure",
        6 => ROLLPITCH = "rollpitch",
        7 => HEADING = "heading",
        13 => TEMPERATURE = "temperature",
        14 => CONDUCTIVITY = "conductivity",
        15 => SALINITY = "salinity",
        16 => SOUNDSPEED = "soundspeed",
        20 => GRAVITY = "gravity",
        24 => MAGNETICFIELD = "magneticfield",
    ]
);

capability_mask!(
    /// Data products a sensor produces.
    Capability2,
    [
        0 => TOPOGRAPHY_ECHOSOUNDER = "topography_echosounder",
        1 => TOPOGRAPHY_INTERFEROMETRY = "topography_interferometry",
        2 => TOPOGRAPHY_SASS = "topography_sass",
        3 => TOPOGRAPHY_MULTIBEAM = "topography_multibeam",
        4 => TOPOGRAPHY_PHOTOGRAMMETRY = "topography_photogrammetry",
        5 => TOPOGRAPHY_STRUCTUREFROMMOTION = "topography_structurefrommotion",
        6 => TOPOGRAPHY_LIDAR = "topography_lidar",
        7 => TOPOGRAPHY_STRUCTUREDLIGHT = "topography_structuredlight",
        8 => TOPOGRAPHY_LASERSCANNER = "topography_laserscanner",
        12 => BACKSCATTER_ECHOSOUNDER = "backscatter_echosounder",
        13 => BACKSCATTER_SIDESCAN = "backscatter_sidescan",
        14 => BACKSCATTER_INTERFEROMETRY = "backscatter_interferometry",
        15 => BACKSCATTER_SASS = "backscatter_sass",
        16 => BACKSCATTER_MULTIBEAM = "backscatter_multibeam",
        17 => BACKSCATTER_LIDAR = "backscatter_lidar",
        18 => BACKSCATTER_STRUCTUREDLIGHT = "backscatter_structuredlight",
        19 => BACKSCATTER_LASERSCANNER = "backscatter_laserscanner",
        21 => SUBBOTTOM_ECHOSOUNDER = "subbottom_echosounder",
        22 => SUBBOTTOM_CHIRP = "subbottom_chirp",
        24 => PHOTOGRAPHY = "photography",
        25 => STEREOPHOTOGRAPHY = "stereophotography",
        26 => VIDEO = "video",
        27 => STEREOVIDEO = "stereovideo",
    ]
);

/// Whether an offset component has been set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OffsetMode {
    #[default]
    Unset,
    Static,
}

/// One mounting point of a sensor relative to the platform origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorOffset {
    pub position_mode: OffsetMode,
    /// Starboard, forward, up in meters
    pub position: [f64; 3],
    pub attitude_mode: OffsetMode,
    pub attitude: Attitude,
}

impl SensorOffset {
    /// An offset with both position and attitude set.
    pub fn fixed(position: [f64; 3], attitude: Attitude) -> Self {
        Self {
            position_mode: OffsetMode::Static,
            position,
            attitude_mode: OffsetMode::Static,
            attitude,
        }
    }

    /// Position if static, zero otherwise.
    pub fn static_position(&self) -> [f64; 3] {
        match self.position_mode {
            OffsetMode::Static => self.position,
            OffsetMode::Unset => [0.0; 3],
        }
    }

    /// Attitude if static, identity otherwise.
    pub fn static_attitude(&self) -> Attitude {
        match self.attitude_mode {
            OffsetMode::Static => self.attitude,
            OffsetMode::Unset => Attitude::IDENTITY,
        }
    }
}

/// Delay between a measurement and its timestamp.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum TimeLatency {
    #[default]
    None,
    /// Constant latency in seconds
    Static(f64),
    /// `(time_d, latency)` pairs in seconds
    Model(Vec<(f64, f64)>),
}

impl TimeLatency {
    /// Latency at `time_d`, interpolating a model linearly and holding its
    /// end values outside the covered range.
    pub fn at(&self, time_d: f64) -> f64 {
        match self {
            TimeLatency::None => 0.0,
            TimeLatency::Static(v) => *v,
            TimeLatency::Model(points) => {
                let Some(&(t0, v0)) = points.first() else {
                    return 0.0;
                };
                if time_d <= t0 {
                    return v0;
                }
                for pair in points.windows(2) {
                    let (ta, va) = pair[0];
                    let (tb, vb) = pair[1];
                    if time_d <= tb {
                        if tb == ta {
                            return vb;
                        }
                        return va + (vb - va) * (time_d - ta) / (tb - ta);
                    }
                }
                points.last().map(|&(_, v)| v).unwrap_or(0.0)
            }
        }
    }
}

/// An instrument on the platform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sensor {
    pub sensor_type: SensorType,
    pub model: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub capability1: Capability1,
    pub capability2: Capability2,
    pub offsets: Vec<SensorOffset>,
    pub time_latency: TimeLatency,
}

impl Sensor {
    pub fn new(sensor_type: SensorType) -> Self {
        Self {
            sensor_type,
            ..Default::default()
        }
    }

    /// The primary mounting offset, or an unset one if none is defined.
    pub fn reference_offset(&self) -> SensorOffset {
        self.offsets.first().copied().unwrap_or_default()
    }
}
