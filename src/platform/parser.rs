// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader for line-oriented platform definition files.
//!
//! Each non-comment line is a directive followed by whitespace-separated
//! values, for example `OFFSET_POSITION 1 0 0.5 2.0 -1.25`. Sensor and
//! offset indices address arrays that grow on demand. Text after the
//! expected values (such as a trailing `## ...` annotation) is ignored.
//!
//! ```rust,no_run
//! use sonarcodec::platform::PlatformModel;
//!
//! let platform = PlatformModel::read("survey.plf")?;
//! println!("{} sensors", platform.num_sensors());
//! # Ok::<(), sonarcodec::core::MbError>(())
//! ```

use std::path::Path;
use std::str::FromStr;

use crate::core::{MbError, Result};

use super::model::{PlatformModel, PlatformType, SourceChannel};
use super::sensor::{Capability1, Capability2, OffsetMode, SensorType, TimeLatency};

impl PlatformModel {
    /// Load a platform definition file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MbError::open_failed(path.display().to_string(), e.to_string()))?;
        let platform: PlatformModel = text.parse()?;
        tracing::debug!(
            path = %path.display(),
            sensors = platform.num_sensors(),
            "read platform definition"
        );
        Ok(platform)
    }
}

impl FromStr for PlatformModel {
    type Err = MbError;

    fn from_str(text: &str) -> Result<Self> {
        let mut parser = Parser {
            lines: text.lines().enumerate(),
            platform: PlatformModel::new(),
        };
        parser.run()?;
        if parser.platform.sensors.is_empty() {
            return Err(MbError::bad_parameter(
                "platform definition",
                "no sensors defined",
            ));
        }
        Ok(parser.platform)
    }
}

struct Parser<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    platform: PlatformModel,
}

/// Tokens of one directive line, with its 1-based line number for errors.
struct Line<'a> {
    number: usize,
    text: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Line<'a> {
    fn new(number: usize, text: &'a str) -> Self {
        Self {
            number,
            text,
            tokens: text.split_whitespace().collect(),
        }
    }

    fn value<T: FromStr>(&self, at: usize) -> Result<T> {
        let token = self.tokens.get(at).ok_or_else(|| {
            MbError::parse(
                format!("platform line {}", self.number),
                format!("missing value {at} in '{}'", self.text.trim()),
            )
        })?;
        token.parse().map_err(|_| {
            MbError::parse(
                format!("platform line {}", self.number),
                format!("bad value '{token}' in '{}'", self.text.trim()),
            )
        })
    }

    /// Text after the first `skip` tokens, trimmed.
    fn remainder(&self, skip: usize) -> &'a str {
        let mut rest = self.text.trim_start();
        for _ in 0..skip {
            rest = match rest.find(char::is_whitespace) {
                Some(at) => rest[at..].trim_start(),
                None => "",
            };
        }
        rest.trim_end()
    }

    /// Sensor index in token 1, or `None` with a warning if negative.
    fn sensor_index(&self) -> Result<Option<usize>> {
        self.index(1)
    }

    fn index(&self, at: usize) -> Result<Option<usize>> {
        let raw: i64 = self.value(at)?;
        match usize::try_from(raw) {
            Ok(index) => Ok(Some(index)),
            Err(_) => {
                tracing::warn!(
                    line = self.number,
                    index = raw,
                    directive = self.tokens[0],
                    "ignoring negative platform index"
                );
                Ok(None)
            }
        }
    }
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<()> {
        while let Some((number, text)) = self.lines.next() {
            let trimmed = text.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let line = Line::new(number + 1, text);
            self.directive(&line)?;
        }
        Ok(())
    }

    fn directive(&mut self, line: &Line<'a>) -> Result<()> {
        let key = line.tokens[0];
        let platform = &mut self.platform;
        match key {
            "MB-SYSTEM_VERSION" | "FILE_VERSION" | "ORIGIN" => {}
            "PLATFORM_TYPE" => {
                let code: i32 = line.value(1)?;
                platform.platform_type = PlatformType::from_code(code).unwrap_or_else(|| {
                    tracing::warn!(line = line.number, code, "unknown platform type");
                    PlatformType::Unknown
                });
            }
            "PLATFORM_NAME" => platform.name = line.remainder(1).to_string(),
            "PLATFORM_ORGANIZATION" => platform.organization = line.remainder(1).to_string(),
            "DOCUMENTATION_URL" => platform.documentation_url = line.remainder(1).to_string(),
            "START_TIME_D" => platform.set_start_time(line.value(1)?)?,
            "END_TIME_D" => platform.set_end_time(line.value(1)?)?,
            "PLATFORM_NUM_SENSORS" => {
                let count: i64 = line.value(1)?;
                if count > 0 {
                    platform.ensure_sensor(count as usize - 1)?;
                }
            }
            "SENSOR_TYPE" => {
                if let Some(i) = line.sensor_index()? {
                    let code: i32 = line.value(2)?;
                    platform.ensure_sensor(i)?.sensor_type = SensorType::from_code(code);
                }
            }
            "SENSOR_MODEL" => {
                if let Some(i) = line.sensor_index()? {
                    platform.ensure_sensor(i)?.model = line.remainder(2).to_string();
                }
            }
            "SENSOR_MANUFACTURER" => {
                if let Some(i) = line.sensor_index()? {
                    platform.ensure_sensor(i)?.manufacturer = line.remainder(2).to_string();
                }
            }
            "SENSOR_SERIALNUMBER" => {
                if let Some(i) = line.sensor_index()? {
                    platform.ensure_sensor(i)?.serial_number = line.remainder(2).to_string();
                }
            }
            "SENSOR_CAPABILITY1" => {
                if let Some(i) = line.sensor_index()? {
                    let bits: i64 = line.value(2)?;
                    platform.ensure_sensor(i)?.capability1 = Capability1(bits as u32);
                }
            }
            "SENSOR_CAPABILITY2" => {
                if let Some(i) = line.sensor_index()? {
                    let bits: i64 = line.value(2)?;
                    platform.ensure_sensor(i)?.capability2 = Capability2(bits as u32);
                }
            }
            "SENSOR_NUM_OFFSETS" => {
                if let Some(i) = line.sensor_index()? {
                    let count: i64 = line.value(2)?;
                    if count > 0 {
                        platform.ensure_offset(i, count as usize - 1)?;
                    } else {
                        platform.ensure_sensor(i)?;
                    }
                }
            }
            "OFFSET_POSITION" => {
                if let (Some(i), Some(j)) = (line.sensor_index()?, line.index(2)?) {
                    let position = [line.value(3)?, line.value(4)?, line.value(5)?];
                    let offset = platform.ensure_offset(i, j)?;
                    offset.position = position;
                    offset.position_mode = OffsetMode::Static;
                }
            }
            "OFFSET_ATTITUDE" => {
                if let (Some(i), Some(j)) = (line.sensor_index()?, line.index(2)?) {
                    let heading = line.value(3)?;
                    let roll = line.value(4)?;
                    let pitch = line.value(5)?;
                    let offset = platform.ensure_offset(i, j)?;
                    offset.attitude.heading = heading;
                    offset.attitude.roll = roll;
                    offset.attitude.pitch = pitch;
                    offset.attitude_mode = OffsetMode::Static;
                }
            }
            "SENSOR_TIME_LATENCY_STATIC" => {
                if let Some(i) = line.sensor_index()? {
                    let latency: f64 = line.value(2)?;
                    platform.ensure_sensor(i)?.time_latency = TimeLatency::Static(latency);
                }
            }
            "SENSOR_TIME_LATENCY_MODEL" => {
                let sensor = line.sensor_index()?;
                let count: i64 = line.value(2)?;
                let points = self.latency_model(line, count.max(0) as usize)?;
                if let Some(i) = sensor {
                    self.platform.ensure_sensor(i)?.time_latency = TimeLatency::Model(points);
                }
            }
            other => {
                if let Some(source) = other.strip_prefix("SOURCE_") {
                    self.source(line, source)?;
                } else {
                    tracing::warn!(line = line.number, directive = other, "unknown platform directive");
                }
            }
        }
        Ok(())
    }

    fn source(&mut self, line: &Line<'a>, source: &str) -> Result<()> {
        let (keyword, slot) = match source.char_indices().last() {
            Some((at, digit @ '1'..='3')) => (&source[..at], digit as usize - '0' as usize),
            _ => (source, 0),
        };
        let Some(channel) = SourceChannel::from_keyword(keyword) else {
            tracing::warn!(line = line.number, directive = line.tokens[0], "unknown source channel");
            return Ok(());
        };
        let sensor: i64 = line.value(1)?;
        self.platform
            .sources
            .set(channel, slot, usize::try_from(sensor).ok());
        Ok(())
    }

    /// Read `count` lines of `time latency` pairs.
    fn latency_model(&mut self, header: &Line<'a>, count: usize) -> Result<Vec<(f64, f64)>> {
        let mut points = Vec::new();
        points
            .try_reserve_exact(count)
            .map_err(|_| MbError::resource_exhausted("time latency model", count))?;
        for k in 0..count {
            let (number, text) = self.lines.next().ok_or_else(|| {
                MbError::end_of_file(format!(
                    "latency model at line {} ended after {k} of {count} entries",
                    header.number
                ))
            })?;
            let line = Line::new(number + 1, text);
            points.push((line.value(0)?, line.value(1)?));
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
## test platform
PLATFORM_TYPE            1  ## Surface vessel
PLATFORM_NAME            R/V Example One
PLATFORM_ORGANIZATION    Ocean Lab
PLATFORM_NUM_SENSORS     2
SOURCE_POSITION          0
SOURCE_DEPTH             0
SOURCE_BATHYMETRY        1
SOURCE_HEADING2          0
SENSOR_TYPE               0   31  ## Position
SENSOR_MODEL               0  SPS 855
SENSOR_NUM_OFFSETS         0   1
OFFSET_POSITION            0       0    0.000000    0.000000    0.000000 ## Starboard, Forward, Up (meters)
SENSOR_TYPE               1    5  ## Sonar multibeam
SENSOR_CAPABILITY2         1        65544  ##
SENSOR_NUM_OFFSETS         1   2
OFFSET_POSITION            1       0    1.500000    3.000000   -2.000000
OFFSET_ATTITUDE            1       1    0.000000    0.500000   -0.250000
SENSOR_TIME_LATENCY_MODEL  1      2
                                      0.000000    0.010000  ## Seconds, Seconds
                                     10.000000    0.020000  ## Seconds, Seconds
";

    #[test]
    fn test_parse_sample() {
        let platform: PlatformModel = SAMPLE.parse().unwrap();
        assert_eq!(platform.platform_type, PlatformType::SurfaceVessel);
        assert_eq!(platform.name, "R/V Example One");
        assert_eq!(platform.organization, "Ocean Lab");
        assert_eq!(platform.num_sensors(), 2);
        assert_eq!(platform.sources.primary(SourceChannel::Position), Some(0));
        assert_eq!(platform.sources.get(SourceChannel::Heading, 2), Some(0));
        assert_eq!(platform.sources.primary(SourceChannel::Heading), None);

        let multibeam = &platform.sensors[1];
        assert_eq!(multibeam.sensor_type, SensorType::SonarMultibeam);
        assert!(multibeam
            .capability2
            .contains(Capability2::TOPOGRAPHY_MULTIBEAM | Capability2::BACKSCATTER_MULTIBEAM));
        assert_eq!(multibeam.offsets[0].position, [1.5, 3.0, -2.0]);
        assert_eq!(multibeam.offsets[0].attitude_mode, OffsetMode::Unset);
        assert_eq!(multibeam.offsets[1].attitude_mode, OffsetMode::Static);
        assert_eq!(multibeam.offsets[1].attitude.pitch, -0.25);
        assert_eq!(
            multibeam.time_latency,
            TimeLatency::Model(vec![(0.0, 0.01), (10.0, 0.02)])
        );
        assert_eq!(platform.sensors[0].model, "SPS 855");
    }

    #[test]
    fn test_index_beyond_length_grows() {
        let platform: PlatformModel = "OFFSET_POSITION 2 3 1.0 2.0 3.0\n".parse().unwrap();
        assert_eq!(platform.num_sensors(), 3);
        assert_eq!(platform.sensors[2].offsets.len(), 4);
        assert_eq!(platform.sensors[2].offsets[3].position_mode, OffsetMode::Static);
    }

    #[test]
    fn test_negative_index_ignored() {
        let platform: PlatformModel = "PLATFORM_NUM_SENSORS 1\nSENSOR_TYPE -1 31\n"
            .parse()
            .unwrap();
        assert_eq!(platform.num_sensors(), 1);
        assert_eq!(platform.sensors[0].sensor_type, SensorType::None);
    }

    #[test]
    fn test_subcamera_alias() {
        let platform: PlatformModel = "PLATFORM_NUM_SENSORS 1\nSOURCE_SUBCAMERA1 0\n"
            .parse()
            .unwrap();
        assert_eq!(platform.sources.get(SourceChannel::Camera, 1), Some(0));
    }

    #[test]
    fn test_zero_sensors_rejected() {
        let err = "PLATFORM_TYPE 2\n".parse::<PlatformModel>().unwrap_err();
        assert!(matches!(err, MbError::BadParameter { .. }));
    }

    #[test]
    fn test_truncated_latency_model() {
        let text = "PLATFORM_NUM_SENSORS 1\nSENSOR_TIME_LATENCY_MODEL 0 3\n0.0 0.1\n";
        let err = text.parse::<PlatformModel>().unwrap_err();
        assert!(err.is_eof());
    }

    #[test]
    fn test_bad_number_is_parse_error() {
        let err = "SENSOR_TYPE 0 sonar\n".parse::<PlatformModel>().unwrap_err();
        assert!(matches!(err, MbError::Parse { .. }));
    }

    #[test]
    fn test_unknown_directive_ignored() {
        let platform: PlatformModel = "PLATFORM_NUM_SENSORS 1\nSENSOR_GRAVITY 0 9.8\n"
            .parse()
            .unwrap();
        assert_eq!(platform.num_sensors(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = PlatformModel::read("/nonexistent/dir/platform.plf").unwrap_err();
        assert!(matches!(err, MbError::OpenFailed { .. }));
    }
}
