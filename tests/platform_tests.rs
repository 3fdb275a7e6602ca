// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for platform models: definition files and sensor geometry.
//!
//! Run with: cargo test --test platform_tests

use sonarcodec::core::MbError;
use sonarcodec::geo::coor_scale;
use sonarcodec::platform::{
    Attitude, Capability1, Capability2, OffsetMode, PlatformModel, PlatformType, SensorType,
    SourceChannel, TimeLatency,
};

/// A vessel with a navigation sensor at the origin and a multibeam
/// mounted at (1, 2, -0.5).
fn survey_vessel() -> PlatformModel {
    let mut platform = PlatformModel::new();
    platform
        .setinfo(
            PlatformType::SurfaceVessel,
            "R/V Test",
            "Survey Group",
            "",
            0.0,
            0.0,
        )
        .unwrap();
    let nav = platform
        .add_sensor(
            SensorType::InsWithPressure,
            "INS",
            "",
            "",
            Capability1::POSITION | Capability1::DEPTH | Capability1::HEADING | Capability1::ROLLPITCH,
            Capability2::empty(),
            1,
            0,
        )
        .unwrap();
    let sonar = platform
        .add_sensor(
            SensorType::SonarMultibeam,
            "MB",
            "",
            "",
            Capability1::empty(),
            Capability2::TOPOGRAPHY_MULTIBEAM,
            1,
            0,
        )
        .unwrap();
    platform
        .set_sensor_offset(
            nav,
            0,
            OffsetMode::Static,
            [0.0, 0.0, 0.0],
            OffsetMode::Static,
            Attitude::IDENTITY,
        )
        .unwrap();
    platform
        .set_sensor_offset(
            sonar,
            0,
            OffsetMode::Static,
            [1.0, 2.0, -0.5],
            OffsetMode::Unset,
            Attitude::IDENTITY,
        )
        .unwrap();
    for channel in [
        SourceChannel::Position,
        SourceChannel::Depth,
        SourceChannel::Heading,
        SourceChannel::RollPitch,
    ] {
        platform.set_source_sensor(channel, 0, nav).unwrap();
    }
    platform
        .set_source_sensor(SourceChannel::Bathymetry, 0, sonar)
        .unwrap();
    platform
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_definition_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vessel.plf");

    let mut platform = survey_vessel();
    platform
        .set_sensor_timelatency(1, TimeLatency::Static(0.02))
        .unwrap();
    platform.write(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("PLATFORM_NAME            R/V Test\n"));
    assert!(text.contains("SOURCE_BATHYMETRY        1\n"));

    let back = PlatformModel::read(&path).unwrap();
    assert_eq!(back, platform);
    assert_eq!(back.sources.primary(SourceChannel::Bathymetry), Some(1));
}

#[test]
fn test_lever_without_rotation() {
    let platform = survey_vessel();
    let (x, y, z) = platform.lever(1, 0, 0.0, 0.0, 0.0).unwrap();
    assert!(close(x, 1.0) && close(y, 2.0) && close(z, -0.5), "({x}, {y}, {z})");
}

#[test]
fn test_lever_heading_east() {
    let platform = survey_vessel();
    let (x, y, z) = platform.lever(1, 0, 90.0, 0.0, 0.0).unwrap();
    // forward points east, starboard points south
    assert!(close(x, 2.0) && close(y, -1.0) && close(z, -0.5), "({x}, {y}, {z})");
}

#[test]
fn test_position_of_multibeam() {
    let platform = survey_vessel();
    let (lon, lat, depth) = platform
        .position(1, 0, -70.5, 41.2, 3.0, 0.0, 0.0, 0.0)
        .unwrap();
    let (mtodeglon, mtodeglat) = coor_scale(41.2);
    assert!(close(lon, -70.5 + mtodeglon));
    assert!(close(lat, 41.2 + 2.0 * mtodeglat));
    assert!(close(depth, 3.5));
}

#[test]
fn test_geometry_requires_sources() {
    let mut platform = survey_vessel();
    platform.sources = Default::default();
    assert!(matches!(
        platform.lever(1, 0, 0.0, 0.0, 0.0).unwrap_err(),
        MbError::BadParameter { .. }
    ));

    let platform = survey_vessel();
    assert!(matches!(
        platform.lever(5, 0, 0.0, 0.0, 0.0).unwrap_err(),
        MbError::BadParameter { .. }
    ));
    assert!(matches!(
        platform.lever(1, 3, 0.0, 0.0, 0.0).unwrap_err(),
        MbError::BadParameter { .. }
    ));
}

#[test]
fn test_orientation_removes_reference_mount() {
    let mut platform = survey_vessel();
    platform
        .set_sensor_offset(
            0,
            0,
            OffsetMode::Static,
            [0.0, 0.0, 0.0],
            OffsetMode::Static,
            Attitude::new(0.0, 2.0, 0.0),
        )
        .unwrap();
    let platform_attitude = platform.orientation(30.0, 2.0, 0.0).unwrap();
    assert!(close(platform_attitude.heading, 30.0));
    assert!(platform_attitude.roll.abs() < 1e-9);
    assert!(platform_attitude.pitch.abs() < 1e-9);
}

#[test]
fn test_parse_latency_model() {
    let text = "\
PLATFORM_NUM_SENSORS     1
SENSOR_TYPE               0   31  ## Position
SENSOR_TIME_LATENCY_MODEL   0       3
                                      0.000000    0.010000  ## Seconds, Seconds
                                     10.000000    0.020000  ## Seconds, Seconds
                                     20.000000    0.040000  ## Seconds, Seconds
";
    let platform: PlatformModel = text.parse().unwrap();
    let latency = &platform.sensors[0].time_latency;
    assert_eq!(
        latency,
        &TimeLatency::Model(vec![(0.0, 0.01), (10.0, 0.02), (20.0, 0.04)])
    );
    assert!(close(latency.at(5.0), 0.015));
    assert!(close(latency.at(15.0), 0.03));
    assert!(close(latency.at(-1.0), 0.01));
    assert!(close(latency.at(99.0), 0.04));
}

#[test]
fn test_parse_grows_sensor_list() {
    let text = "\
PLATFORM_NUM_SENSORS     1
SENSOR_MODEL               3  Sidescan X
OFFSET_POSITION            3       2    0.0  -1.0   0.0
";
    let platform: PlatformModel = text.parse().unwrap();
    assert_eq!(platform.num_sensors(), 4);
    assert_eq!(platform.sensors[3].model, "Sidescan X");
    assert_eq!(platform.sensors[3].offsets.len(), 3);
    assert_eq!(platform.sensors[3].offsets[2].position, [0.0, -1.0, 0.0]);
    assert_eq!(platform.sensors[3].offsets[2].position_mode, OffsetMode::Static);
}

#[test]
fn test_parse_rejects_platform_without_sensors() {
    let err = "PLATFORM_TYPE 2\nPLATFORM_NAME Towfish\n"
        .parse::<PlatformModel>()
        .unwrap_err();
    assert!(matches!(err, MbError::BadParameter { .. }));
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        PlatformModel::read(dir.path().join("nope.plf")).unwrap_err(),
        MbError::OpenFailed { .. }
    ));
}
