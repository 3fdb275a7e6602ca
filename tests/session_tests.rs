// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for session dispatch, capability checks and post-processing.
//!
//! A scripted in-memory driver stands in for a real format so the
//! session behavior can be checked in isolation.
//!
//! Run with: cargo test --test session_tests

use std::any::Any;
use std::collections::VecDeque;
use std::io::{Cursor, Read};

use sonarcodec::core::{DataKind, MbError, Result};
use sonarcodec::geo::{LonFlip, Projection, ProjectionState};
use sonarcodec::io::formats::segy::{SegyStore, TraceHeader};
use sonarcodec::io::traits::{downcast_store, downcast_store_mut};
use sonarcodec::io::{
    register, supported_formats, Altitude, FormatDescriptor, FormatDriver, FormatStore,
    MbioSession, NavRecord, Operation, OperationSet, PingRecord, PreprocessParams, RawSidescan,
    SessionBuilder, SessionStream, SoundVelocityProfile, Swath, BEAM_FLAG_NONE, BEAM_FLAG_NULL,
};

const FAKE_ID: i32 = 9001;

const FAKE: FormatDescriptor = FormatDescriptor {
    id: FAKE_ID,
    name: "FAKE",
    description: "scripted pings for tests",
    beams_bath_max: 16,
    beams_amp_max: 0,
    pixels_ss_max: 0,
    variable_beams: true,
    traveltime: false,
    beam_flagging: true,
    platform_source: DataKind::None,
    nav_source: DataKind::Data,
    sensordepth_source: DataKind::Data,
    heading_source: DataKind::Data,
    attitude_source: DataKind::Data,
    svp_source: DataKind::None,
    beamwidth_xtrack: 1.0,
    beamwidth_ltrack: 2.0,
    operations: OperationSet::of(&[
        Operation::AllocState,
        Operation::ReadPing,
        Operation::Extract,
        Operation::Insert,
        Operation::ExtractNav,
        Operation::InsertNav,
    ]),
};

const BARE: FormatDescriptor = FormatDescriptor {
    id: FAKE_ID + 1,
    name: "BARE",
    description: "allocates and nothing else",
    operations: OperationSet::of(&[Operation::AllocState]),
    ..FAKE
};

/// One scripted ping: scalars plus per-beam depth, across-track and flag.
#[derive(Debug, Clone, Default)]
struct FakePing {
    ping: PingRecord,
    beams: Vec<(f64, f64, u8)>,
}

impl FakePing {
    fn at(navlon: f64, navlat: f64, nbeams: usize) -> Self {
        let beams = (0..nbeams)
            .map(|i| (100.0 + i as f64, i as f64 * 10.0, BEAM_FLAG_NONE))
            .collect();
        FakePing {
            ping: PingRecord {
                kind: DataKind::Data,
                time_i: [2024, 3, 1, 0, 0, 0, 0],
                navlon,
                navlat,
                nbath: nbeams,
                ..PingRecord::default()
            },
            beams,
        }
    }
}

#[derive(Debug, Default)]
struct FakeStore {
    queue: VecDeque<FakePing>,
    current: FakePing,
    nav: NavRecord,
}

impl FormatStore for FakeStore {
    fn format_id(&self) -> i32 {
        FAKE_ID
    }

    fn kind(&self) -> DataKind {
        self.current.ping.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct FakeDriver(&'static FormatDescriptor);

impl FormatDriver for FakeDriver {
    fn descriptor(&self) -> &FormatDescriptor {
        self.0
    }

    fn alloc_store(&self) -> Result<Box<dyn FormatStore>> {
        Ok(Box::new(FakeStore::default()))
    }

    fn read_ping(&self, _reader: &mut dyn Read, store: &mut dyn FormatStore) -> Result<DataKind> {
        let store = downcast_store_mut::<FakeStore>(store, "FAKE")?;
        store.current = store
            .queue
            .pop_front()
            .ok_or_else(|| MbError::end_of_file("fake ping"))?;
        Ok(store.current.ping.kind)
    }

    fn extract(&self, store: &dyn FormatStore, swath: &mut Swath) -> Result<PingRecord> {
        let store = downcast_store::<FakeStore>(store, "FAKE")?;
        let beams = &store.current.beams;
        swath.set_counts(beams.len(), 0, 0)?;
        for (i, &(depth, across, flag)) in beams.iter().enumerate() {
            swath.bath[i] = depth;
            swath.bath_acrosstrack[i] = across;
            swath.bath_alongtrack[i] = 0.0;
            swath.beamflag[i] = flag;
        }
        Ok(store.current.ping.clone())
    }

    fn insert(&self, store: &mut dyn FormatStore, ping: &PingRecord, swath: &Swath) -> Result<()> {
        let store = downcast_store_mut::<FakeStore>(store, "FAKE")?;
        store.current = FakePing {
            ping: ping.clone(),
            beams: (0..swath.nbath())
                .map(|i| (swath.bath[i], swath.bath_acrosstrack[i], swath.beamflag[i]))
                .collect(),
        };
        Ok(())
    }

    fn extract_nav(&self, store: &dyn FormatStore) -> Result<NavRecord> {
        Ok(downcast_store::<FakeStore>(store, "FAKE")?.nav.clone())
    }

    fn insert_nav(&self, store: &mut dyn FormatStore, nav: &NavRecord) -> Result<()> {
        downcast_store_mut::<FakeStore>(store, "FAKE")?.nav = nav.clone();
        Ok(())
    }
}

/// Multiplies degrees by 1000 on the way out, divides on the way back.
struct Millidegrees;

impl Projection for Millidegrees {
    fn name(&self) -> &str {
        "millidegrees"
    }

    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        Ok((lon * 1000.0, lat * 1000.0))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x / 1000.0, y / 1000.0))
    }
}

struct OutOfZone;

impl Projection for OutOfZone {
    fn name(&self) -> &str {
        "out-of-zone"
    }

    fn forward(&self, _lon: f64, _lat: f64) -> Result<(f64, f64)> {
        Err(MbError::projection("point outside projection zone"))
    }

    fn inverse(&self, _x: f64, _y: f64) -> Result<(f64, f64)> {
        Err(MbError::projection("point outside projection zone"))
    }
}

fn fake_session(
    descriptor: &'static FormatDescriptor,
    lonflip: LonFlip,
    projection: ProjectionState,
    pings: Vec<FakePing>,
) -> MbioSession {
    let mut session = MbioSession::new(
        "<fake>",
        SessionStream::Read(Box::new(std::io::empty())),
        Box::new(FakeDriver(descriptor)),
        lonflip,
        projection,
    )
    .unwrap();
    session.store_as_mut::<FakeStore>().unwrap().queue = pings.into();
    session
}

/// Call the session method behind `op` with neutral arguments.
fn invoke(session: &mut MbioSession, op: Operation) -> Result<()> {
    match op {
        Operation::AllocState | Operation::FreeState => Ok(()),
        Operation::ReadPing => session.read_ping().map(drop),
        Operation::WritePing => session.write_ping(),
        Operation::Extract => session.extract().map(drop),
        Operation::Insert => session.insert(&PingRecord::default(), &Swath::new()),
        Operation::ExtractNav => session.extract_nav().map(drop),
        Operation::InsertNav => session.insert_nav(&NavRecord::default()),
        Operation::ExtractAltitude => session.extract_altitude().map(drop),
        Operation::InsertAltitude => session.insert_altitude(&Altitude::default()),
        Operation::ExtractSvp => session.extract_svp().map(drop),
        Operation::InsertSvp => session.insert_svp(&SoundVelocityProfile::default()),
        Operation::TravelTimes => session.ttimes().map(drop),
        Operation::Detects => session.detects().map(drop),
        Operation::Pulses => session.pulses().map(drop),
        Operation::Gains => session.gains().map(drop),
        Operation::ExtractRawSidescan => session.extract_rawss().map(drop),
        Operation::InsertRawSidescan => session.insert_rawss(&RawSidescan::default()),
        Operation::SonarType => session.sonartype().map(drop),
        Operation::SidescanType => session.sidescantype().map(drop),
        Operation::SensorHead => session.sensorhead().map(drop),
        Operation::Preprocess => session.preprocess(None, &PreprocessParams::default()),
        Operation::ExtractPlatform => session.extract_platform().map(drop),
        Operation::PingNumber => session.pingnumber().map(drop),
        Operation::SegyNumber => session.segynumber().map(drop),
        Operation::CopyRecord => session.copy_record().map(drop),
        Operation::ExtractSegyHeader => session.extract_segy_header().map(drop),
        Operation::ExtractSegy => session.extract_segy().map(drop),
        Operation::InsertSegy => session.insert_segy(&TraceHeader::default(), &[]),
    }
}

#[test]
fn test_lonflip_on_extract() {
    let mut session = fake_session(
        &FAKE,
        LonFlip::Negative,
        ProjectionState::Inactive,
        vec![FakePing::at(190.0, 10.0, 1), FakePing::at(10.0, 10.0, 1)],
    );

    session.read_ping().unwrap();
    assert_eq!(session.extract().unwrap().navlon, -170.0);

    session.read_ping().unwrap();
    assert_eq!(session.extract().unwrap().navlon, -350.0);

    session.set_lonflip(LonFlip::Zero);
    assert_eq!(session.extract().unwrap().navlon, 10.0);

    assert!(session.read_ping().unwrap_err().is_eof());
    session.close().unwrap();
}

#[test]
fn test_lonflip_on_extract_nav() {
    let mut session = fake_session(&FAKE, LonFlip::Positive, ProjectionState::Inactive, vec![]);
    session
        .insert_nav(&NavRecord {
            navlon: -90.0,
            navlat: 45.0,
            ..NavRecord::default()
        })
        .unwrap();
    let nav = session.extract_nav().unwrap();
    assert_eq!(nav.navlon, 270.0);
    assert_eq!(nav.navlat, 45.0);
    session.close().unwrap();
}

#[test]
fn test_capacity_never_shrinks() {
    let mut session = fake_session(
        &FAKE,
        LonFlip::Zero,
        ProjectionState::Inactive,
        vec![FakePing::at(0.0, 0.0, 10), FakePing::at(0.0, 0.0, 3)],
    );

    session.read_ping().unwrap();
    session.extract().unwrap();
    assert_eq!(session.swath().nbath(), 10);
    let capacity = session.swath().bath_capacity();
    assert!(capacity >= 10);

    session.read_ping().unwrap();
    let ping = session.extract().unwrap();
    assert_eq!(ping.nbath, 3);
    assert_eq!(session.dimensions().nbath, 3);
    assert_eq!(session.swath().nbath(), 3);
    assert_eq!(session.swath().bath_capacity(), capacity);
    assert_eq!(session.beams_bath_max(), 10);
    assert_eq!(session.swath().bath[2], 102.0);
    session.close().unwrap();
}

#[test]
fn test_projection_inverse_on_extract_forward_on_insert() {
    let mut session = fake_session(
        &FAKE,
        LonFlip::Zero,
        ProjectionState::Active(Box::new(Millidegrees)),
        vec![FakePing::at(-70_500.0, 41_250.0, 2)],
    );
    assert!(session.projection().is_active());

    session.read_ping().unwrap();
    let ping = session.extract().unwrap();
    assert_eq!(ping.navlon, -70.5);
    assert_eq!(ping.navlat, 41.25);

    let mut swath = Swath::new();
    swath.set_counts(1, 0, 0).unwrap();
    swath.bath[0] = 55.0;
    let moved = PingRecord {
        navlon: 12.0,
        navlat: -3.0,
        nbath: 1,
        ..ping
    };
    session.insert(&moved, &swath).unwrap();

    let stored = &session.store_as::<FakeStore>().unwrap().current;
    assert_eq!(stored.ping.navlon, 12_000.0);
    assert_eq!(stored.ping.navlat, -3_000.0);
    assert_eq!(stored.beams, vec![(55.0, 0.0, BEAM_FLAG_NONE)]);
    session.close().unwrap();
}

#[test]
fn test_projection_failure_is_reported() {
    let mut session = fake_session(
        &FAKE,
        LonFlip::Zero,
        ProjectionState::Active(Box::new(OutOfZone)),
        vec![FakePing::at(1.0, 1.0, 1)],
    );
    session.read_ping().unwrap();
    assert!(matches!(
        session.extract().unwrap_err(),
        MbError::Projection { .. }
    ));
    assert!(matches!(
        session.insert_nav(&NavRecord::default()).unwrap_err(),
        MbError::Projection { .. }
    ));
    session.close().unwrap();
}

#[test]
fn test_set_projection_activates() {
    let mut session = fake_session(
        &FAKE,
        LonFlip::Zero,
        ProjectionState::Inactive,
        vec![FakePing::at(2_000.0, 1_000.0, 1)],
    );
    session.read_ping().unwrap();
    assert_eq!(session.extract().unwrap().navlon, 2_000.0 - 360.0 * 6.0);

    session.set_projection(Box::new(Millidegrees));
    assert_eq!(session.extract().unwrap().navlon, 2.0);
    session.close().unwrap();
}

#[test]
fn test_unsupported_operations_leave_session_usable() {
    let mut session = fake_session(&BARE, LonFlip::Zero, ProjectionState::Inactive, vec![]);
    let before = session.dimensions();

    for op in Operation::ALL {
        if matches!(op, Operation::AllocState | Operation::FreeState) {
            continue;
        }
        let err = invoke(&mut session, op).unwrap_err();
        assert_eq!(
            err,
            MbError::CapabilityUnsupported {
                format: "BARE".to_string(),
                operation: op.name().to_string(),
            }
        );
        assert_eq!(session.dimensions(), before);
    }

    assert_eq!(session.kind().unwrap(), DataKind::None);
    session.close().unwrap();
}

#[test]
fn test_segy_lacks_exactly_the_unlisted_operations() {
    let mut session = SessionBuilder::new()
        .format(160)
        .write_to(Vec::new())
        .unwrap();
    let descriptor = *session.descriptor();

    let mut missing = Vec::new();
    for op in Operation::ALL {
        if descriptor.supports(op) {
            continue;
        }
        missing.push(op);
        let err = invoke(&mut session, op).unwrap_err();
        assert!(err.is_unsupported(), "{op}: {err}");
    }
    assert_eq!(
        missing,
        vec![
            Operation::ExtractSvp,
            Operation::InsertSvp,
            Operation::Pulses,
            Operation::Gains,
            Operation::ExtractRawSidescan,
            Operation::InsertRawSidescan,
            Operation::SidescanType,
            Operation::SensorHead,
            Operation::Preprocess,
            Operation::ExtractPlatform,
        ]
    );

    // still usable after the refusals
    session.insert_segy(&TraceHeader::default(), &[]).unwrap();
    assert_eq!(session.kind().unwrap(), DataKind::Data);
    session.close().unwrap();
}

#[test]
fn test_foreign_store_is_bad_descriptor() {
    let mut session = SessionBuilder::new()
        .format(160)
        .read_from(Cursor::new(Vec::new()))
        .unwrap();
    let foreign = FakeStore::default();
    assert!(matches!(
        session.load_record(&foreign).unwrap_err(),
        MbError::BadDescriptor { .. }
    ));
    assert!(session.store_as::<FakeStore>().is_none());
    assert!(session.store_as::<SegyStore>().is_some());

    assert!(matches!(
        downcast_store::<SegyStore>(&foreign, "SEGYSEGY").unwrap_err(),
        MbError::BadDescriptor { .. }
    ));
    session.close().unwrap();
}

#[test]
fn test_copy_and_load_record() {
    let mut session = SessionBuilder::new()
        .format(160)
        .write_to(Vec::new())
        .unwrap();
    let header = TraceHeader {
        shot_num: 77,
        nsamps: 2,
        ..TraceHeader::default()
    };
    session.insert_segy(&header, &[1.0, 2.0]).unwrap();
    let copy = session.copy_record().unwrap();

    session
        .insert_segy(&TraceHeader::default(), &[])
        .unwrap();
    assert_eq!(session.pingnumber().unwrap(), 0);

    session.load_record(copy.as_ref()).unwrap();
    assert_eq!(session.pingnumber().unwrap(), 77);
    assert_eq!(session.extract_segy().unwrap().samples, &[1.0, 2.0]);
    session.close().unwrap();
}

#[test]
fn test_write_ping_on_read_session() {
    let mut session = SessionBuilder::new()
        .format(160)
        .read_from(Cursor::new(Vec::new()))
        .unwrap();
    assert!(matches!(
        session.write_ping().unwrap_err(),
        MbError::WriteFailed { .. }
    ));
    assert!(session.read_ping().unwrap_err().is_eof());
    session.close().unwrap();
}

#[test]
fn test_extract_lonlat_footprint() {
    let mut ping = FakePing::at(-70.0, 0.0, 3);
    ping.beams = vec![
        (100.0, -10.0, BEAM_FLAG_NONE),
        (100.0, 0.0, BEAM_FLAG_NULL),
        (100.0, 10.0, BEAM_FLAG_NONE),
    ];
    let mut session = fake_session(&FAKE, LonFlip::Zero, ProjectionState::Inactive, vec![ping]);
    session.read_ping().unwrap();

    let (ping, footprint) = session.extract_lonlat().unwrap();
    assert_eq!(ping.nbath, 3);
    assert_eq!(footprint.bath_lon.len(), 3);
    // heading north: starboard beams lie east of the ship
    assert!(footprint.bath_lon[0] < -70.0);
    assert!(footprint.bath_lon[2] > -70.0);
    assert!((footprint.bath_lon[0] + footprint.bath_lon[2] + 140.0).abs() < 1e-9);
    assert!(footprint.bath_lat[0].abs() < 1e-12);
    assert!(footprint.bath_lon[1].is_nan());
    assert!(footprint.bath_lat[1].is_nan());
    session.close().unwrap();
}

#[test]
fn test_descriptor_queries() {
    let session = fake_session(&FAKE, LonFlip::Zero, ProjectionState::Inactive, vec![]);
    assert_eq!(session.beamwidths(), (1.0, 2.0));
    assert_eq!(session.descriptor().name, "FAKE");
    assert_eq!(session.path(), "<fake>");
    session.close().unwrap();
}

#[test]
fn test_bare_driver_without_alloc_cannot_back_a_session() {
    static NOTHING: FormatDescriptor = FormatDescriptor {
        name: "NOTHING",
        operations: OperationSet::empty(),
        ..FAKE
    };
    let err = MbioSession::new(
        "<none>",
        SessionStream::Read(Box::new(std::io::empty())),
        Box::new(FakeDriver(&NOTHING)),
        LonFlip::Zero,
        ProjectionState::Inactive,
    )
    .unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn test_registry() {
    assert_eq!(supported_formats(), vec![160]);
    assert_eq!(register(160).unwrap().descriptor().name, "SEGYSEGY");
    assert_eq!(
        register(42).unwrap_err(),
        MbError::BadFormat {
            context: "format id".to_string(),
            code: 42,
        }
    );
}
