// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for the SEGY codec and the format-160 driver behind a session.
//!
//! Run with: cargo test --test segy_tests

use std::io::Cursor;
use std::path::Path;

use proptest::prelude::*;

use sonarcodec::core::{DataKind, MbError};
use sonarcodec::io::formats::segy::{
    coordinate_factor, ibm_to_ieee, ieee_to_ibm, AsciiHeader, FileHeader, SampleFormat,
    SegyReader, SegyStore, SegyWriter, TraceHeader,
};
use sonarcodec::io::{is_segy_file, PingRecord, SessionBuilder, Swath, BEAM_FLAG_NONE};

const ALL_FORMATS: [SampleFormat; 7] = [
    SampleFormat::IbmFloat,
    SampleFormat::Int32,
    SampleFormat::Int16,
    SampleFormat::IeeeFloat,
    SampleFormat::IeeeFloatAlt,
    SampleFormat::Int8,
    SampleFormat::IeeeFloatLe,
];

fn trace_header(shot: i32, nsamps: i16) -> TraceHeader {
    TraceHeader {
        shot_num: shot,
        nsamps,
        si_micros: 250,
        ..TraceHeader::default()
    }
}

fn write_file(path: &Path, format: SampleFormat, traces: &[Vec<f32>]) {
    let nsamps = traces.first().map_or(0, |t| t.len()) as i16;
    let mut writer = SegyWriter::create(
        path,
        AsciiHeader::from_lines(&["C 1 test line"]),
        FileHeader::new(format, 250, nsamps),
    )
    .unwrap();
    for (i, samples) in traces.iter().enumerate() {
        writer
            .write_trace(&trace_header(i as i32 + 1, nsamps), samples)
            .unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_round_trip_every_sample_format() {
    let samples = vec![1.0f32, -2.0, 3.0, 0.0, 100.0, -64.0];
    for format in ALL_FORMATS {
        let mut writer = SegyWriter::new(
            Vec::new(),
            AsciiHeader::default(),
            FileHeader::new(format, 100, samples.len() as i16),
        )
        .unwrap();
        writer.write_trace(&trace_header(7, 6), &samples).unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(
            bytes.len(),
            3200 + 400 + 240 + samples.len() * format.bytes_per_sample(),
            "{format:?}"
        );

        let mut reader = SegyReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.file_header().format, format.code());
        let trace = reader.read_trace().unwrap();
        assert_eq!(trace.header.shot_num, 7);
        assert_eq!(trace.samples, samples.as_slice(), "{format:?}");
        assert!(reader.read_trace().unwrap_err().is_eof());
    }
}

#[test]
fn test_ieee_samples_are_exact() {
    let samples = [1.0f32, -2.5, 3.25, 0.0];
    let mut writer = SegyWriter::new(
        Vec::new(),
        AsciiHeader::default(),
        FileHeader::new(SampleFormat::IeeeFloat, 100, 4),
    )
    .unwrap();
    writer.write_trace(&trace_header(1, 4), &samples).unwrap();
    let bytes = writer.finish().unwrap();

    let at = 3200 + 400 + 240;
    assert_eq!(&bytes[at..at + 4], &[0x3f, 0x80, 0x00, 0x00]);

    let mut reader = SegyReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.read_trace().unwrap().samples, &samples);
}

#[test]
fn test_truncated_trace_is_eof() {
    let mut writer = SegyWriter::new(
        Vec::new(),
        AsciiHeader::default(),
        FileHeader::new(SampleFormat::Int16, 100, 8),
    )
    .unwrap();
    writer.write_trace(&trace_header(1, 8), &[1.0; 8]).unwrap();
    writer.write_trace(&trace_header(2, 8), &[2.0; 8]).unwrap();
    let mut bytes = writer.finish().unwrap();
    bytes.truncate(bytes.len() - 5);

    let mut reader = SegyReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.read_trace().unwrap().header.shot_num, 1);
    assert!(reader.read_trace().unwrap_err().is_eof());
    assert_eq!(reader.traces_read(), 1);
}

#[test]
fn test_truncated_file_header_is_eof() {
    let err = SegyReader::new(Cursor::new(vec![b' '; 3300])).unwrap_err();
    assert!(err.is_eof());
}

#[test]
fn test_unknown_sample_code_rejected_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.sgy");
    write_file(&path, SampleFormat::IeeeFloat, &[vec![0.5; 4]]);

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[3224..3226].copy_from_slice(&7i16.to_be_bytes());
    std::fs::write(&path, &bytes).unwrap();

    // content detection rejects code 7, the extension still names SEGY
    let mut session = SessionBuilder::new().open_read(&path).unwrap();
    assert_eq!(
        session.read_ping().unwrap_err(),
        MbError::UnsupportedSampleFormat { code: 7 }
    );
    session.close().unwrap();

    let mut reader = SegyReader::open(&path).unwrap();
    assert_eq!(
        reader.read_trace().unwrap_err(),
        MbError::UnsupportedSampleFormat { code: 7 }
    );
}

#[test]
fn test_is_segy_file() {
    let dir = tempfile::tempdir().unwrap();
    let segy = dir.path().join("trace.dat");
    write_file(&segy, SampleFormat::Int32, &[vec![1.0, 2.0]]);
    assert!(is_segy_file(&segy));

    let text = dir.path().join("notes.txt");
    std::fs::write(&text, "not a seismic file").unwrap();
    assert!(!is_segy_file(&text));
    assert!(!is_segy_file(dir.path().join("missing.sgy")));
}

#[test]
fn test_coordinate_scalar_examples() {
    let divided = f64::from(-25_380_000i32) * coordinate_factor(-100);
    assert!((divided + 70.5).abs() < 1e-9);

    let multiplied = f64::from(2_538i32) * coordinate_factor(100);
    assert!((multiplied - 70.5).abs() < 1e-9);

    assert!((f64::from(3600i32) * coordinate_factor(0) - 1.0).abs() < 1e-12);
}

#[test]
fn test_session_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("line042.sgy");
    let samples = [0.25f32, -1.5, 8.0, 0.0];

    let mut out = SessionBuilder::new().open_write(&path).unwrap();
    out.store_as_mut::<SegyStore>()
        .unwrap()
        .set_file_header(FileHeader::new(SampleFormat::IeeeFloat, 250, 4))
        .unwrap();
    out.insert_segy(&trace_header(42, 4), &samples).unwrap();

    let mut swath = Swath::new();
    swath.set_counts(1, 0, 0).unwrap();
    swath.bath[0] = 123.45;
    swath.beamflag[0] = BEAM_FLAG_NONE;
    let ping = PingRecord {
        kind: DataKind::Data,
        time_i: [2024, 2, 1, 6, 30, 15, 250_000],
        navlon: -70.5,
        navlat: 41.25,
        heading: 45.0,
        nbath: 1,
        ..PingRecord::default()
    };
    out.insert(&ping, &swath).unwrap();

    let header = out.extract_segy_header().unwrap();
    assert_eq!(header.coord_scalar, -100);
    assert_eq!(header.src_long, -25_380_000);
    assert_eq!(header.src_lat, 14_850_000);
    assert_eq!(header.src_wbd, 12_345);
    assert_eq!(header.day_of_yr, 32);

    out.write_ping().unwrap();
    out.close().unwrap();

    assert!(is_segy_file(&path));
    let mut input = SessionBuilder::new().open_read(&path).unwrap();
    assert_eq!(input.descriptor().id, 160);
    assert_eq!(input.read_ping().unwrap(), DataKind::Data);

    let back = input.extract().unwrap();
    assert_eq!(back.time_i, [2024, 2, 1, 6, 30, 15, 250_000]);
    assert!((back.navlon + 70.5).abs() < 1e-9);
    assert!((back.navlat - 41.25).abs() < 1e-9);
    assert!((back.heading - 45.0).abs() < 1e-6);
    assert_eq!(back.nbath, 1);
    assert!((input.swath().bath[0] - 123.45).abs() < 1e-9);

    assert_eq!(input.pingnumber().unwrap(), 42);
    let view = input.extract_segy().unwrap();
    assert_eq!(view.sample_format, SampleFormat::IeeeFloat);
    assert_eq!(view.samples, &samples);

    assert!(input.read_ping().unwrap_err().is_eof());
    input.close().unwrap();
}

#[test]
fn test_session_nav_and_altitude() {
    let mut session = SessionBuilder::new()
        .format(160)
        .write_to(Vec::new())
        .unwrap();
    let mut header = trace_header(3, 2);
    header.soundspeed = 1500.0;
    header.src_wbd = 5_000;
    header.year = 2023;
    header.day_of_yr = 1;
    session.insert_segy(&header, &[0.0, 1.0]).unwrap();

    let mut nav = session.extract_nav().unwrap();
    nav.time_i = [2023, 12, 31, 23, 59, 59, 0];
    nav.navlon = 10.0;
    nav.navlat = -5.0;
    nav.draft = 7.5;
    session.insert_nav(&nav).unwrap();

    let back = session.extract_nav().unwrap();
    assert_eq!(back.time_i, [2023, 12, 31, 23, 59, 59, 0]);
    assert!((back.navlon - 10.0).abs() < 1e-9);
    assert!((back.navlat + 5.0).abs() < 1e-9);
    assert!((back.draft - 7.5).abs() < 1e-3);

    let altitude = session.extract_altitude().unwrap();
    assert!((altitude.transducer_depth - 7.5).abs() < 1e-3);
    assert!((altitude.altitude - 42.5).abs() < 1e-3);
    assert_eq!(session.extract_segy_header().unwrap().day_of_yr, 365);
    session.close().unwrap();
}

#[test]
fn test_copy_traces_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.sgy");
    let dst = dir.path().join("out.sgy");
    let traces = [vec![1.0f32, 2.0, 3.0, 4.0], vec![-1.0, -2.0, -3.0, -4.0]];
    write_file(&src, SampleFormat::IeeeFloat, &traces);

    let mut input = SessionBuilder::new().open_read(&src).unwrap();
    let mut output = SessionBuilder::new().format(160).open_write(&dst).unwrap();
    let mut copied = 0;
    loop {
        match input.read_ping() {
            Ok(_) => {}
            Err(e) if e.is_eof() => break,
            Err(e) => panic!("read failed: {e}"),
        }
        let record = input.copy_record().unwrap();
        output.load_record(record.as_ref()).unwrap();
        output.write_ping().unwrap();
        copied += 1;
    }
    input.close().unwrap();
    output.close().unwrap();
    assert_eq!(copied, 2);

    // one text header, one file header, then the traces
    let bytes = std::fs::read(&dst).unwrap();
    assert_eq!(bytes.len(), 3200 + 400 + 2 * (240 + 4 * 4));
    assert_eq!(bytes, std::fs::read(&src).unwrap());

    let mut reader = SegyReader::open(&dst).unwrap();
    for (i, expected) in traces.iter().enumerate() {
        let trace = reader.read_trace().unwrap();
        assert_eq!(trace.header.shot_num, i as i32 + 1);
        assert_eq!(trace.samples, expected.as_slice());
    }
    assert!(reader.read_trace().unwrap_err().is_eof());
}

#[test]
fn test_load_record_keeps_sample_capacity() {
    let mut session = SessionBuilder::new()
        .format(160)
        .write_to(Vec::new())
        .unwrap();
    session
        .insert_segy(&trace_header(1, 5000), &vec![0.5; 5000])
        .unwrap();
    let capacity = session
        .store_as::<SegyStore>()
        .unwrap()
        .record()
        .sample_capacity();
    assert!(capacity >= 5000);

    let mut small = SessionBuilder::new()
        .format(160)
        .write_to(Vec::new())
        .unwrap();
    small.insert_segy(&trace_header(2, 2), &[1.0, 2.0]).unwrap();
    let record = small.copy_record().unwrap();
    small.close().unwrap();

    session.load_record(record.as_ref()).unwrap();
    let store = session.store_as::<SegyStore>().unwrap();
    assert_eq!(store.record().samples(), &[1.0, 2.0]);
    assert_eq!(store.record().sample_capacity(), capacity);
    session.close().unwrap();
}

proptest! {
    #[test]
    fn prop_ibm_round_trip_is_close(
        magnitude in 1.0e-30f32..1.0e30f32,
        negative in any::<bool>(),
    ) {
        let value = if negative { -magnitude } else { magnitude };
        let back = ibm_to_ieee(ieee_to_ibm(value));
        prop_assert!(
            ((back - value) / value).abs() <= 2.0e-6,
            "{value} -> {back}"
        );
        prop_assert_eq!(back.is_sign_negative(), negative);
    }
}
