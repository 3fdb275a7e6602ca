// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SEGY format driver (format id 160).
//!
//! Each trace is one single-beam sounding. Position comes from the source
//! (or receiver group) coordinates, depth from the source water depth, and
//! attitude and sound speed from the extension fields at the end of the
//! trace header.

use std::any::Any;
use std::io::{Read, Write};

use super::header::{AsciiHeader, FileHeader};
use super::record::TraceRecord;
use super::trace::TraceHeader;
use crate::core::time::{day_of_year, epoch_seconds, from_year_day, TimeParts};
use crate::core::{DataKind, MbError, Result};
use crate::io::metadata::{
    Altitude, DetectType, Detects, NavRecord, PingRecord, SegyNumber, SegyTraceView, SonarType,
    TravelTimes,
};
use crate::io::swath::{Swath, BEAM_FLAG_NONE, BEAM_FLAG_NULL};
use crate::io::traits::{
    downcast_store, downcast_store_mut, FormatDescriptor, FormatDriver, FormatStore, Operation,
    OperationSet,
};

/// Format id of the SEGY driver.
pub const SEGY_FORMAT_ID: i32 = 160;

/// Coordinate scalar written when the current trace has none.
pub const DEFAULT_COORD_SCALAR: i16 = -100;

const NAME: &str = "SEGYSEGY";

static DESCRIPTOR: FormatDescriptor = FormatDescriptor {
    id: SEGY_FORMAT_ID,
    name: NAME,
    description: "SEGY seismic or subbottom trace data, single beam bathymetry, nav",
    beams_bath_max: 1,
    beams_amp_max: 0,
    pixels_ss_max: 0,
    variable_beams: false,
    traveltime: true,
    beam_flagging: true,
    platform_source: DataKind::None,
    nav_source: DataKind::Data,
    sensordepth_source: DataKind::Data,
    heading_source: DataKind::Data,
    attitude_source: DataKind::Data,
    svp_source: DataKind::None,
    beamwidth_xtrack: 5.0,
    beamwidth_ltrack: 5.0,
    operations: OperationSet::of(&[
        Operation::AllocState,
        Operation::FreeState,
        Operation::ReadPing,
        Operation::WritePing,
        Operation::Extract,
        Operation::Insert,
        Operation::ExtractNav,
        Operation::InsertNav,
        Operation::ExtractAltitude,
        Operation::InsertAltitude,
        Operation::TravelTimes,
        Operation::Detects,
        Operation::SonarType,
        Operation::PingNumber,
        Operation::SegyNumber,
        Operation::CopyRecord,
        Operation::ExtractSegyHeader,
        Operation::ExtractSegy,
        Operation::InsertSegy,
    ]),
};

/// Progress of the file headers on the bound stream.
///
/// Belongs to the stream, not to the record, so it is never copied
/// between stores.
#[derive(Debug, Clone, Copy, Default)]
struct StreamProgress {
    headers_read: bool,
    ascii_written: bool,
    header_written: bool,
}

/// Per-stream SEGY state: the file-level headers and the current trace.
#[derive(Debug, Default)]
pub struct SegyStore {
    kind: DataKind,
    comment: String,
    ascii_header: AsciiHeader,
    file_header: FileHeader,
    stream: StreamProgress,
    record: TraceRecord,
}

impl SegyStore {
    /// Create an empty store with default headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text header of the file.
    pub fn ascii_header(&self) -> &AsciiHeader {
        &self.ascii_header
    }

    /// Binary file header of the file.
    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    /// Set the text header written ahead of the first trace.
    pub fn set_ascii_header(&mut self, ascii_header: AsciiHeader) {
        self.ascii_header = ascii_header;
    }

    /// Set the file header written ahead of the first trace.
    ///
    /// Fails with `UnsupportedSampleFormat` if its format code is unknown.
    pub fn set_file_header(&mut self, file_header: FileHeader) -> Result<()> {
        file_header.sample_format()?;
        self.file_header = file_header;
        Ok(())
    }

    /// The current trace.
    pub fn record(&self) -> &TraceRecord {
        &self.record
    }

    /// Header of the current trace.
    pub fn trace_header(&self) -> &TraceHeader {
        &self.record.header
    }

    /// Replace the current record with a copy of `other`.
    ///
    /// The trace buffers keep their allocation. Once this store's stream
    /// has written a header, that header stays, so the bytes already on
    /// the stream and the held format code agree.
    pub fn copy_from(&mut self, other: &SegyStore) -> Result<()> {
        self.record.copy_from(&other.record)?;
        self.kind = other.kind;
        self.comment.clone_from(&other.comment);
        if !self.stream.ascii_written {
            self.ascii_header.clone_from(&other.ascii_header);
        }
        if !self.stream.header_written {
            self.file_header.clone_from(&other.file_header);
        }
        Ok(())
    }

    fn require_survey(&self, op: Operation) -> Result<()> {
        if self.kind.is_survey() {
            Ok(())
        } else {
            Err(MbError::unexpected_kind(op.name(), self.kind))
        }
    }

    /// Depth of the sonar below the surface, from the two-way sensor depth time.
    fn sonar_depth(&self) -> f64 {
        let h = &self.record.header;
        f64::from(h.sensordepthtime) * f64::from(h.soundspeed) / 2.0
    }

    fn set_sonar_depth(&mut self, depth: f64) {
        let h = &mut self.record.header;
        if h.soundspeed > 0.0 {
            h.sensordepthtime = (2.0 * depth / f64::from(h.soundspeed)) as f32;
        }
    }

    fn time(&self) -> Result<(TimeParts, f64)> {
        let h = &self.record.header;
        let time_i = from_year_day(
            i32::from(h.year),
            i32::from(h.day_of_yr),
            i32::from(h.hour),
            i32::from(h.min),
            i32::from(h.sec),
            i32::from(h.mils) * 1000,
        )?;
        let time_d = epoch_seconds(&time_i)?;
        Ok((time_i, time_d))
    }

    fn set_time(&mut self, time_i: &TimeParts) -> Result<()> {
        let doy = day_of_year(time_i)?;
        let h = &mut self.record.header;
        h.year = time_i[0] as i16;
        h.day_of_yr = doy as i16;
        h.hour = time_i[3] as i16;
        h.min = time_i[4] as i16;
        h.sec = time_i[5] as i16;
        h.mils = (time_i[6] / 1000) as i16;
        Ok(())
    }

    fn position(&self) -> (f64, f64) {
        let h = &self.record.header;
        let factor = coordinate_factor(h.coord_scalar);
        let lon = if h.src_long != 0 { h.src_long } else { h.grp_long };
        let lat = if h.src_lat != 0 { h.src_lat } else { h.grp_lat };
        (f64::from(lon) * factor, f64::from(lat) * factor)
    }

    fn set_position(&mut self, lon: f64, lat: f64) -> Result<()> {
        let h = &mut self.record.header;
        let coord_scalar = if h.coord_scalar == 0 {
            DEFAULT_COORD_SCALAR
        } else {
            h.coord_scalar
        };
        let factor = coordinate_factor(coord_scalar);
        let src_long = scaled_coordinate("longitude", lon, factor, coord_scalar)?;
        let src_lat = scaled_coordinate("latitude", lat, factor, coord_scalar)?;
        h.coord_scalar = coord_scalar;
        h.src_long = src_long;
        h.src_lat = src_lat;
        h.grp_long = src_long;
        h.grp_lat = src_lat;
        Ok(())
    }
}

impl FormatStore for SegyStore {
    fn format_id(&self) -> i32 {
        SEGY_FORMAT_ID
    }

    fn kind(&self) -> DataKind {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Degrees per raw coordinate unit for a trace-header coordinate scalar.
///
/// Raw coordinates are arc-seconds scaled by `coord_scalar`: negative
/// divides, positive multiplies, zero means unscaled.
pub fn coordinate_factor(coord_scalar: i16) -> f64 {
    let scalar = f64::from(coord_scalar);
    if coord_scalar < 0 {
        1.0 / scalar.abs() / 3600.0
    } else if coord_scalar > 0 {
        scalar / 3600.0
    } else {
        1.0 / 3600.0
    }
}

/// Raw header coordinate for `value`, or `BadParameter` if it leaves the i32 range.
fn scaled_coordinate(axis: &str, value: f64, factor: f64, coord_scalar: i16) -> Result<i32> {
    let raw = (value / factor).round();
    if raw.is_finite() && raw >= f64::from(i32::MIN) && raw <= f64::from(i32::MAX) {
        Ok(raw as i32)
    } else {
        Err(MbError::bad_parameter(
            "SEGY position",
            format!("{axis} {value} does not fit a trace header with coordinate scalar {coord_scalar}"),
        ))
    }
}

/// Driver for SEGY trace files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegyDriver;

fn store(store: &dyn FormatStore) -> Result<&SegyStore> {
    downcast_store::<SegyStore>(store, NAME)
}

fn store_mut(store: &mut dyn FormatStore) -> Result<&mut SegyStore> {
    downcast_store_mut::<SegyStore>(store, NAME)
}

impl FormatDriver for SegyDriver {
    fn descriptor(&self) -> &FormatDescriptor {
        &DESCRIPTOR
    }

    fn alloc_store(&self) -> Result<Box<dyn FormatStore>> {
        Ok(Box::new(SegyStore::new()))
    }

    fn read_ping(&self, mut reader: &mut dyn Read, s: &mut dyn FormatStore) -> Result<DataKind> {
        let s = store_mut(s)?;
        if !s.stream.headers_read {
            s.ascii_header = AsciiHeader::read_from(&mut reader)?;
            s.file_header = FileHeader::read_from(&mut reader)?;
            s.stream.headers_read = true;
            tracing::debug!(
                format = s.file_header.format,
                sample_interval = s.file_header.sample_interval,
                "read SEGY file headers"
            );
        }
        let format = s.file_header.sample_format()?;
        s.record.read_from(&mut reader, format)?;
        s.kind = DataKind::Data;
        s.comment.clear();
        Ok(s.kind)
    }

    fn write_ping(&self, mut writer: &mut dyn Write, s: &mut dyn FormatStore) -> Result<()> {
        let s = store_mut(s)?;
        if !s.stream.ascii_written {
            s.ascii_header.write_to(&mut writer)?;
            s.stream.ascii_written = true;
        }
        if !s.stream.header_written {
            s.file_header.write_to(&mut writer)?;
            s.stream.header_written = true;
        }
        if !s.kind.is_survey() {
            // comments have no place in a SEGY file
            tracing::debug!(kind = %s.kind, "skipping non-trace record on SEGY write");
            return Ok(());
        }
        let format = s.file_header.sample_format()?;
        s.record.write_to(&mut writer, format)
    }

    fn extract(&self, s: &dyn FormatStore, swath: &mut Swath) -> Result<PingRecord> {
        let s = store(s)?;
        if s.kind == DataKind::Comment {
            swath.set_counts(0, 0, 0)?;
            return Ok(PingRecord {
                kind: s.kind,
                comment: s.comment.clone(),
                ..PingRecord::default()
            });
        }

        let h = &s.record.header;
        let (time_i, time_d) = s.time()?;
        let (navlon, navlat) = s.position();

        swath.set_counts(1, 0, 0)?;
        let depth = f64::from(h.src_wbd) / 100.0;
        swath.bath[0] = depth;
        swath.beamflag[0] = if depth > 0.0 {
            BEAM_FLAG_NONE
        } else {
            BEAM_FLAG_NULL
        };
        swath.bath_acrosstrack[0] = 0.0;
        swath.bath_alongtrack[0] = 0.0;

        Ok(PingRecord {
            kind: s.kind,
            time_i,
            time_d,
            navlon,
            navlat,
            speed: 0.0,
            heading: f64::from(h.heading),
            nbath: 1,
            namp: 0,
            nss: 0,
            comment: String::new(),
        })
    }

    fn insert(&self, s: &mut dyn FormatStore, ping: &PingRecord, swath: &Swath) -> Result<()> {
        let s = store_mut(s)?;
        s.kind = ping.kind;
        if ping.kind == DataKind::Comment {
            s.comment.clone_from(&ping.comment);
            return Ok(());
        }

        s.set_time(&ping.time_i)?;
        s.set_position(ping.navlon, ping.navlat)?;
        let h = &mut s.record.header;
        h.heading = ping.heading as f32;
        if swath.nbath() > 0 {
            h.src_wbd = if swath.beamflag[0] == BEAM_FLAG_NULL {
                0
            } else {
                (swath.bath[0] * 100.0).round() as i32
            };
        }
        Ok(())
    }

    fn extract_nav(&self, s: &dyn FormatStore) -> Result<NavRecord> {
        let s = store(s)?;
        let h = &s.record.header;
        let (time_i, time_d) = s.time()?;
        let (navlon, navlat) = s.position();
        Ok(NavRecord {
            kind: s.kind,
            time_i,
            time_d,
            navlon,
            navlat,
            speed: 0.0,
            heading: f64::from(h.heading),
            draft: s.sonar_depth(),
            roll: f64::from(h.roll),
            pitch: f64::from(h.pitch),
            heave: 0.0,
        })
    }

    fn insert_nav(&self, s: &mut dyn FormatStore, nav: &NavRecord) -> Result<()> {
        let s = store_mut(s)?;
        s.set_time(&nav.time_i)?;
        s.set_position(nav.navlon, nav.navlat)?;
        s.set_sonar_depth(nav.draft);
        let h = &mut s.record.header;
        h.heading = nav.heading as f32;
        h.roll = nav.roll as f32;
        h.pitch = nav.pitch as f32;
        Ok(())
    }

    fn extract_altitude(&self, s: &dyn FormatStore) -> Result<Altitude> {
        let s = store(s)?;
        s.require_survey(Operation::ExtractAltitude)?;
        let transducer_depth = s.sonar_depth();
        let water_depth = f64::from(s.record.header.src_wbd) / 100.0;
        Ok(Altitude {
            kind: s.kind,
            transducer_depth,
            altitude: water_depth - transducer_depth,
        })
    }

    fn insert_altitude(&self, s: &mut dyn FormatStore, altitude: &Altitude) -> Result<()> {
        let s = store_mut(s)?;
        s.set_sonar_depth(altitude.transducer_depth);
        s.record.header.src_wbd =
            ((altitude.transducer_depth + altitude.altitude) * 100.0).round() as i32;
        Ok(())
    }

    fn ttimes(&self, s: &dyn FormatStore) -> Result<TravelTimes> {
        let s = store(s)?;
        s.require_survey(Operation::TravelTimes)?;
        let h = &s.record.header;
        Ok(TravelTimes {
            kind: s.kind,
            ttimes: vec![f64::from(h.wbt_secs)],
            angles: vec![0.0],
            angles_forward: vec![0.0],
            angles_null: vec![0.0],
            heave: vec![0.0],
            alongtrack_offset: vec![0.0],
            draft: s.sonar_depth(),
            ssv: f64::from(h.soundspeed),
        })
    }

    fn detects(&self, s: &dyn FormatStore) -> Result<Detects> {
        let s = store(s)?;
        s.require_survey(Operation::Detects)?;
        Ok(Detects {
            kind: s.kind,
            detects: vec![DetectType::Unknown],
        })
    }

    fn sonartype(&self, _s: &dyn FormatStore) -> Result<SonarType> {
        Ok(SonarType::Subbottom)
    }

    fn pingnumber(&self, s: &dyn FormatStore) -> Result<u32> {
        let shot = store(s)?.record.header.shot_num;
        u32::try_from(shot)
            .map_err(|_| MbError::bad_parameter("pingnumber", format!("negative shot number {shot}")))
    }

    fn segynumber(&self, s: &dyn FormatStore) -> Result<SegyNumber> {
        let s = store(s)?;
        Ok(SegyNumber {
            line: s.file_header.line,
            shot: s.record.header.shot_num,
            cdp: s.record.header.rp_num,
        })
    }

    fn copy_record(&self, src: &dyn FormatStore, dst: &mut dyn FormatStore) -> Result<()> {
        let src = store(src)?;
        store_mut(dst)?.copy_from(src)
    }

    fn extract_segy_header(&self, s: &dyn FormatStore) -> Result<TraceHeader> {
        Ok(store(s)?.record.header.clone())
    }

    fn extract_segy<'a>(&self, s: &'a dyn FormatStore) -> Result<SegyTraceView<'a>> {
        let s = store(s)?;
        Ok(SegyTraceView {
            sample_format: s.file_header.sample_format()?,
            kind: s.kind,
            header: &s.record.header,
            samples: s.record.samples(),
        })
    }

    fn insert_segy(
        &self,
        s: &mut dyn FormatStore,
        header: &TraceHeader,
        samples: &[f32],
    ) -> Result<()> {
        let s = store_mut(s)?;
        s.record.set(header, samples)?;
        s.kind = DataKind::Data;
        Ok(())
    }
}
