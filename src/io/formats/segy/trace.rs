// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SEGY trace header.
//!
//! Every trace starts with a 240-byte big-endian header. Bytes 180..240
//! carry MB-System extensions (float timing, water-bottom time, sensor depth
//! as two-way time, sound speed, along-track distance and attitude).

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::constants::TRACE_HEADER_SIZE;
use crate::core::{MbError, Result};

/// The 240-byte trace header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceHeader {
    /// Trace sequence number within line
    pub seq_num: i32,
    /// Trace sequence number within reel
    pub seq_reel: i32,
    /// Field record (shot) number
    pub shot_num: i32,
    /// Trace number within field record
    pub shot_tr: i32,
    /// Energy source point number
    pub espn: i32,
    /// CDP ensemble number
    pub rp_num: i32,
    /// Trace number within CDP ensemble
    pub rp_tr: i32,
    /// Trace identification code
    pub trc_id: i16,
    /// Number of vertically summed traces
    pub num_vstk: i16,
    /// Number of horizontally stacked traces
    pub cdp_fold: i16,
    /// Data use (production / test)
    pub use_type: i16,
    /// Source to receiver offset
    pub range: i32,
    /// Receiver group elevation
    pub grp_elev: i32,
    /// Surface elevation at source
    pub src_elev: i32,
    /// Source depth below surface
    pub src_depth: i32,
    /// Datum elevation at receiver group
    pub grp_datum: i32,
    /// Datum elevation at source
    pub src_datum: i32,
    /// Water depth at source, in centimeters
    pub src_wbd: i32,
    /// Water depth at group, in centimeters
    pub grp_wbd: i32,
    /// Scalar applied to elevations and depths
    pub elev_scalar: i16,
    /// Scalar applied to coordinates (negative: divide, positive: multiply)
    pub coord_scalar: i16,
    /// Source longitude in arc-seconds before scaling
    pub src_long: i32,
    /// Source latitude in arc-seconds before scaling
    pub src_lat: i32,
    /// Receiver group longitude in arc-seconds before scaling
    pub grp_long: i32,
    /// Receiver group latitude in arc-seconds before scaling
    pub grp_lat: i32,
    /// Coordinate units (2 = seconds of arc)
    pub coord_units: i16,
    /// Weathering velocity
    pub wvel: i16,
    /// Subweathering velocity
    pub sbvel: i16,
    /// Uphole time at source, in milliseconds
    pub src_up_vel: i16,
    /// Uphole time at group, in milliseconds
    pub grp_up_vel: i16,
    /// Source static correction, in milliseconds
    pub src_static: i16,
    /// Group static correction, in milliseconds
    pub grp_static: i16,
    /// Total static applied, in milliseconds
    pub tot_static: i16,
    /// Lag time A, in milliseconds
    pub laga: i16,
    /// Delay recording time in milliseconds
    pub delay_mils: i32,
    /// Mute start time, in milliseconds
    pub smute_mils: i16,
    /// Mute end time, in milliseconds
    pub emute_mils: i16,
    /// Number of samples following this header
    pub nsamps: i16,
    /// Sample interval in microseconds
    pub si_micros: i16,
    /// Gain, filter and correlation fields, kept verbatim
    pub other_1: [i16; 19],
    /// Year data recorded
    pub year: i16,
    /// Day of year (1-366)
    pub day_of_yr: i16,
    /// Hour of day
    pub hour: i16,
    /// Minute of hour
    pub min: i16,
    /// Second of minute
    pub sec: i16,
    /// Milliseconds of second
    pub mils: i16,
    /// Trace weighting factor
    pub tr_weight: i16,
    /// Geophone group and gap fields, kept verbatim
    pub other_2: [i16; 5],
    /// Delay recording time in seconds
    pub delay: f32,
    /// Mute start time, in seconds
    pub smute_sec: f32,
    /// Mute end time, in seconds
    pub emute_sec: f32,
    /// Sample interval in seconds
    pub si_secs: f32,
    /// Water-bottom two-way travel time in seconds
    pub wbt_secs: f32,
    /// Set at the last trace of a CDP ensemble
    pub end_of_rp: i32,
    /// Unused
    pub dummy1: f32,
    /// Unused
    pub dummy2: f32,
    /// Unused
    pub dummy3: f32,
    /// Sensor depth expressed as two-way travel time in seconds
    pub sensordepthtime: f32,
    /// Water sound speed in m/s
    pub soundspeed: f32,
    /// Along-track distance in km
    pub distance: f32,
    /// Roll in degrees
    pub roll: f32,
    /// Pitch in degrees
    pub pitch: f32,
    /// Heading in degrees
    pub heading: f32,
}

impl TraceHeader {
    /// Number of samples that follow this header.
    ///
    /// A negative count is a malformed header.
    pub fn sample_count(&self) -> Result<usize> {
        usize::try_from(self.nsamps).map_err(|_| {
            MbError::bad_parameter(
                "SEGY trace header",
                format!("negative sample count {}", self.nsamps),
            )
        })
    }

    /// Decode a header from its 240-byte on-disk form.
    pub fn decode(buf: &[u8; TRACE_HEADER_SIZE]) -> Result<Self> {
        let mut c = Cursor::new(&buf[..]);
        let mut h = TraceHeader {
            seq_num: c.read_i32::<BigEndian>()?,
            seq_reel: c.read_i32::<BigEndian>()?,
            shot_num: c.read_i32::<BigEndian>()?,
            shot_tr: c.read_i32::<BigEndian>()?,
            espn: c.read_i32::<BigEndian>()?,
            rp_num: c.read_i32::<BigEndian>()?,
            rp_tr: c.read_i32::<BigEndian>()?,
            trc_id: c.read_i16::<BigEndian>()?,
            num_vstk: c.read_i16::<BigEndian>()?,
            cdp_fold: c.read_i16::<BigEndian>()?,
            use_type: c.read_i16::<BigEndian>()?,
            range: c.read_i32::<BigEndian>()?,
            grp_elev: c.read_i32::<BigEndian>()?,
            src_elev: c.read_i32::<BigEndian>()?,
            src_depth: c.read_i32::<BigEndian>()?,
            grp_datum: c.read_i32::<BigEndian>()?,
            src_datum: c.read_i32::<BigEndian>()?,
            src_wbd: c.read_i32::<BigEndian>()?,
            grp_wbd: c.read_i32::<BigEndian>()?,
            elev_scalar: c.read_i16::<BigEndian>()?,
            coord_scalar: c.read_i16::<BigEndian>()?,
            src_long: c.read_i32::<BigEndian>()?,
            src_lat: c.read_i32::<BigEndian>()?,
            grp_long: c.read_i32::<BigEndian>()?,
            grp_lat: c.read_i32::<BigEndian>()?,
            coord_units: c.read_i16::<BigEndian>()?,
            wvel: c.read_i16::<BigEndian>()?,
            sbvel: c.read_i16::<BigEndian>()?,
            src_up_vel: c.read_i16::<BigEndian>()?,
            grp_up_vel: c.read_i16::<BigEndian>()?,
            src_static: c.read_i16::<BigEndian>()?,
            grp_static: c.read_i16::<BigEndian>()?,
            tot_static: c.read_i16::<BigEndian>()?,
            laga: c.read_i16::<BigEndian>()?,
            delay_mils: c.read_i32::<BigEndian>()?,
            smute_mils: c.read_i16::<BigEndian>()?,
            emute_mils: c.read_i16::<BigEndian>()?,
            nsamps: c.read_i16::<BigEndian>()?,
            si_micros: c.read_i16::<BigEndian>()?,
            ..TraceHeader::default()
        };
        c.read_i16_into::<BigEndian>(&mut h.other_1)?;
        h.year = c.read_i16::<BigEndian>()?;
        h.day_of_yr = c.read_i16::<BigEndian>()?;
        h.hour = c.read_i16::<BigEndian>()?;
        h.min = c.read_i16::<BigEndian>()?;
        h.sec = c.read_i16::<BigEndian>()?;
        h.mils = c.read_i16::<BigEndian>()?;
        h.tr_weight = c.read_i16::<BigEndian>()?;
        c.read_i16_into::<BigEndian>(&mut h.other_2)?;
        h.delay = c.read_f32::<BigEndian>()?;
        h.smute_sec = c.read_f32::<BigEndian>()?;
        h.emute_sec = c.read_f32::<BigEndian>()?;
        h.si_secs = c.read_f32::<BigEndian>()?;
        h.wbt_secs = c.read_f32::<BigEndian>()?;
        h.end_of_rp = c.read_i32::<BigEndian>()?;
        h.dummy1 = c.read_f32::<BigEndian>()?;
        h.dummy2 = c.read_f32::<BigEndian>()?;
        h.dummy3 = c.read_f32::<BigEndian>()?;
        h.sensordepthtime = c.read_f32::<BigEndian>()?;
        h.soundspeed = c.read_f32::<BigEndian>()?;
        h.distance = c.read_f32::<BigEndian>()?;
        h.roll = c.read_f32::<BigEndian>()?;
        h.pitch = c.read_f32::<BigEndian>()?;
        h.heading = c.read_f32::<BigEndian>()?;
        debug_assert_eq!(c.position() as usize, TRACE_HEADER_SIZE);
        Ok(h)
    }

    /// Encode the header into its 240-byte on-disk form.
    pub fn encode(&self) -> Result<[u8; TRACE_HEADER_SIZE]> {
        let mut buf = [0u8; TRACE_HEADER_SIZE];
        let mut c = Cursor::new(&mut buf[..]);
        for v in [
            self.seq_num,
            self.seq_reel,
            self.shot_num,
            self.shot_tr,
            self.espn,
            self.rp_num,
            self.rp_tr,
        ] {
            c.write_i32::<BigEndian>(v)?;
        }
        for v in [self.trc_id, self.num_vstk, self.cdp_fold, self.use_type] {
            c.write_i16::<BigEndian>(v)?;
        }
        for v in [
            self.range,
            self.grp_elev,
            self.src_elev,
            self.src_depth,
            self.grp_datum,
            self.src_datum,
            self.src_wbd,
            self.grp_wbd,
        ] {
            c.write_i32::<BigEndian>(v)?;
        }
        c.write_i16::<BigEndian>(self.elev_scalar)?;
        c.write_i16::<BigEndian>(self.coord_scalar)?;
        for v in [self.src_long, self.src_lat, self.grp_long, self.grp_lat] {
            c.write_i32::<BigEndian>(v)?;
        }
        for v in [
            self.coord_units,
            self.wvel,
            self.sbvel,
            self.src_up_vel,
            self.grp_up_vel,
            self.src_static,
            self.grp_static,
            self.tot_static,
            self.laga,
        ] {
            c.write_i16::<BigEndian>(v)?;
        }
        c.write_i32::<BigEndian>(self.delay_mils)?;
        for v in [self.smute_mils, self.emute_mils, self.nsamps, self.si_micros] {
            c.write_i16::<BigEndian>(v)?;
        }
        for v in self.other_1 {
            c.write_i16::<BigEndian>(v)?;
        }
        for v in [
            self.year,
            self.day_of_yr,
            self.hour,
            self.min,
            self.sec,
            self.mils,
            self.tr_weight,
        ] {
            c.write_i16::<BigEndian>(v)?;
        }
        for v in self.other_2 {
            c.write_i16::<BigEndian>(v)?;
        }
        for v in [
            self.delay,
            self.smute_sec,
            self.emute_sec,
            self.si_secs,
            self.wbt_secs,
        ] {
            c.write_f32::<BigEndian>(v)?;
        }
        c.write_i32::<BigEndian>(self.end_of_rp)?;
        for v in [
            self.dummy1,
            self.dummy2,
            self.dummy3,
            self.sensordepthtime,
            self.soundspeed,
            self.distance,
            self.roll,
            self.pitch,
            self.heading,
        ] {
            c.write_f32::<BigEndian>(v)?;
        }
        debug_assert_eq!(c.position() as usize, TRACE_HEADER_SIZE);
        Ok(buf)
    }

    /// Read a header from a stream. A short read is `EndOfFile`.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; TRACE_HEADER_SIZE];
        reader
            .read_exact(&mut buf)
            .map_err(|e| MbError::from_read(e, "SEGY trace header"))?;
        Self::decode(&buf)
    }

    /// Write a header to a stream. A short write is `WriteFailed`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let buf = self.encode()?;
        writer
            .write_all(&buf)
            .map_err(|e| MbError::from_write(e, "SEGY trace header"))
    }
}
