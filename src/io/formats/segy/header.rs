// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SEGY text header and binary file header.
//!
//! A SEGY file opens with a 3200-byte free-text header (40 card images of
//! 80 characters) followed by a 400-byte big-endian binary header. The
//! binary header's numeric fields occupy the first 62 bytes; the remaining
//! 338 bytes are kept verbatim so unknown content survives a round trip.

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use super::constants::*;
use super::sample::SampleFormat;
use crate::core::{MbError, Result};

/// The 3200-byte free-text header, stored verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct AsciiHeader {
    bytes: [u8; ASCII_HEADER_SIZE],
}

impl Default for AsciiHeader {
    fn default() -> Self {
        Self {
            bytes: [b' '; ASCII_HEADER_SIZE],
        }
    }
}

impl std::fmt::Debug for AsciiHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsciiHeader")
            .field("first_line", &self.line(0))
            .finish()
    }
}

impl AsciiHeader {
    /// Wrap raw header bytes.
    pub fn from_bytes(bytes: [u8; ASCII_HEADER_SIZE]) -> Self {
        Self { bytes }
    }

    /// Build a header from text lines, each padded or cut to 80 columns.
    ///
    /// Lines past the 40th are ignored.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut header = Self::default();
        for (i, line) in lines.iter().take(ASCII_HEADER_LINES).enumerate() {
            let text = line.as_ref().as_bytes();
            let n = text.len().min(ASCII_HEADER_LINE_WIDTH);
            let start = i * ASCII_HEADER_LINE_WIDTH;
            header.bytes[start..start + n].copy_from_slice(&text[..n]);
        }
        header
    }

    /// Raw header bytes.
    pub fn as_bytes(&self) -> &[u8; ASCII_HEADER_SIZE] {
        &self.bytes
    }

    /// Card image `index` with trailing blanks removed, or `None` past line 40.
    pub fn line(&self, index: usize) -> Option<String> {
        if index >= ASCII_HEADER_LINES {
            return None;
        }
        let start = index * ASCII_HEADER_LINE_WIDTH;
        let raw = &self.bytes[start..start + ASCII_HEADER_LINE_WIDTH];
        Some(
            String::from_utf8_lossy(raw)
                .trim_end_matches([' ', '\0'])
                .to_string(),
        )
    }

    /// Read the header from a stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; ASCII_HEADER_SIZE];
        reader
            .read_exact(&mut bytes)
            .map_err(|e| MbError::from_read(e, "SEGY ASCII header"))?;
        Ok(Self { bytes })
    }

    /// Write the header to a stream.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer
            .write_all(&self.bytes)
            .map_err(|e| MbError::from_write(e, "SEGY ASCII header"))
    }
}

/// The 400-byte binary file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Job identification number
    pub jobid: i32,
    /// Line number
    pub line: i32,
    /// Reel number
    pub reel: i32,
    /// Data traces per record
    pub channels: i16,
    /// Auxiliary traces per record
    pub aux_channels: i16,
    /// Sample interval in microseconds
    pub sample_interval: i16,
    /// Sample interval of the original field recording
    pub sample_interval_org: i16,
    /// Samples per data trace
    pub number_samples: i16,
    /// Samples per trace in the original field recording
    pub number_samples_org: i16,
    /// Sample-format code (see [`SampleFormat`])
    pub format: i16,
    /// Expected CDP fold
    pub cdp_fold: i16,
    /// Trace sorting code
    pub trace_sort: i16,
    /// Vertical sum code
    pub vertical_sum: i16,
    /// Sweep frequency at start, in Hz
    pub sweep_start: i16,
    /// Sweep frequency at end, in Hz
    pub sweep_end: i16,
    /// Sweep length in milliseconds
    pub sweep_length: i16,
    /// Sweep type code
    pub sweep_type: i16,
    /// Trace number of the sweep channel
    pub sweep_trace: i16,
    /// Sweep taper length at start, in milliseconds
    pub sweep_taper_start: i16,
    /// Sweep taper length at end, in milliseconds
    pub sweep_taper_end: i16,
    /// Taper type
    pub sweep_taper: i16,
    /// Correlated data traces (1 = no, 2 = yes)
    pub correlated: i16,
    /// Binary gain recovered (1 = yes, 2 = no)
    pub binary_gain: i16,
    /// Amplitude recovery method
    pub amplitude: i16,
    /// Measurement system (1 = meters, 2 = feet)
    pub units: i16,
    /// Impulse signal polarity
    pub impulse_polarity: i16,
    /// Vibratory polarity code
    pub vibrate_polarity: i16,
    /// Sample domain (time or depth)
    pub domain: i16,
    /// Reserved bytes 62..400, kept verbatim
    pub extra: [u8; FILE_HEADER_EXTRA_SIZE],
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            jobid: 0,
            line: 0,
            reel: 0,
            channels: 1,
            aux_channels: 0,
            sample_interval: 0,
            sample_interval_org: 0,
            number_samples: 0,
            number_samples_org: 0,
            format: FORMAT_IEEE_FLOAT,
            cdp_fold: 0,
            trace_sort: 0,
            vertical_sum: 0,
            sweep_start: 0,
            sweep_end: 0,
            sweep_length: 0,
            sweep_type: 0,
            sweep_trace: 0,
            sweep_taper_start: 0,
            sweep_taper_end: 0,
            sweep_taper: 0,
            correlated: 0,
            binary_gain: 0,
            amplitude: 0,
            units: 0,
            impulse_polarity: 0,
            vibrate_polarity: 0,
            domain: 0,
            extra: [0u8; FILE_HEADER_EXTRA_SIZE],
        }
    }
}

impl FileHeader {
    /// Create a header for the given sample encoding, interval and trace length.
    pub fn new(format: SampleFormat, sample_interval_us: i16, number_samples: i16) -> Self {
        Self {
            format: format.code(),
            sample_interval: sample_interval_us,
            sample_interval_org: sample_interval_us,
            number_samples,
            number_samples_org: number_samples,
            ..Self::default()
        }
    }

    /// Decode a header from its 400-byte on-disk form.
    pub fn decode(buf: &[u8; FILE_HEADER_SIZE]) -> Result<Self> {
        let mut c = Cursor::new(&buf[..FILE_HEADER_FIELDS_SIZE]);
        let mut header = Self {
            jobid: c.read_i32::<BigEndian>()?,
            line: c.read_i32::<BigEndian>()?,
            reel: c.read_i32::<BigEndian>()?,
            channels: c.read_i16::<BigEndian>()?,
            aux_channels: c.read_i16::<BigEndian>()?,
            sample_interval: c.read_i16::<BigEndian>()?,
            sample_interval_org: c.read_i16::<BigEndian>()?,
            number_samples: c.read_i16::<BigEndian>()?,
            number_samples_org: c.read_i16::<BigEndian>()?,
            format: c.read_i16::<BigEndian>()?,
            cdp_fold: c.read_i16::<BigEndian>()?,
            trace_sort: c.read_i16::<BigEndian>()?,
            vertical_sum: c.read_i16::<BigEndian>()?,
            sweep_start: c.read_i16::<BigEndian>()?,
            sweep_end: c.read_i16::<BigEndian>()?,
            sweep_length: c.read_i16::<BigEndian>()?,
            sweep_type: c.read_i16::<BigEndian>()?,
            sweep_trace: c.read_i16::<BigEndian>()?,
            sweep_taper_start: c.read_i16::<BigEndian>()?,
            sweep_taper_end: c.read_i16::<BigEndian>()?,
            sweep_taper: c.read_i16::<BigEndian>()?,
            correlated: c.read_i16::<BigEndian>()?,
            binary_gain: c.read_i16::<BigEndian>()?,
            amplitude: c.read_i16::<BigEndian>()?,
            units: c.read_i16::<BigEndian>()?,
            impulse_polarity: c.read_i16::<BigEndian>()?,
            vibrate_polarity: c.read_i16::<BigEndian>()?,
            domain: c.read_i16::<BigEndian>()?,
            extra: [0u8; FILE_HEADER_EXTRA_SIZE],
        };
        header
            .extra
            .copy_from_slice(&buf[FILE_HEADER_FIELDS_SIZE..FILE_HEADER_SIZE]);
        Ok(header)
    }

    /// Encode the header into its 400-byte on-disk form.
    pub fn encode(&self) -> Result<[u8; FILE_HEADER_SIZE]> {
        let mut buf = [0u8; FILE_HEADER_SIZE];
        {
            let mut c = Cursor::new(&mut buf[..FILE_HEADER_FIELDS_SIZE]);
            c.write_i32::<BigEndian>(self.jobid)?;
            c.write_i32::<BigEndian>(self.line)?;
            c.write_i32::<BigEndian>(self.reel)?;
            for value in [
                self.channels,
                self.aux_channels,
                self.sample_interval,
                self.sample_interval_org,
                self.number_samples,
                self.number_samples_org,
                self.format,
                self.cdp_fold,
                self.trace_sort,
                self.vertical_sum,
                self.sweep_start,
                self.sweep_end,
                self.sweep_length,
                self.sweep_type,
                self.sweep_trace,
                self.sweep_taper_start,
                self.sweep_taper_end,
                self.sweep_taper,
                self.correlated,
                self.binary_gain,
                self.amplitude,
                self.units,
                self.impulse_polarity,
                self.vibrate_polarity,
                self.domain,
            ] {
                c.write_i16::<BigEndian>(value)?;
            }
        }
        buf[FILE_HEADER_FIELDS_SIZE..].copy_from_slice(&self.extra);
        Ok(buf)
    }

    /// Read the header from a stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; FILE_HEADER_SIZE];
        reader
            .read_exact(&mut buf)
            .map_err(|e| MbError::from_read(e, "SEGY file header"))?;
        Self::decode(&buf)
    }

    /// Write the header to a stream.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let buf = self.encode()?;
        writer
            .write_all(&buf)
            .map_err(|e| MbError::from_write(e, "SEGY file header"))
    }

    /// Sample encoding named by the format code.
    pub fn sample_format(&self) -> Result<SampleFormat> {
        SampleFormat::from_code(self.format)
    }

    /// SEG-Y revision number stored in the reserved block.
    pub fn revision(&self) -> u16 {
        BigEndian::read_u16(&self.extra[REVISION_OFFSET - FILE_HEADER_FIELDS_SIZE..])
    }

    /// Set the SEG-Y revision number.
    pub fn set_revision(&mut self, revision: u16) {
        BigEndian::write_u16(
            &mut self.extra[REVISION_OFFSET - FILE_HEADER_FIELDS_SIZE..],
            revision,
        );
    }

    /// Fixed-length-trace flag (1 when every trace has `number_samples` samples).
    pub fn fixed_length(&self) -> i16 {
        BigEndian::read_i16(&self.extra[FIXED_LENGTH_OFFSET - FILE_HEADER_FIELDS_SIZE..])
    }

    /// Set the fixed-length-trace flag.
    pub fn set_fixed_length(&mut self, fixed: i16) {
        BigEndian::write_i16(
            &mut self.extra[FIXED_LENGTH_OFFSET - FILE_HEADER_FIELDS_SIZE..],
            fixed,
        );
    }

    /// Number of 3200-byte extended text headers following this header.
    pub fn num_extended_headers(&self) -> i16 {
        BigEndian::read_i16(&self.extra[NUM_EXT_HEADERS_OFFSET - FILE_HEADER_FIELDS_SIZE..])
    }
}
