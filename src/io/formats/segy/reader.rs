// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sequential SEGY reader.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sonarcodec::io::formats::segy::SegyReader;
//!
//! let mut reader = SegyReader::open("line042.sgy")?;
//! println!("format code {}", reader.file_header().format);
//! loop {
//!     match reader.read_trace() {
//!         Ok(trace) => println!("shot {} has {} samples", trace.header.shot_num, trace.samples.len()),
//!         Err(e) if e.is_eof() => break,
//!         Err(e) => return Err(e.into()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::header::{AsciiHeader, FileHeader};
use super::record::TraceRecord;
use super::trace::TraceHeader;
use crate::core::{MbError, Result};

/// Borrowed view of the most recently read trace.
#[derive(Debug, Clone, Copy)]
pub struct SegyTrace<'a> {
    /// Trace header
    pub header: &'a TraceHeader,
    /// Samples decoded to `f32`
    pub samples: &'a [f32],
}

/// Reads the text header and file header on open, then traces on demand.
#[derive(Debug)]
pub struct SegyReader<R> {
    reader: R,
    ascii_header: AsciiHeader,
    file_header: FileHeader,
    record: TraceRecord,
    traces_read: u64,
}

impl SegyReader<BufReader<File>> {
    /// Open a SEGY file and read its headers.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| MbError::open_failed(path.display().to_string(), e.to_string()))?;
        tracing::debug!(path = %path.display(), "opened SEGY file for reading");
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> SegyReader<R> {
    /// Wrap a stream positioned at the start of a SEGY file and read its headers.
    pub fn new(mut reader: R) -> Result<Self> {
        let ascii_header = AsciiHeader::read_from(&mut reader)?;
        let file_header = FileHeader::read_from(&mut reader)?;
        Ok(Self {
            reader,
            ascii_header,
            file_header,
            record: TraceRecord::new(),
            traces_read: 0,
        })
    }

    /// The 3200-byte text header.
    pub fn ascii_header(&self) -> &AsciiHeader {
        &self.ascii_header
    }

    /// The binary file header.
    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    /// Number of traces read so far.
    pub fn traces_read(&self) -> u64 {
        self.traces_read
    }

    /// Read the next trace.
    ///
    /// Returns `EndOfFile` when the stream ends, and
    /// `UnsupportedSampleFormat` when the file header's format code is unknown.
    pub fn read_trace(&mut self) -> Result<SegyTrace<'_>> {
        let format = self.file_header.sample_format()?;
        self.record.read_from(&mut self.reader, format)?;
        self.traces_read += 1;
        Ok(SegyTrace {
            header: &self.record.header,
            samples: self.record.samples(),
        })
    }

    /// The most recently read trace record.
    pub fn record(&self) -> &TraceRecord {
        &self.record
    }

    /// Consume the reader and return the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
