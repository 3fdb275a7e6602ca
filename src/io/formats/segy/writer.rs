// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sequential SEGY writer.
//!
//! The text header and file header are emitted exactly once, ahead of the
//! first trace (or on [`SegyWriter::finish`] for an empty file).
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sonarcodec::io::formats::segy::{AsciiHeader, FileHeader, SampleFormat, SegyWriter, TraceHeader};
//!
//! let ascii = AsciiHeader::from_lines(&["C 1 SUBBOTTOM LINE 3"]);
//! let file_header = FileHeader::new(SampleFormat::IeeeFloat, 125, 4);
//! let mut writer = SegyWriter::create("line003.sgy", ascii, file_header)?;
//!
//! let header = TraceHeader { seq_num: 1, nsamps: 4, ..TraceHeader::default() };
//! writer.write_trace(&header, &[1.0, -2.5, 3.25, 0.0])?;
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::header::{AsciiHeader, FileHeader};
use super::record::write_trace_parts;
use super::sample::SampleFormat;
use super::trace::TraceHeader;
use crate::core::{MbError, Result};
use crate::types::SampleArray;

/// Writes SEGY headers once, then traces.
pub struct SegyWriter<W: Write> {
    writer: W,
    ascii_header: AsciiHeader,
    file_header: FileHeader,
    format: SampleFormat,
    ascii_written: bool,
    header_written: bool,
    raw: SampleArray<u8>,
    traces_written: u64,
}

impl SegyWriter<BufWriter<File>> {
    /// Create a SEGY file.
    pub fn create<P: AsRef<Path>>(
        path: P,
        ascii_header: AsciiHeader,
        file_header: FileHeader,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| MbError::open_failed(path.display().to_string(), e.to_string()))?;
        tracing::debug!(path = %path.display(), "created SEGY file");
        Self::new(BufWriter::new(file), ascii_header, file_header)
    }
}

impl<W: Write> SegyWriter<W> {
    /// Wrap a stream. Nothing is written until the first trace.
    ///
    /// Fails with `UnsupportedSampleFormat` if the file header's format code
    /// cannot be encoded.
    pub fn new(writer: W, ascii_header: AsciiHeader, file_header: FileHeader) -> Result<Self> {
        let format = file_header.sample_format()?;
        Ok(Self {
            writer,
            ascii_header,
            file_header,
            format,
            ascii_written: false,
            header_written: false,
            raw: SampleArray::new(),
            traces_written: 0,
        })
    }

    /// The binary file header that is (or will be) written.
    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    /// Number of traces written so far.
    pub fn traces_written(&self) -> u64 {
        self.traces_written
    }

    /// Write the text and file headers if they have not been written yet.
    pub fn write_headers(&mut self) -> Result<()> {
        if !self.ascii_written {
            self.ascii_header.write_to(&mut self.writer)?;
            self.ascii_written = true;
        }
        if !self.header_written {
            self.file_header.write_to(&mut self.writer)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Write one trace. `samples.len()` must equal `header.nsamps`.
    pub fn write_trace(&mut self, header: &TraceHeader, samples: &[f32]) -> Result<()> {
        self.write_headers()?;
        write_trace_parts(&mut self.writer, header, samples, self.format, &mut self.raw)?;
        self.traces_written += 1;
        Ok(())
    }

    /// Flush and return the underlying stream.
    pub fn finish(mut self) -> Result<W> {
        self.write_headers()?;
        self.writer
            .flush()
            .map_err(|e| MbError::from_write(e, "SEGY flush"))?;
        tracing::debug!(traces = self.traces_written, "finished SEGY file");
        Ok(self.writer)
    }
}
