// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! One trace: header plus decoded samples, with reusable I/O buffers.

use std::io::{Read, Write};

use super::sample::SampleFormat;
use super::trace::TraceHeader;
use crate::core::{MbError, Result};
use crate::types::SampleArray;

/// A trace header with its samples.
///
/// The raw byte buffer and the sample buffer keep their largest allocation
/// across reads, so a file of equal-length traces allocates once.
#[derive(Debug, Default)]
pub struct TraceRecord {
    /// Header of the current trace
    pub header: TraceHeader,
    raw: SampleArray<u8>,
    samples: SampleArray<f32>,
}

impl TraceRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded samples of the current trace.
    pub fn samples(&self) -> &[f32] {
        self.samples.as_slice()
    }

    /// Mutable access to the decoded samples.
    pub fn samples_mut(&mut self) -> &mut [f32] {
        self.samples.as_mut_slice()
    }

    /// Capacity of the decoded-sample buffer.
    pub fn sample_capacity(&self) -> usize {
        self.samples.capacity()
    }

    /// Replace header and samples. `samples.len()` must match `header.nsamps`.
    pub fn set(&mut self, header: &TraceHeader, samples: &[f32]) -> Result<()> {
        check_sample_count(header, samples)?;
        self.samples.assign(samples)?;
        self.header = header.clone();
        Ok(())
    }

    /// Replace header and samples with those of `other`, keeping this
    /// record's allocations.
    pub fn copy_from(&mut self, other: &TraceRecord) -> Result<()> {
        self.samples.assign(other.samples())?;
        self.header.clone_from(&other.header);
        Ok(())
    }

    /// Read the next trace header and its samples.
    ///
    /// The header's `nsamps` alone decides how many samples are read.
    pub fn read_from<R: Read>(&mut self, reader: &mut R, format: SampleFormat) -> Result<()> {
        let header = TraceHeader::read_from(reader)?;
        let count = header.sample_count()?;
        let nbytes = count
            .checked_mul(format.bytes_per_sample())
            .ok_or_else(|| MbError::resource_exhausted("SEGY sample bytes", count))?;

        // Grow both buffers before any bytes land in them.
        self.raw.resize(nbytes)?;
        self.samples.resize(count)?;

        reader
            .read_exact(self.raw.as_mut_slice())
            .map_err(|e| MbError::from_read(e, "SEGY trace samples"))?;
        format.decode(self.raw.as_slice(), self.samples.as_mut_slice());
        self.header = header;
        Ok(())
    }

    /// Write the current header and samples.
    pub fn write_to<W: Write>(&mut self, writer: &mut W, format: SampleFormat) -> Result<()> {
        write_trace_parts(
            writer,
            &self.header,
            self.samples.as_slice(),
            format,
            &mut self.raw,
        )
    }
}

/// Encode and write one trace, using `raw` as scratch space.
pub(crate) fn write_trace_parts<W: Write>(
    writer: &mut W,
    header: &TraceHeader,
    samples: &[f32],
    format: SampleFormat,
    raw: &mut SampleArray<u8>,
) -> Result<()> {
    check_sample_count(header, samples)?;
    raw.resize(samples.len() * format.bytes_per_sample())?;
    format.encode(samples, raw.as_mut_slice());
    header.write_to(writer)?;
    writer
        .write_all(raw.as_slice())
        .map_err(|e| MbError::from_write(e, "SEGY trace samples"))
}

fn check_sample_count(header: &TraceHeader, samples: &[f32]) -> Result<()> {
    let count = header.sample_count()?;
    if count != samples.len() {
        return Err(MbError::bad_parameter(
            "SEGY trace",
            format!(
                "header nsamps {} does not match {} samples",
                header.nsamps,
                samples.len()
            ),
        ));
    }
    Ok(())
}
