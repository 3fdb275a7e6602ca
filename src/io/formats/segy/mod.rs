// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SEG-Y trace codec and format driver.
//!
//! This module provides:
//! - Byte-exact encoding of the text header, file header and trace header
//! - Sample decoding and encoding for format codes 1, 2, 3, 5, 6, 8 and 11
//! - A sequential [`SegyReader`] and [`SegyWriter`]
//! - The [`SegyDriver`] binding traces to the generic access layer
//! - A discrete Hilbert transform for trace envelopes

// Layout constants (pub for detection)
pub mod constants;

pub mod driver;
pub mod header;
pub mod hilbert;
pub mod reader;
pub mod record;
pub mod sample;
pub mod trace;
pub mod writer;

pub use driver::{coordinate_factor, SegyDriver, SegyStore, SEGY_FORMAT_ID};
pub use header::{AsciiHeader, FileHeader};
pub use hilbert::{envelope, hilbert};
pub use reader::{SegyReader, SegyTrace};
pub use record::TraceRecord;
pub use sample::{ibm_to_ieee, ieee_to_ibm, SampleFormat};
pub use trace::TraceHeader;
pub use writer::SegyWriter;
