// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Buffer types shared by codecs and sessions.

pub mod sample_array;

pub use sample_array::SampleArray;
