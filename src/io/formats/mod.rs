// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format drivers.
//!
//! - [`segy`]: SEG-Y seismic and subbottom traces (format 160)

pub mod segy;
