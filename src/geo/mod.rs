// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Geographic helpers shared by the access layer and the platform engine.
//!
//! - [`LonFlip`] - longitude range policy
//! - [`coor_scale`] - meters-per-degree at a latitude
//! - [`Projection`] - external projection service interface

pub mod lonflip;
pub mod projection;
pub mod scale;

pub use lonflip::LonFlip;
pub use projection::{Projection, ProjectionState};
pub use scale::coor_scale;
