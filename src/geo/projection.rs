// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Map projection service interface.
//!
//! Projection algorithms live outside this crate. A session holds an
//! optional [`Projection`] and calls it around extract and insert.

use crate::core::Result;

/// Forward and inverse geographic projection.
pub trait Projection: Send {
    /// Short identifier, e.g. `"UTM10N"`.
    fn name(&self) -> &str;

    /// Geographic (lon, lat) in degrees to projected (x, y).
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)>;

    /// Projected (x, y) to geographic (lon, lat) in degrees.
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)>;
}

/// Projection state carried by a session.
#[derive(Default)]
pub enum ProjectionState {
    /// Coordinates are geographic
    #[default]
    Inactive,
    /// Coordinates in stored records are projected
    Active(Box<dyn Projection>),
}

impl ProjectionState {
    /// Check if a projection is active.
    pub fn is_active(&self) -> bool {
        matches!(self, ProjectionState::Active(_))
    }

    /// Convert stored (x, y) to (lon, lat); identity when inactive.
    pub fn to_geographic(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        match self {
            ProjectionState::Inactive => Ok((x, y)),
            ProjectionState::Active(projection) => projection.inverse(x, y),
        }
    }

    /// Convert (lon, lat) to stored (x, y); identity when inactive.
    pub fn to_projected(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        match self {
            ProjectionState::Inactive => Ok((lon, lat)),
            ProjectionState::Active(projection) => projection.forward(lon, lat),
        }
    }
}

impl std::fmt::Debug for ProjectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionState::Inactive => f.write_str("Inactive"),
            ProjectionState::Active(p) => write!(f, "Active({})", p.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MbError;

    struct Offset;

    impl Projection for Offset {
        fn name(&self) -> &str {
            "offset"
        }
        fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
            Ok((lon * 1000.0, lat * 1000.0))
        }
        fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
            if x.is_nan() {
                return Err(MbError::projection("nan easting"));
            }
            Ok((x / 1000.0, y / 1000.0))
        }
    }

    #[test]
    fn test_inactive_is_identity() {
        let state = ProjectionState::Inactive;
        assert!(!state.is_active());
        assert_eq!(state.to_geographic(1.0, 2.0).unwrap(), (1.0, 2.0));
        assert_eq!(state.to_projected(1.0, 2.0).unwrap(), (1.0, 2.0));
    }

    #[test]
    fn test_active_delegates() {
        let state = ProjectionState::Active(Box::new(Offset));
        assert!(state.is_active());
        assert_eq!(state.to_projected(1.5, -2.0).unwrap(), (1500.0, -2000.0));
        assert_eq!(state.to_geographic(1500.0, -2000.0).unwrap(), (1.5, -2.0));
        assert!(state.to_geographic(f64::NAN, 0.0).is_err());
        assert_eq!(format!("{state:?}"), "Active(offset)");
    }
}
