// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Attitude triples and their composition.
//!
//! An [`Attitude`] is heading, roll and pitch in degrees. Its rotation
//! matrix is `R = Rz(-heading) * Rx(pitch) * Ry(roll)`, which maps vectors
//! from the rotated frame (starboard, forward, up) into the parent frame
//! (east, north, up). Composition multiplies matrices and decomposes the
//! product back into degrees.
//!
//! ```
//! use sonarcodec::platform::Attitude;
//!
//! let mount = Attitude::new(10.0, 0.0, 0.0);
//! let undone = mount.compose(&mount.inverse());
//! assert!(undone.heading.abs() < 1e-9 || (undone.heading - 360.0).abs() < 1e-9);
//! ```

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// Heading, roll and pitch in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attitude {
    /// Degrees clockwise from north
    pub heading: f64,
    /// Degrees, starboard down positive
    pub roll: f64,
    /// Degrees, bow up positive
    pub pitch: f64,
}

impl Attitude {
    /// No rotation.
    pub const IDENTITY: Attitude = Attitude {
        heading: 0.0,
        roll: 0.0,
        pitch: 0.0,
    };

    pub const fn new(heading: f64, roll: f64, pitch: f64) -> Self {
        Self {
            heading,
            roll,
            pitch,
        }
    }

    /// True when all three angles are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.heading == 0.0 && self.roll == 0.0 && self.pitch == 0.0
    }

    /// Rotation matrix of this attitude.
    pub fn to_matrix(&self) -> DMat3 {
        DMat3::from_rotation_z(-self.heading.to_radians())
            * DMat3::from_rotation_x(self.pitch.to_radians())
            * DMat3::from_rotation_y(self.roll.to_radians())
    }

    /// Decompose a rotation matrix built by [`Attitude::to_matrix`].
    ///
    /// Heading is normalized to `[0, 360)`.
    pub fn from_matrix(m: &DMat3) -> Self {
        // glam is column-major: R[row][col] == m.col(col)[row]
        let pitch = m.y_axis.z.clamp(-1.0, 1.0).asin();
        let roll = (-m.x_axis.z).atan2(m.z_axis.z);
        let heading = m.y_axis.x.atan2(m.y_axis.y);
        Self {
            heading: normalize_heading(heading.to_degrees()),
            roll: roll.to_degrees(),
            pitch: pitch.to_degrees(),
        }
    }

    /// Apply `other` inside this frame: `R(self) * R(other)`.
    pub fn compose(&self, other: &Attitude) -> Attitude {
        Attitude::from_matrix(&(self.to_matrix() * other.to_matrix()))
    }

    /// The rotation that undoes this one.
    pub fn inverse(&self) -> Attitude {
        Attitude::from_matrix(&self.to_matrix().transpose())
    }

    /// Rotate a body-frame vector into the parent frame.
    pub fn rotate(&self, v: DVec3) -> DVec3 {
        self.to_matrix() * v
    }
}

fn normalize_heading(heading: f64) -> f64 {
    let h = heading.rem_euclid(360.0);
    if h >= 360.0 {
        h - 360.0
    } else {
        h
    }
}
