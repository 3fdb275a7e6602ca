// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Longitude-flip policy.
//!
//! Every extracted longitude is folded into one of three equivalent
//! 360-degree-wide ranges chosen per session.

use serde::{Deserialize, Serialize};

use crate::core::{MbError, Result};

/// Which 360-degree longitude range extracted values are normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LonFlip {
    /// [-360, 0]
    Negative,
    /// [-180, 180]
    #[default]
    Zero,
    /// [0, 360]
    Positive,
}

impl LonFlip {
    /// Map the classic integer selector (-1, 0, 1) to a policy.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            -1 => Ok(LonFlip::Negative),
            0 => Ok(LonFlip::Zero),
            1 => Ok(LonFlip::Positive),
            other => Err(MbError::bad_parameter(
                "lonflip",
                format!("expected -1, 0 or 1, got {other}"),
            )),
        }
    }

    /// Integer selector for this policy.
    pub fn code(&self) -> i32 {
        match self {
            LonFlip::Negative => -1,
            LonFlip::Zero => 0,
            LonFlip::Positive => 1,
        }
    }

    /// Inclusive bounds of the normalized range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            LonFlip::Negative => (-360.0, 0.0),
            LonFlip::Zero => (-180.0, 180.0),
            LonFlip::Positive => (0.0, 360.0),
        }
    }

    /// Fold `lon` into this policy's range.
    ///
    /// Values already in range are returned unchanged, which makes the
    /// operation idempotent. Non-finite values pass through.
    pub fn normalize(&self, lon: f64) -> f64 {
        if !lon.is_finite() {
            return lon;
        }
        match self {
            LonFlip::Negative => {
                if lon > 0.0 {
                    let r = lon.rem_euclid(360.0);
                    if r > 0.0 {
                        r - 360.0
                    } else {
                        0.0
                    }
                } else if lon < -360.0 {
                    lon.rem_euclid(360.0) - 360.0
                } else {
                    lon
                }
            }
            LonFlip::Zero => {
                if lon > 180.0 || lon < -180.0 {
                    (lon + 180.0).rem_euclid(360.0) - 180.0
                } else {
                    lon
                }
            }
            LonFlip::Positive => {
                if lon > 360.0 || lon < 0.0 {
                    lon.rem_euclid(360.0)
                } else {
                    lon
                }
            }
        }
    }

    /// Check whether `lon` already lies in this policy's range.
    pub fn contains(&self, lon: f64) -> bool {
        let (lo, hi) = self.range();
        lon >= lo && lon <= hi
    }
}
