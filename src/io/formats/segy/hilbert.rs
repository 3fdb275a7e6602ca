// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Discrete Hilbert transform and trace envelope.
//!
//! Direct O(n^2) convolution with the discrete Hilbert kernel. Samples
//! beyond either end of the trace count as zero.

use std::f64::consts::PI;

/// Hilbert transform of `data`.
pub fn hilbert(data: &[f32]) -> Vec<f32> {
    let n = data.len() as isize;
    let at = |i: isize| -> f64 {
        if i >= 0 && i < n {
            f64::from(data[i as usize])
        } else {
            0.0
        }
    };

    (0..n)
        .map(|i1| {
            let mut sum = 0.0;
            for i2 in 1..n {
                let k = i2 as f64;
                let d1 = at(i1 + i2);
                let d2 = at(i1 - i2);
                let d3 = at(i1 + i2 + 1);
                let d4 = at(i1 - i2 - 1);
                sum -= 0.5 * (d1 - d2) / k + 0.5 * (d3 - d4) / (k + 1.0);
            }
            (sum / PI) as f32
        })
        .collect()
}

/// Instantaneous amplitude: `sqrt(x^2 + h^2)` where `h` is the Hilbert transform.
pub fn envelope(data: &[f32]) -> Vec<f32> {
    hilbert(data)
        .iter()
        .zip(data)
        .map(|(&h, &x)| (x * x + h * h).sqrt())
        .collect()
}
