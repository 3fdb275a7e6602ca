// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-ping array buffers owned by a session.

use crate::core::Result;
use crate::types::SampleArray;

/// Beam flag value marking a null (absent) beam.
pub const BEAM_FLAG_NULL: u8 = 0x01;

/// Beam flag value for a good beam.
pub const BEAM_FLAG_NONE: u8 = 0x00;

/// Sidescan value marking a null pixel. Pixels at or below this are ignored.
pub const SIDESCAN_NULL: f64 = -1_000_000_000.0;

/// Bathymetry, amplitude and sidescan arrays of one ping.
///
/// Lengths follow the counts of the current ping; capacities follow the
/// largest ping seen so far.
#[derive(Debug, Clone, Default)]
pub struct Swath {
    /// Beam flags, one per bathymetry beam
    pub beamflag: SampleArray<u8>,
    /// Depths in meters
    pub bath: SampleArray<f64>,
    /// Across-track distance of each beam in meters
    pub bath_acrosstrack: SampleArray<f64>,
    /// Along-track distance of each beam in meters
    pub bath_alongtrack: SampleArray<f64>,
    /// Amplitude per amplitude beam
    pub amp: SampleArray<f64>,
    /// Sidescan pixel values
    pub ss: SampleArray<f64>,
    /// Across-track distance of each pixel in meters
    pub ss_acrosstrack: SampleArray<f64>,
    /// Along-track distance of each pixel in meters
    pub ss_alongtrack: SampleArray<f64>,
}

impl Swath {
    /// Create empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create buffers with room for the given counts.
    pub fn with_capacity(nbath: usize, namp: usize, nss: usize) -> Result<Self> {
        let mut swath = Self::new();
        swath.reserve(nbath, namp, nss)?;
        Ok(swath)
    }

    /// Grow capacities to at least the given counts. Never shrinks.
    pub fn reserve(&mut self, nbath: usize, namp: usize, nss: usize) -> Result<()> {
        self.beamflag.reserve(nbath)?;
        self.bath.reserve(nbath)?;
        self.bath_acrosstrack.reserve(nbath)?;
        self.bath_alongtrack.reserve(nbath)?;
        self.amp.reserve(namp)?;
        self.ss.reserve(nss)?;
        self.ss_acrosstrack.reserve(nss)?;
        self.ss_alongtrack.reserve(nss)?;
        Ok(())
    }

    /// Set the lengths of all arrays. New elements are zero.
    pub fn set_counts(&mut self, nbath: usize, namp: usize, nss: usize) -> Result<()> {
        self.beamflag.resize(nbath)?;
        self.bath.resize(nbath)?;
        self.bath_acrosstrack.resize(nbath)?;
        self.bath_alongtrack.resize(nbath)?;
        self.amp.resize(namp)?;
        self.ss.resize(nss)?;
        self.ss_acrosstrack.resize(nss)?;
        self.ss_alongtrack.resize(nss)?;
        Ok(())
    }

    /// Number of bathymetry beams in the current ping.
    pub fn nbath(&self) -> usize {
        self.bath.len()
    }

    /// Number of amplitude beams in the current ping.
    pub fn namp(&self) -> usize {
        self.amp.len()
    }

    /// Number of sidescan pixels in the current ping.
    pub fn nss(&self) -> usize {
        self.ss.len()
    }

    /// Smallest capacity among the bathymetry arrays.
    pub fn bath_capacity(&self) -> usize {
        self.beamflag
            .capacity()
            .min(self.bath.capacity())
            .min(self.bath_acrosstrack.capacity())
            .min(self.bath_alongtrack.capacity())
    }

    /// Capacity of the amplitude array.
    pub fn amp_capacity(&self) -> usize {
        self.amp.capacity()
    }

    /// Smallest capacity among the sidescan arrays.
    pub fn ss_capacity(&self) -> usize {
        self.ss
            .capacity()
            .min(self.ss_acrosstrack.capacity())
            .min(self.ss_alongtrack.capacity())
    }
}

/// Footprint positions of beams and pixels, in degrees.
#[derive(Debug, Clone, Default)]
pub struct Footprint {
    /// Longitude of each bathymetry beam, NaN for null beams
    pub bath_lon: SampleArray<f64>,
    /// Latitude of each bathymetry beam, NaN for null beams
    pub bath_lat: SampleArray<f64>,
    /// Longitude of each sidescan pixel, NaN for null pixels
    pub ss_lon: SampleArray<f64>,
    /// Latitude of each sidescan pixel, NaN for null pixels
    pub ss_lat: SampleArray<f64>,
}

impl Footprint {
    /// Compute beam and pixel positions from a ping's navigation and the
    /// along/across-track distances in `swath`.
    pub fn compute(
        &mut self,
        swath: &Swath,
        navlon: f64,
        navlat: f64,
        heading: f64,
        mtodeglon: f64,
        mtodeglat: f64,
    ) -> Result<()> {
        let (hx, hy) = heading.to_radians().sin_cos();
        let place = |across: f64, along: f64| -> (f64, f64) {
            (
                navlon + hy * mtodeglon * across + hx * mtodeglon * along,
                navlat - hx * mtodeglat * across + hy * mtodeglat * along,
            )
        };

        let nbath = swath.nbath();
        self.bath_lon.resize(nbath)?;
        self.bath_lat.resize(nbath)?;
        for i in 0..nbath {
            let (lon, lat) = if swath.beamflag[i] == BEAM_FLAG_NULL {
                (f64::NAN, f64::NAN)
            } else {
                place(swath.bath_acrosstrack[i], swath.bath_alongtrack[i])
            };
            self.bath_lon[i] = lon;
            self.bath_lat[i] = lat;
        }

        let nss = swath.nss();
        self.ss_lon.resize(nss)?;
        self.ss_lat.resize(nss)?;
        for i in 0..nss {
            let (lon, lat) = if swath.ss[i] > SIDESCAN_NULL {
                place(swath.ss_acrosstrack[i], swath.ss_alongtrack[i])
            } else {
                (f64::NAN, f64::NAN)
            };
            self.ss_lon[i] = lon;
            self.ss_lat[i] = lat;
        }
        Ok(())
    }
}
