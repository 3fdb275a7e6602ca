// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format-agnostic access sessions.
//!
//! An [`MbioSession`] binds one open stream to one format driver and the
//! store that driver allocated. Every call is checked against the driver's
//! [`OperationSet`](crate::io::traits::OperationSet) before it is forwarded:
//! an operation the format lacks returns `CapabilityUnsupported` and leaves
//! the session untouched.
//!
//! On top of the driver, the session applies the same post-processing to
//! every format:
//! - inverse projection of positions when a projection is active
//! - longitude normalization according to the session's [`LonFlip`]
//! - growth of the per-ping arrays, whose capacities never shrink
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sonarcodec::core::DataKind;
//! use sonarcodec::geo::LonFlip;
//! use sonarcodec::io::SessionBuilder;
//!
//! let mut session = SessionBuilder::new()
//!     .lonflip(LonFlip::Negative)
//!     .open_read("line042.sgy")?;
//!
//! loop {
//!     match session.read_ping() {
//!         Ok(DataKind::Data) => {
//!             let ping = session.extract()?;
//!             println!("{} {} {}", ping.navlon, ping.navlat, session.swath().bath[0]);
//!         }
//!         Ok(_) => {}
//!         Err(e) if e.is_eof() => break,
//!         Err(e) => return Err(e.into()),
//!     }
//! }
//! session.close()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;

pub use builder::{SessionBuilder, SessionConfig};

use std::io::{Read, Write};

use crate::core::{DataKind, MbError, Result};
use crate::geo::{coor_scale, LonFlip, Projection, ProjectionState};
use crate::io::formats::segy::TraceHeader;
use crate::io::metadata::{
    Altitude, Detects, Gains, NavRecord, PingRecord, PreprocessParams, Pulses, RawSidescan,
    SegyNumber, SegyTraceView, SidescanType, SonarType, SoundVelocityProfile, TravelTimes,
};
use crate::io::swath::{Footprint, Swath};
use crate::io::traits::{FormatDescriptor, FormatDriver, FormatStore, Operation};
use crate::platform::PlatformModel;

/// The byte stream a session reads from or writes to.
pub enum SessionStream {
    /// Input stream
    Read(Box<dyn Read + Send>),
    /// Output stream
    Write(Box<dyn Write + Send>),
}

impl SessionStream {
    /// Check if this is an input stream.
    pub fn is_read(&self) -> bool {
        matches!(self, SessionStream::Read(_))
    }
}

impl std::fmt::Debug for SessionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStream::Read(_) => f.write_str("Read"),
            SessionStream::Write(_) => f.write_str("Write"),
        }
    }
}

/// Kind and array counts of the most recently extracted ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    /// Kind of the record
    pub kind: DataKind,
    /// Bathymetry beams
    pub nbath: usize,
    /// Amplitude beams
    pub namp: usize,
    /// Sidescan pixels
    pub nss: usize,
}

/// One open stream bound to one format driver.
pub struct MbioSession {
    path: String,
    stream: SessionStream,
    driver: Box<dyn FormatDriver>,
    store: Option<Box<dyn FormatStore>>,
    lonflip: LonFlip,
    projection: ProjectionState,
    swath: Swath,
    footprint: Footprint,
    beams_bath_max: usize,
    beams_amp_max: usize,
    pixels_ss_max: usize,
    dimensions: Dimensions,
}

impl MbioSession {
    /// Open a file for reading, detecting its format.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        SessionBuilder::new().open_read(path)
    }

    /// Create a file for writing in the given format.
    pub fn create<P: AsRef<std::path::Path>>(path: P, format_id: i32) -> Result<Self> {
        SessionBuilder::new().format(format_id).open_write(path)
    }

    /// Bind a driver to a stream.
    ///
    /// The driver allocates its store here; a driver without an allocate
    /// slot cannot back a session.
    pub fn new(
        path: impl Into<String>,
        stream: SessionStream,
        driver: Box<dyn FormatDriver>,
        lonflip: LonFlip,
        projection: ProjectionState,
    ) -> Result<Self> {
        let descriptor = driver.descriptor();
        if !descriptor.supports(Operation::AllocState) {
            return Err(descriptor.unsupported(Operation::AllocState));
        }
        let store = driver.alloc_store()?;
        let path = path.into();
        tracing::debug!(
            path = %path,
            format = descriptor.id,
            name = descriptor.name,
            stream = ?stream,
            lonflip = ?lonflip,
            projection = ?projection,
            "opened session"
        );
        Ok(Self {
            path,
            stream,
            driver,
            store: Some(store),
            lonflip,
            projection,
            swath: Swath::new(),
            footprint: Footprint::default(),
            beams_bath_max: 0,
            beams_amp_max: 0,
            pixels_ss_max: 0,
            dimensions: Dimensions::default(),
        })
    }

    /// Path (or label) of the stream.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Descriptor of the active driver.
    pub fn descriptor(&self) -> &FormatDescriptor {
        self.driver.descriptor()
    }

    /// Longitude normalization policy.
    pub fn lonflip(&self) -> LonFlip {
        self.lonflip
    }

    /// Change the longitude normalization policy.
    pub fn set_lonflip(&mut self, lonflip: LonFlip) {
        self.lonflip = lonflip;
    }

    /// Projection state.
    pub fn projection(&self) -> &ProjectionState {
        &self.projection
    }

    /// Activate a projection for subsequent extracts and inserts.
    pub fn set_projection(&mut self, projection: Box<dyn Projection>) {
        self.projection = ProjectionState::Active(projection);
    }

    /// Arrays of the most recently extracted ping.
    pub fn swath(&self) -> &Swath {
        &self.swath
    }

    /// Grow the per-ping arrays ahead of time.
    pub fn reserve(&mut self, nbath: usize, namp: usize, nss: usize) -> Result<()> {
        self.swath.reserve(nbath, namp, nss)
    }

    /// Footprint positions of the most recent [`extract_lonlat`](Self::extract_lonlat).
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Largest bathymetry beam count seen so far.
    pub fn beams_bath_max(&self) -> usize {
        self.beams_bath_max
    }

    /// Largest amplitude beam count seen so far.
    pub fn beams_amp_max(&self) -> usize {
        self.beams_amp_max
    }

    /// Largest sidescan pixel count seen so far.
    pub fn pixels_ss_max(&self) -> usize {
        self.pixels_ss_max
    }

    /// Kind and counts of the most recently extracted ping.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Nominal (across-track, along-track) beam widths in degrees.
    pub fn beamwidths(&self) -> (f64, f64) {
        let d = self.driver.descriptor();
        (d.beamwidth_xtrack, d.beamwidth_ltrack)
    }

    /// Kind of the record currently held.
    pub fn kind(&self) -> Result<DataKind> {
        Ok(self.store()?.kind())
    }

    /// Borrow the driver's store as its concrete type.
    pub fn store_as<T: 'static>(&self) -> Option<&T> {
        self.store.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the driver's store as its concrete type.
    pub fn store_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.store.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    fn check(&self, op: Operation) -> Result<()> {
        let descriptor = self.driver.descriptor();
        if descriptor.supports(op) {
            Ok(())
        } else {
            Err(descriptor.unsupported(op))
        }
    }

    fn store(&self) -> Result<&dyn FormatStore> {
        self.store.as_deref().ok_or_else(released)
    }

    fn note_counts(&mut self, nbath: usize, namp: usize, nss: usize) {
        self.beams_bath_max = self.beams_bath_max.max(nbath);
        self.beams_amp_max = self.beams_amp_max.max(namp);
        self.pixels_ss_max = self.pixels_ss_max.max(nss);
    }

    fn to_output_position(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let (lon, lat) = self.projection.to_geographic(lon, lat)?;
        Ok((self.lonflip.normalize(lon), lat))
    }

    // Ping operations

    /// Read the next record and return its kind.
    pub fn read_ping(&mut self) -> Result<DataKind> {
        self.check(Operation::ReadPing)?;
        let reader = match &mut self.stream {
            SessionStream::Read(reader) => reader.as_mut(),
            SessionStream::Write(_) => {
                return Err(MbError::bad_descriptor(format!(
                    "session on '{}' is not open for reading",
                    self.path
                )))
            }
        };
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.read_ping(reader, store)
    }

    /// Write the record held in the store.
    pub fn write_ping(&mut self) -> Result<()> {
        self.check(Operation::WritePing)?;
        let writer = match &mut self.stream {
            SessionStream::Write(writer) => writer.as_mut(),
            SessionStream::Read(_) => {
                return Err(MbError::write_failed(
                    self.path.clone(),
                    "session is open for reading",
                ))
            }
        };
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.write_ping(writer, store)
    }

    /// Extract the current ping into the session arrays.
    ///
    /// Positions come back geographic and normalized by the session's
    /// [`LonFlip`]; the arrays are available through [`swath`](Self::swath).
    pub fn extract(&mut self) -> Result<PingRecord> {
        self.check(Operation::Extract)?;
        let store = self.store.as_deref().ok_or_else(released)?;
        let mut ping = self.driver.extract(store, &mut self.swath)?;

        let (lon, lat) = self.to_output_position(ping.navlon, ping.navlat)?;
        ping.navlon = lon;
        ping.navlat = lat;

        self.note_counts(ping.nbath, ping.namp, ping.nss);
        self.dimensions = Dimensions {
            kind: ping.kind,
            nbath: ping.nbath,
            namp: ping.namp,
            nss: ping.nss,
        };
        Ok(ping)
    }

    /// Extract the current ping and compute beam and pixel footprints.
    pub fn extract_lonlat(&mut self) -> Result<(PingRecord, &Footprint)> {
        let ping = self.extract()?;
        let (mtodeglon, mtodeglat) = coor_scale(ping.navlat);
        self.footprint.compute(
            &self.swath,
            ping.navlon,
            ping.navlat,
            ping.heading,
            mtodeglon,
            mtodeglat,
        )?;
        Ok((ping, &self.footprint))
    }

    /// Replace the current ping with `ping` and the arrays in `swath`.
    pub fn insert(&mut self, ping: &PingRecord, swath: &Swath) -> Result<()> {
        self.check(Operation::Insert)?;
        self.swath.reserve(ping.nbath, ping.namp, ping.nss)?;
        self.note_counts(ping.nbath, ping.namp, ping.nss);

        let (x, y) = self.projection.to_projected(ping.navlon, ping.navlat)?;
        let stored = PingRecord {
            navlon: x,
            navlat: y,
            ..ping.clone()
        };
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.insert(store, &stored, swath)
    }

    // Navigation and attitude

    /// Extract navigation and attitude of the current record.
    pub fn extract_nav(&mut self) -> Result<NavRecord> {
        self.check(Operation::ExtractNav)?;
        let mut nav = self.driver.extract_nav(self.store()?)?;
        let (lon, lat) = self.to_output_position(nav.navlon, nav.navlat)?;
        nav.navlon = lon;
        nav.navlat = lat;
        Ok(nav)
    }

    /// Replace navigation and attitude of the current record.
    pub fn insert_nav(&mut self, nav: &NavRecord) -> Result<()> {
        self.check(Operation::InsertNav)?;
        let (x, y) = self.projection.to_projected(nav.navlon, nav.navlat)?;
        let stored = NavRecord {
            navlon: x,
            navlat: y,
            ..nav.clone()
        };
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.insert_nav(store, &stored)
    }

    /// Transducer depth and altitude above the bottom for the current record.
    pub fn extract_altitude(&mut self) -> Result<Altitude> {
        self.check(Operation::ExtractAltitude)?;
        self.driver.extract_altitude(self.store()?)
    }

    /// Replace transducer depth and altitude of the current record.
    pub fn insert_altitude(&mut self, altitude: &Altitude) -> Result<()> {
        self.check(Operation::InsertAltitude)?;
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.insert_altitude(store, altitude)
    }

    /// Sound velocity profile held in the current record.
    pub fn extract_svp(&mut self) -> Result<SoundVelocityProfile> {
        self.check(Operation::ExtractSvp)?;
        self.driver.extract_svp(self.store()?)
    }

    /// Replace the sound velocity profile of the current record.
    pub fn insert_svp(&mut self, svp: &SoundVelocityProfile) -> Result<()> {
        self.check(Operation::InsertSvp)?;
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.insert_svp(store, svp)
    }

    // Beam-level queries

    /// Per-beam travel times and angles.
    pub fn ttimes(&self) -> Result<TravelTimes> {
        self.check(Operation::TravelTimes)?;
        self.driver.ttimes(self.store()?)
    }

    /// Bottom detection method of each beam.
    pub fn detects(&self) -> Result<Detects> {
        self.check(Operation::Detects)?;
        self.driver.detects(self.store()?)
    }

    /// Transmit pulse type of each beam.
    pub fn pulses(&self) -> Result<Pulses> {
        self.check(Operation::Pulses)?;
        self.driver.pulses(self.store()?)
    }

    /// Transmit gain, pulse length and receive gain.
    pub fn gains(&self) -> Result<Gains> {
        self.check(Operation::Gains)?;
        self.driver.gains(self.store()?)
    }

    /// Raw sidescan samples of the current record.
    pub fn extract_rawss(&self) -> Result<RawSidescan> {
        self.check(Operation::ExtractRawSidescan)?;
        self.driver.extract_rawss(self.store()?)
    }

    /// Replace the raw sidescan samples of the current record.
    pub fn insert_rawss(&mut self, rawss: &RawSidescan) -> Result<()> {
        self.check(Operation::InsertRawSidescan)?;
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.insert_rawss(store, rawss)
    }

    // Metadata queries

    /// Class of sonar that produced the data.
    pub fn sonartype(&self) -> Result<SonarType> {
        self.check(Operation::SonarType)?;
        self.driver.sonartype(self.store()?)
    }

    /// Whether sidescan values are linear or logarithmic.
    pub fn sidescantype(&self) -> Result<SidescanType> {
        self.check(Operation::SidescanType)?;
        self.driver.sidescantype(self.store()?)
    }

    /// Index of the sonar head that produced the current ping.
    pub fn sensorhead(&self) -> Result<usize> {
        self.check(Operation::SensorHead)?;
        self.driver.sensorhead(self.store()?)
    }

    /// Ping (shot) number of the current record.
    pub fn pingnumber(&self) -> Result<u32> {
        self.check(Operation::PingNumber)?;
        self.driver.pingnumber(self.store()?)
    }

    /// Line, shot and CDP numbers of the current trace.
    pub fn segynumber(&self) -> Result<SegyNumber> {
        self.check(Operation::SegyNumber)?;
        self.driver.segynumber(self.store()?)
    }

    // Store-level operations

    /// Run driver preprocessing on the current record.
    pub fn preprocess(
        &mut self,
        platform: Option<&PlatformModel>,
        params: &PreprocessParams,
    ) -> Result<()> {
        self.check(Operation::Preprocess)?;
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.preprocess(store, platform, params)
    }

    /// Platform model carried by the current record.
    pub fn extract_platform(&self) -> Result<(DataKind, PlatformModel)> {
        self.check(Operation::ExtractPlatform)?;
        self.driver.extract_platform(self.store()?)
    }

    /// Deep copy of the current record in a fresh store of the same driver.
    pub fn copy_record(&self) -> Result<Box<dyn FormatStore>> {
        self.check(Operation::CopyRecord)?;
        let src = self.store()?;
        let mut dst = self.driver.alloc_store()?;
        self.driver.copy_record(src, dst.as_mut())?;
        Ok(dst)
    }

    /// Replace the current record with a copy of `src`.
    ///
    /// `src` must come from a session with the same driver, for example
    /// through [`copy_record`](Self::copy_record).
    pub fn load_record(&mut self, src: &dyn FormatStore) -> Result<()> {
        self.check(Operation::CopyRecord)?;
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.copy_record(src, store)
    }

    // SEGY access

    /// Header of the current trace.
    pub fn extract_segy_header(&self) -> Result<TraceHeader> {
        self.check(Operation::ExtractSegyHeader)?;
        self.driver.extract_segy_header(self.store()?)
    }

    /// Header and samples of the current trace.
    pub fn extract_segy(&self) -> Result<SegyTraceView<'_>> {
        self.check(Operation::ExtractSegy)?;
        self.driver.extract_segy(self.store()?)
    }

    /// Replace the current trace.
    pub fn insert_segy(&mut self, header: &TraceHeader, samples: &[f32]) -> Result<()> {
        self.check(Operation::InsertSegy)?;
        let store = self.store.as_deref_mut().ok_or_else(released)?;
        self.driver.insert_segy(store, header, samples)
    }

    /// Flush output, release the driver store and close the stream.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        let flushed = match &mut self.stream {
            SessionStream::Write(writer) => writer
                .flush()
                .map_err(|e| MbError::from_write(e, "session flush")),
            SessionStream::Read(_) => Ok(()),
        };
        let freed = match self.store.take() {
            Some(store) if self.driver.descriptor().supports(Operation::FreeState) => {
                self.driver.free_store(store)
            }
            Some(store) => {
                drop(store);
                Ok(())
            }
            None => Ok(()),
        };
        tracing::debug!(
            path = %self.path,
            beams_bath_max = self.beams_bath_max,
            pixels_ss_max = self.pixels_ss_max,
            "closed session"
        );
        flushed.and(freed)
    }
}

fn released() -> MbError {
    MbError::bad_descriptor("session store has been released")
}

impl Drop for MbioSession {
    fn drop(&mut self) {
        if self.store.is_some() {
            tracing::warn!(path = %self.path, "session dropped without close");
            if let Err(e) = self.release() {
                tracing::warn!(path = %self.path, error = %e, "release on drop failed");
            }
        }
    }
}

impl std::fmt::Debug for MbioSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MbioSession")
            .field("path", &self.path)
            .field("format", &self.driver.descriptor().name)
            .field("stream", &self.stream)
            .field("lonflip", &self.lonflip)
            .field("projection", &self.projection)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}
