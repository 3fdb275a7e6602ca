// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format driver contract.
//!
//! A format is supported by implementing [`FormatDriver`]. The driver
//! describes itself with a [`FormatDescriptor`], whose [`OperationSet`]
//! lists exactly which operations it implements. Every operation method
//! has a default body returning `CapabilityUnsupported`, so a driver only
//! overrides what it lists.
//!
//! Per-stream state lives in a [`FormatStore`] allocated by the driver.
//! Sessions hold it as `Box<dyn FormatStore>` and never look inside; the
//! driver recovers its concrete type with [`downcast_store`].
//!
//! # Example
//!
//! ```no_run
//! use sonarcodec::io::traits::{FormatDriver, Operation};
//!
//! fn describe(driver: &dyn FormatDriver) {
//!     let descriptor = driver.descriptor();
//!     println!("{} ({})", descriptor.name, descriptor.id);
//!     for op in Operation::ALL {
//!         if descriptor.operations.contains(op) {
//!             println!("  {}", op.name());
//!         }
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::io::{Read, Write};

use crate::core::{DataKind, MbError, Result};
use crate::io::formats::segy::TraceHeader;
use crate::platform::PlatformModel;

use super::metadata::{
    Altitude, Detects, Gains, NavRecord, PingRecord, PreprocessParams, Pulses, RawSidescan,
    SegyNumber, SegyTraceView, SidescanType, SonarType, SoundVelocityProfile, TravelTimes,
};
use super::swath::Swath;

/// Operation slots a driver may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Operation {
    AllocState,
    FreeState,
    ReadPing,
    WritePing,
    Extract,
    Insert,
    ExtractNav,
    InsertNav,
    ExtractAltitude,
    InsertAltitude,
    ExtractSvp,
    InsertSvp,
    TravelTimes,
    Detects,
    Pulses,
    Gains,
    ExtractRawSidescan,
    InsertRawSidescan,
    SonarType,
    SidescanType,
    SensorHead,
    Preprocess,
    ExtractPlatform,
    PingNumber,
    SegyNumber,
    CopyRecord,
    ExtractSegyHeader,
    ExtractSegy,
    InsertSegy,
}

impl Operation {
    /// Every operation slot, in table order.
    pub const ALL: [Operation; 29] = [
        Operation::AllocState,
        Operation::FreeState,
        Operation::ReadPing,
        Operation::WritePing,
        Operation::Extract,
        Operation::Insert,
        Operation::ExtractNav,
        Operation::InsertNav,
        Operation::ExtractAltitude,
        Operation::InsertAltitude,
        Operation::ExtractSvp,
        Operation::InsertSvp,
        Operation::TravelTimes,
        Operation::Detects,
        Operation::Pulses,
        Operation::Gains,
        Operation::ExtractRawSidescan,
        Operation::InsertRawSidescan,
        Operation::SonarType,
        Operation::SidescanType,
        Operation::SensorHead,
        Operation::Preprocess,
        Operation::ExtractPlatform,
        Operation::PingNumber,
        Operation::SegyNumber,
        Operation::CopyRecord,
        Operation::ExtractSegyHeader,
        Operation::ExtractSegy,
        Operation::InsertSegy,
    ];

    /// Name used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AllocState => "alloc_state",
            Operation::FreeState => "free_state",
            Operation::ReadPing => "read_ping",
            Operation::WritePing => "write_ping",
            Operation::Extract => "extract",
            Operation::Insert => "insert",
            Operation::ExtractNav => "extract_nav",
            Operation::InsertNav => "insert_nav",
            Operation::ExtractAltitude => "extract_altitude",
            Operation::InsertAltitude => "insert_altitude",
            Operation::ExtractSvp => "extract_svp",
            Operation::InsertSvp => "insert_svp",
            Operation::TravelTimes => "ttimes",
            Operation::Detects => "detects",
            Operation::Pulses => "pulses",
            Operation::Gains => "gains",
            Operation::ExtractRawSidescan => "extract_rawss",
            Operation::InsertRawSidescan => "insert_rawss",
            Operation::SonarType => "sonartype",
            Operation::SidescanType => "sidescantype",
            Operation::SensorHead => "sensorhead",
            Operation::Preprocess => "preprocess",
            Operation::ExtractPlatform => "extract_platform",
            Operation::PingNumber => "pingnumber",
            Operation::SegyNumber => "segynumber",
            Operation::CopyRecord => "copy_record",
            Operation::ExtractSegyHeader => "extract_segy_header",
            Operation::ExtractSegy => "extract_segy",
            Operation::InsertSegy => "insert_segy",
        }
    }

    const fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of operations a driver implements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OperationSet(u64);

impl OperationSet {
    /// The empty set.
    pub const fn empty() -> Self {
        OperationSet(0)
    }

    /// Build a set from a list of operations.
    pub const fn of(ops: &[Operation]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < ops.len() {
            bits |= ops[i].bit();
            i += 1;
        }
        OperationSet(bits)
    }

    /// Return this set with `op` added.
    pub const fn with(self, op: Operation) -> Self {
        OperationSet(self.0 | op.bit())
    }

    /// Check if `op` is in the set.
    pub const fn contains(&self, op: Operation) -> bool {
        self.0 & op.bit() != 0
    }

    /// Number of operations in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the operations in the set, in table order.
    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        Operation::ALL.into_iter().filter(|op| self.contains(*op))
    }
}

impl fmt::Debug for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|op| op.name())).finish()
    }
}

/// Static description of a format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatDescriptor {
    /// Numeric format id
    pub id: i32,
    /// Short name, e.g. `"SEGYSEGY"`
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Largest bathymetry beam count the format can carry
    pub beams_bath_max: usize,
    /// Largest amplitude beam count the format can carry
    pub beams_amp_max: usize,
    /// Largest sidescan pixel count the format can carry
    pub pixels_ss_max: usize,
    /// Beam count varies from ping to ping
    pub variable_beams: bool,
    /// Format carries travel times
    pub traveltime: bool,
    /// Format carries beam flags
    pub beam_flagging: bool,
    /// Record kind carrying platform installation data
    pub platform_source: DataKind,
    /// Record kind carrying navigation
    pub nav_source: DataKind,
    /// Record kind carrying sensor depth
    pub sensordepth_source: DataKind,
    /// Record kind carrying heading
    pub heading_source: DataKind,
    /// Record kind carrying attitude
    pub attitude_source: DataKind,
    /// Record kind carrying sound velocity profiles
    pub svp_source: DataKind,
    /// Nominal across-track beam width in degrees
    pub beamwidth_xtrack: f64,
    /// Nominal along-track beam width in degrees
    pub beamwidth_ltrack: f64,
    /// Implemented operations
    pub operations: OperationSet,
}

impl FormatDescriptor {
    /// The error returned for an operation this format does not implement.
    pub fn unsupported(&self, op: Operation) -> MbError {
        MbError::capability_unsupported(self.name, op.name())
    }

    /// Check if the format implements `op`.
    pub fn supports(&self, op: Operation) -> bool {
        self.operations.contains(op)
    }
}

/// Opaque per-stream state owned by a session and interpreted by one driver.
pub trait FormatStore: Any + Send + fmt::Debug {
    /// Id of the format whose driver allocated this store.
    fn format_id(&self) -> i32;

    /// Kind of the record currently held.
    fn kind(&self) -> DataKind;

    /// Downcast to `Any`.
    fn as_any(&self) -> &dyn Any;

    /// Downcast mutably to `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Recover a driver's concrete store type.
///
/// A store from another driver yields `BadDescriptor`.
pub fn downcast_store<'a, T: 'static>(store: &'a dyn FormatStore, format: &str) -> Result<&'a T> {
    store.as_any().downcast_ref::<T>().ok_or_else(|| {
        MbError::bad_descriptor(format!(
            "store of format {} is not a {format} store",
            store.format_id()
        ))
    })
}

/// Mutable variant of [`downcast_store`].
pub fn downcast_store_mut<'a, T: 'static>(
    store: &'a mut dyn FormatStore,
    format: &str,
) -> Result<&'a mut T> {
    let id = store.format_id();
    store.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
        MbError::bad_descriptor(format!("store of format {id} is not a {format} store"))
    })
}

/// A format driver.
///
/// Only the methods whose [`Operation`] appears in the descriptor's
/// [`OperationSet`] are overridden; the rest fall through to
/// `CapabilityUnsupported`.
pub trait FormatDriver: Send + Sync {
    /// Static description of the format.
    fn descriptor(&self) -> &FormatDescriptor;

    /// Allocate a fresh store for one stream.
    fn alloc_store(&self) -> Result<Box<dyn FormatStore>> {
        Err(self.descriptor().unsupported(Operation::AllocState))
    }

    /// Release a store. Dropping it is enough for most drivers.
    fn free_store(&self, store: Box<dyn FormatStore>) -> Result<()> {
        drop(store);
        Ok(())
    }

    /// Read the next record into the store and return its kind.
    fn read_ping(&self, _reader: &mut dyn Read, _store: &mut dyn FormatStore) -> Result<DataKind> {
        Err(self.descriptor().unsupported(Operation::ReadPing))
    }

    /// Write the record held in the store.
    fn write_ping(&self, _writer: &mut dyn Write, _store: &mut dyn FormatStore) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::WritePing))
    }

    /// Copy the current ping's scalars into a [`PingRecord`] and its arrays into `swath`.
    fn extract(&self, _store: &dyn FormatStore, _swath: &mut Swath) -> Result<PingRecord> {
        Err(self.descriptor().unsupported(Operation::Extract))
    }

    /// Replace the current ping with `ping` and `swath`.
    fn insert(&self, _store: &mut dyn FormatStore, _ping: &PingRecord, _swath: &Swath) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::Insert))
    }

    fn extract_nav(&self, _store: &dyn FormatStore) -> Result<NavRecord> {
        Err(self.descriptor().unsupported(Operation::ExtractNav))
    }

    fn insert_nav(&self, _store: &mut dyn FormatStore, _nav: &NavRecord) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::InsertNav))
    }

    fn extract_altitude(&self, _store: &dyn FormatStore) -> Result<Altitude> {
        Err(self.descriptor().unsupported(Operation::ExtractAltitude))
    }

    fn insert_altitude(&self, _store: &mut dyn FormatStore, _altitude: &Altitude) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::InsertAltitude))
    }

    fn extract_svp(&self, _store: &dyn FormatStore) -> Result<SoundVelocityProfile> {
        Err(self.descriptor().unsupported(Operation::ExtractSvp))
    }

    fn insert_svp(&self, _store: &mut dyn FormatStore, _svp: &SoundVelocityProfile) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::InsertSvp))
    }

    fn ttimes(&self, _store: &dyn FormatStore) -> Result<TravelTimes> {
        Err(self.descriptor().unsupported(Operation::TravelTimes))
    }

    fn detects(&self, _store: &dyn FormatStore) -> Result<Detects> {
        Err(self.descriptor().unsupported(Operation::Detects))
    }

    fn pulses(&self, _store: &dyn FormatStore) -> Result<Pulses> {
        Err(self.descriptor().unsupported(Operation::Pulses))
    }

    fn gains(&self, _store: &dyn FormatStore) -> Result<Gains> {
        Err(self.descriptor().unsupported(Operation::Gains))
    }

    fn extract_rawss(&self, _store: &dyn FormatStore) -> Result<RawSidescan> {
        Err(self.descriptor().unsupported(Operation::ExtractRawSidescan))
    }

    fn insert_rawss(&self, _store: &mut dyn FormatStore, _rawss: &RawSidescan) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::InsertRawSidescan))
    }

    fn sonartype(&self, _store: &dyn FormatStore) -> Result<SonarType> {
        Err(self.descriptor().unsupported(Operation::SonarType))
    }

    fn sidescantype(&self, _store: &dyn FormatStore) -> Result<SidescanType> {
        Err(self.descriptor().unsupported(Operation::SidescanType))
    }

    /// Index of the sonar head that produced the current ping.
    fn sensorhead(&self, _store: &dyn FormatStore) -> Result<usize> {
        Err(self.descriptor().unsupported(Operation::SensorHead))
    }

    /// Apply ancillary data and corrections to the current record.
    fn preprocess(
        &self,
        _store: &mut dyn FormatStore,
        _platform: Option<&PlatformModel>,
        _params: &PreprocessParams,
    ) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::Preprocess))
    }

    /// Build a platform model from installation data in the current record.
    fn extract_platform(&self, _store: &dyn FormatStore) -> Result<(DataKind, PlatformModel)> {
        Err(self.descriptor().unsupported(Operation::ExtractPlatform))
    }

    fn pingnumber(&self, _store: &dyn FormatStore) -> Result<u32> {
        Err(self.descriptor().unsupported(Operation::PingNumber))
    }

    fn segynumber(&self, _store: &dyn FormatStore) -> Result<SegyNumber> {
        Err(self.descriptor().unsupported(Operation::SegyNumber))
    }

    /// Deep-copy `src` into `dst`. Both must belong to this driver.
    fn copy_record(&self, _src: &dyn FormatStore, _dst: &mut dyn FormatStore) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::CopyRecord))
    }

    fn extract_segy_header(&self, _store: &dyn FormatStore) -> Result<TraceHeader> {
        Err(self.descriptor().unsupported(Operation::ExtractSegyHeader))
    }

    fn extract_segy<'a>(&self, _store: &'a dyn FormatStore) -> Result<SegyTraceView<'a>> {
        Err(self.descriptor().unsupported(Operation::ExtractSegy))
    }

    fn insert_segy(
        &self,
        _store: &mut dyn FormatStore,
        _header: &TraceHeader,
        _samples: &[f32],
    ) -> Result<()> {
        Err(self.descriptor().unsupported(Operation::InsertSegy))
    }
}

impl fmt::Debug for dyn FormatDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.descriptor();
        f.debug_struct("FormatDriver")
            .field("id", &d.id)
            .field("name", &d.name)
            .finish()
    }
}
