// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Builder pattern and configuration for opening sessions.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{MbError, Result};
use crate::geo::{LonFlip, Projection, ProjectionState};
use crate::io::detection::{detect_format, detect_from_extension};
use crate::io::registry::register;

use super::{MbioSession, SessionStream};

/// Session options, loadable from TOML.
///
/// ```
/// use sonarcodec::geo::LonFlip;
/// use sonarcodec::io::SessionConfig;
///
/// let config = SessionConfig::from_toml_str("lonflip = \"negative\"\nformat = 160").unwrap();
/// assert_eq!(config.lonflip, LonFlip::Negative);
/// assert_eq!(config.format, Some(160));
/// assert_eq!(config.initial_beams, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Longitude normalization policy
    pub lonflip: LonFlip,
    /// Format id; detected from the file when unset
    pub format: Option<i32>,
    /// Bathymetry and amplitude beams to reserve up front
    pub initial_beams: usize,
    /// Sidescan pixels to reserve up front
    pub initial_pixels: usize,
}

impl SessionConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MbError::parse("session config", e.to_string()))
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MbError::open_failed(path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Serialize the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| MbError::parse("session config", e.to_string()))
    }
}

/// Builder for opening sessions.
#[derive(Default)]
pub struct SessionBuilder {
    config: SessionConfig,
    projection: Option<Box<dyn Projection>>,
}

impl SessionBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SessionConfig) -> Self {
        Self {
            config,
            projection: None,
        }
    }

    /// Set the longitude normalization policy.
    pub fn lonflip(mut self, lonflip: LonFlip) -> Self {
        self.config.lonflip = lonflip;
        self
    }

    /// Set the format id instead of detecting it.
    pub fn format(mut self, format_id: i32) -> Self {
        self.config.format = Some(format_id);
        self
    }

    /// Reserve room for this many beams up front.
    pub fn initial_beams(mut self, beams: usize) -> Self {
        self.config.initial_beams = beams;
        self
    }

    /// Reserve room for this many sidescan pixels up front.
    pub fn initial_pixels(mut self, pixels: usize) -> Self {
        self.config.initial_pixels = pixels;
        self
    }

    /// Activate a projection for the session.
    pub fn projection(mut self, projection: Box<dyn Projection>) -> Self {
        self.projection = Some(projection);
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Open a file for reading.
    pub fn open_read<P: AsRef<Path>>(self, path: P) -> Result<MbioSession> {
        let path = path.as_ref();
        let format_id = match self.config.format {
            Some(id) => id,
            None => detect_format(path)?
                .map(|id| id.code())
                .ok_or_else(|| {
                    MbError::bad_parameter(
                        "SessionBuilder",
                        format!("cannot detect format of '{}'", path.display()),
                    )
                })?,
        };
        let file = File::open(path)
            .map_err(|e| MbError::open_failed(path.display().to_string(), e.to_string()))?;
        self.build(
            path.display().to_string(),
            format_id,
            SessionStream::Read(Box::new(BufReader::new(file))),
        )
    }

    /// Create a file for writing.
    pub fn open_write<P: AsRef<Path>>(self, path: P) -> Result<MbioSession> {
        let path = path.as_ref();
        let format_id = match self.config.format {
            Some(id) => id,
            None => detect_from_extension(path)
                .map(|id| id.code())
                .ok_or_else(|| {
                    MbError::bad_parameter(
                        "SessionBuilder",
                        format!("cannot infer format of '{}'", path.display()),
                    )
                })?,
        };
        let file = File::create(path)
            .map_err(|e| MbError::open_failed(path.display().to_string(), e.to_string()))?;
        self.build(
            path.display().to_string(),
            format_id,
            SessionStream::Write(Box::new(BufWriter::new(file))),
        )
    }

    /// Read from an arbitrary stream. The format must be set.
    pub fn read_from<R: Read + Send + 'static>(self, reader: R) -> Result<MbioSession> {
        let format_id = self.require_format()?;
        self.build("<stream>", format_id, SessionStream::Read(Box::new(reader)))
    }

    /// Write to an arbitrary stream. The format must be set.
    pub fn write_to<W: Write + Send + 'static>(self, writer: W) -> Result<MbioSession> {
        let format_id = self.require_format()?;
        self.build("<stream>", format_id, SessionStream::Write(Box::new(writer)))
    }

    fn require_format(&self) -> Result<i32> {
        self.config
            .format
            .ok_or_else(|| MbError::bad_parameter("SessionBuilder", "format is not set"))
    }

    fn build(
        self,
        label: impl Into<String>,
        format_id: i32,
        stream: SessionStream,
    ) -> Result<MbioSession> {
        let driver = register(format_id)?;
        let projection = match self.projection {
            Some(p) => ProjectionState::Active(p),
            None => ProjectionState::Inactive,
        };
        let mut session = MbioSession::new(label, stream, driver, self.config.lonflip, projection)?;
        session.reserve(
            self.config.initial_beams,
            self.config.initial_beams,
            self.config.initial_pixels,
        )?;
        Ok(session)
    }
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("projection", &self.projection.as_ref().map(|p| p.name()))
            .finish()
    }
}
