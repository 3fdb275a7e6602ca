// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Writer for platform definition files.
//!
//! Output is aligned in columns and annotated with `##` comments naming
//! sensor types, capability bits and axis units. A written file reads
//! back to an equal model.

use std::fmt::Write as _;
use std::path::Path;

use crate::core::{MbError, Result, TimeParts};

use super::model::PlatformModel;
use super::sensor::{OffsetMode, Sensor, TimeLatency};

impl PlatformModel {
    /// Write the model to a platform definition file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_definition_string())
            .map_err(|e| MbError::write_failed(path.display().to_string(), e.to_string()))?;
        tracing::debug!(
            path = %path.display(),
            sensors = self.num_sensors(),
            "wrote platform definition"
        );
        Ok(())
    }

    /// Render the model as platform definition text.
    pub fn to_definition_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut out);
        out
    }

    fn render(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "## MB-System Platform Definition File")?;
        writeln!(out, "MB-SYSTEM_VERSION        {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "FILE_VERSION             1.00")?;
        writeln!(
            out,
            "ORIGIN                   Generated by {} at <{}>",
            env!("CARGO_PKG_NAME"),
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
        )?;
        writeln!(out, "##")?;
        writeln!(
            out,
            "PLATFORM_TYPE            {}  ## {}",
            self.platform_type.code(),
            self.platform_type
        )?;
        writeln!(out, "PLATFORM_NAME            {}", self.name)?;
        writeln!(out, "PLATFORM_ORGANIZATION    {}", self.organization)?;
        writeln!(out, "DOCUMENTATION_URL        {}", self.documentation_url)?;
        writeln!(out, "##")?;
        writeln!(
            out,
            "START_TIME_D             {:.6}  ## {}",
            self.start_time_d,
            format_time_parts(&self.start_time_i)
        )?;
        writeln!(
            out,
            "END_TIME_D               {:.6}  ## {}",
            self.end_time_d,
            format_time_parts(&self.end_time_i)
        )?;
        writeln!(out, "##")?;
        writeln!(out, "PLATFORM_NUM_SENSORS     {}", self.sensors.len())?;
        writeln!(out, "##")?;

        writeln!(out, "## Defined data source sensors:")?;
        for (channel, slot, sensor) in self.sources.iter() {
            if let Some(sensor) = sensor {
                let key = format!("SOURCE_{}{}", channel.keyword(), slot_suffix(slot));
                writeln!(out, "{key:<25}{sensor}")?;
            }
        }
        writeln!(out, "##")?;
        writeln!(out, "## Undefined data sources:")?;
        for (channel, slot, sensor) in self.sources.iter() {
            if sensor.is_none() {
                writeln!(out, "  ## SOURCE_{}{}", channel.keyword(), slot_suffix(slot))?;
            }
        }
        writeln!(out, "##")?;

        writeln!(out, "## Sensor list:")?;
        for (index, sensor) in self.sensors.iter().enumerate() {
            writeln!(out, "##")?;
            render_sensor(out, index, sensor)?;
        }
        writeln!(out, "##")
    }
}

fn render_sensor(out: &mut String, index: usize, sensor: &Sensor) -> std::fmt::Result {
    writeln!(
        out,
        "SENSOR_TYPE               {index:2}  {:3}  ## {}",
        sensor.sensor_type.code(),
        sensor.sensor_type
    )?;
    writeln!(out, "SENSOR_MODEL                {index:2}  {}", sensor.model)?;
    writeln!(out, "SENSOR_MANUFACTURER         {index:2}  {}", sensor.manufacturer)?;
    writeln!(out, "SENSOR_SERIALNUMBER         {index:2}  {}", sensor.serial_number)?;

    write!(out, "SENSOR_CAPABILITY1          {index:2}  {:10}  ##", sensor.capability1.bits())?;
    for name in sensor.capability1.names() {
        write!(out, " {name}")?;
    }
    writeln!(out)?;
    write!(out, "SENSOR_CAPABILITY2          {index:2}  {:10}  ##", sensor.capability2.bits())?;
    for name in sensor.capability2.names() {
        write!(out, " {name}")?;
    }
    writeln!(out)?;

    writeln!(out, "SENSOR_NUM_OFFSETS          {index:2}  {:2}", sensor.offsets.len())?;
    for (j, offset) in sensor.offsets.iter().enumerate() {
        if offset.position_mode == OffsetMode::Static {
            let [x, y, z] = offset.position;
            writeln!(
                out,
                "OFFSET_POSITION             {index:2}      {j:2}  {x:10.6}  {y:10.6}  {z:10.6} ## Starboard, Forward, Up (meters)"
            )?;
        }
        if offset.attitude_mode == OffsetMode::Static {
            let a = offset.attitude;
            writeln!(
                out,
                "OFFSET_ATTITUDE             {index:2}      {j:2}  {:10.6}  {:10.6}  {:10.6} ## Heading, Roll, Pitch (degrees)",
                a.heading, a.roll, a.pitch
            )?;
        }
    }

    match &sensor.time_latency {
        TimeLatency::None => {}
        TimeLatency::Static(latency) => {
            writeln!(
                out,
                "SENSOR_TIME_LATENCY_STATIC  {index:2}      {latency:10.6}  ## Seconds"
            )?;
        }
        TimeLatency::Model(points) => {
            writeln!(out, "SENSOR_TIME_LATENCY_MODEL   {index:2}      {:2}", points.len())?;
            for (time_d, latency) in points {
                writeln!(
                    out,
                    "{:37}{time_d:10.6}  {latency:10.6}  ## Seconds, Seconds",
                    ""
                )?;
            }
        }
    }
    Ok(())
}

fn slot_suffix(slot: usize) -> String {
    if slot == 0 {
        String::new()
    } else {
        slot.to_string()
    }
}

fn format_time_parts(t: &TimeParts) -> String {
    format!(
        "{:04}/{:02}/{:02} {:02}:{:02}:{:02}.{:06}",
        t[0], t[1], t[2], t[3], t[4], t[5], t[6]
    )
}
