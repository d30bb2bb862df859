// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use super::parser::parse_capability_xml;
use super::CapabilityModel;
use crate::diagnostics::Diagnostics;
use crate::error::Result;

pub struct CapabilityReader;

impl CapabilityReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(
        &self,
        path: P,
        diagnostics: &mut Diagnostics,
    ) -> Result<CapabilityModel> {
        let path_str = path.as_ref().display().to_string();
        log::info!("Loading signal configuration: {path_str}");

        let content = fs::read_to_string(path)?;
        log::debug!("Signal configuration size: {} bytes", content.len());

        let model = parse_capability_xml(&content, diagnostics)?;

        let placements = model.signal_to_pin_map.iter().count();
        log::info!(
            "Parsed {} peripheral types, {} peripherals, {} functional properties",
            model.peripheral_types.len(),
            model.peripherals.len(),
            model.functional_properties.len()
        );
        log::info!(
            "Pin map: {} peripherals, {placements} placements",
            model.signal_to_pin_map.len()
        );

        Ok(model)
    }
}

impl Default for CapabilityReader {
    fn default() -> Self {
        Self::new()
    }
}
