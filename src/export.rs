// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Intermediate registries written next to the generated source so they can
//! be inspected without re-running synthesis.

use csv::Writer;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::capability::{CapabilityModel, PinPlacement, SignalToPinMap};
use crate::error::Result;
use crate::group::PeripheralGroups;

#[derive(Debug, Serialize)]
pub struct PlacementCsvRecord {
    #[serde(rename = "Peripheral")]
    pub peripheral: String,
    #[serde(rename = "Signal")]
    pub signal: String,
    #[serde(rename = "Pin")]
    pub pin: String,
    #[serde(rename = "Routable")]
    pub routable: bool,
    #[serde(rename = "Mux")]
    pub mux: String,
    #[serde(rename = "PCR")]
    pub pcr: String,
    #[serde(rename = "PackageFunction")]
    pub package_function: String,
    #[serde(rename = "Coords")]
    pub coords: String,
    #[serde(rename = "Function")]
    pub function: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Convert a PinPlacement to a PlacementCsvRecord
fn placement_to_csv_record(placement: &PinPlacement) -> PlacementCsvRecord {
    PlacementCsvRecord {
        peripheral: placement.peripheral.clone(),
        signal: placement.signal.clone(),
        pin: placement.base_pin.clone(),
        routable: placement.is_routable,
        mux: placement.mux.to_string(),
        pcr: crate::capability::pin_map::pcr_address(&placement.base_pin)
            .map(|addr| format!("0x{addr:08X}"))
            .unwrap_or_default(),
        package_function: placement.package_function.clone(),
        coords: placement.coords.clone(),
        function: placement.func_label.clone().unwrap_or_default(),
        description: placement.description.clone(),
    }
}

/// Export the pin map as one CSV row per placement
pub fn export_pin_map_to_csv<P: AsRef<Path>>(map: &SignalToPinMap, file_path: P) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    for placement in map.iter() {
        writer.serialize(placement_to_csv_record(placement))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write `{"<key>": value}` as pretty JSON.
pub fn export_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    key: &str,
    value: &T,
    file_path: P,
) -> Result<()> {
    let mut wrapper: IndexMap<&str, &T> = IndexMap::new();
    wrapper.insert(key, value);

    let mut writer = BufWriter::new(File::create(file_path)?);
    serde_json::to_writer_pretty(&mut writer, &wrapper)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Dump every registry plus the grouped board mapping into `dir`.
/// Returns the written paths.
pub fn export_registries<P: AsRef<Path>>(
    model: &CapabilityModel,
    groups: &PeripheralGroups,
    dir: P,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let json_path = |key: &str| dir.join(format!("{key}.json"));
    let mut written = Vec::new();

    let path = json_path("signal_to_pin_map");
    export_json("signal_to_pin_map", &model.signal_to_pin_map, &path)?;
    written.push(path);

    let path = json_path("peripherals");
    export_json("peripherals", &model.peripherals, &path)?;
    written.push(path);

    let path = json_path("peripheral_types");
    export_json("peripheral_types", &model.peripheral_types, &path)?;
    written.push(path);

    let path = json_path("functional_properties");
    export_json("functional_properties", &model.functional_properties, &path)?;
    written.push(path);

    let path = json_path("board_mapping_config");
    export_json("board_mapping_config", groups, &path)?;
    written.push(path);

    let csv_path = dir.join("signal_to_pin_map.csv");
    export_pin_map_to_csv(&model.signal_to_pin_map, &csv_path)?;
    written.push(csv_path);

    for path in &written {
        log::info!("Wrote {}", path.display());
    }
    Ok(written)
}
