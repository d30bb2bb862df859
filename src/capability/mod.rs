// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Capability model of an MCU package, read from its signal configuration
//! document: which peripherals exist, what signals they carry and which
//! physical pins each signal may be routed to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mux value recorded for pins that have no port control register.
pub const FIXED_MUX: &str = "FIXED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalChannel {
    pub id: String,
    pub name: Option<String>,
    pub directions: Option<String>,
    pub modes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalDefinition {
    pub unified_ids: Option<String>,
    pub directions: Option<String>,
    pub modes: Option<String>,
    pub channels: Vec<SignalChannel>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeripheralType {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub signals: IndexMap<String, SignalDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peripheral {
    pub id: String,
    pub name: Option<String>,
    pub peripheral_type: String,
}

impl Peripheral {
    /// Signal definitions inherited from the peripheral's type.
    pub fn signals<'a>(
        &self,
        types: &'a PeripheralTypes,
    ) -> Option<&'a IndexMap<String, SignalDefinition>> {
        types.get(&self.peripheral_type).map(|t| &t.signals)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDeclaration {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalProperty {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub applicable_modes: Vec<String>,
    pub states: IndexMap<String, StateDeclaration>,
}

pub type PeripheralTypes = IndexMap<String, PeripheralType>;
pub type Peripherals = IndexMap<String, Peripheral>;
pub type FunctionalProperties = IndexMap<String, FunctionalProperty>;

/// Multiplexer selector of one placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Mux {
    /// Value of the `MUX` bit-field, e.g. `0x3`.
    Alt(String),
    /// Fixed-function pin or connection; not routable through the mux.
    Fixed,
}

impl Mux {
    pub fn selector(&self) -> Option<&str> {
        match self {
            Mux::Alt(value) => Some(value),
            Mux::Fixed => None,
        }
    }
}

impl fmt::Display for Mux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mux::Alt(value) => f.write_str(value),
            Mux::Fixed => f.write_str(FIXED_MUX),
        }
    }
}

impl From<Mux> for String {
    fn from(mux: Mux) -> Self {
        mux.to_string()
    }
}

impl From<String> for Mux {
    fn from(value: String) -> Self {
        if value == FIXED_MUX {
            Mux::Fixed
        } else {
            Mux::Alt(value)
        }
    }
}

/// One candidate physical pin for a peripheral signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinPlacement {
    pub peripheral: String,
    pub signal: String,
    /// Canonical pin name (`PTB16`), or the first label of a fixed-function pin.
    pub base_pin: String,
    pub is_routable: bool,
    pub mux: Mux,
    pub package_function: String,
    pub coords: String,
    pub func_label: Option<String>,
    pub description: String,
}

/// `peripheral -> signal -> placements`, all in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalToPinMap {
    map: IndexMap<String, IndexMap<String, Vec<PinPlacement>>>,
}

impl SignalToPinMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, placement: PinPlacement) {
        self.map
            .entry(placement.peripheral.clone())
            .or_default()
            .entry(placement.signal.clone())
            .or_default()
            .push(placement);
    }

    /// Placements of one exact signal; empty when either key is unknown.
    pub fn placements(&self, peripheral: &str, signal: &str) -> &[PinPlacement] {
        self.map
            .get(peripheral)
            .and_then(|signals| signals.get(signal))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn signals(&self, peripheral: &str) -> Option<&IndexMap<String, Vec<PinPlacement>>> {
        self.map.get(peripheral)
    }

    pub fn peripherals(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PinPlacement> {
        self.map.values().flat_map(|s| s.values()).flatten()
    }

    /// Every placement whose base pin is `pin`, across all peripherals.
    pub fn placements_for_pin<'a>(&'a self, pin: &'a str) -> impl Iterator<Item = &'a PinPlacement> {
        self.iter().filter(move |p| p.base_pin == pin)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// All registries parsed from one signal configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityModel {
    pub part_number: Option<String>,
    pub peripheral_types: PeripheralTypes,
    pub peripherals: Peripherals,
    pub functional_properties: FunctionalProperties,
    pub signal_to_pin_map: SignalToPinMap,
}

pub mod parser;
pub mod pin_map;
pub mod reader;
