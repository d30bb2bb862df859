// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Two-level grouping of resolved pins: by peripheral, then by electrical
//! signature within a peripheral. Both levels keep first-seen order.

use indexmap::IndexMap;
use serde::Serialize;

use crate::board::ElectricalSignature;
use crate::resolve::ResolvedPinEntry;

/// Resolved pins keyed by peripheral id.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PeripheralGroups {
    groups: IndexMap<String, Vec<ResolvedPinEntry>>,
}

impl PeripheralGroups {
    pub fn from_entries(entries: impl IntoIterator<Item = ResolvedPinEntry>) -> Self {
        let mut groups: IndexMap<String, Vec<ResolvedPinEntry>> = IndexMap::new();
        for entry in entries {
            groups.entry(entry.peripheral.clone()).or_default().push(entry);
        }
        Self { groups }
    }

    pub fn get(&self, peripheral: &str) -> Option<&[ResolvedPinEntry]> {
        self.groups.get(peripheral).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ResolvedPinEntry])> {
        self.groups
            .iter()
            .map(|(peripheral, entries)| (peripheral.as_str(), entries.as_slice()))
    }

    pub fn peripherals(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Every entry, peripheral by peripheral.
    pub fn entries(&self) -> impl Iterator<Item = &ResolvedPinEntry> {
        self.groups.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Pins of one peripheral that share an electrical signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectricalSubGroup<'a> {
    /// 1-based position among the signatures of the peripheral.
    pub index: usize,
    pub signature: &'a ElectricalSignature,
    pub entries: Vec<&'a ResolvedPinEntry>,
}

pub fn electrical_subgroups(entries: &[ResolvedPinEntry]) -> Vec<ElectricalSubGroup<'_>> {
    let mut by_signature: IndexMap<&ElectricalSignature, Vec<&ResolvedPinEntry>> = IndexMap::new();
    for entry in entries {
        by_signature.entry(&entry.electrical).or_default().push(entry);
    }

    by_signature
        .into_iter()
        .enumerate()
        .map(|(i, (signature, entries))| ElectricalSubGroup {
            index: i + 1,
            signature,
            entries,
        })
        .collect()
}
