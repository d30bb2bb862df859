// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Signal resolver: matches each `signal -> pin` assignment of the board
//! mapping against the pin map.
//!
//! Signal keys have no fixed boundary between peripheral and signal
//! (`ENET0_1588_TMR0` is peripheral `ENET0_1588`, signal `TMR0`), so every
//! underscore is tried as the split point, shortest peripheral first. The
//! first split that finds a placement on the chosen pin wins.

use serde::Serialize;

use crate::board::{BoardConfig, ElectricalSignature, LogicProperties, PinAssignment};
use crate::capability::{Mux, PinPlacement, SignalToPinMap};
use crate::diagnostics::{Diagnostic, Diagnostics};

/// A board mapping entry bound to a concrete hardware placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPinEntry {
    pub peripheral: String,
    /// Signal part of the key after splitting.
    pub signal: String,
    /// Pin map signal the placement was found under; differs from `signal`
    /// when the peripheral-wide fallback matched.
    pub matched_signal: String,
    pub base_pin: String,
    pub mux: Mux,
    /// The signal key as written in the board mapping.
    pub func_label: String,
    pub user_label: Option<String>,
    pub electrical: ElectricalSignature,
    pub logic: LogicProperties,
}

impl ResolvedPinEntry {
    /// Label used in pinctrl comments.
    pub fn display_label(&self) -> &str {
        match &self.user_label {
            Some(label) if !label.is_empty() => label,
            _ if !self.func_label.is_empty() => &self.func_label,
            _ => &self.base_pin,
        }
    }

    pub fn is_gpio(&self) -> bool {
        self.func_label.contains("GPIO")
    }
}

/// Candidate `(peripheral, signal)` splits in ascending peripheral length.
pub fn split_points(signal_key: &str) -> impl Iterator<Item = (&str, &str)> {
    signal_key
        .match_indices('_')
        .map(move |(i, _)| (&signal_key[..i], &signal_key[i + 1..]))
}

/// Look up a placement of `pin` for one candidate split: the exact signal
/// list first, then every signal list of the peripheral in document order.
pub fn find_placement<'a>(
    map: &'a SignalToPinMap,
    peripheral: &str,
    signal: &str,
    pin: &str,
) -> Option<&'a PinPlacement> {
    let exact = map
        .placements(peripheral, signal)
        .iter()
        .find(|p| p.base_pin == pin);
    if exact.is_some() {
        return exact;
    }

    map.signals(peripheral)?
        .values()
        .flatten()
        .find(|p| p.base_pin == pin)
}

/// Resolve one assignment, or `None` when no split point matches.
pub fn resolve_assignment(
    map: &SignalToPinMap,
    assignment: &PinAssignment,
) -> Option<ResolvedPinEntry> {
    split_points(&assignment.signal).find_map(|(peripheral, signal)| {
        let placement = find_placement(map, peripheral, signal, &assignment.pin)?;
        log::trace!(
            "{} on {} resolved to {}.{} (mux {})",
            assignment.signal,
            assignment.pin,
            placement.peripheral,
            placement.signal,
            placement.mux
        );
        Some(ResolvedPinEntry {
            peripheral: peripheral.to_string(),
            signal: signal.to_string(),
            matched_signal: placement.signal.clone(),
            base_pin: assignment.pin.clone(),
            mux: placement.mux.clone(),
            func_label: assignment.signal.clone(),
            user_label: assignment.label.clone(),
            electrical: assignment.electrical(),
            logic: assignment.logic(),
        })
    })
}

/// Resolve every assignment in mapping order. Misses are skipped and
/// recorded as [`Diagnostic::UnresolvedSignal`].
pub fn resolve_board(
    map: &SignalToPinMap,
    config: &BoardConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<ResolvedPinEntry> {
    let mut resolved = Vec::with_capacity(config.mapping.len());
    for assignment in &config.mapping {
        match resolve_assignment(map, assignment) {
            Some(entry) => resolved.push(entry),
            None => {
                log::debug!(
                    "No hardware match for {} on {}",
                    assignment.signal,
                    assignment.pin
                );
                diagnostics.push(Diagnostic::UnresolvedSignal {
                    signal: assignment.signal.clone(),
                    pin: assignment.pin.clone(),
                });
            }
        }
    }
    resolved
}
