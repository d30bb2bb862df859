// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Non-fatal findings collected while parsing, resolving and emitting.
//!
//! Each stage takes `&mut Diagnostics` and keeps going after pushing an
//! entry. The caller decides how to report them.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A top-level container node is absent; its registry is empty.
    MissingSection { section: &'static str },
    /// The pin map names a peripheral that the peripheral registry lacks.
    UnregisteredPeripheral { peripheral: String },
    /// A routable pin connection carries no MUX bit-field assignment.
    FixedFunctionConnection {
        pin: String,
        peripheral: String,
        signal: String,
    },
    /// A board mapping entry matched no placement under any split point.
    UnresolvedSignal { signal: String, pin: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingSection { section } => {
                write!(f, "no <{section}> section in signal configuration")
            }
            Diagnostic::UnregisteredPeripheral { peripheral } => {
                write!(f, "pin map references unregistered peripheral {peripheral}")
            }
            Diagnostic::FixedFunctionConnection {
                pin,
                peripheral,
                signal,
            } => write!(
                f,
                "connection {peripheral}.{signal} on {pin} has no MUX assignment"
            ),
            Diagnostic::UnresolvedSignal { signal, pin } => {
                write!(f, "no hardware match for {signal} on {pin}")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::trace!("diagnostic: {diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(signal, pin)` pairs that could not be resolved, in mapping order.
    pub fn unresolved(&self) -> Vec<(&str, &str)> {
        self.items
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnresolvedSignal { signal, pin } => {
                    Some((signal.as_str(), pin.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
