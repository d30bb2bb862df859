// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Hard failures that abort a synthesis run.
//!
//! Anything recoverable is recorded in [`crate::diagnostics::Diagnostics`]
//! instead; an `Error` always means no artifact is produced.

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed signal configuration XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("peripheral {peripheral} references unknown peripheral type {peripheral_type}")]
    UnknownPeripheralType {
        peripheral: String,
        peripheral_type: String,
    },
    #[error("duplicate peripheral {0} in peripherals registry")]
    DuplicatePeripheral(String),
    #[error("malformed pin name `{name}` or description `{description}`")]
    MalformedPin { name: String, description: String },
    #[error("{0}")]
    PinConflicts(PinConflicts),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Short class name used when reporting a failed run.
    pub fn class(&self) -> &'static str {
        match self {
            Error::Xml(_)
            | Error::MissingAttribute { .. }
            | Error::UnknownPeripheralType { .. }
            | Error::DuplicatePeripheral(_)
            | Error::MalformedPin { .. } => "structural",
            Error::PinConflicts(_) => "validation",
            Error::Io(_) | Error::Json(_) | Error::Csv(_) => "input/output",
        }
    }
}

/// A physical pin claimed by two different signals in the board mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinConflict {
    pub pin: String,
    pub first_signal: String,
    pub second_signal: String,
}

impl fmt::Display for PinConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pin {} is assigned to both '{}' and '{}'",
            self.pin, self.first_signal, self.second_signal
        )
    }
}

/// Every conflict found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinConflicts(pub Vec<PinConflict>);

impl PinConflicts {
    pub fn iter(&self) -> std::slice::Iter<'_, PinConflict> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PinConflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pin conflict(s) in board mapping", self.0.len())?;
        for conflict in &self.0 {
            write!(f, "; {conflict}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_lists_every_pin() {
        let conflicts = PinConflicts(vec![
            PinConflict {
                pin: "PTB16".to_string(),
                first_signal: "UART0_RX".to_string(),
                second_signal: "I2C0_SDA".to_string(),
            },
            PinConflict {
                pin: "PTA1".to_string(),
                first_signal: "GPIOA_LED".to_string(),
                second_signal: "FTM0_CH6".to_string(),
            },
        ]);
        let message = Error::PinConflicts(conflicts).to_string();

        assert!(message.starts_with("2 pin conflict(s)"));
        assert!(message.contains("pin PTB16 is assigned to both 'UART0_RX' and 'I2C0_SDA'"));
        assert!(message.contains("pin PTA1 is assigned to both 'GPIOA_LED' and 'FTM0_CH6'"));
    }

    #[test]
    fn test_error_class() {
        assert_eq!(Error::DuplicatePeripheral("UART0".into()).class(), "structural");
        assert_eq!(Error::PinConflicts(PinConflicts(Vec::new())).class(), "validation");
    }
}
