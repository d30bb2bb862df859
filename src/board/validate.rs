// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Board mapping validation. Runs before resolution; any conflict stops
//! the build.

use indexmap::IndexMap;

use super::BoardConfig;
use crate::error::{Error, PinConflict, PinConflicts, Result};

/// Check that no physical pin is claimed by two different signals.
///
/// All conflicts are collected so they can be fixed in one pass. A pin
/// listed twice for the same signal is not a conflict.
pub fn validate_board_config(config: &BoardConfig) -> Result<()> {
    let mut pin_usage: IndexMap<&str, &str> = IndexMap::new();
    let mut conflicts = Vec::new();

    for entry in &config.mapping {
        match pin_usage.get(entry.pin.as_str()) {
            Some(owner) if *owner != entry.signal => conflicts.push(PinConflict {
                pin: entry.pin.clone(),
                first_signal: owner.to_string(),
                second_signal: entry.signal.clone(),
            }),
            Some(_) => {}
            None => {
                pin_usage.insert(&entry.pin, &entry.signal);
            }
        }
    }

    if conflicts.is_empty() {
        log::info!("Board configuration validation passed: no pin conflicts detected");
        Ok(())
    } else {
        for conflict in &conflicts {
            log::error!("CONFLICT: {conflict}");
        }
        Err(Error::PinConflicts(PinConflicts(conflicts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PinAssignment;

    #[test]
    fn test_distinct_pins_pass() {
        let config = BoardConfig::new(vec![
            PinAssignment::new("UART0_RX", "PTB16"),
            PinAssignment::new("UART0_TX", "PTB17"),
        ]);
        assert!(validate_board_config(&config).is_ok());
    }

    #[test]
    fn test_all_conflicts_reported() {
        let config = BoardConfig::new(vec![
            PinAssignment::new("UART0_RX", "PTB16"),
            PinAssignment::new("I2C0_SDA", "PTB16"),
            PinAssignment::new("GPIOA_LED", "PTA1"),
            PinAssignment::new("FTM0_CH6", "PTA1"),
            PinAssignment::new("SPI0_SCK", "PTB16"),
        ]);
        let Err(Error::PinConflicts(conflicts)) = validate_board_config(&config) else {
            panic!("expected pin conflicts");
        };

        assert_eq!(conflicts.len(), 3);
        let pins: Vec<_> = conflicts.iter().map(|c| c.pin.as_str()).collect();
        assert_eq!(pins, vec!["PTB16", "PTA1", "PTB16"]);
        assert_eq!(conflicts.0[2].first_signal, "UART0_RX");
        assert_eq!(conflicts.0[2].second_signal, "SPI0_SCK");
    }

    #[test]
    fn test_repeated_identical_claim_is_allowed() {
        let config = BoardConfig::new(vec![
            PinAssignment::new("UART0_RX", "PTB16"),
            PinAssignment::new("UART0_RX", "PTB16"),
        ]);
        assert!(validate_board_config(&config).is_ok());
    }
}
