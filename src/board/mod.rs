// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! User-authored board mapping: which signal each physical pin carries and
//! how the pin should be configured electrically and logically.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pull {
    Up,
    Down,
    #[serde(alias = "none", alias = "disabled")]
    Disable,
}

impl fmt::Display for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pull::Up => "up",
            Pull::Down => "down",
            Pull::Disable => "disable",
        })
    }
}

/// On/off electrical attribute. Accepts `true`/`false` or
/// `"enable"`/`"disable"` in the mapping file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "ToggleRepr")]
pub enum Toggle {
    Enable,
    Disable,
}

impl Toggle {
    pub fn is_enabled(self) -> bool {
        self == Toggle::Enable
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToggleRepr {
    Bool(bool),
    Text(String),
}

impl TryFrom<ToggleRepr> for Toggle {
    type Error = String;

    fn try_from(value: ToggleRepr) -> Result<Self, Self::Error> {
        match value {
            ToggleRepr::Bool(true) => Ok(Toggle::Enable),
            ToggleRepr::Bool(false) => Ok(Toggle::Disable),
            ToggleRepr::Text(text) => match text.to_ascii_lowercase().as_str() {
                "enable" | "enabled" => Ok(Toggle::Enable),
                "disable" | "disabled" => Ok(Toggle::Disable),
                _ => Err(format!(
                    "expected true, false, \"enable\" or \"disable\", found \"{text}\""
                )),
            },
        }
    }
}

/// The six electrical attributes, compared as a whole to decide whether two
/// pins can share one pinctrl sub-block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElectricalSignature {
    pub pull: Option<Pull>,
    pub drive_strength: Option<String>,
    pub slew_rate: Option<String>,
    pub open_drain: Option<Toggle>,
    pub passive_filter: Option<Toggle>,
    pub digital_filter: Option<Toggle>,
}

/// GPIO controller settings of a pin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicProperties {
    pub gpio_init_state: Option<bool>,
    /// `kPORT_Interrupt*` name; unknown names are ignored on emission.
    pub gpio_interrupt: Option<String>,
}

/// One `signal -> pin` line of the board mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAssignment {
    /// Peripheral and signal joined by `_`, e.g. `UART0_RX`.
    pub signal: String,
    pub pin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<Pull>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_strength: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slew_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_drain: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive_filter: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_filter: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpio_init_state: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpio_interrupt: Option<String>,
}

impl PinAssignment {
    pub fn new(signal: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            pin: pin.into(),
            label: None,
            pull: None,
            drive_strength: None,
            slew_rate: None,
            open_drain: None,
            passive_filter: None,
            digital_filter: None,
            gpio_init_state: None,
            gpio_interrupt: None,
        }
    }

    pub fn electrical(&self) -> ElectricalSignature {
        ElectricalSignature {
            pull: self.pull,
            drive_strength: self.drive_strength.clone(),
            slew_rate: self.slew_rate.clone(),
            open_drain: self.open_drain,
            passive_filter: self.passive_filter,
            digital_filter: self.digital_filter,
        }
    }

    pub fn logic(&self) -> LogicProperties {
        LogicProperties {
            gpio_init_state: self.gpio_init_state,
            gpio_interrupt: self.gpio_interrupt.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub mapping: Vec<PinAssignment>,
}

impl BoardConfig {
    pub fn new(mapping: Vec<PinAssignment>) -> Self {
        Self { mapping }
    }
}

pub mod reader;
pub mod validate;
