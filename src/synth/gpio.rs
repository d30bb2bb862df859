// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! GPIO controller nodes (`&gpioa`, `&gpiob`, ...) carrying the logical side
//! of GPIO pins: active level, pull flags, interrupt trigger and initial
//! output state.

use std::collections::BTreeMap;

use crate::board::Pull;
use crate::capability::pin_map::parse_port_pin;
use crate::resolve::ResolvedPinEntry;

/// Interrupt trigger kinds of the Kinetis PORT driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioInterrupt {
    RisingEdge,
    FallingEdge,
    EitherEdge,
    LogicZero,
    LogicOne,
}

impl GpioInterrupt {
    /// Parse a `kPORT_Interrupt*` name.
    pub fn from_port_name(name: &str) -> Option<Self> {
        match name {
            "kPORT_InterruptRisingEdge" => Some(Self::RisingEdge),
            "kPORT_InterruptFallingEdge" => Some(Self::FallingEdge),
            "kPORT_InterruptEitherEdge" => Some(Self::EitherEdge),
            "kPORT_InterruptLogicZero" => Some(Self::LogicZero),
            "kPORT_InterruptLogicOne" => Some(Self::LogicOne),
            _ => None,
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Self::RisingEdge => "GPIO_INT_EDGE_RISING",
            Self::FallingEdge => "GPIO_INT_EDGE_FALLING",
            Self::EitherEdge => "GPIO_INT_EDGE_BOTH",
            Self::LogicZero => "GPIO_INT_LEVEL_LOW",
            Self::LogicOne => "GPIO_INT_LEVEL_HIGH",
        }
    }
}

/// Flags of the `gpios` cell. Unknown interrupt kinds are dropped.
pub fn gpio_flags(entry: &ResolvedPinEntry) -> Vec<&'static str> {
    let mut flags = Vec::new();

    match entry.electrical.pull {
        Some(Pull::Up) => flags.push("GPIO_PULL_UP"),
        Some(Pull::Down) => flags.push("GPIO_PULL_DOWN"),
        Some(Pull::Disable) | None => {}
    }
    if let Some(interrupt) = entry
        .logic
        .gpio_interrupt
        .as_deref()
        .and_then(GpioInterrupt::from_port_name)
    {
        flags.push(interrupt.flag());
    }
    flags.push(if entry.logic.gpio_init_state == Some(false) {
        "GPIO_ACTIVE_LOW"
    } else {
        "GPIO_ACTIVE_HIGH"
    });

    flags
}

/// Lower-cased user label, or `pin_<index>` when the label is missing or blank.
fn node_name(entry: &ResolvedPinEntry, index: u32) -> String {
    entry
        .user_label
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("pin_{index}"))
        .to_lowercase()
        .replace(' ', "_")
}

/// GPIO entries bucketed by lower-case port letter, ports sorted.
fn port_groups<'a>(
    entries: impl IntoIterator<Item = &'a ResolvedPinEntry>,
) -> BTreeMap<char, Vec<(u32, &'a ResolvedPinEntry)>> {
    let mut ports: BTreeMap<char, Vec<(u32, &ResolvedPinEntry)>> = BTreeMap::new();
    for entry in entries {
        if !entry.is_gpio() {
            continue;
        }
        let Some((port, index)) = parse_port_pin(&entry.base_pin) else {
            continue;
        };
        ports
            .entry(port.to_ascii_lowercase())
            .or_default()
            .push((index, entry));
    }
    ports
}

/// One block per GPIO port, in port order; empty when no GPIO pin resolved.
pub fn emit_gpio_nodes<'a>(entries: impl IntoIterator<Item = &'a ResolvedPinEntry>) -> Vec<String> {
    port_groups(entries)
        .into_iter()
        .map(|(port, pins)| {
            let mut out = vec![format!("&gpio{port} {{"), "    status = \"okay\";".to_string()];
            for (index, entry) in pins {
                let flags = gpio_flags(entry).join(" | ");
                out.push(format!("    {} {{", node_name(entry, index)));
                out.push(format!("        gpios = <&gpio{port} {index} ({flags})>;"));
                if let Some(state) = entry.logic.gpio_init_state {
                    let level = if state { "high" } else { "low" };
                    out.push(format!("        output-{level};"));
                }
                out.push("    };".to_string());
            }
            out.push("};".to_string());
            out.join("\n")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ElectricalSignature, LogicProperties};
    use crate::capability::Mux;

    fn gpio(signal: &str, pin: &str, label: Option<&str>, logic: LogicProperties) -> ResolvedPinEntry {
        ResolvedPinEntry {
            peripheral: "GPIOB".to_string(),
            signal: "LED".to_string(),
            matched_signal: "GPIO".to_string(),
            base_pin: pin.to_string(),
            mux: Mux::Alt("0x1".to_string()),
            func_label: signal.to_string(),
            user_label: label.map(str::to_string),
            electrical: ElectricalSignature::default(),
            logic,
        }
    }

    #[test]
    fn test_interrupt_mapping() {
        assert_eq!(
            GpioInterrupt::from_port_name("kPORT_InterruptEitherEdge").map(GpioInterrupt::flag),
            Some("GPIO_INT_EDGE_BOTH")
        );
        assert_eq!(GpioInterrupt::from_port_name("kPORT_DMARisingEdge"), None);
    }

    #[test]
    fn test_flags_drop_unknown_interrupt() {
        let mut entry = gpio(
            "GPIOC_SW2",
            "PTC6",
            None,
            LogicProperties {
                gpio_init_state: None,
                gpio_interrupt: Some("kPORT_InterruptSomethingElse".to_string()),
            },
        );
        entry.electrical.pull = Some(Pull::Up);
        assert_eq!(gpio_flags(&entry), vec!["GPIO_PULL_UP", "GPIO_ACTIVE_HIGH"]);

        entry.logic.gpio_interrupt = Some("kPORT_InterruptFallingEdge".to_string());
        assert_eq!(
            gpio_flags(&entry),
            vec!["GPIO_PULL_UP", "GPIO_INT_EDGE_FALLING", "GPIO_ACTIVE_HIGH"]
        );
    }

    #[test]
    fn test_ports_sorted_and_non_gpio_skipped() {
        let entries = vec![
            gpio("GPIOE_LED", "PTE26", Some("LED Green"), LogicProperties::default()),
            gpio("GPIOB_LED", "PTB21", None, LogicProperties::default()),
            gpio("UART0_RX", "PTB16", None, LogicProperties::default()),
            gpio("GPIOX_FIXED", "VDD", None, LogicProperties::default()),
        ];
        let blocks = emit_gpio_nodes(&entries);

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("&gpiob {"));
        assert!(blocks[0].contains("    pin_21 {"));
        assert!(!blocks[0].contains("PTB16"));
        assert!(!blocks[0].contains("pin_16"));
        assert!(blocks[1].starts_with("&gpioe {"));
        assert!(blocks[1].contains("    led_green {"));
        assert!(blocks[1].contains("gpios = <&gpioe 26 (GPIO_ACTIVE_HIGH)>;"));
    }

    #[test]
    fn test_explicit_init_state_emits_output_directive() {
        let entries = vec![gpio(
            "GPIOB_LED1",
            "PTB22",
            Some("LED_RED"),
            LogicProperties {
                gpio_init_state: Some(true),
                gpio_interrupt: None,
            },
        )];
        let block = emit_gpio_nodes(&entries).join("\n");
        assert_eq!(
            block,
            [
                "&gpiob {",
                "    status = \"okay\";",
                "    led_red {",
                "        gpios = <&gpiob 22 (GPIO_ACTIVE_HIGH)>;",
                "        output-high;",
                "    };",
                "};",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_blank_label_falls_back_to_pin_index() {
        let entries = vec![
            gpio("GPIOB_LED", "PTB21", Some(""), LogicProperties::default()),
            gpio("GPIOB_SW", "PTB22", Some("  "), LogicProperties::default()),
        ];
        let block = emit_gpio_nodes(&entries).join("\n");
        assert!(block.contains("    pin_21 {\n        gpios = <&gpiob 21 (GPIO_ACTIVE_HIGH)>;"));
        assert!(block.contains("    pin_22 {"));
        assert!(!block.contains("     {"));
    }
}
