// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Templated peripheral nodes for peripherals the generator knows about.

use super::SynthOptions;
use crate::group::PeripheralGroups;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralKind {
    I2s,
    Uart,
}

impl PeripheralKind {
    /// Classify by substring of the peripheral id; I2S is checked first.
    pub fn detect(peripheral: &str) -> Option<Self> {
        if peripheral.contains("I2S") {
            Some(Self::I2s)
        } else if peripheral.contains("UART") {
            Some(Self::Uart)
        } else {
            None
        }
    }
}

fn pinctrl_header(peripheral: &str, options: &SynthOptions) -> Vec<String> {
    vec![
        format!("&{} {{", peripheral.to_lowercase()),
        format!(
            "    pinctrl-0 = <&{}>;",
            options.pinctrl_node_name(peripheral)
        ),
        "    pinctrl-names = \"default\";".to_string(),
    ]
}

pub fn emit_uart_node(peripheral: &str, options: &SynthOptions) -> String {
    let mut out = pinctrl_header(peripheral, options);
    out.push(format!(
        "    current-speed = <{}>;",
        options.uart_current_speed
    ));
    out.push("    status = \"okay\";".to_string());
    out.push("};".to_string());
    out.join("\n")
}

/// 16-bit PCM receiver clocked from the transmitter.
pub fn emit_i2s_node(peripheral: &str, options: &SynthOptions) -> String {
    let mut out = pinctrl_header(peripheral, options);
    out.extend([
        "    status = \"okay\";".to_string(),
        String::new(),
        "    protocol = \"i2s\";".to_string(),
        "    bit-format = \"s16le\";".to_string(),
        format!("    sample-rate = <{}>;", options.i2s_sample_rate),
        String::new(),
        "    receiver {".to_string(),
        "        sync-mode = <1>;".to_string(),
        "        data-lane = <0>;".to_string(),
        "    };".to_string(),
        "};".to_string(),
    ]);
    out.join("\n")
}

/// One block per known peripheral, in group order.
pub fn emit_peripheral_nodes(groups: &PeripheralGroups, options: &SynthOptions) -> Vec<String> {
    groups
        .peripherals()
        .filter_map(|peripheral| match PeripheralKind::detect(peripheral)? {
            PeripheralKind::I2s => Some(emit_i2s_node(peripheral, options)),
            PeripheralKind::Uart => Some(emit_uart_node(peripheral, options)),
        })
        .collect()
}
