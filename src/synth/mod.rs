// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Devicetree synthesis.
//!
//! One pass runs validate -> resolve -> group -> emit. The output is three
//! sections in fixed order: `&pinctrl`, GPIO controller nodes, then
//! peripheral nodes. Nothing is kept between runs, so identical inputs give
//! identical text.

pub mod gpio;
pub mod nodes;
pub mod pinctrl;

use crate::board::validate::validate_board_config;
use crate::board::BoardConfig;
use crate::capability::CapabilityModel;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::group::PeripheralGroups;
use crate::resolve::resolve_board;

/// Emission constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthOptions {
    /// Macro wrapping each routing selector, e.g. `K64_PSEL(B, 16, 0x3)`.
    pub pinmux_macro: String,
    /// Appended to the lower-cased peripheral id to name its pinctrl node.
    pub node_suffix: String,
    pub uart_current_speed: u32,
    pub i2s_sample_rate: u32,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            pinmux_macro: "K64_PSEL".to_string(),
            node_suffix: "_default".to_string(),
            uart_current_speed: 115_200,
            i2s_sample_rate: 16_000,
        }
    }
}

impl SynthOptions {
    pub fn pinctrl_node_name(&self, peripheral: &str) -> String {
        format!("{}{}", peripheral.to_lowercase(), self.node_suffix)
    }
}

/// Result of a successful run. Resolution misses are in `diagnostics`.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub dts: String,
    pub groups: PeripheralGroups,
    pub diagnostics: Diagnostics,
}

/// Render grouped pins into devicetree source.
pub fn render(groups: &PeripheralGroups, options: &SynthOptions) -> String {
    let mut blocks = vec![pinctrl::emit_pinctrl(groups, options)];
    blocks.extend(gpio::emit_gpio_nodes(groups.entries()));
    blocks.extend(nodes::emit_peripheral_nodes(groups, options));

    let mut dts = blocks.join("\n\n");
    dts.push('\n');
    dts
}

/// Validate the board mapping, resolve it against the capability model and
/// render the result.
///
/// Pin conflicts fail the whole run. Assignments that match no placement
/// are left out of the output and reported in [`Synthesis::diagnostics`].
pub fn synthesize(
    model: &CapabilityModel,
    config: &BoardConfig,
    options: &SynthOptions,
) -> Result<Synthesis> {
    validate_board_config(config)?;

    let mut diagnostics = Diagnostics::new();
    let resolved = resolve_board(&model.signal_to_pin_map, config, &mut diagnostics);
    log::debug!(
        "Resolved {} of {} assignments",
        resolved.len(),
        config.mapping.len()
    );

    let groups = PeripheralGroups::from_entries(resolved);
    let dts = render(&groups, options);

    Ok(Synthesis {
        dts,
        groups,
        diagnostics,
    })
}
