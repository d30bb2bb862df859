// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! `&pinctrl` section: one node per peripheral, one `groupN` sub-block per
//! electrical signature.

use super::SynthOptions;
use crate::board::{ElectricalSignature, Pull};
use crate::capability::pin_map::parse_port_pin;
use crate::group::{electrical_subgroups, ElectricalSubGroup, PeripheralGroups};
use crate::resolve::ResolvedPinEntry;

/// Routing selector such as `K64_PSEL(B, 16, 0x3)`; `None` for pins without
/// a port control register or placements without a mux value.
pub fn pinmux_selector(entry: &ResolvedPinEntry, macro_name: &str) -> Option<String> {
    let (port, index) = parse_port_pin(&entry.base_pin)?;
    let mux = entry.mux.selector()?;
    Some(format!(
        "{macro_name}({}, {index}, {mux})",
        port.to_ascii_uppercase()
    ))
}

/// Property lines for the set attributes of a signature, in fixed order.
pub fn property_lines(signature: &ElectricalSignature) -> Vec<String> {
    let mut lines = Vec::new();

    match signature.pull {
        Some(Pull::Up) => lines.push("bias-pull-up;".to_string()),
        Some(Pull::Down) => lines.push("bias-pull-down;".to_string()),
        Some(Pull::Disable) => lines.push("bias-disable;".to_string()),
        None => {}
    }
    if let Some(drive) = signature.drive_strength.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("drive-strength = \"{drive}\";"));
    }
    if let Some(slew) = signature.slew_rate.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("slew-rate = \"{slew}\";"));
    }
    if signature.open_drain.is_some_and(|t| t.is_enabled()) {
        lines.push("drive-open-drain;".to_string());
    }
    if signature.passive_filter.is_some_and(|t| t.is_enabled()) {
        lines.push("passive-filter;".to_string());
    }
    if signature.digital_filter.is_some_and(|t| t.is_enabled()) {
        lines.push("digital-filter;".to_string());
    }

    lines
}

/// Emit one `group<number>` block. Returns `false`, emitting nothing, when
/// none of the entries has a routing selector.
fn emit_subgroup(
    number: usize,
    subgroup: &ElectricalSubGroup<'_>,
    options: &SynthOptions,
    out: &mut Vec<String>,
) -> bool {
    let selectors: Vec<(String, &str)> = subgroup
        .entries
        .iter()
        .filter_map(|entry| {
            let selector = pinmux_selector(entry, &options.pinmux_macro);
            if selector.is_none() {
                log::debug!(
                    "{} on {} has no routing selector, left out of pinmux",
                    entry.func_label,
                    entry.base_pin
                );
            }
            selector.map(|s| (s, entry.display_label()))
        })
        .collect();
    if selectors.is_empty() {
        return false;
    }

    out.push(format!("        group{number} {{"));
    out.push("            pinmux = <".to_string());
    let last = selectors.len() - 1;
    for (i, (selector, label)) in selectors.iter().enumerate() {
        let comma = if i < last { "," } else { "" };
        out.push(format!("                {selector}{comma} /* {label} */"));
    }
    out.push("            >;".to_string());
    for line in property_lines(subgroup.signature) {
        out.push(format!("            {line}"));
    }
    out.push("        };".to_string());
    true
}

/// Node for one peripheral, e.g. `uart0_default: uart0_default { ... };`.
pub fn emit_pinctrl_node(
    peripheral: &str,
    entries: &[ResolvedPinEntry],
    options: &SynthOptions,
) -> Vec<String> {
    let node_name = options.pinctrl_node_name(peripheral);
    let mut out = vec![format!("    {node_name}: {node_name} {{")];
    let mut emitted = 0;
    for subgroup in electrical_subgroups(entries) {
        if emit_subgroup(emitted + 1, &subgroup, options, &mut out) {
            emitted += 1;
        }
    }
    out.push("    };".to_string());
    out
}

pub fn emit_pinctrl(groups: &PeripheralGroups, options: &SynthOptions) -> String {
    let mut out = vec!["&pinctrl {".to_string()];
    for (peripheral, entries) in groups.iter() {
        out.extend(emit_pinctrl_node(peripheral, entries, options));
    }
    out.push("};".to_string());
    out.join("\n")
}
