// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Registry parsers for the signal configuration document.
//!
//! The document root holds the containers `peripheral_types`,
//! `peripherals`, `functional_properties_declarations` and `pins`. A missing
//! container yields an empty registry and a diagnostic; malformed records
//! inside a container abort the load.

use indexmap::IndexMap;
use roxmltree::{Document, Node};

use super::pin_map::parse_signal_to_pin_map;
use super::{
    CapabilityModel, FunctionalProperties, FunctionalProperty, Peripheral, PeripheralType,
    PeripheralTypes, Peripherals, SignalChannel, SignalDefinition, StateDeclaration,
};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};

/// First direct child element named `name`.
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

/// Direct child elements named `name`.
pub(crate) fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.has_tag_name(name))
}

pub(crate) fn required_attr<'a>(node: Node<'a, '_>, attribute: &'static str) -> Result<&'a str> {
    match node.attribute(attribute) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute,
        }),
    }
}

fn optional_attr(node: Node<'_, '_>, attribute: &str) -> Option<String> {
    node.attribute(attribute).map(str::to_string)
}

/// Locate a top-level container, recording a diagnostic when absent.
fn section<'a, 'input>(
    root: Node<'a, 'input>,
    name: &'static str,
    diagnostics: &mut Diagnostics,
) -> Option<Node<'a, 'input>> {
    let node = child(root, name);
    if node.is_none() {
        log::warn!("No {name} found in signal configuration");
        diagnostics.push(Diagnostic::MissingSection { section: name });
    }
    node
}

/// Record elements of a container (comments and text are skipped).
fn records<'a, 'input>(container: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    container.children().filter(Node::is_element)
}

pub fn parse_part_number(root: Node<'_, '_>) -> Option<String> {
    child(root, "part_information")
        .and_then(|info| child(info, "part_number"))
        .and_then(|part| optional_attr(part, "id"))
}

fn parse_channels(signal: Node<'_, '_>) -> Result<Vec<SignalChannel>> {
    signal
        .descendants()
        .filter(|n| n.has_tag_name("signal_channel"))
        .map(|chan| {
            Ok(SignalChannel {
                id: required_attr(chan, "id")?.to_string(),
                name: optional_attr(chan, "name"),
                directions: optional_attr(chan, "directions"),
                modes: optional_attr(chan, "modes"),
            })
        })
        .collect()
}

pub fn parse_peripheral_types(
    root: Node<'_, '_>,
    diagnostics: &mut Diagnostics,
) -> Result<PeripheralTypes> {
    log::debug!("Parsing peripheral types");
    let mut entries = PeripheralTypes::new();
    let Some(container) = section(root, "peripheral_types", diagnostics) else {
        return Ok(entries);
    };

    for node in records(container) {
        let id = required_attr(node, "id")?;
        let mut signals = IndexMap::new();
        for sig in node
            .descendants()
            .filter(|n| n.has_tag_name("peripheral_signal"))
        {
            let definition = SignalDefinition {
                unified_ids: optional_attr(sig, "unified_ids"),
                directions: optional_attr(sig, "directions"),
                modes: optional_attr(sig, "modes"),
                channels: parse_channels(sig)?,
                features: sig
                    .descendants()
                    .filter(|n| n.has_tag_name("signal_feature"))
                    .filter_map(|f| optional_attr(f, "id"))
                    .collect(),
            };
            signals.insert(required_attr(sig, "id")?.to_string(), definition);
        }

        entries.insert(
            id.to_string(),
            PeripheralType {
                id: id.to_string(),
                name: optional_attr(node, "name"),
                description: optional_attr(node, "description"),
                signals,
            },
        );
    }

    log::debug!("Parsed {} peripheral types", entries.len());
    Ok(entries)
}

pub fn parse_peripherals(
    root: Node<'_, '_>,
    peripheral_types: &PeripheralTypes,
    diagnostics: &mut Diagnostics,
) -> Result<Peripherals> {
    log::debug!("Parsing peripherals");
    let mut entries = Peripherals::new();
    let Some(container) = section(root, "peripherals", diagnostics) else {
        return Ok(entries);
    };

    for node in records(container) {
        let id = required_attr(node, "id")?;
        let peripheral_type = required_attr(node, "peripheral_type")?;

        if !peripheral_types.contains_key(peripheral_type) {
            return Err(Error::UnknownPeripheralType {
                peripheral: id.to_string(),
                peripheral_type: peripheral_type.to_string(),
            });
        }
        if entries.contains_key(id) {
            return Err(Error::DuplicatePeripheral(id.to_string()));
        }

        entries.insert(
            id.to_string(),
            Peripheral {
                id: id.to_string(),
                name: optional_attr(node, "name"),
                peripheral_type: peripheral_type.to_string(),
            },
        );
    }

    log::debug!("Parsed {} peripherals", entries.len());
    Ok(entries)
}

pub fn parse_functional_properties(
    root: Node<'_, '_>,
    diagnostics: &mut Diagnostics,
) -> Result<FunctionalProperties> {
    log::debug!("Parsing functional properties");
    let mut entries = FunctionalProperties::new();
    let Some(container) = section(root, "functional_properties_declarations", diagnostics)
    else {
        return Ok(entries);
    };

    for node in records(container) {
        let id = required_attr(node, "id")?;

        let applicable_modes = node
            .descendants()
            .filter(|n| n.has_tag_name("applicable_mode"))
            .filter_map(|mode| optional_attr(mode, "directions"))
            .collect();

        let mut states = IndexMap::new();
        for state in children(node, "state_declaration") {
            states.insert(
                required_attr(state, "id")?.to_string(),
                StateDeclaration {
                    name: optional_attr(state, "name"),
                    description: optional_attr(state, "description"),
                },
            );
        }

        entries.insert(
            id.to_string(),
            FunctionalProperty {
                id: id.to_string(),
                name: optional_attr(node, "name"),
                description: optional_attr(node, "description"),
                applicable_modes,
                states,
            },
        );
    }

    log::debug!("Parsed {} functional properties", entries.len());
    Ok(entries)
}

/// Build every registry from an already parsed document.
pub fn parse_capability_model(
    document: &Document<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<CapabilityModel> {
    let root = document.root_element();

    let part_number = parse_part_number(root);
    if let Some(part) = &part_number {
        log::debug!("Discovered part number: {part}");
    }

    let peripheral_types = parse_peripheral_types(root, diagnostics)?;
    let peripherals = parse_peripherals(root, &peripheral_types, diagnostics)?;
    let functional_properties = parse_functional_properties(root, diagnostics)?;
    let signal_to_pin_map = parse_signal_to_pin_map(root, &peripherals, diagnostics)?;

    Ok(CapabilityModel {
        part_number,
        peripheral_types,
        peripherals,
        functional_properties,
        signal_to_pin_map,
    })
}

/// Parse the document text and build every registry.
pub fn parse_capability_xml(xml: &str, diagnostics: &mut Diagnostics) -> Result<CapabilityModel> {
    let document = Document::parse(xml)?;
    parse_capability_model(&document, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES_XML: &str = r#"
<signal_configuration>
  <part_information><part_number id="MK64FN1M0VLL12"/></part_information>
  <peripheral_types>
    <peripheral_type id="UART" name="UART" description="Universal asynchronous receiver">
      <peripheral_signals>
        <peripheral_signal id="RX" directions="IN" modes="default"/>
        <peripheral_signal id="TX" directions="OUT">
          <signal_features><signal_feature id="open_drain"/></signal_features>
        </peripheral_signal>
      </peripheral_signals>
    </peripheral_type>
    <peripheral_type id="ADC" name="ADC">
      <peripheral_signal id="SE">
        <signal_channel id="4a" name="SE4a" directions="IN" modes="single"/>
        <signal_channel id="4b" name="SE4b"/>
      </peripheral_signal>
    </peripheral_type>
  </peripheral_types>
  <peripherals>
    <peripheral id="UART0" name="UART0" peripheral_type="UART"/>
    <!-- comments are ignored -->
    <peripheral id="ADC0" peripheral_type="ADC"/>
  </peripherals>
  <functional_properties_declarations>
    <functional_property_declaration id="pull_select" name="Pull select">
      <applicable_modes><applicable_mode directions="in"/><applicable_mode directions="inOut"/></applicable_modes>
      <state_declaration id="down" name="Pull down"/>
      <state_declaration id="up" name="Pull up" description="Internal pull-up"/>
    </functional_property_declaration>
  </functional_properties_declarations>
</signal_configuration>
"#;

    #[test]
    fn test_parse_registries() {
        let mut diagnostics = Diagnostics::new();
        let model = parse_capability_xml(TYPES_XML, &mut diagnostics).unwrap();

        assert_eq!(model.part_number.as_deref(), Some("MK64FN1M0VLL12"));
        assert_eq!(model.peripheral_types.len(), 2);

        let uart = &model.peripheral_types["UART"];
        assert_eq!(uart.signals.keys().collect::<Vec<_>>(), vec!["RX", "TX"]);
        assert_eq!(uart.signals["TX"].features, vec!["open_drain".to_string()]);
        assert_eq!(uart.signals["RX"].directions.as_deref(), Some("IN"));

        let adc = &model.peripheral_types["ADC"];
        assert_eq!(adc.signals["SE"].channels.len(), 2);
        assert_eq!(adc.signals["SE"].channels[0].name.as_deref(), Some("SE4a"));

        assert_eq!(model.peripherals.keys().collect::<Vec<_>>(), vec!["UART0", "ADC0"]);
        let signals = model.peripherals["UART0"]
            .signals(&model.peripheral_types)
            .unwrap();
        assert!(signals.contains_key("RX"));

        let pull = &model.functional_properties["pull_select"];
        assert_eq!(pull.applicable_modes, vec!["in", "inOut"]);
        assert_eq!(pull.states.keys().collect::<Vec<_>>(), vec!["down", "up"]);

        // Only <pins> is absent.
        assert_eq!(
            diagnostics.iter().collect::<Vec<_>>(),
            vec![&Diagnostic::MissingSection { section: "pins" }]
        );
    }

    #[test]
    fn test_missing_sections_are_not_fatal() {
        let mut diagnostics = Diagnostics::new();
        let model = parse_capability_xml("<signal_configuration/>", &mut diagnostics).unwrap();

        assert!(model.peripheral_types.is_empty());
        assert!(model.peripherals.is_empty());
        assert!(model.functional_properties.is_empty());
        assert!(model.signal_to_pin_map.is_empty());
        assert_eq!(diagnostics.len(), 4);
    }

    #[test]
    fn test_unknown_peripheral_type_is_fatal() {
        let xml = r#"<root>
            <peripheral_types><peripheral_type id="UART"/></peripheral_types>
            <peripherals><peripheral id="SPI0" peripheral_type="SPI"/></peripherals>
        </root>"#;
        let err = parse_capability_xml(xml, &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownPeripheralType { ref peripheral, ref peripheral_type }
                if peripheral == "SPI0" && peripheral_type == "SPI"
        ));
    }

    #[test]
    fn test_duplicate_peripheral_is_fatal() {
        let xml = r#"<root>
            <peripheral_types><peripheral_type id="UART"/></peripheral_types>
            <peripherals>
                <peripheral id="UART0" peripheral_type="UART"/>
                <peripheral id="UART0" peripheral_type="UART"/>
            </peripherals>
        </root>"#;
        let err = parse_capability_xml(xml, &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, Error::DuplicatePeripheral(ref id) if id == "UART0"));
    }

    #[test]
    fn test_record_without_id_is_fatal() {
        let xml = r#"<root><peripheral_types><peripheral_type name="UART"/></peripheral_types></root>"#;
        let err = parse_capability_xml(xml, &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute { attribute: "id", .. }
        ));
    }

    #[test]
    fn test_unparsable_xml() {
        let err = parse_capability_xml("<root><unclosed></root>", &mut Diagnostics::new())
            .unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }
}
