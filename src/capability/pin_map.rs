// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Pin map parser: turns the `<pins>` section into
//! `peripheral -> signal -> [PinPlacement]`.
//!
//! A pin record looks like
//!
//! ```xml
//! <pin name="ADC1_SE4a/PTE0/UART1_TX" description="ADC;Port E0;UART TX" coords="1">
//!   <connections name_part="UART1_TX" package_function="UART1_TX">
//!     <connection>
//!       <peripheral_signal_ref peripheral="UART1" signal="TX"/>
//!       <configuration>
//!         <assign register="PORTE_PCR0" bit_field="MUX" bit_field_value="0x3"/>
//!       </configuration>
//!     </connection>
//!   </connections>
//! </pin>
//! ```
//!
//! Only labels of the form `PT<port><index>` on ports A-E have a port
//! control register, so only those pins are routable through the mux.

use nom::{
    bytes::complete::tag,
    character::complete::{digit1, satisfy},
    combinator::{all_consuming, map_res},
    sequence::preceded,
    IResult, Parser,
};
use roxmltree::Node;

use super::parser::{child, children, required_attr};
use super::{Mux, Peripherals, PinPlacement, SignalToPinMap};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};

/// Package function recorded for fixed-function pins.
pub const ANALOG_FUNCTION: &str = "ANALOG";

/// Kinetis PORTx base addresses; one 32-bit PCR per pin follows each base.
const PORT_BASES: [(char, u32); 5] = [
    ('A', 0x4004_9000),
    ('B', 0x4004_A000),
    ('C', 0x4004_B000),
    ('D', 0x4004_C000),
    ('E', 0x4004_D000),
];

fn port_pin(input: &str) -> IResult<&str, (char, u32)> {
    preceded(
        tag("PT"),
        (
            satisfy(|c: char| PORT_BASES.iter().any(|(port, _)| *port == c)),
            map_res(digit1, str::parse::<u32>),
        ),
    )
    .parse(input)
}

/// Split a routable pin name into port letter and index: `PTB16` -> `('B', 16)`.
pub fn parse_port_pin(name: &str) -> Option<(char, u32)> {
    all_consuming(port_pin)
        .parse(name)
        .ok()
        .map(|(_, parsed)| parsed)
}

pub fn is_routable_pin(name: &str) -> bool {
    parse_port_pin(name).is_some()
}

/// Address of the port control register of a routable pin on ports A-E.
pub fn pcr_address(pin: &str) -> Option<u32> {
    let (port, index) = parse_port_pin(pin)?;
    let (_, base) = PORT_BASES.iter().find(|(p, _)| *p == port)?;
    index.checked_mul(4).and_then(|offset| base.checked_add(offset))
}

fn split_field(value: &str, delimiter: char) -> Vec<&str> {
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The `MUX` bit-field value of a connection, if it has one.
fn mux_value(connection: Node<'_, '_>) -> Option<String> {
    let configuration = child(connection, "configuration")?;
    children(configuration, "assign")
        .filter(|assign| assign.attribute("bit_field") == Some("MUX"))
        .filter_map(|assign| assign.attribute("bit_field_value"))
        .last()
        .map(str::to_string)
}

fn parse_pin(
    pin: Node<'_, '_>,
    map: &mut SignalToPinMap,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let name = pin.attribute("name").unwrap_or_default();
    let description = pin.attribute("description").unwrap_or_default();
    let labels = split_field(name, '/');
    let descriptions = split_field(description, ';');

    if labels.is_empty() || labels.len() != descriptions.len() {
        return Err(Error::MalformedPin {
            name: name.to_string(),
            description: description.to_string(),
        });
    }
    let coords = required_attr(pin, "coords")?;

    let routable = labels.iter().copied().find(|l| is_routable_pin(l));
    let base_pin = routable.unwrap_or(labels[0]);
    let is_routable = routable.is_some();

    for connections in children(pin, "connections") {
        let name_part = connections.attribute("name_part");
        let package_function = if is_routable {
            connections
                .attribute("package_function")
                .unwrap_or_default()
                .to_string()
        } else {
            ANALOG_FUNCTION.to_string()
        };
        let description = name_part
            .and_then(|part| labels.iter().position(|l| *l == part))
            .map(|i| descriptions[i].to_string())
            .unwrap_or_default();

        for connection in children(connections, "connection") {
            let Some(signal_ref) = child(connection, "peripheral_signal_ref") else {
                continue;
            };
            let peripheral = required_attr(signal_ref, "peripheral")?;
            let signal = required_attr(signal_ref, "signal")?;

            let mux = match (is_routable, mux_value(connection)) {
                (true, Some(value)) => Mux::Alt(value),
                (true, None) => {
                    diagnostics.push(Diagnostic::FixedFunctionConnection {
                        pin: base_pin.to_string(),
                        peripheral: peripheral.to_string(),
                        signal: signal.to_string(),
                    });
                    Mux::Fixed
                }
                (false, _) => Mux::Fixed,
            };

            map.insert(PinPlacement {
                peripheral: peripheral.to_string(),
                signal: signal.to_string(),
                base_pin: base_pin.to_string(),
                is_routable,
                mux,
                package_function: package_function.clone(),
                coords: coords.to_string(),
                func_label: name_part.map(str::to_string),
                description: description.clone(),
            });
        }
    }
    Ok(())
}

pub fn parse_signal_to_pin_map(
    root: Node<'_, '_>,
    peripherals: &Peripherals,
    diagnostics: &mut Diagnostics,
) -> Result<SignalToPinMap> {
    log::debug!("Parsing hardware pin-to-signal mapping table");
    let mut map = SignalToPinMap::new();

    let Some(pins) = child(root, "pins") else {
        log::warn!("No pins found in signal configuration");
        diagnostics.push(Diagnostic::MissingSection { section: "pins" });
        return Ok(map);
    };

    for pin in children(pins, "pin") {
        parse_pin(pin, &mut map, diagnostics)?;
    }

    for peripheral in map.peripherals() {
        if !peripherals.contains_key(peripheral) {
            diagnostics.push(Diagnostic::UnregisteredPeripheral {
                peripheral: peripheral.to_string(),
            });
        }
    }

    log::debug!("Mapped signals for {} peripherals", map.len());
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Peripheral;
    use roxmltree::Document;

    fn registry(ids: &[&str]) -> Peripherals {
        ids.iter()
            .map(|id| {
                (
                    id.to_string(),
                    Peripheral {
                        id: id.to_string(),
                        name: None,
                        peripheral_type: "T".to_string(),
                    },
                )
            })
            .collect()
    }

    fn parse(xml: &str, peripherals: &Peripherals) -> (Result<SignalToPinMap>, Diagnostics) {
        let document = Document::parse(xml).unwrap();
        let mut diagnostics = Diagnostics::new();
        let map = parse_signal_to_pin_map(document.root_element(), peripherals, &mut diagnostics);
        (map, diagnostics)
    }

    #[test]
    fn test_parse_port_pin() {
        assert_eq!(parse_port_pin("PTB16"), Some(('B', 16)));
        assert_eq!(parse_port_pin("PTE0"), Some(('E', 0)));
        assert_eq!(parse_port_pin("PTB"), None);
        assert_eq!(parse_port_pin("PTB16X"), None);
        assert_eq!(parse_port_pin("PTF3"), None);
        assert_eq!(parse_port_pin("PTb2"), None);
        assert_eq!(parse_port_pin("ADC0_SE8"), None);
        assert_eq!(parse_port_pin("VDD"), None);
    }

    #[test]
    fn test_pcr_address() {
        assert_eq!(pcr_address("PTE1"), Some(0x4004_D004));
        assert_eq!(pcr_address("PTA0"), Some(0x4004_9000));
        assert_eq!(pcr_address("PTB16"), Some(0x4004_A040));
        assert_eq!(pcr_address("PTF3"), None);
        assert_eq!(pcr_address("VDDA"), None);
    }

    #[test]
    fn test_unknown_port_is_not_routable() {
        let xml = r#"<root><pins>
            <pin name="PTF3/FTM9_CH0" description="Port F3;Timer channel" coords="99">
                <connections name_part="FTM9_CH0"><connection>
                    <peripheral_signal_ref peripheral="FTM9" signal="CH0"/>
                    <configuration><assign bit_field="MUX" bit_field_value="0x4"/></configuration>
                </connection></connections>
            </pin>
        </pins></root>"#;
        let (map, diagnostics) = parse(xml, &registry(&["FTM9"]));
        let map = map.unwrap();

        let ch0 = &map.placements("FTM9", "CH0")[0];
        assert_eq!(ch0.base_pin, "PTF3");
        assert!(!ch0.is_routable);
        assert_eq!(ch0.mux, Mux::Fixed);
        assert_eq!(ch0.package_function, ANALOG_FUNCTION);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_routable_and_fixed_pins() {
        let xml = r#"<root><pins>
            <pin name="ADC0_SE8/PTB0/I2C0_SCL" description="ADC input;Port B0;I2C clock" coords="81">
                <connections name_part="I2C0_SCL" package_function="I2C0_SCL">
                    <connection>
                        <peripheral_signal_ref peripheral="I2C0" signal="SCL"/>
                        <configuration>
                            <assign register="PORTB_PCR0" bit_field="ODE" bit_field_value="0x1"/>
                            <assign register="PORTB_PCR0" bit_field="MUX" bit_field_value="0x2"/>
                        </configuration>
                    </connection>
                </connections>
                <connections name_part="ADC0_SE8" package_function="ADC0_SE8">
                    <connection>
                        <peripheral_signal_ref peripheral="ADC0" signal="SE.8"/>
                    </connection>
                </connections>
            </pin>
            <pin name="VREFH" description="Reference voltage" coords="32">
                <connections name_part="VREFH">
                    <connection><peripheral_signal_ref peripheral="VREF" signal="H"/></connection>
                    <connection/>
                </connections>
            </pin>
        </pins></root>"#;
        let (map, diagnostics) = parse(xml, &registry(&["I2C0", "ADC0"]));
        let map = map.unwrap();

        let scl = &map.placements("I2C0", "SCL")[0];
        assert_eq!(scl.base_pin, "PTB0");
        assert!(scl.is_routable);
        assert_eq!(scl.mux, Mux::Alt("0x2".to_string()));
        assert_eq!(scl.coords, "81");
        assert_eq!(scl.func_label.as_deref(), Some("I2C0_SCL"));
        assert_eq!(scl.description, "I2C clock");

        let adc = &map.placements("ADC0", "SE.8")[0];
        assert_eq!(adc.mux, Mux::Fixed);
        assert_eq!(adc.description, "ADC input");

        let vref = &map.placements("VREF", "H")[0];
        assert_eq!(vref.base_pin, "VREFH");
        assert!(!vref.is_routable);
        assert_eq!(vref.mux, Mux::Fixed);
        assert_eq!(vref.package_function, ANALOG_FUNCTION);

        let found: Vec<_> = diagnostics.iter().cloned().collect();
        assert_eq!(
            found,
            vec![
                Diagnostic::FixedFunctionConnection {
                    pin: "PTB0".to_string(),
                    peripheral: "ADC0".to_string(),
                    signal: "SE.8".to_string(),
                },
                Diagnostic::UnregisteredPeripheral {
                    peripheral: "VREF".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_alternative_placements_keep_document_order() {
        let xml = r#"<root><pins>
            <pin name="PTB16/UART0_RX" description="Port B16;UART RX" coords="62">
                <connections name_part="UART0_RX"><connection>
                    <peripheral_signal_ref peripheral="UART0" signal="RX"/>
                    <configuration><assign bit_field="MUX" bit_field_value="0x3"/></configuration>
                </connection></connections>
            </pin>
            <pin name="PTA1/UART0_RX" description="Port A1;UART RX" coords="35">
                <connections name_part="UART0_RX"><connection>
                    <peripheral_signal_ref peripheral="UART0" signal="RX"/>
                    <configuration><assign bit_field="MUX" bit_field_value="0x2"/></configuration>
                </connection></connections>
            </pin>
        </pins></root>"#;
        let (map, _) = parse(xml, &registry(&["UART0"]));
        let map = map.unwrap();
        let pins: Vec<_> = map
            .placements("UART0", "RX")
            .iter()
            .map(|p| p.base_pin.as_str())
            .collect();
        assert_eq!(pins, vec!["PTB16", "PTA1"]);
        assert_eq!(map.placements_for_pin("PTA1").count(), 1);
    }

    #[test]
    fn test_mismatched_description_is_fatal() {
        let xml = r#"<root><pins>
            <pin name="PTB16/UART0_RX" description="Port B16" coords="62"/>
        </pins></root>"#;
        let (map, _) = parse(xml, &registry(&[]));
        assert!(matches!(map, Err(Error::MalformedPin { .. })));
    }

    #[test]
    fn test_empty_name_is_fatal() {
        let xml = r#"<root><pins><pin name="" description="" coords="1"/></pins></root>"#;
        let (map, _) = parse(xml, &registry(&[]));
        assert!(matches!(map, Err(Error::MalformedPin { .. })));
    }

    #[test]
    fn test_missing_coords_is_fatal() {
        let xml = r#"<root><pins><pin name="PTA0" description="Port A0"/></pins></root>"#;
        let (map, _) = parse(xml, &registry(&[]));
        assert!(matches!(
            map,
            Err(Error::MissingAttribute { attribute: "coords", .. })
        ));
    }
}
