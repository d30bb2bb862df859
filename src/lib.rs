//! Pinctrl Synthesizer Library
//!
//! This library resolves a board's `signal -> pin` mapping against an MCU
//! signal configuration document (the vendor's description of which pins can
//! carry which peripheral signals) and generates devicetree pinctrl, GPIO and
//! peripheral nodes from the result.

pub mod board;
pub mod capability;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod group;
pub mod resolve;
pub mod synth;

// Re-export commonly used types
pub use board::{BoardConfig, ElectricalSignature, PinAssignment, Pull, Toggle};
pub use capability::{CapabilityModel, Mux, PinPlacement, SignalToPinMap};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Error, Result};
pub use group::PeripheralGroups;
pub use resolve::ResolvedPinEntry;
pub use synth::{synthesize, SynthOptions, Synthesis};
