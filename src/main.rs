// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pinctrl_synth::board::reader::BoardReader;
use pinctrl_synth::capability::pin_map::pcr_address;
use pinctrl_synth::capability::reader::CapabilityReader;
use pinctrl_synth::export::export_registries;
use pinctrl_synth::{synthesize, Diagnostics, Error, Result, SynthOptions};

#[derive(Parser)]
#[command(name = "pinctrl-synth")]
#[command(about = "Generate devicetree pinctrl sources from MCU signal configuration data", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a board mapping and write the pinctrl .dtsi
    Build {
        /// signal_configuration.xml of the processor package
        #[arg(long)]
        signals: PathBuf,
        /// Board mapping JSON
        #[arg(long)]
        board: PathBuf,
        /// Output .dtsi (default: <board stem>-pinctrl.dtsi next to the board file)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the intermediate registries (JSON and CSV) into this directory
        #[arg(long)]
        dump_dir: Option<PathBuf>,
        /// Macro wrapping each pinmux selector
        #[arg(long, default_value = "K64_PSEL")]
        pinmux_macro: String,
        /// Suffix appended to the lower-cased peripheral id to name its pinctrl node
        #[arg(long, default_value = "_default")]
        node_suffix: String,
        /// current-speed of generated UART nodes
        #[arg(long, default_value_t = 115_200)]
        uart_speed: u32,
        /// sample-rate of generated I2S nodes
        #[arg(long, default_value_t = 16_000)]
        i2s_sample_rate: u32,
    },
    /// Inspect the signal configuration
    Query {
        /// signal_configuration.xml of the processor package
        #[arg(long)]
        signals: PathBuf,
        #[command(subcommand)]
        query: Query,
    },
}

#[derive(Subcommand)]
enum Query {
    /// List every signal that can be routed to a physical pin
    FindBasePin {
        /// Pin name, e.g. PTB16
        pin: String,
    },
}

fn default_output(board: &Path) -> PathBuf {
    let stem = board
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase().replace('-', "_"))
        .unwrap_or_else(|| "board".to_string());
    board.with_file_name(format!("{stem}-pinctrl.dtsi"))
}

/// One-line report for a failed command, whichever subcommand ran.
fn failure_message(err: &Error) -> String {
    format!("{} error: {err}", err.class())
}

fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        log::warn!("{diagnostic}");
    }
}

fn build(
    signals: &Path,
    board: &Path,
    output: Option<PathBuf>,
    dump_dir: Option<PathBuf>,
    options: SynthOptions,
) -> Result<()> {
    let config = BoardReader::new().read(board)?;

    let mut diagnostics = Diagnostics::new();
    let model = CapabilityReader::new().read(signals, &mut diagnostics)?;
    if let Some(part) = &model.part_number {
        log::info!("Part number: {part}");
    }

    let synthesis = synthesize(&model, &config, &options)?;
    diagnostics.extend(synthesis.diagnostics.clone());
    report(&diagnostics);

    let output = output.unwrap_or_else(|| default_output(board));
    fs::write(&output, &synthesis.dts)?;
    log::info!("Wrote DTS to {}", output.display());

    if let Some(dir) = dump_dir {
        export_registries(&model, &synthesis.groups, dir)?;
    }

    let unresolved = diagnostics.unresolved();
    if unresolved.is_empty() {
        log::info!("DTS build successful");
    } else {
        log::warn!(
            "DTS built with {} unmatched assignment(s):",
            unresolved.len()
        );
        for (signal, pin) in unresolved {
            log::warn!("  {signal} -> {pin}");
        }
    }
    Ok(())
}

fn find_base_pin(signals: &Path, pin: &str) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let model = CapabilityReader::new().read(signals, &mut diagnostics)?;

    let mut found = 0;
    for placement in model.signal_to_pin_map.placements_for_pin(pin) {
        found += 1;
        println!(
            "{}\t{}.{}\tmux={}\t{}",
            placement.base_pin,
            placement.peripheral,
            placement.signal,
            placement.mux,
            placement.package_function
        );
    }
    if let Some(addr) = pcr_address(pin) {
        println!("{pin}\tPCR=0x{addr:08X}");
    }
    if found == 0 {
        log::warn!("No placements found for pin {pin}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .init();

    let result = match cli.command {
        Commands::Build {
            signals,
            board,
            output,
            dump_dir,
            pinmux_macro,
            node_suffix,
            uart_speed,
            i2s_sample_rate,
        } => {
            let options = SynthOptions {
                pinmux_macro,
                node_suffix,
                uart_current_speed: uart_speed,
                i2s_sample_rate,
            };
            build(&signals, &board, output, dump_dir, options)
        }
        Commands::Query { signals, query } => match query {
            Query::FindBasePin { pin } => find_base_pin(&signals, &pin),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}
