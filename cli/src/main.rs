mod data;
mod logging;
mod report;

use std::io::{self, BufRead, Write};

use clap::Parser;
use color_eyre::eyre::Result;
use hidvolt_platform::{DeviceSelector, HidDeviceDiscovery, SystemBatteries};

use data::Scanner;
use logging::LogLevel;

/// Battery levels for wireless HID pointing devices
///
/// Runs one scan: enumerates HID mouse interfaces, flags the ones whose
/// device path looks like the primary interface of a wireless composite
/// device, and reports a best-effort battery percentage for each.
/// https://github.com/hidvolt/hidvolt
#[derive(Debug, Parser)]
#[command(name = "hidvolt", version, verbatim_doc_comment)]
struct Cli {
    /// HID usage page to filter on (default: Generic Desktop)
    #[arg(long, default_value = "0x0001", value_parser = parse_u16)]
    usage_page: u16,

    /// HID usage id to filter on (default: Mouse)
    #[arg(long, default_value = "0x0002", value_parser = parse_u16)]
    usage_id: u16,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Wait for Enter before exiting
    #[arg(short, long)]
    wait: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(
        cli.log_level
            .as_deref()
            .map(LogLevel::from_str)
            .unwrap_or_default(),
    );

    let selector = DeviceSelector {
        usage_page: cli.usage_page,
        usage_id: cli.usage_id,
    };

    let mut devices = HidDeviceDiscovery::new()?;
    let mut batteries = SystemBatteries::new();

    let outcome = Scanner::new(&mut devices, &mut batteries, selector).run();

    let mut stdout = io::stdout().lock();
    match outcome {
        Ok(scan) => {
            if cli.json {
                report::render_json(&scan, &mut stdout)?;
            } else {
                report::render_text(&scan, &mut stdout)?;
            }
        }
        Err(err) => {
            writeln!(stdout, "Error: device enumeration failed: {}", err)?;
            drop(stdout);
            if cli.wait {
                wait_for_enter()?;
            }
            std::process::exit(1);
        }
    }
    drop(stdout);

    if cli.wait {
        wait_for_enter()?;
    }

    Ok(())
}

fn wait_for_enter() -> Result<()> {
    print!("Press Enter to exit... ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(())
}

fn parse_u16(value: &str) -> Result<u16, String> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|err| format!("invalid 16-bit value {:?}: {}", trimmed, err))
}
