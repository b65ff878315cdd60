//! Command line interface to control Belkin Wemo smart devices.

mod icons;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wemo_device::{WemoDevice, UNKNOWN_DEVICE};
use wemo_registry::Registry;

const DISCOVER_COMMANDS: &[&str] = &["discover", "scan", "update"];
const ENABLE_COMMANDS: &[&str] = &["on", "enable"];
const DISABLE_COMMANDS: &[&str] = &["off", "disable"];

/// Control Belkin Wemo smart devices from the terminal.
#[derive(Parser, Debug)]
#[command(name = "wemo", version, about = "Belkin Wemo command line interface")]
struct Args {
    /// Scan for devices and refresh the registry
    #[arg(short, long)]
    scan: bool,

    /// Device name to operate on
    #[arg(short, long, default_value = "")]
    device: String,

    /// One of: list, info, discover, scan, update, on, enable, off, disable
    #[arg(short, long, default_value = "list")]
    command: String,

    /// Registry file (defaults to the per-user config location)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let registry = match &args.registry {
        Some(path) => Registry::at(path),
        None => Registry::default_location(),
    };

    if args.scan || DISCOVER_COMMANDS.contains(&args.command.as_str()) {
        registry.refresh()?;
        return list_devices(&registry);
    }

    if args.command == "list" {
        return list_devices(&registry);
    }

    if args.device.is_empty() {
        eprintln!("ERROR: Command '{}' needs a device name (-d).", args.command);
        return Ok(());
    }

    let devices = registry.devices()?;
    let tag = wemo_registry::tag(&args.device);
    let Some(device) = devices.get(&tag) else {
        eprintln!("ERROR: No Wemo device named {} was found.", args.device);
        return Ok(());
    };

    match args.command.as_str() {
        cmd if ENABLE_COMMANDS.contains(&cmd) => {
            let state = device.on();
            println!("  - Wemo '{}' state = {}", device.name(), state);
            print_device_row(device);
        }
        cmd if DISABLE_COMMANDS.contains(&cmd) => {
            let state = device.off();
            println!("  - Wemo '{}' state = {}", device.name(), state);
            print_device_row(device);
        }
        "info" => {
            print_device_row(device);
            let details = serde_json::to_string_pretty(&device.describe())?;
            println!("\nDetails:\n{}", details);
        }
        other => {
            eprintln!("ERROR: Unknown command '{}'.", other);
        }
    }

    Ok(())
}

/// Print the registered devices as a table, one live-queried row each.
fn list_devices(registry: &Registry) -> Result<()> {
    let devices = registry.devices()?;

    println!(
        "# {:<7}  {:<32}  {:<16}  {:<6}",
        "State", "Name", "Host/IP Address", "Status"
    );
    println!(
        "# {:<7}  {:<32}  {:<16}  {:<6}",
        "-".repeat(6),
        "-".repeat(32),
        "-".repeat(16),
        "-".repeat(6)
    );

    let mut tags: Vec<&String> = devices.keys().collect();
    tags.sort();
    for tag in tags {
        print_device_row(&devices[tag]);
    }
    Ok(())
}

fn print_device_row(device: &WemoDevice) {
    let state = device.state();
    let icon = if device.name() == UNKNOWN_DEVICE {
        icons::unknown_device()
    } else {
        icons::state(state)
    };

    println!(
        "  {} {:<4}  {:<32}  {:<16}  {:<6}",
        icon,
        "",
        device.name(),
        device.address(),
        state
    );
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
