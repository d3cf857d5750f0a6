//! brain-config CLI
//!
//! Read and write configuration parameters of a Brain unit.
//!
//! A parameter is named `<namespace>.<field>`, where the namespace is one of
//! `global`, `setup1`, `setup2` or `setup3`. Written values are 16-bit and
//! may be given in decimal or with a `0x`, `0o` or `0b` prefix.
//!
//! ```text
//! $ brain-config /dev/ttyUSB0 -f fields.toml --read global.GovDiv
//! global.GovDiv: 2100
//!
//! $ brain-config /dev/ttyUSB0 -f fields.toml --write global.GovDiv=0x834
//! global.GovDiv: 42 -> 2100
//! ```

use std::path::PathBuf;

use brain_config::fields::parse_assignment;
use brain_config::{Brain, BrainError, Config, FieldTables, SerialTransport};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// brain-config CLI
#[derive(Parser, Debug)]
#[command(name = "brain-config")]
#[command(about = "Modify Brain FBL unit configuration")]
#[command(version)]
struct Args {
    /// Serial device (e.g. /dev/ttyUSB0)
    device: String,

    /// TOML file with the global and setup field tables
    #[arg(short, long)]
    fields: PathBuf,

    /// Read a configuration parameter, e.g. global.RxType
    #[arg(short, long, value_name = "NAME")]
    read: Vec<String>,

    /// Read all known configuration parameters
    #[arg(long)]
    read_all: bool,

    /// Write a configuration parameter, given as name=val
    #[arg(short, long, value_name = "NAME=VAL")]
    write: Vec<String>,

    /// Serial line speed
    #[arg(long, default_value_t = brain_config::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Firmware identifier the unit must report
    #[arg(long, default_value = brain_config::EXPECTED_FIRMWARE)]
    firmware: String,

    /// Give up on a silent unit after this many milliseconds (0 waits forever)
    #[arg(long, default_value = "0")]
    timeout_ms: u64,
}

fn main() {
    // Logs go to stderr, reports to stdout
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,brain_config=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .device(&args.device)
        .baud_rate(args.baud)
        .expected_firmware(&args.firmware)
        .read_timeout_ms(args.timeout_ms)
        .field_table(&args.fields)
        .build();

    if let Err(e) = run(&args, &config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, config: &Config) -> Result<(), BrainError> {
    let tables = FieldTables::from_config(config)?;
    let mut brain = Brain::open(config)?;

    if args.read_all {
        for name in tables.qualified_names() {
            read_item(&mut brain, &tables, &name)?;
        }
        return Ok(());
    }

    for name in &args.read {
        read_item(&mut brain, &tables, name)?;
    }

    for assignment in &args.write {
        write_item(&mut brain, &tables, assignment)?;
    }

    Ok(())
}

fn read_item(
    brain: &mut Brain<SerialTransport>,
    tables: &FieldTables,
    name: &str,
) -> Result<(), BrainError> {
    let value = brain.read_named(tables, name)?;
    println!("{}: {}", name, value);
    Ok(())
}

fn write_item(
    brain: &mut Brain<SerialTransport>,
    tables: &FieldTables,
    assignment: &str,
) -> Result<(), BrainError> {
    let (name, value) = parse_assignment(assignment)?;

    let old = brain.read_named(tables, name)?;
    brain.write_named(tables, name, value)?;
    let new = brain.read_named(tables, name)?;

    println!("{}: {} -> {}", name, old, new);
    Ok(())
}
