use std::process;

use clap::{Parser, Subcommand};
use strata_core::config::BridgeConfig;
use strata_core::marshal::NATIVE_WORD;
use strata_core::registry::Callback;
use strata_core::runtime::{reference_runtime, InProcessRuntime};
use strata_core::types::FieldDescriptor;
use strata_core::{Address, Bridge, BridgeError, BridgeResult, PrintOptions, TypeDescriptor, TypedValueRef};
use strata_utils::{debug, init_logging};

/// Render debuggee values and demangle symbols through the Strata bridge.
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version)]
#[command(about = "Render debuggee values and demangle symbols through the Strata bridge", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Demangle one or more symbol names
    Demangle
    {
        /// Mangled names (printed back unchanged if they can't be demangled)
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print a value from raw bytes
    Print
    {
        /// Type name handed to the value printer (e.g. int, bool, char, node *)
        #[arg(short = 't', long, default_value = "int")]
        type_name: String,
        /// Value bytes in hex, in target byte order (e.g. 2a00000000000000)
        #[arg(long)]
        hex: String,
        /// Treat the value as a record of native-word fields with these names (comma separated)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        /// Debuggee address of the value (hex format: 0x1000 or decimal)
        #[arg(long, default_value = "0")]
        address: String,
        /// Ask for an abbreviated rendering
        #[arg(long, default_value_t = false)]
        summary: bool,
        /// Stop descending at this depth (defaults to STRATA_MAX_DEPTH or 8)
        #[arg(long)]
        max_depth: Option<u32>,
    },
    /// Show the effective bridge configuration
    Info,
}

fn main()
{
    // Initialize logging (reads from RUST_LOG env var)
    // Defaults to INFO level and Pretty format if not set
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> BridgeResult<()>
{
    let bridge = Bridge::start(reference_runtime(), BridgeConfig::from_env()?)?;

    match cli.command {
        Commands::Demangle { names } => {
            for name in names {
                println!("{}", bridge.demangle(&name)?);
            }
            Ok(())
        }
        Commands::Print {
            type_name,
            hex,
            fields,
            address,
            summary,
            max_depth,
        } => {
            let bytes = parse_hex(&hex)?;
            let address = parse_address(&address)?;
            let ty = if fields.is_empty() {
                TypeDescriptor::scalar(type_name, bytes.len())
            } else {
                let fields = fields
                    .into_iter()
                    .enumerate()
                    .map(|(index, name)| {
                        FieldDescriptor::new(name, index * NATIVE_WORD, TypeDescriptor::scalar("int", NATIVE_WORD))
                    })
                    .collect();
                TypeDescriptor::record(type_name, fields)
            };
            debug!(type_name = ty.name(), size = ty.size(), %address, "printing value");

            let value = TypedValueRef::at_start(&bytes, &ty, address);
            let options = PrintOptions {
                summary_only: summary,
                max_depth,
            };
            println!("{}", bridge.print_to_string(value, options)?);
            Ok(())
        }
        Commands::Info => {
            print_bridge_info(&bridge);
            Ok(())
        }
    }
}

fn print_bridge_info(bridge: &Bridge<InProcessRuntime>)
{
    println!("Bridge Information:");
    println!("  Max Depth: {}", bridge.max_depth());
    println!("  Search Path: {}", bridge.search_path().as_deref().unwrap_or("(none)"));
    println!("  Diagnostics: {}", bridge.context().settings().diagnostics());
    for callback in Callback::ALL {
        let handle = bridge.resolve(callback);
        let state = if handle.is_missing() { "missing" } else { "exported" };
        println!("  {}: {}", handle.name(), state);
    }
}

fn parse_hex(hex: &str) -> BridgeResult<Vec<u8>>
{
    let digits: Vec<u8> = hex
        .strip_prefix("0x")
        .unwrap_or(hex)
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    if let Some(bad) = digits.iter().find(|byte| !byte.is_ascii_hexdigit()) {
        return Err(BridgeError::InvalidArgument(format!("{hex:?} contains non-hex byte 0x{bad:02x}")));
    }
    if digits.len() % 2 != 0 {
        return Err(BridgeError::InvalidArgument(format!("{hex:?} is not an even number of hex digits")));
    }
    Ok(digits.chunks(2).map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1])).collect())
}

/// Value of an ASCII hex digit already checked with `is_ascii_hexdigit`.
fn hex_value(digit: u8) -> u8
{
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

fn parse_address(raw: &str) -> BridgeResult<Address>
{
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => raw.parse::<u64>(),
    };
    parsed
        .map(Address::from)
        .map_err(|err| BridgeError::InvalidArgument(format!("bad address {raw:?}: {err}")))
}
