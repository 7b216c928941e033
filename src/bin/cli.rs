//! gridclc CLI
//!
//! Command-line interface for encoding, decoding and inspecting data-grid
//! client protocol messages.

use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gridclc::codec::{engine, table, OperationDescriptor, Routing};
use gridclc::protocol::{split_message, FragmentAssembler};
use gridclc::transport::{read_all_messages, write_message};
use gridclc::{ClientMessage, CommandRegistry, Config, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Exit code for configuration errors
const EXIT_CONFIG: i32 = 2;

/// Exit code when the bytes do not match the expected wire format
const EXIT_PROTOCOL: i32 = 3;

/// gridclc CLI
#[derive(Parser, Debug)]
#[command(name = "gridclc")]
#[command(about = "Command-line client for the data-grid binary protocol")]
#[command(version)]
struct Args {
    /// Configuration override (KEY=VALUE), may be repeated
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    set: Vec<String>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every operation with its message types and field offsets
    Ops,

    /// Encode a request
    Encode {
        /// Command verb (e.g. map:put)
        verb: String,

        /// Request fields as KEY=VALUE
        fields: Vec<String>,

        /// Partition id for partition-routed operations
        #[arg(short, long)]
        partition: Option<i32>,

        /// Write wire bytes to this file instead of printing a frame dump
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Decode a response captured in a file
    Decode {
        /// Command verb the response belongs to
        verb: String,

        /// File holding the wire bytes
        file: PathBuf,
    },

    /// Dump every frame of every message in a file
    Inspect {
        /// File holding the wire bytes
        file: PathBuf,
    },

    /// Validate the operation table
    Check,
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args.set) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Initialize tracing/logging
    let fallback = if args.verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},gridclc={}", fallback, fallback)));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("gridclc v{}", gridclc::VERSION);

    if let Err(e) = table::self_check() {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args.command, &config) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        let code = if e.is_protocol_violation() { EXIT_PROTOCOL } else { 1 };
        std::process::exit(code);
    }
}

fn load_config(overrides: &[String]) -> Result<Config> {
    let mut config = Config::default();
    for pair in overrides {
        config.apply_pair(pair)?;
    }
    Ok(config)
}

fn run(command: Commands, config: &Config) -> Result<()> {
    let registry = CommandRegistry::new();
    match command {
        Commands::Ops => {
            for (verb, op) in registry.verbs() {
                print_operation(verb, op);
            }
            Ok(())
        }
        Commands::Encode {
            verb,
            fields,
            partition,
            out,
        } => {
            let op = registry.get(&verb)?;
            let values = gridclc::commands::parse_arguments(op, &fields)?;
            let request = engine::encode_request(op, partition, &values)?;
            match out {
                Some(path) => {
                    let fragments = split_message(request, config.fragment_size, 1);
                    let mut file = File::create(&path)?;
                    for fragment in &fragments {
                        write_message(&mut file, fragment)?;
                    }
                    tracing::info!("Wrote {} message(s) to {}", fragments.len(), path.display());
                    Ok(())
                }
                None => {
                    print_message(&request);
                    Ok(())
                }
            }
        }
        Commands::Decode { verb, file } => {
            let op = registry.get(&verb)?;
            let bytes = std::fs::read(&file)?;
            let mut assembler = FragmentAssembler::new(config.max_message_size);
            for wire in read_all_messages(&bytes, config.max_frame_size, config.max_message_size)? {
                let Some(message) = assembler.accept(wire)? else {
                    continue;
                };
                if message.is_event() {
                    tracing::debug!("Skipping event {}", message);
                    continue;
                }
                let fields = engine::decode_response(op, &message)?;
                println!("{}", op.name);
                for (name, value) in fields.iter() {
                    println!("  {} = {}", name, value);
                }
            }
            if assembler.pending() > 0 {
                tracing::warn!("{} fragmented message(s) left incomplete", assembler.pending());
            }
            Ok(())
        }
        Commands::Inspect { file } => {
            let bytes = std::fs::read(&file)?;
            for message in read_all_messages(&bytes, config.max_frame_size, config.max_message_size)? {
                print_message(&message);
            }
            Ok(())
        }
        Commands::Check => {
            table::self_check()?;
            println!("OK: {} operations, {} events", table::OPERATIONS.len(), table::EVENTS.len());
            Ok(())
        }
    }
}

// =============================================================================
// Output
// =============================================================================

fn print_operation(verb: &str, op: &OperationDescriptor) {
    let routing = match op.routing {
        Routing::Any => "any",
        Routing::Partition => "partition",
    };
    println!(
        "{:<24} {:<30} request=0x{:06x} response=0x{:06x} routing={} retryable={}",
        verb, op.name, op.request.message_type, op.response.message_type, routing, op.retryable
    );
    for (index, field) in op.request.fixed.iter().enumerate() {
        println!(
            "    @{:<3} {}: {}",
            op.request.offset_of(index),
            field.name,
            field.kind.name()
        );
    }
    for field in op.request.vars {
        println!("    +    {}: {}", field.name, field.kind.name());
    }
}

fn print_message(message: &ClientMessage) {
    println!("{}", message);
    for (index, frame) in message.frames().iter().enumerate() {
        println!(
            "  [{}] flags=0x{:04x} len={} {}",
            index,
            frame.flags,
            frame.frame_length(),
            hex_preview(&frame.content)
        );
    }
}

fn hex_preview(content: &[u8]) -> String {
    const PREVIEW: usize = 32;
    let mut hex: String = content
        .iter()
        .take(PREVIEW)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ");
    if content.len() > PREVIEW {
        hex.push_str(" ...");
    }
    hex
}
