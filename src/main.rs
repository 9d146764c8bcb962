//! AGC Disassembler - CLI Entry Point
//!
//! Commands:
//! - `agc-disasm <image>` - Same as `disasm <image>`
//! - `agc-disasm disasm <image>` - Decode an image into an instruction listing
//! - `agc-disasm dump <image>` - List raw word values
//! - `agc-disasm peek <image> <address>...` - Read memory-mapped cells

use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(name = "agc-disasm")]
#[command(version)]
#[command(about = "A disassembler for Apollo Guidance Computer core rope images")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Image to disassemble when no command is given
    image: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every word of an image
    Disasm {
        /// Path to the binary image
        image: String,
        /// Emit one JSON object per word
        #[arg(long)]
        json: bool,
        /// Decode the first word with the extended opcode table
        #[arg(long)]
        extended: bool,
    },
    /// Print address and value of every word without decoding
    Dump {
        /// Path to the binary image
        image: String,
    },
    /// Load an image into memory and read cells through the register map
    Peek {
        /// Path to the binary image
        image: String,
        /// Octal addresses to read
        #[arg(required = true)]
        addresses: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    match (cli.command, cli.image) {
        (Some(Commands::Disasm { image, json, extended }), _) => {
            disassemble_file(&image, json, extended);
        }
        (Some(Commands::Dump { image }), _) => {
            dump_file(&image);
        }
        (Some(Commands::Peek { image, addresses }), _) => {
            peek_file(&image, &addresses);
        }
        (None, Some(image)) => {
            disassemble_file(&image, false, false);
        }
        (None, None) => {
            eprintln!("No image given. Use --help for available commands");
            std::process::exit(1);
        }
    }
}

fn load(path: &str) -> agc::Image {
    match agc::load_image(path) {
        Ok(image) => {
            info!("{}: {} words", path, image.len());
            image
        }
        Err(e) => {
            eprintln!("Failed to load image: {}", e);
            std::process::exit(1);
        }
    }
}

fn disassemble_file(path: &str, json: bool, extended: bool) {
    use agc::asm::{Format, Options};

    let image = load(path);
    let options = Options {
        format: if json { Format::Json } else { Format::Text },
        initial_mode: agc::ModeState { extended },
    };

    match agc::disassemble(&image.words, options) {
        Ok(listing) => print!("{}", listing),
        Err(e) => {
            eprintln!("Listing error: {}", e);
            std::process::exit(1);
        }
    }
}

fn dump_file(path: &str) {
    let image = load(path);
    print!("{}", agc::asm::dump(&image.words));
}

fn peek_file(path: &str, addresses: &[String]) {
    let image = load(path);
    let mem = match image.memory_map() {
        Ok(mem) => mem,
        Err(e) => {
            eprintln!("Failed to build memory map: {}", e);
            std::process::exit(1);
        }
    };

    for text in addresses {
        let addr = match usize::from_str_radix(text.trim_start_matches("0o"), 8) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Invalid octal address {:?}: {}", text, e);
                std::process::exit(1);
            }
        };

        match mem.read(addr).and_then(|value| mem.region(addr).map(|region| (value, region))) {
            Ok((value, region)) => println!("{:06o}\t{:06o}\t{:?}", addr, value, region),
            Err(e) => {
                eprintln!("Read error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
