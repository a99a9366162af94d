//! brisk - inspect and exercise the brisk native runtime
//!
//! # Usage
//!
//! ```bash
//! # List every registered routine
//! brisk routines
//!
//! # Boot the runtime and run every module's query pass
//! brisk check
//!
//! # Invoke a routine on a boxed literal
//! brisk call toUnsignedByte '[^d,v,i]' int:42
//! ```
//!
//! A fault raised by a routine ends the process with the fault's status:
//! 254 internal consistency, 253 unsupported type, 252 precondition.

mod literal;
mod logging;

use brisk_runtime::{fault, Runtime, TypeTag};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::process;

#[derive(Parser)]
#[command(name = "brisk")]
#[command(version = "0.1.0")]
#[command(about = "Inspect and exercise the brisk native runtime", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered routines
    Routines {
        /// Only routines with this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Run the module query pass and report failures
    Check,

    /// Invoke a routine on a single boxed argument
    Call {
        /// Routine name, e.g. toUnsignedByte
        name: String,

        /// Signature descriptor, e.g. [^d,v,i]
        signature: String,

        /// Argument literal: <tag>:<value> or null
        arg: String,
    },

    /// Show module order and type tags
    Info,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init_with_level(LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_some() {
        logging::init_from_env();
    } else {
        logging::init();
    }

    let runtime = fault::or_terminate(Runtime::boot);

    let result = match cli.command {
        Commands::Routines { name } => {
            list_routines(&runtime, name.as_deref());
            Ok(())
        }
        Commands::Check => check(&runtime),
        Commands::Call {
            name,
            signature,
            arg,
        } => call(&runtime, &name, &signature, &arg),
        Commands::Info => {
            show_info(&runtime);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn list_routines(runtime: &Runtime, name: Option<&str>) {
    for entry in runtime.registry().entries() {
        if name.map_or(true, |n| n == entry.name) {
            println!("{:<16} {}", entry.name, entry.signature);
        }
    }
}

fn check(runtime: &Runtime) -> Result<(), String> {
    let report = runtime.query_report();
    for (module, message) in &report.failures {
        println!("FAIL {}: {}", module, message);
    }
    println!(
        "{} module(s) queried, {} failure(s)",
        report.queried,
        report.failures.len()
    );

    if report.is_ok() {
        Ok(())
    } else {
        Err("module query pass failed".to_string())
    }
}

fn call(runtime: &Runtime, name: &str, signature: &str, arg: &str) -> Result<(), String> {
    let outcome = fault::catch(|| {
        let arg = literal::parse(arg).map_err(|e| e.to_string())?;
        runtime
            .call(name, signature, &[arg])
            .map_err(|e| e.to_string())
    });

    match outcome {
        Ok(Ok(result)) => {
            println!("{} {}", result.tag(), result);
            Ok(())
        }
        Ok(Err(message)) => Err(message),
        Err(fault) => fault::terminate(&fault),
    }
}

fn show_info(runtime: &Runtime) {
    println!("brisk runtime {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Modules (registration order):");
    for module in runtime.modules() {
        println!("  {}", module);
    }
    println!();
    println!("Type tags:");
    for tag in TypeTag::ALL {
        println!("  {:>2} {}", tag as u32, tag);
    }
    println!();
    println!("{} routine(s) registered", runtime.registry().len());
}
