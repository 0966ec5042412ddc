//! midlet-store CLI entry point
//!
//! Parses arguments via `cli::run`, prints errors to stderr and exits
//! non-zero on failure. All logic lives in the CLI module.

use midlet_store::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
