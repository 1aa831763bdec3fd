//! ledgerdesk entry point.
//!
//! Parses CLI arguments, dispatches to the CLI module, prints errors to
//! stderr, and exits non-zero on failure. All logic lives elsewhere.

use ledgerdesk::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
