//! `leetrack` command-line entry point.
//!
//! ```bash
//! leetrack add --title "Two Sum" --topic Array --difficulty easy --number 1
//! leetrack review first 1
//! leetrack due
//! leetrack --config leetrack.toml stats
//! ```

mod cli;
mod commands;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    if let Err(err) = commands::execute(cli) {
        log::error!(
            "event=cli_command module=cli status=error error_code={}",
            err.code()
        );
        eprintln!("error[{}]: {err}", err.code());
        std::process::exit(1);
    }
}
