//! Tilegfx - command-line tool for encoding, importing and optimizing console tile graphics

use std::process::ExitCode;

use tilegfx::cli;

fn main() -> ExitCode {
    cli::run()
}
