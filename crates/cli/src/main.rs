use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;
use env_logger::init;
use patch_font_cli::cli::Cli;

fn main() -> ExitCode {
    CompleteEnv::with_factory(Cli::command).complete();
    init();
    match Cli::parse().run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_validation() => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
