use clap::Parser;
use ruleconv::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
