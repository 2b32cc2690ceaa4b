use std::error::Error;

use clap::Parser;

mod cli;
mod keymap;
mod pace;
mod run;

fn main() -> Result<(), Box<dyn Error>> {
    let args = cli::Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    run::run(&args)
}
