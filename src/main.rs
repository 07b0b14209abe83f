mod cli;
mod error;
mod exporter;
mod fmt;
mod importer;
mod ledger;
mod models;
mod session;
mod settings;
mod simulation;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    // Stay quiet by default; the dashboard owns the terminal
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::dashboard::run(None),
        Some(Commands::Dashboard { file }) => cli::dashboard::run(file),
        Some(Commands::Show { file }) => cli::show::run(&file),
        Some(Commands::Simulate {
            file,
            percent,
            scenario,
            export,
            output,
        }) => cli::simulate::run(&file, percent, scenario, export, output),
        Some(Commands::Export { file, output }) => cli::export::run(&file, output),
        Some(Commands::Config {
            strict,
            extended,
            export_dir,
            user_name,
        }) => cli::config::run(strict, extended, export_dir, user_name),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
