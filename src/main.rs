use clap::Parser;
use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

use lifeorg::cli;
use lifeorg::cli::commands::{Cli, Commands};
use lifeorg::db::connection::default_db_path;

fn init_logging() {
    let filter = EnvFilter::try_from_env("LIFEORG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    let db_path = cli_args.db.unwrap_or_else(default_db_path);

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(&db_path, json_output),
        Commands::Task(cmd) => cli::task::run(cmd, &db_path, json_output),
        Commands::Habit(cmd) => cli::habit::run(cmd, &db_path, json_output),
        Commands::Timer(cmd) => cli::timer::run(cmd, &db_path, json_output),
        Commands::Settings(cmd) => cli::settings::run(cmd, &db_path, json_output),
        Commands::Export { output } => cli::data::run_export(output.as_deref(), &db_path, json_output),
        Commands::Import { file, yes } => cli::data::run_import(&file, yes, &db_path, json_output),
        Commands::Reset { yes } => cli::data::run_reset(yes, &db_path, json_output),
        Commands::Status => cli::status::run(&db_path, json_output),
    };

    process::exit(exit_code);
}
