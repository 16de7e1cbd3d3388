use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    info!("Starting questionnaire");

    match cli.command {
        Commands::New {
            title,
            program,
            kind,
            out,
        } => commands::new::run(title, program, &kind, &out),
        Commands::Show { file } => commands::show::run(&file),
        Commands::Edit { file, plain } => commands::edit::run(&file, plain),
        Commands::Pull { id, out } => {
            let remote = Config::load()?.remote(cli.api_url, cli.token)?;
            commands::pull::run(&remote, id, &out).await
        }
        Commands::Push { id, file } => {
            let remote = Config::load()?.remote(cli.api_url, cli.token)?;
            commands::push::run(&remote, id, &file).await
        }
        Commands::Configure { timeout } => {
            commands::configure::run(&Config::get_config_path()?, cli.api_url, cli.token, timeout)
        }
    }
}
