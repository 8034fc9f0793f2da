use clap::Parser;
use ecprot::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{cluster, extract},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Cluster(_) => "cluster",
        Command::Extract(_) => "extract",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Cluster(args) => cluster::cluster(args)?,
        Command::Extract(args) => extract::extract(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e.to_string());
    }
}
