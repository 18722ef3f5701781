//! pw-cli - Command line tool for drawing land parcels and analyzing
//! vegetation change between two periods.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pw-cli",
    version,
    about = "Land parcel vegetation-change toolkit"
)]
struct Cli {
    #[command(flatten)]
    settings: pw_cmd::Settings,

    #[command(subcommand)]
    command: pw_cmd::Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    pw_cmd::run(cli.settings, cli.command).await
}
