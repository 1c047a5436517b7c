mod collect;
mod vendor_list;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::collect::CollectArgs;
use crate::vendor_list::VendorListArgs;

#[derive(Debug, Parser)]
#[command(name = "agencydir")]
#[command(about = "Partner discovery and vendor list tooling for the agency directory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover, verify and stage new partner candidates
    CollectPartners(CollectArgs),
    /// Merge listings and staging files into the vendor master list
    BuildVendorList(VendorListArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = agencydir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::CollectPartners(args) => collect::run_collect_partners(&config, &args).await,
        Commands::BuildVendorList(args) => vendor_list::run_build_vendor_list(&config, &args),
    }
}
