//! Gridbook main entry point

use clap::Parser;
use gridbook_api::start_server;
use gridbook_config::Config;
use gridbook_core::{seed_accounts, MemoryRepository, StaticOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "gridbook")]
#[command(version = "0.1.0")]
#[command(about = "An editable transaction grid with a stub HTTP API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    rt.block_on(async {
        let config = Config::load_or_default(&args.config)?;
        log::info!(
            "Config loaded: {}:{}, {} records/page, {} paging",
            config.server.host,
            config.server.port,
            config.pagination.records_per_page,
            config.pagination.mode
        );

        let repo = if config.seed.demo_data {
            log::info!("Seeding demo transactions");
            Arc::new(MemoryRepository::seeded())
        } else {
            Arc::new(MemoryRepository::new())
        };
        let accounts = Arc::new(StaticOptions::new(seed_accounts()));

        start_server(config, repo, accounts).await
    })
}
