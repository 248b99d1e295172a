//! Sage HTTP server binary

use sage::{Catalog, Config, ResearchCorpus, SageEngine};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sage=info,tower_http=info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    println!("Sage product guide");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let config = Config::from_env()?;

    let catalog = Catalog::premo();
    let research = ResearchCorpus::mock();
    println!("✓ Catalog loaded: {} products", catalog.len());
    println!("✓ Research corpus: {} papers", research.all().len());
    println!("✓ Match strategy: {:?}", config.match_strategy);

    let engine = SageEngine::new(
        catalog,
        research,
        config.match_strategy,
        config.max_query_chars,
    )?;

    println!("✓ Starting HTTP server on {}...", config.bind_addr());
    println!();

    sage::server::run_server(engine, &config).await?;

    Ok(())
}
