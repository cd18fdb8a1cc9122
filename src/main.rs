use budgeteer::{
    config::{database, seed},
    core::{account, sheet},
    errors::Result,
};
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LEDGER_CONFIG: &str = "config.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed categories and accounts from the ledger config, if present
    let config_path = std::env::var("LEDGER_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_LEDGER_CONFIG), PathBuf::from);
    if config_path.exists() {
        let config = seed::load_config(&config_path)?;
        seed::seed_ledger(&db, &config)
            .await
            .inspect_err(|e| error!("Failed to seed ledger: {}", e))?;
    } else {
        warn!("No ledger config at {:?}, skipping seeding", config_path);
    }

    // 5. Report the derived figures
    for acc in account::get_all_accounts(&db).await? {
        let total = account::account_total(&db, &acc).await?;
        info!("Account '{}': balance {} total {}", acc.name, acc.balance, total);
    }
    for s in sheet::get_all_sheets(&db).await? {
        let available = sheet::sheet_available(&db, &s).await?;
        let state = if s.is_open() { "open" } else { "closed" };
        info!(
            "Sheet {}-{:02} ({}): available {}",
            s.year, s.month, state, available
        );
    }

    Ok(())
}
