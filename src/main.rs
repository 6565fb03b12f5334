use dotenvy::dotenv;
use expense_tracker::{
    config::{categories, database},
    core::{category, user},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the default category configuration
    let config = categories::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        categories = config.categories.len(),
        "Loaded default category configuration"
    );

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed default categories
    category::seed_default_categories(&db, &config.categories)
        .await
        .inspect(|inserted| info!("Seeded {} default categories", inserted))
        .inspect_err(|e| error!("Failed to seed default categories: {}", e))?;

    let users = user::count_users(&db).await?;
    info!(users, "Expense tracker ready");

    Ok(())
}
