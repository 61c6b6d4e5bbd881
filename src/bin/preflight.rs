//! Checks configuration and store connectivity before the API server is started.

use order_catalogue::domain::model::{all_models, ResourceModel};
use order_catalogue::infra::config::{Config, StoreBackend};
use order_catalogue::CatalogueService;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads env vars (or .env):\n\
           STORE_BACKEND (postgres|memory), DATABASE_URL, DB_MAX_CONNECTIONS,\n\
           PORT, BIND_ADDR, API_BASE_PATH\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  STORE_BACKEND={:?}", config.store_backend);
    println!("  LISTEN_ADDR={}", config.listen_addr());
    println!(
        "  API_BASE_PATH={}",
        if config.api_base_path.is_empty() { "/" } else { config.api_base_path.as_str() }
    );
    if config.store_backend == StoreBackend::Postgres {
        println!("  DB_MAX_CONNECTIONS={}", config.db_max_connections);
    }

    // Connecting also creates any missing collections and unique indexes.
    let service = CatalogueService::connect(&config).await?;
    service.ping().await?;
    println!("  Store reachable.");

    for model in all_models() {
        let count = service.list(model).await?.len();
        let unique = model.unique_fields();
        println!(
            "  Collection `{}`: {} record(s){}",
            model.collection_name(),
            count,
            if unique.is_empty() {
                String::new()
            } else {
                format!(", unique on {}", unique.join(", "))
            }
        );
    }

    println!("> Preflight OK.");
    Ok(())
}
