use adder_server::agent::AgentClient;
use adder_server::config::ServerConfig;
use adder_server::routes;
use adder_server::state::AppState;

use actix_web::{web, App, HttpServer};
use adder_core::{setup_logger, Authenticator, JobController, PhonePool, PlatformClient, PoolStore};
use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let config = ServerConfig::load(&args.config)?;
    let _log_guard = setup_logger(config.log_dir.as_deref());

    info!(
        "adder-server v{} starting (agent: {})",
        env!("CARGO_PKG_VERSION"),
        config.agent_url
    );

    let pool = Arc::new(PhonePool::with_store(PoolStore::new(&config.phones_file))?);
    info!(
        "Loaded {} account(s) from {}",
        pool.len(),
        config.phones_file
    );

    let agent = Arc::new(AgentClient::new(&config.agent_url)?);
    let controller = Arc::new(JobController::new(
        Arc::clone(&pool),
        Arc::clone(&agent) as Arc<dyn PlatformClient>,
    ));

    let state = web::Data::new(AppState {
        pool,
        controller: Arc::clone(&controller),
        authenticator: agent as Arc<dyn Authenticator>,
    });

    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    // Let a running job wind down before the process exits.
    controller.stop();
    controller.join().await;
    Ok(())
}
