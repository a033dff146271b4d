mod api_doc;
mod error;
mod handlers;
mod middleware;
mod services;
mod setup;
mod state;
mod telemetry;
mod utils;

use catflow_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, broker, services, routes)
    let (state, router) = crate::setup::initialize_app(config.clone()).await?;

    // Serve until a shutdown signal arrives
    let served = crate::setup::server::start_server(&config, router).await;

    // The producer is closed exactly once, after the server stops taking requests
    crate::setup::broker::close_broker(state.broker.as_ref()).await;

    served
}
