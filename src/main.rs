use statik::{config, logger, server};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sizing worker threads from configuration
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
        logger::log_debug(&format!("Using {workers} worker threads"));
    } else {
        logger::log_debug("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), BoxError> {
    let static_server = server::Server::bind(&cfg)?;
    logger::log_server_start(&static_server.local_addr()?, static_server.site().path());

    static_server.run(server::shutdown_signal()).await;
    Ok(())
}
