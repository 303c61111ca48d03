use anyhow::Context;
use rental_server::{config::Config, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = Config::from_env().context("load configuration")?;
	let addr = config.bind_addr;
	let app = router(AppState::seeded(config));

	let listener = tokio::net::TcpListener::bind(addr)
		.await
		.with_context(|| format!("bind {}", addr))?;
	log::info!("listening on http://{}", addr);
	axum::serve(listener, app).await.context("server shutdown")?;

	Ok(())
}
