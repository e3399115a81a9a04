// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Daycare server binary.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use daycare_server::{create_app_state, create_router, session_cleanup};
use daycare_server_config::{LogFormat, ServerConfig};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Daycare server - role dashboards and messaging for staff and parents.
#[derive(Parser, Debug)]
#[command(name = "daycare-server", about = "Daycare access-control server", version)]
struct Args {
	/// Path to a TOML config file. Defaults to /etc/daycare/server.toml.
	#[arg(long, env = "DAYCARE_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn init_tracing(config: &ServerConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	match config.logging.format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => daycare_server_config::load_config_with_file(path)?,
		None => daycare_server_config::load_config()?,
	};

	init_tracing(&config);

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		base_url = %config.http.base_url,
		database = %config.database.url,
		gate_failure_mode = %config.auth.gate_failure_mode,
		"starting daycare-server"
	);

	let pool = daycare_server_db::create_pool(&config.database.url).await?;
	daycare_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config);
	let cleanup = session_cleanup::spawn(
		Arc::clone(&state.session_store),
		session_cleanup::DEFAULT_CLEANUP_INTERVAL,
	);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	cleanup.abort();
	tracing::info!("Server shutdown complete");
	Ok(())
}
