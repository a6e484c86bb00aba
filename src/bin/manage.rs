//! Management binary: run the HTTP server or apply migrations.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nuages::config::settings::Settings;
use nuages::config::urls;
use nuages::http::Server;
use nuages::mail::ConsoleEmailBackend;
use nuages::{AppContext, Result, db};

#[derive(Parser)]
#[command(name = "manage", about = "Content and shop backend management")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Start the HTTP server
	Runserver {
		/// Bind address, e.g. 127.0.0.1:8000 (defaults to settings)
		#[arg(long)]
		addr: Option<String>,
	},
	/// Apply pending database migrations
	Migrate,
}

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.init();

	match run(Cli::parse()).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			tracing::error!(%error, "command failed");
			ExitCode::FAILURE
		}
	}
}

async fn run(cli: Cli) -> Result<()> {
	let settings = Settings::from_env()?;

	match cli.command {
		Command::Runserver { addr } => {
			let bind = addr.unwrap_or_else(|| settings.bind_addr.clone());
			let addr = bind
				.parse()
				.map_err(|_| nuages::Error::Internal(format!("invalid bind address: {bind}")))?;

			let pool = db::connect(&settings.database_url).await?;
			let ctx = Arc::new(AppContext::new(settings, pool, Arc::new(ConsoleEmailBackend)));
			Server::new(ctx, urls::routes()).run(addr).await
		}
		Command::Migrate => {
			let pool = db::connect(&settings.database_url).await?;
			db::migrate(&pool).await?;
			tracing::info!("migrations applied");
			Ok(())
		}
	}
}
