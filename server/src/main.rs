use fleetward_server::config::ServerConfig;
use tracing::error;

#[tokio::main]
async fn main() -> std::process::ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let res = match ServerConfig::from_env() {
		Ok(config) => fleetward_server::run(config).await,
		Err(err) => Err(err),
	};

	match res {
		Ok(()) => std::process::ExitCode::SUCCESS,
		Err(err) => {
			error!("FATAL: {}", err);
			std::process::ExitCode::FAILURE
		}
	}
}

// vim: ts=4
