//! Demonstration client for the user service.
//!
//! Runs the bidirectional exchange against `http://localhost:50051` unless
//! configured otherwise:
//!
//! ```bash
//! USER_CLIENT__CALL_SHAPE=server_stream cargo run -p user-client
//! USER_CLIENT_CONFIG=client.toml cargo run -p user-client
//! ```

use std::process::ExitCode;

use user_client::{ClientConfig, ConsoleReporter, Error, UserClient};

/// Optional path to a `.toml`, `.yaml` or `.json` config file.
const CONFIG_PATH_VAR: &str = "USER_CLIENT_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "User client failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Error> {
    let mut builder = ClientConfig::builder().with_dotenv().with_logging_from_env();
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        builder = builder.with_config_file(path);
    }
    let config = builder.build()?;

    tracing::info!(
        endpoint = %config.channel.endpoint,
        call = %config.call_shape,
        "Connecting to user service"
    );

    let mut client = UserClient::connect(&config).await?;
    client.run(config.call_shape, ConsoleReporter).await?;

    Ok(())
}
