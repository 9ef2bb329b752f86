// src/main.rs
use clap::Parser;
use job_portal::app_log;
use job_portal::cli::{handle_portal_command, PortalCli};
use job_portal::logging::init_tracing;
use job_portal::ApiError;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    let cli = PortalCli::parse();
    match handle_portal_command(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let err = match e.downcast::<ApiError>() {
                Ok(api_error) => api_error,
                Err(other) => ApiError::unknown(format!("{:#}", other)).with_code("CLI"),
            };
            app_log!(error, "Command failed: {}", err);
            match serde_json::to_string_pretty(&err) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}
