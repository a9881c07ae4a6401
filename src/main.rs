use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match ip_geoguesser::run_with_config().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
