use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match quotevote_server::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("event=server_exit module=server status=error error={e}");
            eprintln!("quotevote-server: {e}");
            ExitCode::FAILURE
        }
    }
}
