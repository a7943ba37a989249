// src/main.rs
use tray_fill::api;
use tray_fill::config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();
    let solver_config = app_config.solver.solver_config();

    println!("🚀 Tray fill service starting...");
    if let Err(err) = api::start_api_server(app_config.api, solver_config, app_config.defaults).await {
        eprintln!("❌ API server terminated with an error: {err}");
        std::process::exit(1);
    }
}
