use tunedeck::config::AppConfig;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = tunedeck::run(AppConfig::default()).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
