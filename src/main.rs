use news_api::{run_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match Config::from_env() {
        Ok(config) => run_app(&config).await,
        Err(error) => Err(error),
    };
    if let Err(error) = result {
        tracing::error!("Error: {error:#}");
        std::process::exit(1);
    }
}
