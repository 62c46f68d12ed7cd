mod config;
mod domain;
mod greeting;
mod handlers;
mod metrics;
mod webhook;

use std::sync::Arc;
use teloxide::Bot;
use teloxide::requests::Requester;
use teloxide::types::ChatId;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    pretty_env_logger::init();

    let app_config = config::AppConfig::from_env()?;
    let bot_config = config::BotConfig::from_env()?;
    let server_config = config::ServerConfig::from_env();

    // fail fast if the template is broken
    greeting::render_greeting(&app_config.app_name, ChatId(0))?;

    let bot = Bot::new(bot_config.token);
    match bot_config.webhook_url {
        Some(url) => {
            log::info!("Setting a webhook: {url}");
            let mut request = bot.set_webhook(url);
            request.secret_token.clone_from(&app_config.webhook_secret);
            request.await?;
        }
        None => log::info!("WEBHOOK_URL is not set, the webhook is expected to be managed externally"),
    }

    let webhook_path = app_config.webhook_path.clone();
    let app = axum::Router::new()
        .merge(metrics::init())
        .merge(webhook::router(Arc::new(bot), app_config));

    let addr = server_config.listen_addr;
    let tcp_listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening for updates at http://{addr}{webhook_path}");

    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C signal handler");
            log::info!("Shutdown of the webhook server")
        })
        .await?;
    Ok(())
}
