use anyhow::Context;
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;
use std::time::Duration;
use ticketserver::commands::halt::HaltDispatcher;
use ticketserver::commands::{CommandRegistry, CommandSpec, CommandSurface};
use ticketserver::config::AppConfig;
use ticketserver::gateway;
use ticketserver::platform::discord::DiscordPlatform;
use ticketserver::platform::ChatPlatform;
use ticketserver::shared::state::AppState;
use ticketserver::shared::utils::create_conn;
use ticketserver::tickets::store::{DieselConfigStore, DieselTicketStore};

fn build_registry(platform: Arc<dyn ChatPlatform>) -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register(CommandSpec::new(
        "ticket",
        CommandSurface::Slash,
        "Open a support ticket",
    ));
    registry.register(
        CommandSpec::new(
            "configure",
            CommandSurface::Slash,
            "Manage the ticketing configuration for this server",
        )
        .cooldown(Duration::from_secs(2 * 60))
        .require_member_permission("ManageChannels"),
    );

    registry.install_halt_fallback(Arc::new(HaltDispatcher::new(platform)));
    registry
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let config = AppConfig::from_env().context("Failed to load config from env")?;
    std::env::set_var("DATABASE_URL", config.database_url());

    let pool = create_conn().context("Failed to create database pool")?;

    let platform: Arc<dyn ChatPlatform> = Arc::new(DiscordPlatform::new(
        config.discord.bot_token.clone(),
        config.discord.application_id.clone(),
    ));

    let registry = Arc::new(build_registry(Arc::clone(&platform)));

    let state = Arc::new(AppState {
        config: config.clone(),
        conn: pool.clone(),
        platform,
        configs: Arc::new(DieselConfigStore::new(pool.clone())),
        tickets: Arc::new(DieselTicketStore::new(pool)),
        registry,
    });

    let app = gateway::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting interactions server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")
}
