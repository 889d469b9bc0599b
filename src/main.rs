use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serenity::model::gateway::GatewayIntents;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use tracing_subscriber::EnvFilter;

use paymaster_bot::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use paymaster_bot::dispatch::MismatchPolicy;
use paymaster_bot::gateway::HttpGateway;
use paymaster_bot::handler::Handler;
use paymaster_bot::model::{AppState, ShardManagerContainer};
use paymaster_bot::session::TokenRegistry;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let token = env::var("DISCORD_TOKEN").expect("Expected DISCORD_TOKEN in the environment.");
    let api_base =
        env::var("PAYMENTS_API_URL").expect("Expected PAYMENTS_API_URL in the environment.");
    let allowed_guild_id = env::var("SERVER_ID")
        .ok()
        .map(|raw| raw.parse::<u64>().expect("SERVER_ID must be a valid number."))
        .map(GuildId::new);
    let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    let mismatch_policy = env::var("MISMATCH_POLICY")
        .ok()
        .and_then(|raw| MismatchPolicy::from_str(&raw).ok())
        .unwrap_or_default();

    let tokens = Arc::new(TokenRegistry::new());
    let gateway = HttpGateway::new(&api_base, Duration::from_secs(timeout_secs), tokens.clone())
        .expect("Error building the payments API client.");
    let app_state = Arc::new(AppState::new(Arc::new(gateway), tokens, mismatch_policy));

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler { allowed_guild_id })
        .await
        .expect("Error creating the Discord client.");

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
        data.insert::<AppState>(app_state);
    }

    if let Err(why) = client.start().await {
        tracing::error!(error = ?why, "client error");
    }
}
