use chrono::{DateTime, Utc};
use config::Config;
use modules::{misc::snipe::SnipeBuffer, system::events::ReadyHandler};
use poise::serenity_prelude::{self as serenity, CreateAllowedMentions};
use std::sync::Arc;
use tracing::{error, info, trace};
use tracing_subscriber::EnvFilter;

mod config;
mod events;
mod modules;
mod utils;

use crate::events::EventManager;

#[derive(Clone, Debug)]
pub struct Data {
    pub config: Arc<Config>,
    pub snipes: Arc<SnipeBuffer>,
    pub event_manager: Arc<EventManager>,
    pub ready_at: DateTime<Utc>,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;
type Command = poise::Command<Data, Error>;

fn where_used(ctx: Context<'_>) -> String {
    ctx.guild_id()
        .map_or_else(|| "DM".to_string(), |id| id.to_string())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command {} failed for {} in {}: {:?}",
                ctx.command().qualified_name,
                ctx.author().tag(),
                where_used(ctx),
                error
            );
            if let Err(e) = ctx.reply("❌ Something went wrong running that command.").await {
                error!("Failed to report command error: {}", e);
            }
        }
        err => {
            if let Err(e) = poise::builtins::on_error(err).await {
                error!("Error while handling framework error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("starting minearchy bot");

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let token = config.token.clone();
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let commands = modules::minecraft::commands()
        .into_iter()
        .chain(modules::misc::commands())
        .collect();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions::<Data, Error> {
            allowed_mentions: Some(CreateAllowedMentions::new().empty_roles().empty_users()),
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    trace!(
                        "Command {} used by {} in {}",
                        ctx.command().qualified_name,
                        ctx.author().tag(),
                        where_used(ctx)
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command {} completed for {} in {}",
                        ctx.command().qualified_name,
                        ctx.author().tag(),
                        where_used(ctx)
                    );
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    data.event_manager.handle_event(ctx, event).await;
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("logged in as {}, registering commands", ready.user.tag());
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let event_manager = Arc::new(EventManager::new());
                let data = Data {
                    config,
                    snipes: Arc::new(SnipeBuffer::new()),
                    event_manager,
                    ready_at: Utc::now(),
                };

                data.event_manager.init(&data).await;
                data.event_manager.add_handler(ReadyHandler).await;

                Ok(data)
            })
        })
        .build();

    // Deleted messages can only be sniped if they are still in the cache.
    let mut cache_settings = serenity::cache::Settings::default();
    cache_settings.max_messages = 200;

    let client = serenity::ClientBuilder::new(token, intents)
        .cache_settings(cache_settings)
        .framework(framework)
        .await;

    let mut client = match client {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
