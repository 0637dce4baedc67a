use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Discord bot that posts Guest / Candidate role toggle panels
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Register commands per-guild instead of globally (faster for testing)
    #[arg(long)]
    guild_commands: bool,

    /// Specific guild ID to register commands to (overrides DISCORD_GUILD_ID)
    #[arg(long)]
    guild_id: Option<u64>,
}

mod commands;
mod config;
mod error;
mod events;
mod logging;
mod managers;
mod messages;
mod panel;
mod permissions;
mod state;

use commands::setup_roles;
use config::{CommandScope, Settings};
use events::{
    handle_channel_deleted, handle_component_interaction, handle_guild_left,
    handle_messages_deleted,
};
use managers::run_startup_permission_check;
use state::{create_shared_panel_store, PanelStore, SharedPanelStore};

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared application state
pub struct Data {
    pub panel_store: SharedPanelStore,
    /// Path of the panel store file
    pub store_path: String,
    pub panel_footer: String,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            if let Err(e) = handle_component_interaction(ctx, component, data).await {
                error!("Failed to handle button click: {}", e);
            }
        }
        serenity::FullEvent::MessageDelete {
            deleted_message_id, ..
        } => {
            handle_messages_deleted(&[*deleted_message_id], data).await;
        }
        serenity::FullEvent::MessageDeleteBulk {
            multiple_deleted_messages_ids,
            ..
        } => {
            handle_messages_deleted(multiple_deleted_messages_ids, data).await;
        }
        serenity::FullEvent::ChannelDelete { channel, .. } => {
            handle_channel_deleted(channel.id, data).await;
        }
        // Outages also arrive as GuildDelete, with `unavailable` set
        serenity::FullEvent::GuildDelete { incomplete, .. } if !incomplete.unavailable => {
            handle_guild_left(incomplete.id, data).await;
        }
        _ => {}
    }
    Ok(())
}

async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<Data, Error>],
    scope: CommandScope,
    ready_guilds: &[serenity::GuildId],
) {
    let guilds = match scope {
        CommandScope::Global => {
            info!("Registering commands globally...");
            match poise::builtins::register_globally(ctx, commands).await {
                Ok(()) => info!(
                    "Successfully registered {} commands globally (may take up to 1 hour to propagate)",
                    commands.len()
                ),
                Err(e) => error!("Failed to register commands globally: {}", e),
            }
            return;
        }
        CommandScope::AllGuilds => ready_guilds.to_vec(),
        CommandScope::Guild(id) => vec![serenity::GuildId::new(id)],
    };

    for guild_id in guilds {
        info!("Registering commands to guild: {}", guild_id);
        if let Err(e) = poise::builtins::register_in_guild(ctx, commands, guild_id).await {
            error!("Failed to register commands for guild {}: {}", guild_id, e);
        } else {
            info!(
                "Successfully registered {} commands for guild {}",
                commands.len(),
                guild_id
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(tracing_subscriber::filter::LevelFilter::INFO);
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    logging::init(settings.log_level);

    let scope = CommandScope::resolve(args.guild_commands, args.guild_id, settings.guild_id);
    info!("Command registration scope: {:?}", scope);

    // Ensure state directory exists
    if let Err(e) = tokio::fs::create_dir_all(&settings.state_path).await {
        warn!("Could not create state directory {}: {}", settings.state_path, e);
    }

    let store_path = settings.panel_store_path();
    info!("Loading role panels from {}...", store_path);
    let panel_store = PanelStore::load(&store_path).await.unwrap_or_else(|e| {
        warn!("Could not load panel store: {}, using empty store", e);
        PanelStore::new()
    });
    info!("Loaded {} role panel(s)", panel_store.len());
    let panel_store = create_shared_panel_store(panel_store);

    let panel_footer = settings.panel_footer.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![setup_roles()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' invoked by {} (ID: {}) in {}",
                        ctx.command().qualified_name,
                        ctx.author().name,
                        ctx.author().id,
                        ctx.guild_id().map(|g| g.to_string()).unwrap_or_else(|| "DM".to_string())
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' completed for {}",
                        ctx.command().qualified_name,
                        ctx.author().name
                    );
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Error in command '{}': {}", ctx.command().qualified_name, error);
                            let _ = ctx
                                .send(
                                    poise::CreateReply::default()
                                        .content(messages::unexpected_error(&error.to_string()))
                                        .ephemeral(true),
                                )
                                .await;
                        }
                        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
                            error!("Argument parse error in '{}': {} (input: {:?})", ctx.command().qualified_name, error, input);
                        }
                        poise::FrameworkError::MissingBotPermissions { missing_permissions, ctx, .. } => {
                            error!("Bot missing permissions for '{}': {:?}", ctx.command().qualified_name, missing_permissions);
                            let _ = ctx.say(format!("Bot is missing permissions: {:?}", missing_permissions)).await;
                        }
                        poise::FrameworkError::GuildOnly { ctx, .. } => {
                            error!("Command '{}' is guild-only, used in DM by {}", ctx.command().qualified_name, ctx.author().name);
                        }
                        other => {
                            error!("Other framework error: {}", other);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            let panel_store = panel_store.clone();

            Box::pin(async move {
                info!("Logged in as {} (ID: {})", ready.user.name, ready.user.id);

                let guild_ids: Vec<serenity::GuildId> = ready.guilds.iter().map(|g| g.id).collect();
                if guild_ids.is_empty() {
                    warn!("Bot is not in any guilds - skipping permission check");
                } else {
                    let mut panel_roles: HashMap<serenity::GuildId, Vec<serenity::RoleId>> =
                        HashMap::new();
                    for binding in panel_store.read().await.panels.values() {
                        panel_roles
                            .entry(binding.guild_id)
                            .or_default()
                            .extend([binding.guest_role_id, binding.candidate_role_id]);
                    }
                    run_startup_permission_check(ctx.http.as_ref(), &guild_ids, &panel_roles)
                        .await;
                }

                register_commands(ctx, &framework.options().commands, scope, &guild_ids).await;

                Ok(Data {
                    panel_store,
                    store_path,
                    panel_footer,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut client = serenity::ClientBuilder::new(&settings.token, intents)
        .framework(framework)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested, closing gateway connection...");
            shard_manager.shutdown_all().await;
        }
    });

    info!("Starting bot...");
    if let Err(e) = client.start().await {
        let err_str = e.to_string();
        if err_str.contains("Disallowed") || err_str.contains("intents") {
            error!("Failed to start bot: {}", e);
            error!("The GUILD_MEMBERS privileged intent needs to be enabled in the Discord Developer Portal");
            error!("Go to https://discord.com/developers/applications -> Your App -> Bot -> Privileged Gateway Intents");
            return Err(anyhow::anyhow!(
                "Disallowed gateway intents. Enable GUILD_MEMBERS in the Discord Developer Portal"
            ));
        }
        return Err(e.into());
    }
    warn!("Bot ended.");

    Ok(())
}
