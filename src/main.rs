use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use gnomebot::config::BotConfig;
use poise::serenity_prelude as serenity;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;
mod report;

use commands::{
    admins::{say::*, unlock::*},
    general::{clapback::*, code::*, mock::*, ping::*, quote::*},
    image::{GenerationLock, imagine::*},
};
use report::{code_block, report};

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;
type CommandResult = Result<(), Error>;

// User data, which is stored and accessible in all command invocations
struct Data {
    config: BotConfig,
    /// Held while an `/imagine` generation is running.
    generation_lock: GenerationLock,
}

#[poise::command(slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let allowed = ctx.data().config.is_admin(ctx.author().id.get());
    if !allowed {
        ctx.say("You do not have the permissions for this").await?;
    }
    Ok(allowed)
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command `{}` failed: {}", ctx.command().name, error);
            report(
                &ctx.serenity_context().http,
                &ctx.data().config.debug_channels,
                &code_block(&format!("Command `{}` failed: {}", ctx.command().name, error)),
            )
            .await;
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gnomebot=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env()?;
    let token = config.discord_token.clone();
    info!(
        "Image output directory: {}, forwarded ip: {}",
        config.output_dir.display(),
        config.session.forwarded_ip
    );

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let commands = vec![
        // Default commands
        register(),
        help(),
        // General commands
        ping(),
        code(),
        mock(),
        clapback(),
        quote(),
        // Image commands
        imagine(),
        // Admin commands
        unlock(),
        say(),
    ];

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("{} is online!", ready.user.name);
                report(&ctx.http, &config.debug_channels, "Gnomebot is online!").await;
                Ok(Data {
                    config,
                    generation_lock: GenerationLock::new(),
                })
            })
        });

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework.build())
        .await?;

    client.start().await.map_err(Into::into)
}
