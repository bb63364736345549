//! Serenity event handler for the brevity code bot.
//!
//! Registers the slash commands once connected and routes each command
//! interaction to [`BotService`]. Service errors become short replies to the
//! user; only failures to talk to Discord are returned as errors.

use crate::commands::{
    self, CHECK_PERMS, DEFINE, DISABLE_POSTING, ENABLE_POSTING, GREENIE_BOARD, NEXT_TERM, QUIZ,
    RELOAD_TERMS, SET_FREQUENCY, SETUP,
};
use crate::embeds::{greenie_embed, term_embed};
use crate::permissions::permission_report;
use crate::quiz::run_quiz;
use crate::{DiscordError, DiscordErrorKind, DiscordResult, FlickrImages};
use brevity_bot::BotService;
use brevity_core::{ChannelId, GuildId, UserId};
use brevity_error::{BrevityError, InputError, InputErrorKind};
use chrono::Utc;
use serenity::all::{
    Command, CommandInteraction, Context, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse, EventHandler, GatewayIntents,
    Interaction, Ready, ResolvedValue,
};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Event handler for the brevity code bot.
pub struct BrevityHandler {
    service: BotService,
    images: Option<Arc<FlickrImages>>,
    wiki_base: String,
}

impl BrevityHandler {
    /// Creates a handler over `service`.
    pub fn new(
        service: BotService,
        images: Option<Arc<FlickrImages>>,
        wiki_base: impl Into<String>,
    ) -> Self {
        Self {
            service,
            images,
            wiki_base: wiki_base.into(),
        }
    }

    /// Required gateway intents. Slash commands need no privileged intents.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
    }

    #[instrument(
        skip(self, ctx, command),
        fields(command = %command.data.name, guild_id = ?command.guild_id, user_id = %command.user.id)
    )]
    async fn dispatch(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        debug!("Handling command");
        match command.data.name.as_str() {
            SETUP => self.setup(ctx, command).await,
            NEXT_TERM => self.next_term(ctx, command).await,
            DEFINE => self.define(ctx, command).await,
            RELOAD_TERMS => self.reload_terms(ctx, command).await,
            SET_FREQUENCY => self.set_frequency(ctx, command).await,
            ENABLE_POSTING => self.set_posting(ctx, command, true).await,
            DISABLE_POSTING => self.set_posting(ctx, command, false).await,
            QUIZ => self.quiz(ctx, command).await,
            GREENIE_BOARD => self.greenie_board(ctx, command).await,
            CHECK_PERMS => self.check_perms(ctx, command).await,
            other => {
                warn!(command = other, "Unknown command");
                reply(ctx, command, "I don't know that command.", true).await?;
                Err(DiscordError::new(DiscordErrorKind::InteractionFailed(format!(
                    "Unknown command: {}",
                    other
                ))))
            }
        }
    }

    async fn setup(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        let Some(guild) = require_guild(ctx, command).await? else {
            return Ok(());
        };
        let channel = ChannelId(command.channel_id.get());
        match self.service.setup(guild, channel).await {
            Ok(config) => {
                reply(
                    ctx,
                    command,
                    format!(
                        "✅ Brevity terms will be posted in <#{}> every {} hour(s).",
                        config.channel_id(),
                        config.frequency_hours()
                    ),
                    false,
                )
                .await
            }
            Err(e) => reply_error(ctx, command, &e).await,
        }
    }

    async fn next_term(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        let Some(guild) = require_guild(ctx, command).await? else {
            return Ok(());
        };
        command.defer(&ctx.http).await?;

        let term = match self.service.next_term(guild, Utc::now()).await {
            Ok(term) => term,
            Err(e) => {
                return edit(ctx, command, EditInteractionResponse::new().content(e.user_message()))
                    .await;
            }
        };
        let image = match &self.images {
            Some(images) => images.random_photo().await,
            None => None,
        };
        let embed = term_embed(&term, &self.wiki_base, image.as_deref());
        edit(ctx, command, EditInteractionResponse::new().embed(embed)).await
    }

    async fn define(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        let query = string_option(command, "term").unwrap_or_default();
        match self.service.define(&query) {
            Ok(term) => reply_embed(ctx, command, term_embed(&term, &self.wiki_base, None), false).await,
            Err(e) => reply_error(ctx, command, &e).await,
        }
    }

    async fn reload_terms(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        command.defer_ephemeral(&ctx.http).await?;
        let content = match self.service.reload_terms().await {
            Ok(count) => format!("🔄 Reloaded {} brevity terms.", count),
            Err(e) => e.user_message(),
        };
        edit(ctx, command, EditInteractionResponse::new().content(content)).await
    }

    async fn set_frequency(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        let Some(guild) = require_guild(ctx, command).await? else {
            return Ok(());
        };
        let hours = integer_option(command, "hours").unwrap_or(0);
        match self.service.set_frequency(guild, hours).await {
            Ok(config) => {
                reply(
                    ctx,
                    command,
                    format!("⏲️ Terms will be posted every {} hour(s).", config.frequency_hours()),
                    true,
                )
                .await
            }
            Err(e) => reply_error(ctx, command, &e).await,
        }
    }

    async fn set_posting(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        enabled: bool,
    ) -> DiscordResult<()> {
        let Some(guild) = require_guild(ctx, command).await? else {
            return Ok(());
        };
        match self.service.set_posting(guild, enabled).await {
            Ok(config) => {
                let content = if enabled {
                    format!("▶️ Scheduled posts resumed in <#{}>.", config.channel_id())
                } else {
                    "⏸️ Scheduled posts paused. /nextterm still works.".to_string()
                };
                reply(ctx, command, content, true).await
            }
            Err(e) => reply_error(ctx, command, &e).await,
        }
    }

    async fn quiz(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        let Some(guild) = require_guild(ctx, command).await? else {
            return Ok(());
        };
        let mode = string_option(command, "mode");
        let settings = match self.service.quiz_settings(
            integer_option(command, "questions"),
            mode.as_deref(),
            integer_option(command, "duration"),
        ) {
            Ok(settings) => settings,
            Err(e) => return reply_error(ctx, command, &e).await,
        };
        let user = UserId(command.user.id.get());
        let session = match self.service.start_quiz(guild, user, settings) {
            Ok(session) => session,
            Err(e) => return reply_error(ctx, command, &e).await,
        };

        if session.settings().mode().is_ephemeral() {
            command.defer_ephemeral(&ctx.http).await?;
        } else {
            command.defer(&ctx.http).await?;
        }
        run_quiz(ctx, command, &self.service, session).await
    }

    async fn greenie_board(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        let Some(guild) = require_guild(ctx, command).await? else {
            return Ok(());
        };
        let user = UserId(command.user.id.get());
        match self.service.greenie_board(guild, user).await {
            Ok(board) => {
                let name = command.user.global_name.as_deref().unwrap_or(&command.user.name);
                reply_embed(ctx, command, greenie_embed(name, &board), false).await
            }
            Err(e) => reply_error(ctx, command, &e).await,
        }
    }

    async fn check_perms(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        let Some(guild) = require_guild(ctx, command).await? else {
            return Ok(());
        };
        let config = match self.service.status(guild).await {
            Ok(config) => config,
            Err(e) => return reply_error(ctx, command, &e).await,
        };
        let report = permission_report(command.app_permissions, config.as_ref(), Utc::now());
        reply(ctx, command, report, true).await
    }
}

#[async_trait]
impl EventHandler for BrevityHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );
        let definitions = commands::definitions(self.service.quiz_config());
        match Command::set_global_commands(&ctx.http, definitions).await {
            Ok(registered) => info!(count = registered.len(), "Registered slash commands"),
            Err(e) => error!(error = %e, "Failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // Button presses are consumed by the quiz collectors.
        let Interaction::Command(command) = interaction else {
            return;
        };
        if let Err(e) = self.dispatch(&ctx, &command).await {
            error!(command = %command.data.name, error = %e, "Command failed");
        }
    }
}

/// The invoking guild, replying with a refusal when used outside one.
async fn require_guild(
    ctx: &Context,
    command: &CommandInteraction,
) -> DiscordResult<Option<GuildId>> {
    match command.guild_id {
        Some(guild) => Ok(Some(GuildId(guild.get()))),
        None => {
            let err = BrevityError::from(InputError::new(InputErrorKind::GuildOnly));
            reply_error(ctx, command, &err).await?;
            Ok(None)
        }
    }
}

fn integer_option(command: &CommandInteraction, name: &str) -> Option<i64> {
    command
        .data
        .options()
        .into_iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.value {
            ResolvedValue::Integer(value) => Some(value),
            _ => None,
        })
}

fn string_option(command: &CommandInteraction, name: &str) -> Option<String> {
    command
        .data
        .options()
        .into_iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.value {
            ResolvedValue::String(value) => Some(value.to_string()),
            _ => None,
        })
}

async fn reply(
    ctx: &Context,
    command: &CommandInteraction,
    content: impl Into<String>,
    ephemeral: bool,
) -> DiscordResult<()> {
    let message = CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(ephemeral);
    command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}

async fn reply_embed(
    ctx: &Context,
    command: &CommandInteraction,
    embed: CreateEmbed,
    ephemeral: bool,
) -> DiscordResult<()> {
    let message = CreateInteractionResponseMessage::new()
        .embed(embed)
        .ephemeral(ephemeral);
    command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}

async fn reply_error(
    ctx: &Context,
    command: &CommandInteraction,
    err: &BrevityError,
) -> DiscordResult<()> {
    warn!(command = %command.data.name, error = %err, "Command rejected");
    reply(ctx, command, err.user_message(), true).await
}

async fn edit(
    ctx: &Context,
    command: &CommandInteraction,
    builder: EditInteractionResponse,
) -> DiscordResult<()> {
    command.edit_response(&ctx.http, builder).await?;
    Ok(())
}
