//! Gateway client setup and lifecycle.

use crate::{BrevityHandler, DiscordError, DiscordErrorKind};
use serenity::Client;
use serenity::all::ShardManager;
use std::sync::Arc;
use tracing::{info, instrument};

/// The connected brevity code bot.
///
/// # Example
/// ```no_run
/// use brevity_discord::{BrevityDiscordBot, BrevityHandler};
/// # async fn run(handler: BrevityHandler) -> Result<(), Box<dyn std::error::Error>> {
/// let token = std::env::var("DISCORD_TOKEN")?;
/// let mut bot = BrevityDiscordBot::new(&token, handler).await?;
/// bot.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct BrevityDiscordBot {
    client: Client,
}

impl BrevityDiscordBot {
    /// Builds the gateway client around `handler`.
    ///
    /// # Errors
    ///
    /// `ConnectionFailed` when the client cannot be built.
    #[instrument(skip(token, handler), fields(token_len = token.len()))]
    pub async fn new(token: &str, handler: BrevityHandler) -> Result<Self, DiscordError> {
        let intents = BrevityHandler::intents();
        info!(?intents, "Building Discord client");

        let client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        Ok(Self { client })
    }

    /// Handle used to close the gateway on shutdown.
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        Arc::clone(&self.client.shard_manager)
    }

    /// Connects and runs until the gateway closes.
    ///
    /// # Errors
    ///
    /// `ConnectionFailed` when the gateway cannot be reached or closes with
    /// a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), DiscordError> {
        info!("Starting Discord bot");
        self.client.start().await.map_err(|e| {
            DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })
    }
}
