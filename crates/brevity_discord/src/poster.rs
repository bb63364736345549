//! Scheduled posting to Discord channels.

use crate::embeds::{SCHEDULED_HEADING, term_embed};
use crate::FlickrImages;
use async_trait::async_trait;
use brevity_bot::TermPoster;
use brevity_core::{ChannelId, Term};
use brevity_error::{BrevityResult, DeliveryError};
use serenity::all::{CreateMessage, Http};
use std::num::NonZeroU64;
use std::sync::Arc;
use tracing::{debug, instrument};

/// [`TermPoster`] that sends embeds through the Discord HTTP API.
pub struct DiscordPoster {
    http: Arc<Http>,
    images: Option<Arc<FlickrImages>>,
    wiki_base: String,
}

impl DiscordPoster {
    /// Creates a poster with its own HTTP client for `token`.
    ///
    /// The scheduler is built before the gateway client, so the poster can't
    /// borrow the client's HTTP handle.
    #[instrument(skip(token, images, wiki_base), fields(token_len = token.len()))]
    pub fn new(token: &str, images: Option<Arc<FlickrImages>>, wiki_base: impl Into<String>) -> Self {
        Self::with_http(Arc::new(Http::new(token)), images, wiki_base)
    }

    /// Creates a poster sharing an existing HTTP client.
    pub fn with_http(
        http: Arc<Http>,
        images: Option<Arc<FlickrImages>>,
        wiki_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            images,
            wiki_base: wiki_base.into(),
        }
    }
}

/// Converts a stored channel id, rejecting zero.
pub fn serenity_channel(channel: ChannelId) -> Option<serenity::all::ChannelId> {
    NonZeroU64::new(channel.0).map(serenity::all::ChannelId::from)
}

#[async_trait]
impl TermPoster for DiscordPoster {
    #[instrument(skip(self, term), fields(channel_id = %channel, term = %term.name()))]
    async fn post_term(&self, channel: ChannelId, term: &Term) -> BrevityResult<()> {
        let target = serenity_channel(channel)
            .ok_or_else(|| DeliveryError::new(format!("Invalid channel id {}", channel)))?;

        let image = match &self.images {
            Some(images) => images.random_photo().await,
            None => None,
        };
        let message = CreateMessage::new()
            .content(SCHEDULED_HEADING)
            .embed(term_embed(term, &self.wiki_base, image.as_deref()));

        target
            .send_message(&self.http, message)
            .await
            .map_err(|e| DeliveryError::new(format!("Failed to post to channel {}: {}", channel, e)))?;
        debug!("Term delivered");
        Ok(())
    }
}
