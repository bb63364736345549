//! `brevity run`: connects the bot and drives it until Ctrl-C.

use brevity_bot::{BotConfig, BotServer, BotService, Credentials, RotationTracker, Scheduler};
use brevity_discord::{BrevityDiscordBot, BrevityHandler, DiscordPoster, FlickrImages};
use brevity_store::{GuildRepository, Keys, connect};
use brevity_terms::{TermCache, WikipediaSource};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Validates configuration, wires the services and runs the gateway.
///
/// # Errors
///
/// Fails before connecting when credentials or settings are invalid or the
/// store can't be reached, and afterwards when the gateway closes with a
/// fatal error.
pub async fn run_bot(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::from_env()?;
    let config = BotConfig::load(config_path)?;
    info!(?credentials, key_prefix = %config.key_prefix, "Configuration loaded");

    let store = connect(credentials.store_url()).await?;
    let keys = Keys::new(config.key_prefix.clone());
    let repo = GuildRepository::new(Arc::clone(&store), keys.clone())
        .with_default_frequency(config.default_frequency_hours)
        .with_results_retained(config.results_retained);

    let source = Arc::new(
        WikipediaSource::new(config.source.url.clone())
            .with_first_term(config.source.first_term.clone())
            .with_stop_heading(config.source.stop_heading.clone()),
    );
    let cache = Arc::new(TermCache::new(
        Arc::clone(&store),
        &keys,
        source,
        config.term_refresh_interval(),
    ));
    match cache.load().await {
        Ok(count) => info!(count, "Term cache ready"),
        // Commands report the empty cache and /reloadterms can retry.
        Err(e) => warn!(error = %e, "Starting without terms"),
    }

    let images = credentials
        .flickr_api_key()
        .map(|key| Arc::new(FlickrImages::new(key)));
    if images.is_none() {
        info!("No Flickr key, posts will carry no image");
    }

    let poster = Arc::new(DiscordPoster::new(
        credentials.discord_token(),
        images.clone(),
        config.source.url.clone(),
    ));
    let rotation = RotationTracker::new(repo.clone(), Arc::clone(&cache));
    let scheduler = Arc::new(Scheduler::new(repo.clone(), rotation, poster, &config));
    let service = BotService::new(
        repo,
        Arc::clone(&cache),
        Arc::clone(&scheduler),
        config.quiz.clone(),
    );

    let handler = BrevityHandler::new(service, images, config.source.url.clone());
    let mut bot = BrevityDiscordBot::new(credentials.discord_token(), handler).await?;
    let shard_manager = bot.shard_manager();

    let server = BotServer::new(scheduler, cache, &config).spawn();

    let mut gateway = tokio::spawn(async move { bot.start().await });

    let outcome = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Shutting down");
            shard_manager.shutdown_all().await;
            match (&mut gateway).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "Gateway task did not finish cleanly");
                    Ok(())
                }
            }
        }
        joined = &mut gateway => match joined {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Gateway task panicked");
                Ok(())
            }
        },
    };

    server.shutdown().await;
    info!("Brevity bot stopped");
    outcome?;
    Ok(())
}
