mod test_utils;

use brevity_core::{ChannelId, GuildId};
use chrono::{TimeDelta, Utc};
use std::time::Duration;
use test_utils::{Fixture, FlakyStore, sample_terms};

async fn configure(fixture: &Fixture, guild: GuildId, channel: ChannelId, hours_ago: Option<i64>) {
    fixture.repo.save_channel(guild, channel).await.expect("save channel");
    fixture
        .repo
        .set_posting_enabled(guild, true)
        .await
        .expect("enable posting");
    fixture
        .repo
        .set_frequency_hours(guild, 24)
        .await
        .expect("set frequency");
    if let Some(hours) = hours_ago {
        fixture
            .repo
            .set_last_posted(guild, Utc::now() - TimeDelta::hours(hours))
            .await
            .expect("set last posted");
    }
}

#[tokio::test]
async fn test_tick_posts_to_overdue_guild() {
    let fixture = Fixture::new(sample_terms());
    let guild = GuildId(10);
    configure(&fixture, guild, ChannelId(100), Some(25)).await;

    let now = Utc::now();
    let report = fixture.scheduler.tick(now).await;

    assert_eq!(report.posted, vec![guild]);
    let posts = fixture.poster.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, ChannelId(100));
    let last = fixture.repo.last_posted(guild).await.expect("read last posted");
    assert_eq!(last, Some(now));
}

#[tokio::test]
async fn test_tick_leaves_recent_guild_idle() {
    let fixture = Fixture::new(sample_terms());
    let guild = GuildId(11);
    configure(&fixture, guild, ChannelId(101), Some(1)).await;
    let before = fixture.repo.last_posted(guild).await.expect("read last posted");

    let report = fixture.scheduler.tick(Utc::now()).await;

    assert_eq!(report.idle, vec![guild]);
    assert!(report.posted.is_empty());
    assert!(fixture.poster.posts().is_empty());
    assert_eq!(fixture.repo.last_posted(guild).await.expect("read"), before);
}

#[tokio::test]
async fn test_tick_posts_to_never_posted_guild() {
    let fixture = Fixture::new(sample_terms());
    configure(&fixture, GuildId(12), ChannelId(102), None).await;

    let report = fixture.scheduler.tick(Utc::now()).await;
    assert_eq!(report.posted, vec![GuildId(12)]);
}

#[tokio::test]
async fn test_tick_skips_disabled_guild() {
    let fixture = Fixture::new(sample_terms());
    let guild = GuildId(13);
    configure(&fixture, guild, ChannelId(103), Some(48)).await;
    fixture
        .repo
        .set_posting_enabled(guild, false)
        .await
        .expect("disable posting");

    let report = fixture.scheduler.tick(Utc::now()).await;

    assert_eq!(report.skipped, vec![guild]);
    assert!(fixture.poster.posts().is_empty());
}

#[tokio::test]
async fn test_failed_post_stays_due() {
    let fixture = Fixture::new(sample_terms());
    let guild = GuildId(14);
    configure(&fixture, guild, ChannelId(104), Some(30)).await;
    let before = fixture.repo.last_posted(guild).await.expect("read last posted");
    fixture.poster.set_failing(true);

    let report = fixture.scheduler.tick(Utc::now()).await;
    assert_eq!(report.failed, vec![guild]);
    assert_eq!(fixture.repo.last_posted(guild).await.expect("read"), before);
    assert_eq!(fixture.scheduler.metrics().post_failures(), 1);

    fixture.poster.set_failing(false);
    let report = fixture.scheduler.tick(Utc::now()).await;
    assert_eq!(report.posted, vec![guild]);
}

#[tokio::test]
async fn test_slow_post_times_out() {
    let fixture = Fixture::new(sample_terms());
    let guild = GuildId(15);
    configure(&fixture, guild, ChannelId(105), None).await;
    fixture.poster.set_delay(Duration::from_secs(5));

    let report = fixture.scheduler.tick(Utc::now()).await;

    assert_eq!(report.failed, vec![guild]);
    assert_eq!(fixture.repo.last_posted(guild).await.expect("read"), None);
}

#[tokio::test]
async fn test_one_failing_guild_does_not_block_others() {
    let fixture = Fixture::new(sample_terms());
    configure(&fixture, GuildId(20), ChannelId(200), None).await;
    configure(&fixture, GuildId(21), ChannelId(201), Some(2)).await;
    configure(&fixture, GuildId(22), ChannelId(202), None).await;
    fixture.cache.replace(Vec::new());

    let report = fixture.scheduler.tick(Utc::now()).await;

    // Empty cache fails the due guilds but the idle one is still classified.
    assert_eq!(report.failed, vec![GuildId(20), GuildId(22)]);
    assert_eq!(report.idle, vec![GuildId(21)]);
    assert_eq!(report.total(), 3);
}

#[tokio::test]
async fn test_post_now_ignores_enabled_flag_and_stamps() {
    let fixture = Fixture::new(sample_terms());
    let guild = GuildId(30);
    configure(&fixture, guild, ChannelId(300), Some(1)).await;
    fixture
        .repo
        .set_posting_enabled(guild, false)
        .await
        .expect("disable posting");

    let now = Utc::now();
    let term = fixture.scheduler.post_now(guild, now).await.expect("manual post");

    assert!(sample_terms().iter().any(|t| t.id() == term.id()));
    assert_eq!(fixture.repo.last_posted(guild).await.expect("read"), Some(now));
    assert_eq!(fixture.scheduler.metrics().manual_posts(), 1);
    // Manual posts are replies, not channel posts.
    assert!(fixture.poster.posts().is_empty());
}

#[tokio::test]
async fn test_post_now_unconfigured_guild_only_rotates() {
    let fixture = Fixture::new(sample_terms());
    let guild = GuildId(31);

    fixture
        .scheduler
        .post_now(guild, Utc::now())
        .await
        .expect("manual post");

    assert_eq!(fixture.repo.last_posted(guild).await.expect("read"), None);
    assert_eq!(fixture.repo.used_terms(guild).await.expect("used").len(), 1);
    assert!(fixture.repo.guild_config(guild).await.expect("config").is_none());
}

#[tokio::test]
async fn test_lost_stamp_is_retried_within_tick() {
    let flaky = FlakyStore::new();
    let fixture = Fixture::with_flaky_store(sample_terms(), flaky.clone());
    let guild = GuildId(40);
    configure(&fixture, guild, ChannelId(400), Some(25)).await;
    flaky.fail_writes(":last_posted", 1);

    let now = Utc::now();
    let first = fixture.scheduler.tick(now).await;
    let second = fixture.scheduler.tick(now + TimeDelta::minutes(5)).await;

    assert_eq!(flaky.failed_writes(), 1);
    assert_eq!(first.posted, vec![guild]);
    assert!(first.failed.is_empty());
    assert_eq!(second.idle, vec![guild]);
    assert_eq!(fixture.poster.posts().len(), 1);
    assert_eq!(fixture.repo.last_posted(guild).await.expect("read"), Some(now));
}

#[tokio::test]
async fn test_lost_rotation_write_is_retried_within_tick() {
    let flaky = FlakyStore::new();
    let fixture = Fixture::with_flaky_store(sample_terms(), flaky.clone());
    let guild = GuildId(41);
    configure(&fixture, guild, ChannelId(401), Some(25)).await;
    flaky.fail_writes(":used_terms", 1);

    let report = fixture.scheduler.tick(Utc::now()).await;

    assert_eq!(flaky.failed_writes(), 1);
    assert_eq!(report.posted, vec![guild]);
    assert_eq!(fixture.repo.used_terms(guild).await.expect("used").len(), 1);
}
