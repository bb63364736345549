use brevity_core::{ChannelId, GuildConfig, GuildId};
use brevity_discord::{missing_permissions, permission_report};
use chrono::{TimeDelta, Utc};
use serenity::all::Permissions;

fn full() -> Permissions {
    Permissions::VIEW_CHANNEL
        | Permissions::SEND_MESSAGES
        | Permissions::EMBED_LINKS
        | Permissions::ATTACH_FILES
}

#[test]
fn test_nothing_missing_with_required_set() {
    assert!(missing_permissions(full()).is_empty());
}

#[test]
fn test_administrator_implies_everything() {
    assert!(missing_permissions(Permissions::ADMINISTRATOR).is_empty());
}

#[test]
fn test_missing_names_listed() {
    let granted = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
    assert_eq!(missing_permissions(granted), vec!["Embed Links", "Attach Files"]);
}

#[test]
fn test_report_for_unconfigured_guild() {
    let report = permission_report(Some(full()), None, Utc::now());
    assert!(report.contains("every permission"));
    assert!(report.contains("/setup"));
}

#[test]
fn test_report_for_configured_guild() {
    let now = Utc::now();
    let config = GuildConfig::new(
        GuildId(1),
        ChannelId(42),
        true,
        24,
        Some(now - TimeDelta::hours(1)),
    );
    let report = permission_report(Some(Permissions::VIEW_CHANNEL), Some(&config), now);

    assert!(report.contains("Missing here: Send Messages, Embed Links, Attach Files"));
    assert!(report.contains("<#42>"));
    assert!(report.contains("every 24 hours"));
    assert!(report.contains("next term <t:"));
}

#[test]
fn test_report_for_disabled_and_due() {
    let now = Utc::now();
    let disabled = GuildConfig::new(GuildId(1), ChannelId(42), false, 1, None);
    let report = permission_report(None, Some(&disabled), now);
    assert!(report.contains("didn't tell me"));
    assert!(report.contains("every 1 hour, posting is disabled"));

    let due = GuildConfig::new(GuildId(1), ChannelId(42), true, 1, None);
    assert!(permission_report(None, Some(&due), now).contains("due on the next check"));
}
