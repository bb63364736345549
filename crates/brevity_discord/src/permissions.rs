//! Channel permission checks for `/checkperms`.

use brevity_core::{GuildConfig, ScheduleState};
use chrono::{DateTime, Utc};
use serenity::all::Permissions;

/// Permissions the bot needs in a posting channel, with display names.
pub const REQUIRED_PERMISSIONS: [(Permissions, &str); 4] = [
    (Permissions::VIEW_CHANNEL, "View Channel"),
    (Permissions::SEND_MESSAGES, "Send Messages"),
    (Permissions::EMBED_LINKS, "Embed Links"),
    (Permissions::ATTACH_FILES, "Attach Files"),
];

/// Names of the required permissions missing from `granted`.
pub fn missing_permissions(granted: Permissions) -> Vec<&'static str> {
    if granted.administrator() {
        return Vec::new();
    }
    REQUIRED_PERMISSIONS
        .iter()
        .filter(|(permission, _)| !granted.contains(*permission))
        .map(|(_, name)| *name)
        .collect()
}

/// The `/checkperms` reply.
///
/// `granted` is `None` when Discord did not report the bot's permissions.
pub fn permission_report(
    granted: Option<Permissions>,
    config: Option<&GuildConfig>,
    now: DateTime<Utc>,
) -> String {
    let mut lines = Vec::new();
    match granted.map(missing_permissions) {
        Some(missing) if missing.is_empty() => {
            lines.push("✅ I have every permission I need in this channel.".to_string())
        }
        Some(missing) => lines.push(format!("⚠️ Missing here: {}", missing.join(", "))),
        None => lines.push("❔ Discord didn't tell me my permissions in this channel.".to_string()),
    }

    match config {
        None => lines.push("Not set up yet. Run /setup in the channel I should post to.".to_string()),
        Some(config) => {
            lines.push(format!("Posting channel: <#{}>", config.channel_id()));
            let schedule = match config.schedule_state(now) {
                ScheduleState::Disabled => "posting is disabled".to_string(),
                ScheduleState::Due => "a term is due on the next check".to_string(),
                ScheduleState::Idle => match config.next_due() {
                    Some(next) => format!("next term <t:{}:R>", next.timestamp()),
                    None => "waiting".to_string(),
                },
            };
            lines.push(format!(
                "Schedule: every {} hour{}, {}",
                config.frequency_hours(),
                if *config.frequency_hours() == 1 { "" } else { "s" },
                schedule
            ));
        }
    }
    lines.join("\n")
}
