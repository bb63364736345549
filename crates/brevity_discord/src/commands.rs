//! Slash command definitions.

use brevity_bot::{QuizConfig, QuizMode};
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};
use strum::IntoEnumIterator;

/// `/setup`
pub const SETUP: &str = "setup";
/// `/nextterm`
pub const NEXT_TERM: &str = "nextterm";
/// `/define`
pub const DEFINE: &str = "define";
/// `/reloadterms`
pub const RELOAD_TERMS: &str = "reloadterms";
/// `/setfrequency`
pub const SET_FREQUENCY: &str = "setfrequency";
/// `/enableposting`
pub const ENABLE_POSTING: &str = "enableposting";
/// `/disableposting`
pub const DISABLE_POSTING: &str = "disableposting";
/// `/quiz`
pub const QUIZ: &str = "quiz";
/// `/greenieboard`
pub const GREENIE_BOARD: &str = "greenieboard";
/// `/checkperms`
pub const CHECK_PERMS: &str = "checkperms";

fn admin(command: CreateCommand) -> CreateCommand {
    command.default_member_permissions(Permissions::MANAGE_GUILD)
}

/// Every command the bot registers, using `quiz` for option limits.
pub fn definitions(quiz: &QuizConfig) -> Vec<CreateCommand> {
    vec![
        admin(CreateCommand::new(SETUP).description("Post brevity terms in this channel")),
        CreateCommand::new(NEXT_TERM).description("Show the next brevity term now"),
        CreateCommand::new(DEFINE)
            .description("Look up a brevity term")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "term", "Term to look up")
                    .required(true),
            ),
        admin(CreateCommand::new(RELOAD_TERMS).description("Fetch the term list from Wikipedia again")),
        admin(
            CreateCommand::new(SET_FREQUENCY)
                .description("Set how often terms are posted")
                .add_option(
                    CreateCommandOption::new(CommandOptionType::Integer, "hours", "Hours between posts")
                        .required(true)
                        .min_int_value(1)
                        .max_int_value(24 * 7),
                ),
        ),
        admin(CreateCommand::new(ENABLE_POSTING).description("Resume scheduled posts")),
        admin(CreateCommand::new(DISABLE_POSTING).description("Pause scheduled posts")),
        quiz_command(quiz),
        CreateCommand::new(GREENIE_BOARD).description("Show your recent quiz results"),
        CreateCommand::new(CHECK_PERMS).description("Check my permissions and the posting schedule"),
    ]
}

fn mode_choices(option: CreateCommandOption) -> CreateCommandOption {
    QuizMode::iter().fold(option, |option, mode| {
        option.add_string_choice(format!("{:?}", mode), mode.to_string())
    })
}

fn quiz_command(quiz: &QuizConfig) -> CreateCommand {
    let mode = mode_choices(CreateCommandOption::new(
        CommandOptionType::String,
        "mode",
        "Who sees the quiz",
    ));
    CreateCommand::new(QUIZ)
        .description("Take a brevity code quiz")
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "questions", "Number of questions")
                .min_int_value(1)
                .max_int_value(quiz.max_questions as u64),
        )
        .add_option(mode)
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "duration", "Seconds per question")
                .min_int_value(quiz.min_duration_secs)
                .max_int_value(quiz.max_duration_secs),
        )
}
