//! Interactive quiz flow over button components.

use crate::components::{AnswerPress, answer_buttons, classify_press};
use crate::embeds::{answer_embed, question_embed, summary_embed};
use crate::DiscordResult;
use brevity_bot::{BotService, QuizSession};
use chrono::Utc;
use serenity::all::{
    CommandInteraction, ComponentInteraction, ComponentInteractionCollector, Context,
    CreateInteractionResponse, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    EditInteractionResponse, MessageId,
};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Reply to members pressing buttons on someone else's quiz.
pub const NOT_YOUR_QUIZ: &str = "This quiz belongs to someone else. Start your own with /quiz!";

/// Runs `session` as a series of follow-up messages on a deferred `/quiz`.
///
/// Each question waits for the quiz taker's first button press or for the
/// configured duration, whichever comes first. Unanswered questions count as
/// wrong. The result is recorded and a summary with the greenie board is
/// posted at the end.
#[instrument(
    skip_all,
    fields(guild_id = %session.guild_id(), user_id = %session.user_id(), questions = session.questions().len())
)]
pub async fn run_quiz(
    ctx: &Context,
    command: &CommandInteraction,
    service: &BotService,
    mut session: QuizSession,
) -> DiscordResult<()> {
    let total = session.questions().len();
    let duration = *session.settings().duration();
    let ephemeral = session.settings().mode().is_ephemeral();

    command
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new().content(format!(
                "🛩️ Quiz starting: {} question(s), {} seconds each.",
                total,
                duration.as_secs()
            )),
        )
        .await?;

    for index in 0..total {
        let Some(question) = session.question(index).cloned() else {
            break;
        };
        let followup = CreateInteractionResponseFollowup::new()
            .embed(question_embed(index, total, &question, duration))
            .components(answer_buttons(index, &question))
            .ephemeral(ephemeral);
        let message = command.create_followup(&ctx.http, followup).await?;

        match await_answer(ctx, command, message.id, index, duration).await {
            Some((press, option)) => {
                let correct = match session.answer(index, option) {
                    Ok(correct) => correct,
                    Err(e) => {
                        warn!(index, option, error = %e, "Ignoring invalid answer");
                        false
                    }
                };
                debug!(index, option, correct, "Answer received");
                let update = CreateInteractionResponseMessage::new()
                    .embed(answer_embed(index, total, &question, session.answer_for(index)))
                    .components(vec![]);
                press
                    .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(update))
                    .await?;
            }
            None => {
                debug!(index, "Question timed out");
                let reveal = CreateInteractionResponseFollowup::new()
                    .embed(answer_embed(index, total, &question, None))
                    .components(vec![]);
                command.edit_followup(&ctx.http, message.id, reveal).await?;
            }
        }
    }

    let guild = *session.guild_id();
    let user = *session.user_id();
    let summary = match service.record_quiz(&session, Utc::now()).await {
        Ok(result) => {
            info!(score = result.score(), total = result.total(), "Quiz finished");
            let board = match service.greenie_board(guild, user).await {
                Ok(board) => Some(board),
                Err(e) => {
                    warn!(error = %e, "Could not load greenie board");
                    None
                }
            };
            CreateInteractionResponseFollowup::new().embed(summary_embed(&result, board.as_ref()))
        }
        Err(e) => {
            warn!(error = %e, "Could not record quiz result");
            let result = session.finish(Utc::now());
            CreateInteractionResponseFollowup::new()
                .embed(summary_embed(&result, None))
                .content(e.user_message())
        }
    };
    command
        .create_followup(&ctx.http, summary.ephemeral(ephemeral))
        .await?;
    Ok(())
}

/// Waits for the quiz taker to press one of question `index`'s buttons.
///
/// Presses by other members get a private refusal and stale presses are
/// acknowledged, so neither shows as a failed interaction.
async fn await_answer(
    ctx: &Context,
    command: &CommandInteraction,
    message: MessageId,
    index: usize,
    duration: std::time::Duration,
) -> Option<(ComponentInteraction, usize)> {
    let deadline = Instant::now() + duration;
    loop {
        let remaining = deadline.checked_duration_since(Instant::now())?;
        let press = ComponentInteractionCollector::new(&ctx.shard)
            .message_id(message)
            .timeout(remaining)
            .next()
            .await?;
        let response = match classify_press(
            &press.data.custom_id,
            press.user.id.get(),
            command.user.id.get(),
            index,
        ) {
            AnswerPress::Answer(option) => return Some((press, option)),
            AnswerPress::NotOwner => {
                debug!(user_id = %press.user.id, "Ignoring press from another member");
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(NOT_YOUR_QUIZ)
                        .ephemeral(true),
                )
            }
            AnswerPress::Stale => {
                debug!(custom_id = %press.data.custom_id, "Ignoring unrelated button");
                CreateInteractionResponse::Acknowledge
            }
        };
        if let Err(e) = press.create_response(&ctx.http, response).await {
            warn!(error = %e, "Failed to answer button press");
        }
    }
}
