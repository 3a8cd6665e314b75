use crate::aggregator::aggregate;
use crate::debug_log::PhaseTimer;
use crate::error::{Result, StatsError};
use crate::types::{ConversationSummary, Message, MessageType, Metrics};

/// `None` for a group with no messages; other errors propagate.
fn optional_metrics(result: Result<Metrics>) -> Result<Option<Metrics>> {
    match result {
        Ok(metrics) => Ok(Some(metrics)),
        Err(StatsError::EmptyInput) => Ok(None),
        Err(e) => Err(e),
    }
}

fn aggregate_type(messages: &[Message], message_type: MessageType) -> Result<Option<Metrics>> {
    let _timer = PhaseTimer::start("AGGREGATE", format!("{message_type:?}"));
    optional_metrics(aggregate(
        messages.iter().filter(|m| m.message_type == message_type),
    ))
}

/// Run the received, sent and combined passes. Each pass owns its own
/// aggregator, so they run in parallel.
pub fn summarize(messages: &[Message], skipped_records: usize) -> Result<ConversationSummary> {
    let ((received, sent), all) = rayon::join(
        || {
            rayon::join(
                || aggregate_type(messages, MessageType::Received),
                || aggregate_type(messages, MessageType::Sent),
            )
        },
        || {
            let _timer = PhaseTimer::start("AGGREGATE", "All");
            optional_metrics(aggregate(messages))
        },
    );

    Ok(ConversationSummary {
        received: received?,
        sent: sent?,
        all: all?,
        skipped_records,
    })
}
