use std::collections::BTreeMap;

use crate::debug_log;
use crate::error::{Result, StatsError};
use crate::types::{Message, Metrics, WordCounts};

/// Running state for one aggregation pass.
///
/// Seeded from the first message; every later message is folded in with
/// [`Aggregator::push`]. Ties on length keep the earliest longest/shortest.
#[derive(Debug)]
pub struct Aggregator<'a> {
    count: usize,
    total_length: usize,
    longest: &'a Message,
    shortest: &'a Message,
    histogram: BTreeMap<usize, usize>,
    word_counts: WordCounts,
}

impl<'a> Aggregator<'a> {
    pub fn seed(first: &'a Message) -> Self {
        let mut aggregator = Self {
            count: 0,
            total_length: 0,
            longest: first,
            shortest: first,
            histogram: BTreeMap::new(),
            word_counts: WordCounts::new(),
        };
        aggregator.record(first);
        aggregator
    }

    pub fn push(&mut self, message: &'a Message) {
        if message.message_length > self.longest.message_length {
            self.longest = message;
        }
        if message.message_length < self.shortest.message_length {
            self.shortest = message;
        }
        self.record(message);
    }

    fn record(&mut self, message: &Message) {
        self.count += 1;
        self.total_length += message.message_length;
        *self.histogram.entry(message.message_length).or_insert(0) += 1;
        for token in &message.tokens {
            self.word_counts.add(token);
        }
    }

    pub fn finish(self) -> Metrics {
        Metrics {
            total_messages: self.count,
            average_length: self.total_length as f64 / self.count as f64,
            longest: self.longest.clone(),
            shortest: self.shortest.clone(),
            histogram: self.histogram,
            word_counts: self.word_counts,
        }
    }
}

/// Summarize `messages` in a single in-order pass.
pub fn aggregate<'a, I>(messages: I) -> Result<Metrics>
where
    I: IntoIterator<Item = &'a Message>,
{
    let aggregator = messages
        .into_iter()
        .fold(None, |state: Option<Aggregator<'a>>, message| match state {
            None => Some(Aggregator::seed(message)),
            Some(mut aggregator) => {
                aggregator.push(message);
                Some(aggregator)
            }
        });

    let metrics = aggregator.ok_or(StatsError::EmptyInput)?.finish();
    debug_log::log(
        "AGGREGATE",
        "DONE",
        &format!(
            "{} messages, {} distinct lengths, {} distinct words",
            metrics.total_messages,
            metrics.histogram.len(),
            metrics.word_counts.len()
        ),
    );
    Ok(metrics)
}
