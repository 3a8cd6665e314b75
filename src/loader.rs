use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::debug_log::{self, PhaseTimer};
use crate::error::StatsError;
use crate::tokenizer::Tokenizer;
use crate::types::{Message, MessageType, SourceRecord};
use crate::utils::warn_once;

/// What to do with a record that cannot be turned into a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Abort the whole load on the first malformed record.
    #[default]
    Strict,
    /// Drop malformed records and report them in [`LoadOutcome::skipped`].
    SkipMalformed,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub messages: Vec<Message>,
    pub skipped: Vec<StatsError>,
}

fn attribute(node: roxmltree::Node, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

/// Read every direct element child of the document root as a source record.
pub fn parse_document(xml: &str) -> Result<Vec<SourceRecord>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, options)
        .context("Failed to parse SMS export as XML")?;

    let records = doc
        .root_element()
        .children()
        .filter(|node| node.is_element())
        .enumerate()
        .map(|(index, node)| SourceRecord {
            index,
            address: attribute(node, "address"),
            type_code: attribute(node, "type"),
            body: attribute(node, "body"),
            date: attribute(node, "date"),
            time: attribute(node, "time"),
        })
        .collect();

    Ok(records)
}

pub fn read_records(path: &Path) -> Result<Vec<SourceRecord>> {
    let xml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read SMS export {}", path.display()))?;
    parse_document(&xml).with_context(|| format!("Invalid SMS export {}", path.display()))
}

/// Convert epoch milliseconds to a local timestamp, truncating to whole seconds.
fn local_timestamp(index: usize, raw: &str) -> Result<DateTime<Local>, StatsError> {
    let millis: i64 = raw
        .trim()
        .parse()
        .map_err(|_| StatsError::malformed(index, format!("date {raw:?} is not an integer")))?;

    DateTime::from_timestamp(millis / 1000, 0)
        .map(|utc| utc.with_timezone(&Local))
        .ok_or_else(|| StatsError::malformed(index, format!("date {raw} is out of range")))
}

pub fn build_message(record: &SourceRecord, tokenizer: &Tokenizer) -> Result<Message, StatsError> {
    let index = record.index;
    let require = |value: &Option<String>, name: &str| {
        value
            .clone()
            .ok_or_else(|| StatsError::malformed(index, format!("missing `{name}` attribute")))
    };

    let phone_number = require(&record.address, "address")?;
    let body = require(&record.body, "body")?;
    let date = require(&record.date, "date")?;
    let timestamp = local_timestamp(index, &date)?;

    Ok(Message {
        phone_number,
        message_type: MessageType::from_code(record.type_code.as_deref()),
        message_length: body.chars().count(),
        tokens: tokenizer.tokenize(&body),
        message: body,
        date_raw: record.time.clone().unwrap_or_default(),
        timestamp,
    })
}

/// Build one message per record, in source order.
pub fn build_messages(
    records: &[SourceRecord],
    tokenizer: &Tokenizer,
    policy: LoadPolicy,
) -> Result<LoadOutcome, StatsError> {
    let _timer = PhaseTimer::start("LOAD", format!("{} records", records.len()));
    let mut outcome = LoadOutcome {
        messages: Vec::with_capacity(records.len()),
        skipped: Vec::new(),
    };

    for record in records {
        match build_message(record, tokenizer) {
            Ok(message) => outcome.messages.push(message),
            Err(e) if policy == LoadPolicy::SkipMalformed => {
                warn_once(format!("Skipping {e}"));
                debug_log::log("LOAD", "SKIP", &e.to_string());
                outcome.skipped.push(e);
            }
            Err(e) => return Err(e),
        }
    }

    debug_log::log(
        "LOAD",
        "DONE",
        &format!(
            "{} messages, {} skipped",
            outcome.messages.len(),
            outcome.skipped.len()
        ),
    );

    Ok(outcome)
}

/// Read, parse and convert an SMS export file.
pub fn load_file(path: &Path, tokenizer: &Tokenizer, policy: LoadPolicy) -> Result<LoadOutcome> {
    let records = read_records(path)?;
    let outcome = build_messages(&records, tokenizer, policy)
        .with_context(|| format!("Failed to load messages from {}", path.display()))?;
    Ok(outcome)
}

#[cfg(test)]
mod tests;
