use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Received,
    Sent,
    Unknown,
}

impl MessageType {
    /// Maps the export's `type` attribute onto a message direction.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("1") => MessageType::Received,
            Some("2") => MessageType::Sent,
            _ => MessageType::Unknown,
        }
    }
}

/// Raw attribute view of one element in the XML export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRecord {
    pub index: usize,
    pub address: Option<String>,
    pub type_code: Option<String>,
    pub body: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub phone_number: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub message: String,
    pub date_raw: String,
    pub timestamp: DateTime<Local>,
    pub message_length: usize,
    pub tokens: Vec<String>,
}

/// Token occurrence counts that remember first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str) {
        match self.index.get(token) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), 1));
            }
        }
    }

    pub fn get(&self, token: &str) -> u64 {
        self.index
            .get(token)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order each token was first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// Entries by descending count; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        // sort_by is stable, so equal counts stay in insertion order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl Serialize for WordCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (word, count) in self.ranked() {
            map.serialize_entry(word, &count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_messages: usize,
    pub average_length: f64,
    pub longest: Message,
    pub shortest: Message,
    #[serde(serialize_with = "serialize_histogram")]
    pub histogram: BTreeMap<usize, usize>,
    pub word_counts: WordCounts,
}

/// JSON object keys must be strings.
fn serialize_histogram<S: Serializer>(
    histogram: &BTreeMap<usize, usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        histogram
            .iter()
            .map(|(length, count)| (length.to_string(), count)),
    )
}

/// Per-direction statistics for one export. `None` marks a group with no messages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub received: Option<Metrics>,
    pub sent: Option<Metrics>,
    pub all: Option<Metrics>,
    pub skipped_records: usize,
}
