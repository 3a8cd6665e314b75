use crate::types::{ConversationSummary, Metrics};
use crate::utils::{NumberFormatOptions, format_decimal, format_number};

pub const DEFAULT_MAX_HISTOGRAM_LENGTH: usize = 100;

#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub number_format: NumberFormatOptions,
    /// Number of word-frequency rows to print; 0 prints all of them.
    pub top_words: usize,
    pub max_histogram_length: usize,
    pub owner_name: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            number_format: NumberFormatOptions::default(),
            top_words: 0,
            max_histogram_length: DEFAULT_MAX_HISTOGRAM_LENGTH,
            owner_name: None,
        }
    }
}

impl ReportOptions {
    fn label(&self, group: &str) -> String {
        match self.owner_name.as_deref().map(str::trim) {
            Some(owner) if !owner.is_empty() => format!("{owner}'s {group}"),
            _ => {
                let mut chars = group.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Render one group's metrics as the fixed multi-line report.
pub fn format_metrics(metrics: &Metrics, options: &ReportOptions) -> String {
    let numbers = &options.number_format;
    let count = |n: usize| format_number(n as u64, numbers);

    let mut out = format!(
        "Total Messages: {}\n\
         Average Message Length (in number of characters): {}\n\
         Longest Message was {} characters: {}\n\
         Shortest Message was {} characters: {}\n",
        count(metrics.total_messages),
        format_decimal(metrics.average_length, numbers),
        count(metrics.longest.message_length),
        metrics.longest.message,
        count(metrics.shortest.message_length),
        metrics.shortest.message,
    );

    out.push_str("Word Frequencies:\n");
    let ranked = metrics.word_counts.ranked();
    let limit = match options.top_words {
        0 => ranked.len(),
        n => n,
    };
    for (word, occurrences) in ranked.into_iter().take(limit) {
        out.push_str(&format!("  {word}: {}\n", format_number(occurrences, numbers)));
    }

    out
}

/// Flatten the histogram into one entry per message, ascending by length,
/// skipping lengths above `max_length`.
pub fn project_histogram(metrics: &Metrics, max_length: usize) -> Vec<usize> {
    metrics
        .histogram
        .range(..=max_length)
        .flat_map(|(&length, &count)| std::iter::repeat_n(length, count))
        .collect()
}

/// Header line, flattened histogram and its length, as printed for plotting.
pub fn format_histogram_block(
    title: &str,
    metrics: Option<&Metrics>,
    max_length: usize,
) -> String {
    let projection = metrics
        .map(|m| project_histogram(m, max_length))
        .unwrap_or_default();
    let values = projection
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!("{title} Histogram data:\n[{values}]\n{}\n", projection.len())
}

fn format_group(label: &str, metrics: Option<&Metrics>, options: &ReportOptions) -> String {
    match metrics {
        Some(metrics) => format!("{label}:\n{}", format_metrics(metrics, options)),
        None => format!("{label}:\nNo messages.\n"),
    }
}

/// Full text output: sent, received and combined reports, then the three
/// histogram dumps.
pub fn format_summary(summary: &ConversationSummary, options: &ReportOptions) -> String {
    let sent = options.label("sent messages");
    let received = options.label("received messages");
    let max = options.max_histogram_length;

    let blocks = [
        format_group(&sent, summary.sent.as_ref(), options),
        format_group(&received, summary.received.as_ref(), options),
        format_group("All messages", summary.all.as_ref(), options),
        "----".to_string(),
        format_histogram_block("All Messages", summary.all.as_ref(), max),
        "----".to_string(),
        format_histogram_block(&sent, summary.sent.as_ref(), max),
        "----".to_string(),
        format_histogram_block(&received, summary.received.as_ref(), max),
    ];

    let mut out = blocks.join("\n");
    if summary.skipped_records > 0 {
        out.push_str(&format!(
            "----\nSkipped {} malformed record(s)\n",
            format_number(summary.skipped_records as u64, &options.number_format)
        ));
    }
    out
}
