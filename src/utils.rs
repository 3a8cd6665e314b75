use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use num_format::{Locale, ToFormattedString};

static WARNED_MESSAGES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Print a warning to stderr, once per distinct message.
pub fn warn_once(message: impl Into<String>) {
    let message = message.into();
    let cache = WARNED_MESSAGES.get_or_init(|| Mutex::new(HashSet::new()));

    if let Ok(mut warned) = cache.lock()
        && warned.insert(message.clone())
    {
        eprintln!("{message}");
    }
}

#[derive(Clone, Debug)]
pub struct NumberFormatOptions {
    pub use_comma: bool,
    pub locale: String,
    pub decimal_places: usize,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            use_comma: false,
            locale: "en".to_string(),
            decimal_places: 2,
        }
    }
}

impl NumberFormatOptions {
    fn locale(&self) -> Locale {
        match self.locale.as_str() {
            "de" => Locale::de,
            "fr" => Locale::fr,
            "es" => Locale::es,
            "it" => Locale::it,
            "ja" => Locale::ja,
            "ko" => Locale::ko,
            "zh" => Locale::zh,
            _ => Locale::en,
        }
    }
}

/// Format a count for display.
pub fn format_number(n: impl Into<u64>, options: &NumberFormatOptions) -> String {
    let n: u64 = n.into();
    if options.use_comma {
        n.to_formatted_string(&options.locale())
    } else {
        n.to_string()
    }
}

/// Format a fractional value with `decimal_places` digits, grouping the integer part
/// the same way [`format_number`] does.
pub fn format_decimal(value: f64, options: &NumberFormatOptions) -> String {
    let fixed = format!("{:.prec$}", value, prec = options.decimal_places);
    if !options.use_comma || !value.is_finite() || value < 0.0 {
        return fixed;
    }

    let locale = options.locale();
    match fixed.split_once('.') {
        Some((whole, fraction)) => match whole.parse::<u64>() {
            Ok(whole) => format!(
                "{}{}{}",
                whole.to_formatted_string(&locale),
                locale.decimal(),
                fraction
            ),
            Err(_) => fixed,
        },
        None => match fixed.parse::<u64>() {
            Ok(whole) => whole.to_formatted_string(&locale),
            Err(_) => fixed,
        },
    }
}
