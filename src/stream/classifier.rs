//! Classifies one raw event-stream line.

use std::sync::OnceLock;

use regex::Regex;
use strum::{Display, EnumString};

static EVENT_LINE: OnceLock<Regex> = OnceLock::new();

fn event_line() -> &'static Regex {
    EVENT_LINE.get_or_init(|| {
        Regex::new(r"^(event|id|data):\s*(.*)$").expect("event line pattern is valid")
    })
}

/// Header fields other than `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MetaField {
    Event,
    Id,
}

/// One line of the wire stream, typed.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEvent {
    /// `data:` line whose value parsed as JSON.
    Data(serde_json::Value),
    /// `data:` line whose value did not parse. Skipped by the decoder.
    MalformedData { raw: String, error: String },
    /// `event:` or `id:` line.
    Meta { field: MetaField, value: String },
    /// Blank line, comment, or any other prefix.
    Ignorable,
}

/// Classify a single line. Pure; never fails.
pub fn classify_line(line: &str) -> ClassifiedEvent {
    let Some(captures) = event_line().captures(line) else {
        return ClassifiedEvent::Ignorable;
    };
    let field = captures.get(1).map_or("", |m| m.as_str());
    let value = captures.get(2).map_or("", |m| m.as_str()).trim();

    match field {
        "data" => match serde_json::from_str(value) {
            Ok(json) => ClassifiedEvent::Data(json),
            Err(e) => ClassifiedEvent::MalformedData {
                raw: value.to_string(),
                error: e.to_string(),
            },
        },
        other => match other.parse::<MetaField>() {
            Ok(field) => ClassifiedEvent::Meta {
                field,
                value: value.to_string(),
            },
            Err(_) => ClassifiedEvent::Ignorable,
        },
    }
}
