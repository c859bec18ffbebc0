//! Build log text extraction shared by the provider adapters.

/// Case-insensitive markers of a build error line.
const ERROR_MARKERS: [&str; 3] = ["error", "failed", "err!"];

pub fn is_error_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    ERROR_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Join the error lines, or every line when none of them is an error.
pub fn error_text(lines: &[String], errors: &[String]) -> String {
    if errors.is_empty() {
        lines.join("\n")
    } else {
        errors.join("\n")
    }
}

/// Extract log lines from a Vercel build events body.
///
/// The endpoint answers with either a JSON array of events or a stream of
/// server-sent `data:` lines. Text lives in `text` or `payload.text`.
pub fn vercel_event_lines(body: &str) -> Vec<String> {
    if let Ok(events) = serde_json::from_str::<Vec<serde_json::Value>>(body) {
        return events.iter().filter_map(event_text).collect();
    }

    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<serde_json::Value>(data.trim()).ok())
        .filter_map(|event| event_text(&event))
        .collect()
}

fn event_text(event: &serde_json::Value) -> Option<String> {
    event
        .get("payload")
        .and_then(|p| p.get("text"))
        .or_else(|| event.get("text"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
}
