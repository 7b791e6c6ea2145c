//! Splitting a model answer into answer text and its `SOURCES` line

use regex::Regex;
use std::sync::OnceLock;

fn sources_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"SOURCES:\s").expect("valid regex"))
}

fn question_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"QUESTION:\s").expect("valid regex"))
}

/// Split raw model output into `(answer, sources)`
///
/// `sources` is the first line after the marker. Output without a marker
/// keeps everything as the answer and returns empty sources.
pub fn split_answer(output: &str) -> (String, String) {
    let Some(marker) = sources_marker().find(output) else {
        tracing::warn!("Model output has no SOURCES part");
        return (output.trim().to_string(), String::new());
    };

    let answer = output[..marker.start()].trim().to_string();
    let mut rest = &output[marker.end()..];
    if let Some(q) = question_marker().find(rest) {
        rest = &rest[..q.start()];
    }
    let sources = rest.lines().next().unwrap_or_default().trim().to_string();

    (answer, sources)
}
