use std::io::{self, Write};

use colored::Colorize;
use weather_compare_core::ComparisonResult;

pub const NO_DATA_NOTICE: &str = "No weather data available in the response.";

/// Write the markdown answer as-is, or a notice when the service sent none.
pub fn render(result: &ComparisonResult, out: &mut dyn Write) -> io::Result<()> {
    match result.answer() {
        Some(answer) => writeln!(out, "{answer}")?,
        None => writeln!(out, "{}", NO_DATA_NOTICE.yellow().bold())?,
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered(body: serde_json::Value) -> String {
        let mut out = Vec::new();
        render(&ComparisonResult::new(body), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn answer_is_written_unchanged() {
        let answer = "## Paris vs Tokyo\n\n| Day | Paris | Tokyo |\n|---|---|---|\n| 1 | 12°C | 18°C |";
        assert_eq!(rendered(json!({ "answer": answer })), format!("{answer}\n"));
    }

    #[test]
    fn missing_answer_prints_notice() {
        assert!(rendered(json!({})).contains(NO_DATA_NOTICE));
    }

    #[test]
    fn empty_answer_prints_notice() {
        assert!(rendered(json!({ "answer": "" })).contains(NO_DATA_NOTICE));
    }
}
