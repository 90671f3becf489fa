//! Advisory response parsing

use serde_json::Value;

use crate::AdvisoryError;

/// Lines this short are headings or filler, not advice
const MIN_ADVICE_CHARS: usize = 10;

/// Extract advice strings from model output
///
/// A JSON array is accepted only if every entry is a non-empty string.
/// Anything else is read line by line with list markers removed.
pub fn parse_advice(content: &str) -> Result<Vec<String>, AdvisoryError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AdvisoryError::Empty);
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(content) {
        return parse_array(items);
    }

    let advice: Vec<String> = content
        .lines()
        .map(strip_list_marker)
        .filter(|line| line.chars().count() > MIN_ADVICE_CHARS)
        .map(str::to_string)
        .collect();

    if advice.is_empty() {
        Err(AdvisoryError::Empty)
    } else {
        Ok(advice)
    }
}

fn parse_array(items: Vec<Value>) -> Result<Vec<String>, AdvisoryError> {
    if items.is_empty() {
        return Err(AdvisoryError::Empty);
    }
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            other => Err(AdvisoryError::MalformedResponse(format!(
                "entry {} is not a non-empty string: {}",
                i, other
            ))),
        })
        .collect()
}

/// Drop "1." / "2)" numbering and "-" / "*" / "•" bullets
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let line = if digits > 0 {
        let rest = &line[digits..];
        match rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            Some(rest) => rest.trim_start(),
            None => line,
        }
    } else {
        line
    };

    let line = line
        .strip_prefix(['-', '*', '•'])
        .map(str::trim_start)
        .unwrap_or(line);

    line.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array() {
        let advice = parse_advice(r#"["Take a break every two hours", "Sleep at least seven hours"]"#).unwrap();
        assert_eq!(advice.len(), 2);
        assert_eq!(advice[1], "Sleep at least seven hours");
    }

    #[test]
    fn test_json_array_with_bad_entries() {
        assert!(matches!(
            parse_advice(r#"["Take a break every two hours", 3]"#),
            Err(AdvisoryError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_advice(r#"["Take a break every two hours", "  "]"#),
            Err(AdvisoryError::MalformedResponse(_))
        ));
        assert_eq!(parse_advice("[]"), Err(AdvisoryError::Empty));
    }

    #[test]
    fn test_numbered_lines() {
        let content = "Advice:\n1. Take a break every two hours\n2) Avoid driving between 2am and 5am\n\n- Keep the cabin cool and ventilated\n• Drink water regularly on long trips\n";
        let advice = parse_advice(content).unwrap();
        assert_eq!(
            advice,
            vec![
                "Take a break every two hours",
                "Avoid driving between 2am and 5am",
                "Keep the cabin cool and ventilated",
                "Drink water regularly on long trips",
            ]
        );
    }

    #[test]
    fn test_short_lines_only_is_empty() {
        assert_eq!(parse_advice("OK\nSure."), Err(AdvisoryError::Empty));
        assert_eq!(parse_advice("   "), Err(AdvisoryError::Empty));
    }

    #[test]
    fn test_number_without_marker_kept() {
        assert_eq!(strip_list_marker("24 hours without sleep is dangerous"), "24 hours without sleep is dangerous");
    }
}
