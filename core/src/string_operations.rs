/// Lowercases `text` for case-insensitive search.
///
/// Unicode aware, so Cyrillic capitals (including `Ё`) fold the same way Latin ones do.
pub fn casefold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Returns true when `haystack` contains the already-folded `needle_folded`.
///
/// An empty needle matches everything.
pub fn contains_folded(haystack: &str, needle_folded: &str) -> bool {
    needle_folded.is_empty() || casefold(haystack).contains(needle_folded)
}

/// Formats a weight in kilograms: whole numbers without decimals, everything else with one.
pub fn format_kg(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    if (value - value.floor()).abs() < 0.001 {
        format!("{}", value.floor() as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Formats the time left until `end_time` (unix seconds) as seen at `now`.
///
/// Ten seconds and above are rounded up to whole seconds, anything below keeps one decimal.
pub fn format_seconds_left(end_time: f64, now: f64) -> String {
    let left = (end_time - now).max(0.0);
    if left >= 10.0 {
        format!("{}s", left.ceil() as i64)
    } else {
        format!("{:.1}s", left)
    }
}

/// Parses the leading integer of `text` the way browser `parseInt(text, 10)` does.
///
/// Leading whitespace and a single sign are accepted, parsing stops at the first
/// non-digit. Returns `None` when no digit was found.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a strictly positive quantity typed by the player.
///
/// Blank input counts as "1", mirroring the default value of the quantity prompt.
pub fn parse_positive_quantity(text: &str) -> Option<i64> {
    let text = if text.is_empty() { "1" } else { text };
    parse_int_prefix(text).filter(|n| *n > 0)
}

/// Removes quote and question-mark characters from a file name reported by the host.
pub fn strip_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\'' | '"' | '?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casefold_handles_cyrillic_and_latin() {
        assert_eq!(casefold("АптЕчка"), "аптечка");
        assert_eq!(casefold("ЁЖ Knife"), "ёж knife");
    }

    #[test]
    fn contains_folded_is_case_insensitive() {
        assert!(contains_folded("Нож", "нож"));
        assert!(!contains_folded("Аптечка", "нож"));
        assert!(contains_folded("anything", ""));
    }

    #[test]
    fn format_kg_drops_decimals_for_whole_numbers() {
        assert_eq!(format_kg(3.0), "3");
        assert_eq!(format_kg(3.0004), "3");
        assert_eq!(format_kg(4.5), "4.5");
        assert_eq!(format_kg(f64::NAN), "0");
    }

    #[test]
    fn format_seconds_left_switches_precision_at_ten_seconds() {
        assert_eq!(format_seconds_left(112.2, 100.0), "13s");
        assert_eq!(format_seconds_left(104.34, 100.0), "4.3s");
        assert_eq!(format_seconds_left(90.0, 100.0), "0.0s");
    }

    #[test]
    fn parse_int_prefix_matches_browser_semantics() {
        assert_eq!(parse_int_prefix("12"), Some(12));
        assert_eq!(parse_int_prefix("  7abc"), Some(7));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("+"), None);
    }

    #[test]
    fn parse_positive_quantity_rejects_zero_and_negatives() {
        assert_eq!(parse_positive_quantity(""), Some(1));
        assert_eq!(parse_positive_quantity("5"), Some(5));
        assert_eq!(parse_positive_quantity("0"), None);
        assert_eq!(parse_positive_quantity("-2"), None);
        assert_eq!(parse_positive_quantity("x"), None);
    }

    #[test]
    fn strip_quotes_removes_only_quote_characters() {
        assert_eq!(strip_quotes("ma'ps/\"a?.vtf"), "maps/a.vtf");
    }
}
