//! Price extraction from free text
//!
//! Prices on the site show up in many shapes (`$1,299.00`, `USD 899`,
//! `MSRP: $450`, bare `12,500.00`). Patterns are tried in priority order and
//! only the first match of each pattern is considered; a match is accepted
//! when its numeric value lies in the plausible range for IT equipment.

use regex::{Regex, RegexBuilder};

use crate::domain::constants::limits;

/// Patterns tried by [`PriceParser::extract`], in priority order.
/// A pattern may wrap the price in group 1; otherwise the whole match is used.
const EXTRACTION_PATTERNS: [&str; 11] = [
    r"\$[\d,]+\.?\d*",
    r"USD\s*[\d,]+\.?\d*",
    r"[\d,]+\.?\d*\s*USD",
    r"Price:\s*\$?[\d,]+\.?\d*",
    r"Cost:\s*\$?[\d,]+\.?\d*",
    r"MSRP:\s*\$?[\d,]+\.?\d*",
    r"List:\s*\$?[\d,]+\.?\d*",
    r"Sale:\s*\$?[\d,]+\.?\d*",
    // bare number followed by whitespace or end of text
    r"([\d,]{3,}\.?\d{0,2})(?:\s|$)",
    r"€[\d,]+\.?\d*",
    r"£[\d,]+\.?\d*",
];

/// Patterns used to tidy an already extracted price
const CLEANING_PATTERNS: [&str; 4] = [
    r"\$[\d,]+\.?\d*",
    r"USD\s*[\d,]+\.?\d*",
    r"[\d,]+\.?\d*\s*USD",
    r"([\d,]{3,}\.?\d{0,2})(?:\s|$)",
];

/// Regex based price finder
#[derive(Debug, Clone)]
pub struct PriceParser {
    extraction: Vec<Regex>,
    cleaning: Vec<Regex>,
}

impl PriceParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            extraction: compile_all(&EXTRACTION_PATTERNS)?,
            cleaning: compile_all(&CLEANING_PATTERNS)?,
        })
    }

    /// First plausible price in `text`
    pub fn extract(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        self.extraction
            .iter()
            .filter_map(|pattern| first_match(pattern, text))
            .find(|candidate| Self::is_reasonable(candidate))
            .map(str::to_string)
    }

    /// Look for a price within the window around the first mention of `needle`
    pub fn find_near(&self, needle: &str, haystack: &str) -> Option<String> {
        if needle.is_empty() {
            return None;
        }
        let pos = haystack.find(needle)?;
        let end_of_needle = pos + needle.len();

        let start = haystack[..pos]
            .char_indices()
            .rev()
            .take(limits::PRICE_WINDOW_CHARS)
            .last()
            .map_or(pos, |(i, _)| i);
        let end = haystack[end_of_needle..]
            .char_indices()
            .nth(limits::PRICE_WINDOW_CHARS)
            .map_or(haystack.len(), |(i, _)| end_of_needle + i);

        self.extract(&haystack[start..end])
    }

    /// Reduce a price string to its price token; unmatched input is returned as is
    pub fn clean(&self, price: &str) -> String {
        if price.is_empty() {
            return String::new();
        }

        self.cleaning
            .iter()
            .find_map(|pattern| first_match(pattern, price))
            .unwrap_or(price)
            .to_string()
    }

    /// Plausibility check: digits and dots only, 10..=500000
    pub fn is_reasonable(price_text: &str) -> bool {
        Self::numeric_value(price_text)
            .is_some_and(|v| (limits::MIN_REASONABLE_PRICE..=limits::MAX_REASONABLE_PRICE).contains(&v))
    }

    /// Numeric value of a price string, ignoring currency marks and separators
    pub fn numeric_value(price_text: &str) -> Option<f64> {
        let numbers: String = price_text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if numbers.is_empty() {
            return None;
        }
        numbers.parse::<f64>().ok()
    }
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns
        .iter()
        .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
        .collect()
}

fn first_match<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    let caps = pattern.captures(text)?;
    caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parser() -> PriceParser {
        PriceParser::new().unwrap()
    }

    #[rstest]
    #[case("Cisco ISR4331 $1,299.00 in stock", Some("$1,299.00"))]
    #[case("Only USD 899.50 today", Some("USD 899.50"))]
    #[case("Now 1,450 USD", Some("1,450 USD"))]
    #[case("MSRP: 2,300", Some("MSRP: 2,300"))]
    #[case("Sale: 455.99", Some("Sale: 455.99"))]
    #[case("Total 12,500.00 each", Some("12,500.00"))]
    #[case("about €45", Some("€45"))]
    #[case("£75 each", Some("£75"))]
    #[case("no price here", None)]
    #[case("", None)]
    fn extracts_first_plausible_price(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(parser().extract(text).as_deref(), expected);
    }

    #[test]
    fn implausible_first_match_falls_through_to_later_patterns() {
        // "$5" is too cheap; the bare number pattern then finds 1,250
        assert_eq!(parser().extract("$5 shipping, 1,250 unit").as_deref(), Some("1,250"));
    }

    #[test]
    fn only_first_match_of_a_pattern_is_considered() {
        // the first dollar amount is implausible and the second is ignored
        assert_eq!(parser().extract("$1 then $50"), None);
    }

    #[rstest]
    #[case("$10", true)]
    #[case("$9.99", false)]
    #[case("500,000", true)]
    #[case("500,001", false)]
    #[case("1.2.3", false)]
    #[case("call", false)]
    fn plausibility_range(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(PriceParser::is_reasonable(text), expected);
    }

    #[test]
    fn find_near_limits_search_to_window() {
        let far = format!("Cisco C9200-24T Switch {} $4,500.00", "x".repeat(600));
        assert_eq!(parser().find_near("Cisco C9200-24T Switch", &far), None);

        let near = "Huawei AR2220 Router list price $2,150.00";
        assert_eq!(
            parser().find_near("Huawei AR2220 Router", near).as_deref(),
            Some("$2,150.00")
        );
        assert_eq!(parser().find_near("missing", near), None);
    }

    #[test]
    fn find_near_handles_multibyte_text() {
        let text = format!("{}Dell PowerEdge server €85 {}", "é".repeat(700), "ü".repeat(700));
        assert_eq!(
            parser().find_near("Dell PowerEdge server", &text).as_deref(),
            Some("€85")
        );
    }

    #[rstest]
    #[case("Price $1,299.00 incl.", "$1,299.00")]
    #[case("USD 799", "USD 799")]
    #[case("2,400 ", "2,400")]
    #[case("Call", "Call")]
    #[case("", "")]
    fn clean_keeps_price_token(#[case] input: &str, #[case] expected: &str) {
        let p = parser();
        let cleaned = p.clean(input);
        assert_eq!(cleaned, expected);
        assert_eq!(p.clean(&cleaned), cleaned);
    }

    #[test]
    fn numeric_value_strips_currency() {
        assert_eq!(PriceParser::numeric_value("$1,299.50"), Some(1299.5));
        assert_eq!(PriceParser::numeric_value("USD"), None);
    }
}
