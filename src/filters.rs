//! Custom askama filters used by the site templates.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate};

/// `5` becomes `★★★★★`. Ratings are clamped to 0..=5.
pub fn stars<T: Display>(rating: T) -> askama::Result<String> {
    let rating: i64 = rating.to_string().trim().parse().unwrap_or(0);
    Ok("★".repeat(rating.clamp(0, 5) as usize))
}

/// First sentence of a description, used on the compact price menu.
pub fn first_sentence<T: Display>(text: T) -> askama::Result<String> {
    let text = text.to_string();
    let head = text.split('.').next().unwrap_or_default().trim();
    if head.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("{head}."))
}

/// `2026-12-31` (or an RFC 3339 timestamp) becomes `Dec 31`; anything else is shown as-is.
pub fn short_date<T: Display>(value: T) -> askama::Result<String> {
    let value = value.to_string();
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.format("%b %d").to_string());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.format("%b %d").to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_clamp() {
        assert_eq!(stars(5).unwrap(), "★★★★★");
        assert_eq!(stars(9).unwrap(), "★★★★★");
        assert_eq!(stars(-1).unwrap(), "");
        assert_eq!(stars("3").unwrap(), "★★★");
    }

    #[test]
    fn first_sentence_keeps_period() {
        assert_eq!(
            first_sentence("Precision cuts tailored to you. Includes wash.").unwrap(),
            "Precision cuts tailored to you."
        );
        assert_eq!(first_sentence("No period here").unwrap(), "No period here.");
        assert_eq!(first_sentence("").unwrap(), "");
    }

    #[test]
    fn short_date_formats_month_day() {
        assert_eq!(short_date("2026-12-31").unwrap(), "Dec 31");
        assert_eq!(short_date("2026-03-05T10:00:00+05:30").unwrap(), "Mar 05");
        assert_eq!(short_date("soon").unwrap(), "soon");
    }
}
