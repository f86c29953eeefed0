//! Chapter markers stored as comment pairs
//!
//! ```text
//! CHAPTER001=00:00:00.000
//! CHAPTER001NAME=Introduction
//! ```
//!
//! Each chapter ends where the next one starts; the last ends with the track.

use aural_core::Chapter;
use std::collections::BTreeMap;

/// Parse `HH:MM:SS(.fff)` or `MM:SS(.fff)` into seconds
pub fn parse_timestamp(text: &str) -> Option<f64> {
    let mut seconds = 0.0;
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    for part in &parts {
        let value: f64 = part.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        seconds = seconds * 60.0 + value;
    }
    Some(seconds)
}

/// Build chapters from `(key, value)` comment pairs
///
/// Keys are matched case-insensitively. Entries whose start cannot be parsed
/// or falls at or after `duration` are dropped.
pub fn chapters_from_comments<'a>(
    comments: impl IntoIterator<Item = (&'a str, &'a str)>,
    duration: f64,
) -> Vec<Chapter> {
    let mut starts: BTreeMap<u32, f64> = BTreeMap::new();
    let mut names: BTreeMap<u32, String> = BTreeMap::new();

    for (key, value) in comments {
        let key = key.to_ascii_uppercase();
        let Some(rest) = key.strip_prefix("CHAPTER") else {
            continue;
        };
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        let Ok(number) = digits.parse::<u32>() else {
            continue;
        };
        match &rest[digits.len()..] {
            "" => {
                if let Some(start) = parse_timestamp(value) {
                    starts.insert(number, start);
                }
            }
            "NAME" => {
                names.insert(number, value.trim().to_string());
            }
            _ => {}
        }
    }

    let mut ordered: Vec<(f64, String)> = starts
        .into_iter()
        .filter(|&(_, start)| duration <= 0.0 || start < duration)
        .map(|(number, start)| {
            let title = names
                .remove(&number)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Chapter {number}"));
            (start, title)
        })
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
    ordered.dedup_by(|later, earlier| later.0 == earlier.0);

    let ends: Vec<f64> = ordered
        .iter()
        .skip(1)
        .map(|(start, _)| *start)
        .chain(std::iter::once(duration))
        .collect();

    ordered
        .into_iter()
        .zip(ends)
        .filter(|((start, _), end)| end > start)
        .map(|((start, title), end)| Chapter::new(title, start, end))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_parse_with_and_without_hours() {
        assert_eq!(parse_timestamp("00:01:30.500"), Some(90.5));
        assert_eq!(parse_timestamp("02:05"), Some(125.0));
        assert_eq!(parse_timestamp("1:00:00"), Some(3600.0));
        assert_eq!(parse_timestamp("90"), None);
        assert_eq!(parse_timestamp("aa:bb"), None);
        assert_eq!(parse_timestamp("-1:00"), None);
    }

    #[test]
    fn comment_pairs_become_contiguous_chapters() {
        let comments = [
            ("CHAPTER002", "00:10:00.000"),
            ("chapter001", "00:00:00.000"),
            ("CHAPTER001NAME", "Opening"),
            ("CHAPTER002NAME", ""),
            ("TITLE", "Not a chapter"),
        ];

        let chapters = chapters_from_comments(comments, 1500.0);

        assert_eq!(
            chapters,
            vec![
                Chapter::new("Opening", 0.0, 600.0),
                Chapter::new("Chapter 2", 600.0, 1500.0),
            ]
        );
    }

    #[test]
    fn starts_beyond_the_track_are_dropped() {
        let comments = [("CHAPTER001", "00:00:10"), ("CHAPTER002", "01:00:00")];

        let chapters = chapters_from_comments(comments, 120.0);

        assert_eq!(chapters, vec![Chapter::new("Chapter 1", 10.0, 120.0)]);
    }

    #[test]
    fn unknown_duration_drops_the_open_last_chapter() {
        let comments = [("CHAPTER001", "00:00"), ("CHAPTER002", "00:30")];

        let chapters = chapters_from_comments(comments, 0.0);

        assert_eq!(chapters, vec![Chapter::new("Chapter 1", 0.0, 30.0)]);
    }
}
