//! Tag pairs of a game record.

use chrono::{NaiveDate, Utc};

use crate::board::Variant;

/// Tags written to a game record, in output order.
///
/// `Result` and `Variant` come from the game itself; `SetUp` and `FEN` are
/// written separately after these.
pub const TAG_ORDER: [&str; 20] = [
    "Event",
    "Site",
    "Date",
    "Round",
    "White",
    "Black",
    "Result",
    "WhiteElo",
    "BlackElo",
    "WhiteNA",
    "BlackNA",
    "WhiteType",
    "BlackType",
    "TimeControl",
    "ECO",
    "Variant",
    "WhiteA",
    "WhiteB",
    "BlackA",
    "BlackB",
];

const READ_ONLY: [&str; 2] = ["SetUp", "FEN"];

/// Tag pairs in insertion order. Keys matching a known tag ignoring case
/// are stored under the known spelling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags {
    entries: Vec<(String, String)>,
}

fn canonical(key: &str) -> String {
    TAG_ORDER
        .iter()
        .chain(READ_ONLY.iter())
        .find(|known| known.eq_ignore_ascii_case(key))
        .map_or_else(|| key.to_string(), |known| (*known).to_string())
}

impl Tags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((canonical(key), value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(key))?;
        Some(self.entries.remove(idx).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Known tags with a non-empty value, in output order
    pub fn ordered(&self) -> impl Iterator<Item = (&'static str, &str)> {
        TAG_ORDER
            .iter()
            .filter_map(|&key| self.get(key).filter(|v| !v.is_empty()).map(|v| (key, v)))
    }

    /// The `Date` tag, read leniently
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.get("Date").map(parse_pgn_date)
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.set("Date", format_pgn_date(date));
    }
}

/// Read a `yyyy.MM.dd` date. Unknown parts (`??`) read as `01`; an
/// unreadable date falls back to today.
#[must_use]
pub fn parse_pgn_date(text: &str) -> NaiveDate {
    let mut cleaned = String::with_capacity(text.len());
    let mut in_unknown = false;
    for c in text.trim().chars() {
        if c == '?' {
            if !in_unknown {
                cleaned.push_str("01");
            }
            in_unknown = true;
        } else {
            cleaned.push(c);
            in_unknown = false;
        }
    }
    NaiveDate::parse_from_str(&cleaned, "%Y.%m.%d").unwrap_or_else(|_| {
        log::warn!("unreadable date '{text}', using today");
        Utc::now().date_naive()
    })
}

#[must_use]
pub fn format_pgn_date(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// Variant named by a `Variant` tag value; unknown names play standard rules.
#[must_use]
pub fn variant_from_tag(value: &str) -> Variant {
    Variant::from_pgn_name(value).unwrap_or_else(|| {
        log::warn!("unknown variant '{value}', using standard rules");
        Variant::Standard
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_are_canonical() {
        let mut tags = Tags::new();
        tags.set("white", "Fuchs, Reinhart");
        tags.set("Opening", "Catalan");
        tags.set("Event", "Leipzig");
        tags.set("Black", "");
        assert_eq!(tags.get("White"), Some("Fuchs, Reinhart"));
        let ordered: Vec<_> = tags.ordered().collect();
        assert_eq!(ordered, vec![("Event", "Leipzig"), ("White", "Fuchs, Reinhart")]);
        assert_eq!(tags.len(), 4);
        assert_eq!(tags.remove("OPENING").as_deref(), Some("Catalan"));
    }

    #[test]
    fn test_dates() {
        let date = parse_pgn_date("1960.??.??");
        assert_eq!(format_pgn_date(date), "1960.01.01");
        assert_eq!(format_pgn_date(parse_pgn_date("2001.12.24")), "2001.12.24");
        assert_eq!(parse_pgn_date("garbage"), Utc::now().date_naive());
    }

    #[test]
    fn test_variant_tags() {
        assert_eq!(variant_from_tag("Crazyhouse"), Variant::Crazyhouse);
        assert_eq!(variant_from_tag("BugHouse"), Variant::Bughouse);
        assert_eq!(variant_from_tag("Grasshoper"), Variant::Grasshopper);
        assert_eq!(variant_from_tag("no such thing"), Variant::Standard);
    }
}
