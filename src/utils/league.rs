use crate::models::{RawMatch, UNKNOWN_LEAGUE};

/// League codes that sources already label correctly
const CANONICAL_LEAGUES: [&str; 3] = ["NFL", "NCAA", "WNBA"];

/// URL substrings and the league they map to, checked in order
const URL_TRIGGERS: [(&str, &str); 5] = [
    ("football", "Football"),
    ("basketball", "Basketball"),
    ("tennis", "Tennis"),
    ("futsal", "Futsal"),
    ("baseball", "Baseball"),
];

/// Map a raw record to its canonical league label.
///
/// Allow-listed leagues pass through untouched. Otherwise the first URL
/// trigger found in `match_url` wins, and when nothing matches the original
/// label is kept (an empty label becomes `"Unknown"`).
pub fn normalize_league(raw: &RawMatch) -> String {
    if CANONICAL_LEAGUES.contains(&raw.league.as_str()) {
        return raw.league.clone();
    }

    let url = raw.match_url.to_lowercase();
    if let Some((_, league)) = URL_TRIGGERS
        .iter()
        .find(|(trigger, _)| url.contains(trigger))
    {
        return league.to_string();
    }

    if raw.league.trim().is_empty() {
        UNKNOWN_LEAGUE.to_string()
    } else {
        raw.league.clone()
    }
}
