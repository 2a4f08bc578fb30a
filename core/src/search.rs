//! Query building for site-restricted web searches.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const ARTICLE_SITES: &[&str] = &[
    "substack.com",
    "medium.com",
    "dev.to",
    "hashnode.com",
    "hackernoon.com",
    "producthunt.com/posts",
    "indie.hackers.com",
];

pub const PODCAST_SITES: &[&str] = &[
    "podcasts.apple.com",
    "spotify.com/episode",
    "open.spotify.com/episode",
    "anchor.fm",
    "listennotes.com",
];

/// Date restriction token for "last six months".
pub const RECENT_DATE_RESTRICT: &str = "m6";
const RECENT_WINDOW_DAYS: u64 = 180;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// `(site:a OR site:b ...)`
pub fn site_clause(sites: &[&str]) -> String {
    let sites: Vec<String> = sites.iter().map(|site| format!("site:{site}")).collect();
    format!("({})", sites.join(" OR "))
}

/// Wrap a free-text query with the article site restriction.
pub fn article_query(query: &str) -> String {
    format!("{} {}", site_clause(ARTICLE_SITES), query)
}

/// Site-restricted query ORing the contact's interests, limited to the
/// last six months. Blank interests are skipped; with none left the
/// interest clause is omitted.
pub fn recommendation_query(sites: &[&str], interests: &[String], today: NaiveDate) -> String {
    let since = today
        .checked_sub_days(Days::new(RECENT_WINDOW_DAYS))
        .unwrap_or(today);
    let interests: Vec<&str> = interests
        .iter()
        .map(|interest| interest.trim())
        .filter(|interest| !interest.is_empty())
        .collect();

    let mut query = site_clause(sites);
    if !interests.is_empty() {
        query.push_str(&format!(" ({})", interests.join(" OR ")));
    }
    query.push_str(&format!(" after:{}", since.format("%Y-%m-%d")));
    query
}

/// First usable `{title, link, snippet}` item of a raw search payload.
pub fn first_hit(results: &Value) -> Option<SearchHit> {
    results
        .get("items")
        .and_then(Value::as_array)?
        .iter()
        .find_map(|item| {
            serde_json::from_value::<SearchHit>(item.clone())
                .ok()
                .filter(|hit| !hit.link.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn site_clause_ors_every_site() {
        assert_eq!(
            site_clause(&["a.com", "b.com"]),
            "(site:a.com OR site:b.com)"
        );
    }

    #[test]
    fn article_query_prefixes_site_clause() {
        let query = article_query("rust async");
        assert!(query.starts_with("(site:substack.com OR site:medium.com"));
        assert!(query.ends_with(") rust async"));
    }

    #[test]
    fn recommendation_query_includes_interests_and_window() {
        let query = recommendation_query(
            &["anchor.fm"],
            &["Rust".to_string(), " ".to_string(), "Databases".to_string()],
            day(2024, 7, 1),
        );
        assert_eq!(query, "(site:anchor.fm) (Rust OR Databases) after:2024-01-03");
    }

    #[test]
    fn recommendation_query_without_interests_omits_clause() {
        let query = recommendation_query(&["anchor.fm"], &[], day(2024, 7, 1));
        assert_eq!(query, "(site:anchor.fm) after:2024-01-03");
    }

    #[test]
    fn first_hit_skips_items_without_link() {
        let hit = first_hit(&json!({
            "items": [
                {"title": "No link"},
                {"title": "Good", "link": "https://medium.com/x", "snippet": "s"}
            ]
        }))
        .unwrap();
        assert_eq!(hit.title, "Good");
        assert!(first_hit(&json!({"searchInformation": {}})).is_none());
    }
}
