//! Volatile per-user session cache: the selected account, the last enriched
//! bundle and the last recommendations. Cleared with `outreach session clear`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use outreach_core::activity::EnrichedBundle;
use outreach_core::recommendations::RecommendationOutput;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<EnrichedBundle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<RecommendationOutput>,
}

pub fn session_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("outreach")
        .join("session.json")
}

impl Session {
    pub fn load() -> Self {
        Self::load_from(&session_path())
    }

    pub fn save(&self) -> Result<(), String> {
        self.save_to(&session_path())
    }

    /// A missing or unreadable cache is an empty session.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create '{}': {e}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to encode session: {e}"))?;
        std::fs::write(path, data).map_err(|e| format!("Failed to write '{}': {e}", path.display()))
    }

    pub fn clear_at(path: &Path) -> Result<(), String> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to remove '{}': {e}", path.display())),
        }
    }

    /// A new bundle invalidates recommendations drafted for the previous one.
    pub fn set_bundle(&mut self, bundle: EnrichedBundle) {
        self.bundle = Some(bundle);
        self.recommendations = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outreach_core::activity::Profile;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("outreach-cli-test-{}", std::process::id()))
            .join(format!("{name}.json"))
    }

    #[test]
    fn round_trips_through_disk() {
        let path = scratch("round_trip");
        let mut session = Session {
            account_id: Some("acct1".to_string()),
            ..Default::default()
        };
        session.set_bundle(EnrichedBundle {
            profile: Profile {
                id: "user123".to_string(),
                ..Default::default()
            },
            chat_id: Some("c1".to_string()),
            ..Default::default()
        });
        session.save_to(&path).unwrap();

        assert_eq!(Session::load_from(&path), session);
        Session::clear_at(&path).unwrap();
        assert_eq!(Session::load_from(&path), Session::default());
    }

    #[test]
    fn clearing_a_missing_session_is_fine() {
        assert!(Session::clear_at(&scratch("never_written")).is_ok());
    }

    #[test]
    fn corrupt_cache_reads_as_empty() {
        let path = scratch("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Session::load_from(&path), Session::default());
        Session::clear_at(&path).unwrap();
    }

    #[test]
    fn new_bundle_drops_stale_recommendations() {
        let mut session = Session {
            recommendations: Some(RecommendationOutput::default()),
            ..Default::default()
        };
        session.set_bundle(EnrichedBundle::default());
        assert!(session.recommendations.is_none());
        assert!(session.bundle.is_some());
    }
}
