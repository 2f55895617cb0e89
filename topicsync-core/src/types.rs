//! Domain types shared by the record store and the reconciler.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Desired marker-topic membership per repository, plus the API credential.
///
/// Persisted as a flat two-key YAML document. Field names match the files
/// written by earlier releases (`accesstoken`, `repositories`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Record {
    #[serde(
        rename = "accesstoken",
        alias = "AccessToken",
        alias = "access_token",
        default
    )]
    pub access_token: String,

    /// Repository full name (`owner/name`) → should carry the marker topic.
    #[serde(alias = "Repositories", default)]
    pub repositories: BTreeMap<String, bool>,
}

impl Record {
    /// Desired membership for `full_name`, or `None` if the repository is not tracked.
    pub fn desired(&self, full_name: &str) -> Option<bool> {
        self.repositories.get(full_name).copied()
    }

    /// Record `full_name`'s desired membership, replacing any previous value.
    pub fn track(&mut self, full_name: impl Into<String>, wants_marker: bool) {
        self.repositories.insert(full_name.into(), wants_marker);
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Point-in-time read of one remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    /// `owner/name`, unique per remote host.
    pub full_name: String,
    pub owner_login: String,
    pub name: String,
    /// Topics in the order the remote returned them.
    pub topics: Vec<String>,
}

impl RepositorySnapshot {
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of comparing a repository's topics with its recorded membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Unchanged,
    TagShouldBeAdded,
    TagShouldBeRemoved,
    UnknownRepository,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Unchanged => write!(f, "unchanged"),
            Outcome::TagShouldBeAdded => write!(f, "added"),
            Outcome::TagShouldBeRemoved => write!(f, "removed"),
            Outcome::UnknownRepository => write!(f, "adopted"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_legacy_keys() {
        let mut record = Record {
            access_token: "ghp_secret".into(),
            ..Record::default()
        };
        record.track("org/b", false);
        record.track("org/a", true);

        let yaml = serde_yaml::to_string(&record).expect("serialize");
        assert!(yaml.contains("accesstoken: ghp_secret"), "got: {yaml}");
        let a = yaml.find("org/a").expect("org/a");
        let b = yaml.find("org/b").expect("org/b");
        assert!(a < b, "repositories must be written in sorted order");
    }

    #[test]
    fn record_accepts_key_aliases_and_missing_fields() {
        let r: Record =
            serde_yaml::from_str("AccessToken: t\nRepositories:\n  org/a: true\n").expect("aliases");
        assert_eq!(r.access_token, "t");
        assert_eq!(r.desired("org/a"), Some(true));

        let r: Record = serde_yaml::from_str("repositories: {}\n").expect("missing token");
        assert!(r.access_token.is_empty());
    }

    #[test]
    fn desired_is_none_for_untracked() {
        assert_eq!(Record::default().desired("org/x"), None);
    }

    #[test]
    fn snapshot_has_topic_is_exact_match() {
        let snap = RepositorySnapshot {
            full_name: "org/a".into(),
            owner_login: "org".into(),
            name: "a".into(),
            topics: vec!["hacktoberfest2020".into()],
        };
        assert!(!snap.has_topic("hacktoberfest"));
        assert!(snap.has_topic("hacktoberfest2020"));
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::TagShouldBeAdded.to_string(), "added");
        assert_eq!(Outcome::UnknownRepository.to_string(), "adopted");
    }
}
