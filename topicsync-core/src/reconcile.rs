//! Reconciliation of recorded marker-topic membership against remote repositories.
//!
//! [`classify`] is the whole decision procedure. [`init`] seeds a fresh record
//! from the remote state; [`update`] pushes the record's desired state to the
//! remote and adopts repositories it has not seen before.

use crate::error::ReconcileError;
use crate::record::RecordStore;
use crate::types::{Outcome, Record, RepositorySnapshot};

/// Error returned by a [`RepositoryHost`] implementation.
pub type RemoteError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// Remote seam
// ---------------------------------------------------------------------------

/// The remote side of a reconciliation: lists repositories and rewrites topics.
pub trait RepositoryHost {
    /// All repositories owned by `owner`, in the order the remote returns them.
    fn list_repositories(&self, owner: &str) -> Result<Vec<RepositorySnapshot>, RemoteError>;

    /// Replace the full topic set of `owner/repo` with `topics`.
    fn replace_topics(&self, owner: &str, repo: &str, topics: &[String])
        -> Result<(), RemoteError>;
}

impl<T: RepositoryHost + ?Sized> RepositoryHost for &T {
    fn list_repositories(&self, owner: &str) -> Result<Vec<RepositorySnapshot>, RemoteError> {
        (**self).list_repositories(owner)
    }

    fn replace_topics(
        &self,
        owner: &str,
        repo: &str,
        topics: &[String],
    ) -> Result<(), RemoteError> {
        (**self).replace_topics(owner, repo, topics)
    }
}

/// Whose repositories are reconciled, and which topic is the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub owner: String,
    pub marker: String,
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Compare a repository's current topics with its recorded membership.
///
/// An untracked repository is always [`Outcome::UnknownRepository`], whatever
/// its topics are.
pub fn classify(record: &Record, marker: &str, full_name: &str, topics: &[String]) -> Outcome {
    let Some(want) = record.desired(full_name) else {
        return Outcome::UnknownRepository;
    };
    let has = topics.iter().any(|t| t == marker);

    match (has, want) {
        (false, true) => Outcome::TagShouldBeAdded,
        (true, false) => Outcome::TagShouldBeRemoved,
        _ => Outcome::Unchanged,
    }
}

/// `topics` with `marker` appended. Does not deduplicate.
pub fn with_marker(topics: &[String], marker: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(topics.len() + 1);
    out.extend_from_slice(topics);
    out.push(marker.to_owned());
    out
}

/// `topics` with every occurrence of `marker` removed, order preserved.
pub fn without_marker(topics: &[String], marker: &str) -> Vec<String> {
    topics.iter().filter(|t| *t != marker).cloned().collect()
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What `update` did to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryAction {
    pub full_name: String,
    pub outcome: Outcome,
}

/// A topic replacement the remote rejected.
#[derive(Debug)]
pub struct RemoteWriteFailure {
    pub full_name: String,
    pub outcome: Outcome,
    pub error: RemoteError,
}

/// Result of one `update` pass.
///
/// Remote write failures do not abort the pass; they are collected here and
/// the record is still saved.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub actions: Vec<RepositoryAction>,
    pub failures: Vec<RemoteWriteFailure>,
}

impl UpdateReport {
    /// Actions other than [`Outcome::Unchanged`].
    pub fn changed(&self) -> impl Iterator<Item = &RepositoryAction> {
        self.actions
            .iter()
            .filter(|a| a.outcome != Outcome::Unchanged)
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.actions.iter().filter(|a| a.outcome == outcome).count()
    }
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

/// Create a record mirroring the current remote state.
///
/// Fails with [`ReconcileError::ConfigurationAlreadyExists`] before `connect`
/// is called if the store already holds a record. Nothing is written to the
/// remote.
pub fn init<H, F>(store: &RecordStore, target: &Target, connect: F) -> Result<Record, ReconcileError>
where
    H: RepositoryHost,
    F: FnOnce(&Record) -> H,
{
    if store.exists() {
        return Err(ReconcileError::ConfigurationAlreadyExists {
            path: store.path().to_path_buf(),
        });
    }

    let mut record = Record::default();
    let host = connect(&record);
    let repos = list(&host, target)?;

    for repo in &repos {
        let has = repo.has_topic(&target.marker);
        tracing::info!(repository = %repo.full_name, has_marker = has, "tracking repository");
        record.track(repo.full_name.clone(), has);
    }

    store.save(&record).map_err(ReconcileError::RecordSave)?;
    Ok(record)
}

/// Push the record's desired marker membership to the remote.
///
/// Fails with [`ReconcileError::ConfigurationMissing`] before `connect` is
/// called if the store holds no record. Repositories missing from the record
/// are adopted with their current state; the record is saved at the end.
pub fn update<H, F>(
    store: &RecordStore,
    target: &Target,
    connect: F,
) -> Result<UpdateReport, ReconcileError>
where
    H: RepositoryHost,
    F: FnOnce(&Record) -> H,
{
    if !store.exists() {
        return Err(ReconcileError::ConfigurationMissing {
            path: store.path().to_path_buf(),
        });
    }

    let mut record = store.load().map_err(ReconcileError::RecordLoad)?;
    let host = connect(&record);
    let repos = list(&host, target)?;
    let mut report = UpdateReport::default();

    for repo in repos {
        let outcome = classify(&record, &target.marker, &repo.full_name, &repo.topics);
        let replacement = match outcome {
            Outcome::TagShouldBeAdded => Some(with_marker(&repo.topics, &target.marker)),
            Outcome::TagShouldBeRemoved => Some(without_marker(&repo.topics, &target.marker)),
            Outcome::UnknownRepository => {
                let has = repo.has_topic(&target.marker);
                tracing::info!(repository = %repo.full_name, has_marker = has, "adopting repository");
                record.track(repo.full_name.clone(), has);
                None
            }
            Outcome::Unchanged => {
                tracing::debug!(repository = %repo.full_name, "unchanged");
                None
            }
        };

        if let Some(topics) = replacement {
            if let Err(error) = host.replace_topics(&repo.owner_login, &repo.name, &topics) {
                tracing::warn!(repository = %repo.full_name, %outcome, error = %error, "topic replacement failed");
                report.failures.push(RemoteWriteFailure {
                    full_name: repo.full_name,
                    outcome,
                    error,
                });
                continue;
            }
            tracing::info!(repository = %repo.full_name, %outcome, "topics replaced");
        }

        report.actions.push(RepositoryAction {
            full_name: repo.full_name,
            outcome,
        });
    }

    store.save(&record).map_err(ReconcileError::RecordSave)?;
    Ok(report)
}

fn list<H: RepositoryHost>(
    host: &H,
    target: &Target,
) -> Result<Vec<RepositorySnapshot>, ReconcileError> {
    let repos = host
        .list_repositories(&target.owner)
        .map_err(|source| ReconcileError::RemoteList {
            owner: target.owner.clone(),
            source,
        })?;
    tracing::debug!(owner = %target.owner, count = repos.len(), "listed repositories");
    Ok(repos)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
