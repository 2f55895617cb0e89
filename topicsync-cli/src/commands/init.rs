//! `topicsync init` — seed the record from current remote state.

use anyhow::{Context, Result};
use clap::Args;

use topicsync_core::reconcile;
use topicsync_github::GithubClient;

use crate::Settings;

/// Create the record file. Refuses to overwrite an existing one.
#[derive(Args, Debug)]
pub struct InitArgs {}

impl InitArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let store = settings.store();
        let target = settings.target();
        tracing::debug!(config = %store.path().display(), owner = %target.owner, topic = %target.marker, "running init");

        let record = reconcile::init(&store, &target, |r| GithubClient::new(&r.access_token))
            .with_context(|| format!("init failed for '{}'", target.owner))?;

        let marked = record.repositories.values().filter(|want| **want).count();
        println!(
            "✓ Tracking {} repositories of '{}' ({} with '{}')",
            record.repositories.len(),
            target.owner,
            marked,
            target.marker
        );
        println!("  Saved to: {}", store.path().display());
        Ok(())
    }
}
