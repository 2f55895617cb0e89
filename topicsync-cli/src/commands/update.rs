//! `topicsync update` — push the recorded marker membership to GitHub.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use topicsync_core::{
    reconcile::{self, RemoteWriteFailure, UpdateReport},
    Outcome,
};
use topicsync_github::GithubClient;

use crate::Settings;

/// Reconcile every repository against the record, then save the record.
#[derive(Args, Debug)]
pub struct UpdateArgs {}

#[derive(Tabled)]
struct ActionRow {
    #[tabled(rename = "repository")]
    repository: String,
    #[tabled(rename = "action")]
    action: String,
}

impl UpdateArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let store = settings.store();
        let target = settings.target();
        tracing::debug!(config = %store.path().display(), owner = %target.owner, topic = %target.marker, "running update");

        let report = reconcile::update(&store, &target, |r| GithubClient::new(&r.access_token))
            .with_context(|| format!("update failed for '{}'", target.owner))?;

        print_report(&report, &target.marker);

        if !report.failures.is_empty() {
            for failure in &report.failures {
                eprintln!("{} {}", "✗".red().bold(), failure_line(failure, &target.marker));
            }
            bail!(
                "{} of {} repositories could not be updated; the record was saved, re-run `update` to retry",
                report.failures.len(),
                report.actions.len() + report.failures.len()
            );
        }
        Ok(())
    }
}

fn print_report(report: &UpdateReport, marker: &str) {
    let rows: Vec<ActionRow> = report
        .changed()
        .map(|a| ActionRow {
            repository: a.full_name.clone(),
            action: outcome_label(a.outcome, marker),
        })
        .collect();

    println!(
        "{} {} repositories checked ({} added, {} removed, {} adopted, {} unchanged)",
        "✓".green().bold(),
        report.actions.len() + report.failures.len(),
        report.count(Outcome::TagShouldBeAdded),
        report.count(Outcome::TagShouldBeRemoved),
        report.count(Outcome::UnknownRepository),
        report.count(Outcome::Unchanged),
    );

    if rows.is_empty() {
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn failure_line(failure: &RemoteWriteFailure, marker: &str) -> String {
    format!(
        "{} (failed: {}): {}",
        failure.full_name,
        outcome_label(failure.outcome, marker),
        failure.error
    )
}

fn outcome_label(outcome: Outcome, marker: &str) -> String {
    match outcome {
        Outcome::TagShouldBeAdded => format!("+ {marker}"),
        Outcome::TagShouldBeRemoved => format!("- {marker}"),
        Outcome::UnknownRepository => "adopted".to_string(),
        Outcome::Unchanged => "unchanged".to_string(),
    }
}
