//! End-to-end runs against a changelog on disk with stubbed tracker and model

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use herald_ai::synthesizer::render_block;
use herald_ai::{BlockSynthesizer, TextGenerator};
use herald_core::{ChangelogError, IssueSource, Pipeline, ReviewGate, RunOptions, RunOutcome};
use herald_integrations::{CompletedIssuesQuery, IssuePage, IssueTracker, Team, TrackerIssue};
use herald_storage::ChangelogDocument;

const CHANGELOG: &str = "---\ntitle: Changelog\n---\n\n\
<Update label=\"2026-01-01\">\n\n## Older Feature\n\nShipped earlier.\n\n</Update>\n\n\
<Update label=\"2025-12-15\">\n\n## Oldest Feature\n\n</Update>\n";

const HEAD: &str = "---\ntitle: Changelog\n---\n\n";

const PROSE: &str = "## Fresh Feature\n\nSomething new.";

struct StubTracker {
    issues: Vec<TrackerIssue>,
    has_more: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl IssueTracker for StubTracker {
    async fn completed_issues(&self, _query: &CompletedIssuesQuery) -> anyhow::Result<IssuePage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(IssuePage {
            issues: self.issues.clone(),
            has_more: self.has_more,
        })
    }

    async fn list_teams(&self) -> anyhow::Result<Vec<Team>> {
        Ok(Vec::new())
    }

    fn system_name(&self) -> &'static str {
        "stub"
    }
}

/// Replies with fixed prose; fails on the call whose index equals `fail_on`
struct StubGenerator {
    calls: Arc<AtomicUsize>,
    fail_on: Option<usize>,
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _system: &str, _prompt: &str) -> anyhow::Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if Some(n) == self.fail_on {
            anyhow::bail!("model overloaded");
        }
        Ok(PROSE.to_string())
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

#[derive(Default)]
struct RecordingGate {
    answer: bool,
    previews: Vec<String>,
    questions: Vec<String>,
}

impl ReviewGate for RecordingGate {
    fn show_preview(&mut self, preview: &str) {
        self.previews.push(preview.to_string());
    }

    fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.answer)
    }
}

struct Harness {
    pipeline: Pipeline,
    fetches: Arc<AtomicUsize>,
    generations: Arc<AtomicUsize>,
}

fn completed(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
}

fn issue(id: &str, completed_at: Option<DateTime<Utc>>) -> TrackerIssue {
    TrackerIssue {
        id: id.to_string(),
        title: format!("{id} title"),
        description: Some(format!("{id} description")),
        url: format!("https://linear.app/acme/issue/{id}"),
        completed_at,
    }
}

fn harness(issues: Vec<TrackerIssue>, fail_on: Option<usize>) -> Harness {
    let fetches = Arc::new(AtomicUsize::new(0));
    let generations = Arc::new(AtomicUsize::new(0));

    let tracker = StubTracker {
        issues,
        has_more: false,
        calls: Arc::clone(&fetches),
    };
    let generator = StubGenerator {
        calls: Arc::clone(&generations),
        fail_on,
    };

    let source = IssueSource::new(Box::new(tracker), "team".to_string(), "feature".to_string(), 100);
    let synthesizer = BlockSynthesizer::new(Box::new(generator), "Acme");

    Harness {
        pipeline: Pipeline::new(source, synthesizer, chrono_tz::America::Los_Angeles),
        fetches,
        generations,
    }
}

fn two_days() -> Vec<TrackerIssue> {
    vec![
        issue("ACME-3", Some(completed(12, 18))),
        issue("ACME-1", Some(completed(10, 18))),
        issue("ACME-2", Some(completed(10, 21))),
        issue("ACME-4", None),
    ]
}

fn write_changelog(dir: &Path, text: &str) -> ChangelogDocument {
    let path = dir.join("changelog.mdx");
    std::fs::write(&path, text).unwrap();
    ChangelogDocument::load(&path).unwrap()
}

fn on_disk(document: &ChangelogDocument) -> String {
    std::fs::read_to_string(document.path()).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
}

#[tokio::test]
async fn test_generates_blocks_newest_first_above_last_entry() {
    let dir = tempfile::tempdir().unwrap();
    let document = write_changelog(dir.path(), CHANGELOG);
    let h = harness(two_days(), None);
    let mut gate = RecordingGate {
        answer: true,
        ..RecordingGate::default()
    };

    let outcome = h
        .pipeline
        .run(&document, &RunOptions::default(), &mut gate)
        .await
        .unwrap();

    let blocks = match outcome {
        RunOutcome::Written(blocks) => blocks,
        other => panic!("expected a write, got {other:?}"),
    };
    let days: Vec<_> = blocks.iter().map(|b| b.day_key()).collect();
    assert_eq!(days, ["2026-01-10", "2026-01-12"]);
    assert_eq!(h.generations.load(Ordering::SeqCst), 2);

    let newer = render_block(day(12), PROSE);
    let older = render_block(day(10), PROSE);
    let expected = format!(
        "{HEAD}{}\n\n{}\n\n{}",
        newer.markup(),
        older.markup(),
        &CHANGELOG[HEAD.len()..]
    );
    assert_eq!(on_disk(&document), expected);

    assert_eq!(gate.previews.len(), 1);
    assert!(gate.previews[0].find("2026-01-10").unwrap() < gate.previews[0].find("2026-01-12").unwrap());
    assert_eq!(
        gate.questions,
        [format!("Write 2 new block(s) to {}?", document.path().display())]
    );
}

#[tokio::test]
async fn test_nothing_new_is_up_to_date() {
    let dir = tempfile::tempdir().unwrap();
    let document = write_changelog(dir.path(), CHANGELOG);
    let h = harness(
        vec![issue("ACME-0", Some(completed(1, 0))), issue("ACME-9", None)],
        None,
    );
    let mut gate = RecordingGate::default();

    let outcome = h
        .pipeline
        .run(&document, &RunOptions::default(), &mut gate)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::UpToDate);
    assert_eq!(h.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(h.generations.load(Ordering::SeqCst), 0);
    assert!(gate.previews.is_empty());
    assert_eq!(on_disk(&document), CHANGELOG);
}

#[tokio::test]
async fn test_synthesis_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let document = write_changelog(dir.path(), CHANGELOG);
    let h = harness(two_days(), Some(1));
    let mut gate = RecordingGate {
        answer: true,
        ..RecordingGate::default()
    };

    let err = h
        .pipeline
        .run(&document, &RunOptions::default(), &mut gate)
        .await
        .unwrap_err();

    match err {
        ChangelogError::SynthesisFailed { day, message } => {
            assert_eq!(day, "2026-01-12");
            assert!(message.contains("model overloaded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(gate.previews.is_empty());
    assert_eq!(on_disk(&document), CHANGELOG);
}

#[tokio::test]
async fn test_declined_confirmation_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let document = write_changelog(dir.path(), CHANGELOG);
    let h = harness(two_days(), None);
    let mut gate = RecordingGate::default();

    let outcome = h
        .pipeline
        .run(&document, &RunOptions::default(), &mut gate)
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Declined(ref blocks) if blocks.len() == 2));
    assert_eq!(gate.questions.len(), 1);
    assert_eq!(on_disk(&document), CHANGELOG);
}

#[tokio::test]
async fn test_dry_run_previews_without_asking() {
    let dir = tempfile::tempdir().unwrap();
    let document = write_changelog(dir.path(), CHANGELOG);
    let h = harness(two_days(), None);
    let mut gate = RecordingGate {
        answer: true,
        ..RecordingGate::default()
    };
    let options = RunOptions {
        since: None,
        dry_run: true,
    };

    let outcome = h.pipeline.run(&document, &options, &mut gate).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Previewed(ref blocks) if blocks.len() == 2));
    assert_eq!(gate.previews.len(), 1);
    assert!(gate.questions.is_empty());
    assert_eq!(on_disk(&document), CHANGELOG);
}

#[tokio::test]
async fn test_missing_marker_fails_before_fetching() {
    let dir = tempfile::tempdir().unwrap();
    let document = write_changelog(dir.path(), "# Changelog\n\nComing soon.\n");
    let h = harness(two_days(), None);
    let mut gate = RecordingGate::default();

    let err = h
        .pipeline
        .run(&document, &RunOptions::default(), &mut gate)
        .await
        .unwrap_err();

    assert!(matches!(err, ChangelogError::NoExistingEntries { .. }));
    assert_eq!(h.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_since_override_without_marker_still_cannot_merge() {
    let dir = tempfile::tempdir().unwrap();
    let text = "# Changelog\n\nComing soon.\n";
    let document = write_changelog(dir.path(), text);
    let h = harness(two_days(), None);
    let mut gate = RecordingGate {
        answer: true,
        ..RecordingGate::default()
    };
    let options = RunOptions {
        since: Some("2026-01-01".to_string()),
        dry_run: false,
    };

    let err = h.pipeline.run(&document, &options, &mut gate).await.unwrap_err();

    assert!(matches!(err, ChangelogError::MalformedDocument(_)));
    assert_eq!(on_disk(&document), text);
}

#[tokio::test]
async fn test_invalid_since_fails_before_fetching() {
    let dir = tempfile::tempdir().unwrap();
    let document = write_changelog(dir.path(), CHANGELOG);
    let h = harness(two_days(), None);
    let mut gate = RecordingGate::default();
    let options = RunOptions {
        since: Some("01/05/2026".to_string()),
        dry_run: false,
    };

    let err = h.pipeline.run(&document, &options, &mut gate).await.unwrap_err();

    assert!(matches!(err, ChangelogError::InvalidDateFormat { .. }));
    assert_eq!(h.fetches.load(Ordering::SeqCst), 0);
}
