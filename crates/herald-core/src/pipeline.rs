use chrono_tz::Tz;
use herald_ai::BlockSynthesizer;
use herald_storage::{ChangelogDocument, ContentBlock};

use crate::cutoff::resolve_cutoff;
use crate::error::{ChangelogError, Result};
use crate::grouping::group_by_day;
use crate::source::IssueSource;

/// Operator checkpoint between generation and the write
pub trait ReviewGate {
    /// Present the full text about to be inserted
    fn show_preview(&mut self, preview: &str);

    /// Ask a yes/no question; `Ok(false)` aborts without writing
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read
    fn confirm(&mut self, question: &str) -> std::io::Result<bool>;
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// `YYYY-MM-DD` that replaces the document's newest entry as cutoff
    pub since: Option<String>,
    /// Show the preview and stop
    pub dry_run: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing completed since the cutoff
    UpToDate,
    Previewed(Vec<ContentBlock>),
    Declined(Vec<ContentBlock>),
    Written(Vec<ContentBlock>),
}

impl RunOutcome {
    #[must_use]
    pub fn blocks(&self) -> &[ContentBlock] {
        match self {
            Self::UpToDate => &[],
            Self::Previewed(blocks) | Self::Declined(blocks) | Self::Written(blocks) => blocks,
        }
    }
}

/// Preview text: blocks in generation order separated by blank lines
#[must_use]
pub fn render_preview(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(ContentBlock::markup)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct Pipeline {
    source: IssueSource,
    synthesizer: BlockSynthesizer,
    zone: Tz,
}

impl Pipeline {
    #[must_use]
    pub fn new(source: IssueSource, synthesizer: BlockSynthesizer, zone: Tz) -> Self {
        Self {
            source,
            synthesizer,
            zone,
        }
    }

    /// Run one generation pass against `document`
    ///
    /// Every block is generated before anything is shown, and the document is
    /// written at most once, after the gate approves.
    ///
    /// # Errors
    ///
    /// Fails on the first error of any stage; the document is then untouched
    pub async fn run(
        &self,
        document: &ChangelogDocument,
        options: &RunOptions,
        gate: &mut dyn ReviewGate,
    ) -> Result<RunOutcome> {
        let cutoff = resolve_cutoff(options.since.as_deref(), document)?;
        log::info!("Cutoff {} (from {})", cutoff.date(), cutoff.source);

        log::info!(
            "Fetching issues with label \"{}\" completed after {}",
            self.source.label(),
            cutoff.instant.to_rfc3339()
        );
        let items = self.source.fetch_since(&cutoff).await?;
        log::info!("Found {} issue(s)", items.len());

        if items.is_empty() {
            log::info!("No new issues since {}. Changelog is up to date.", cutoff.date());
            return Ok(RunOutcome::UpToDate);
        }

        let buckets = group_by_day(items, self.zone);
        log::info!(
            "Generating {} block(s) with {}",
            buckets.len(),
            self.synthesizer.model_name()
        );

        let mut blocks = Vec::with_capacity(buckets.len());
        for bucket in &buckets {
            log::info!("  {} ({} issue(s))", bucket.day_key(), bucket.len());
            let block = self
                .synthesizer
                .synthesize(bucket)
                .await
                .map_err(|e| ChangelogError::SynthesisFailed {
                    day: bucket.day_key(),
                    message: format!("{e:#}"),
                })?;
            blocks.push(block);
        }

        gate.show_preview(&render_preview(&blocks));

        if options.dry_run {
            log::info!("Dry run, {} left unchanged", document.path().display());
            return Ok(RunOutcome::Previewed(blocks));
        }

        let question = format!(
            "Write {} new block(s) to {}?",
            blocks.len(),
            document.path().display()
        );
        if !gate.confirm(&question)? {
            log::info!("Aborted, nothing written");
            return Ok(RunOutcome::Declined(blocks));
        }

        document.merge(&blocks)?.save()?;
        log::info!(
            "Wrote {} block(s) to {}",
            blocks.len(),
            document.path().display()
        );
        Ok(RunOutcome::Written(blocks))
    }
}
