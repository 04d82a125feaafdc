/// Changelog generation command handler
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use herald_ai::{create_provider, BlockSynthesizer};
use herald_core::{IssueSource, Pipeline, ReviewGate, RunOptions, RunOutcome, Settings};
use herald_integrations::LinearClient;
use herald_storage::ChangelogDocument;

use super::helpers::{env_var, is_yes, rule};

const PREVIEW_WIDTH: usize = 60;

#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub since: Option<String>,
    pub dry_run: bool,
    pub yes: bool,
    pub changelog: Option<PathBuf>,
}

/// Terminal review: preview on stdout, answer from stdin
struct TerminalGate {
    assume_yes: bool,
}

impl ReviewGate for TerminalGate {
    fn show_preview(&mut self, preview: &str) {
        println!("\n{}", rule(PREVIEW_WIDTH));
        println!("{preview}");
        println!("{}\n", rule(PREVIEW_WIDTH));
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        print!("{question} [y/N] ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

pub async fn generate_command(config_path: Option<&Path>, args: GenerateArgs) -> Result<()> {
    let mut settings = Settings::load(config_path)?;
    if let Some(path) = args.changelog {
        settings.changelog_path = path;
    }

    let zone = settings.reference_zone()?;
    let team_id = settings.team_id()?.to_string();

    let tracker = LinearClient::new(
        Settings::linear_api_key(env_var)?,
        settings.linear.api_url.clone(),
        settings.request_timeout(),
    )?;
    let source = IssueSource::new(
        Box::new(tracker),
        team_id,
        settings.label.clone(),
        settings.page_size,
    );

    let generator = create_provider(&settings.ai_config(env_var)?)?;
    let synthesizer = BlockSynthesizer::new(generator, &settings.product_name);

    let document = ChangelogDocument::load(&settings.changelog_path)?;
    log::debug!(
        "Using {} with {} ({})",
        settings.changelog_path.display(),
        settings.ai.provider,
        synthesizer.model_name()
    );
    let pipeline = Pipeline::new(source, synthesizer, zone);

    let options = RunOptions {
        since: args.since,
        dry_run: args.dry_run,
    };
    let mut gate = TerminalGate {
        assume_yes: args.yes,
    };

    match pipeline.run(&document, &options, &mut gate).await? {
        RunOutcome::UpToDate => println!("Changelog is up to date."),
        RunOutcome::Previewed(blocks) => {
            println!("Dry run: {} block(s) generated, nothing written.", blocks.len());
        }
        RunOutcome::Declined(_) => println!("Aborted."),
        RunOutcome::Written(blocks) => println!(
            "Added {} block(s) to {}.",
            blocks.len(),
            settings.changelog_path.display()
        ),
    }

    Ok(())
}
