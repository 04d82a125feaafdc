//! Day bucket -> `<Update>` block
//!
//! The model only writes the inner prose. Everything structural (the wrapper
//! tag, its label and the placeholder images) is added here so the block is
//! always well-formed regardless of what the model returns.

use anyhow::Result;
use chrono::NaiveDate;
use herald_storage::{ContentBlock, DayBucket, DAY_KEY_FORMAT};

use crate::ai_provider::TextGenerator;
use crate::placeholders::add_image_placeholders;
use crate::prompts::{system_directive, user_prompt};

/// Writes one changelog block per day through a [`TextGenerator`]
pub struct BlockSynthesizer {
    generator: Box<dyn TextGenerator>,
    system_directive: String,
}

impl BlockSynthesizer {
    #[must_use]
    pub fn new(generator: Box<dyn TextGenerator>, product: &str) -> Self {
        Self {
            generator,
            system_directive: system_directive(product),
        }
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Generate prose for `bucket` and wrap it into a block
    ///
    /// # Errors
    ///
    /// Returns an error if the generator fails or returns only whitespace
    pub async fn synthesize(&self, bucket: &DayBucket) -> Result<ContentBlock> {
        let prompt = user_prompt(bucket);
        log::debug!("Synthesizing {} ({} chars of prompt)", bucket.day_key(), prompt.len());

        let prose = self
            .generator
            .generate(&self.system_directive, &prompt)
            .await?;

        let prose = prose.trim();
        if prose.is_empty() {
            anyhow::bail!("{} returned no text", self.generator.model_name());
        }

        Ok(render_block(bucket.day, prose))
    }
}

/// Wrap generated prose into a labelled `<Update>` block with placeholders
#[must_use]
pub fn render_block(day: NaiveDate, prose: &str) -> ContentBlock {
    let label = day.format(DAY_KEY_FORMAT);
    let body = add_image_placeholders(prose.trim(), day);
    ContentBlock::new(
        day,
        format!("<Update label=\"{label}\">\n\n{body}\n\n</Update>"),
    )
}
