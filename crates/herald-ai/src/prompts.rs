//! Prompt text for changelog synthesis
//!
//! The system directive is fixed per run; only the user prompt changes per day.

use herald_storage::DayBucket;

/// Shown in place of a missing or blank issue description
pub const NO_DESCRIPTION: &str = "(no description)";

const ISSUE_SEPARATOR: &str = "\n\n---\n\n";

/// Existing changelog entries used to steer tone and layout
const TONE_EXAMPLES: &str = r#"<Update label="2026-02-18">

## Image-to-Video Now Available Without a Subscription

You can now generate image-to-video and text-to-video clips at 480p on the free plan. Higher resolutions still require a subscription.

Try it now by visiting https://example.com/create/image-to-video.

</Update>

<Update label="2026-02-04">

## Choose a Model in the Image Editor API

You can now pick which model the image editor uses:

- `qwen-edit`
- `nano-banana`

```python
res = client.v1.image_editor.generate(
    ...
    model="nano-banana",
)
```

Upgrade to the latest SDK version to try it out.

</Update>

<Update label="2026-01-19">

## New Usage Page

Added a dedicated `/usage` page so you can track your consumption at a glance.

</Update>"#;

/// Build the fixed system directive for `product`
#[must_use]
pub fn system_directive(product: &str) -> String {
    format!(
        "You are writing changelog entries for {product}.\n\
         \n\
         Your job is to rewrite issue titles and descriptions into polished, user-facing changelog prose in MDX format.\n\
         \n\
         Rules:\n\
         - Write in the same style as the existing examples below: concise, direct, and action-oriented\n\
         - Start each entry with \"## \" followed by a clear, punchy title (not the raw issue title)\n\
         - Write 1-3 short paragraphs describing what changed and why it matters to the user\n\
         - If relevant, include a code snippet (Python or TypeScript matching the issue context)\n\
         - End with a \"Try it out now:\" link if there's a product URL in the description, otherwise omit it\n\
         - If multiple issues are provided for the same day, write a separate \"## \" section for each\n\
         - Do NOT include the <Update label=\"...\"> wrapper, just the inner MDX content\n\
         - Do NOT include any image or Frame tags, those will be added automatically\n\
         - Do NOT hallucinate details not present in the issue\n\
         \n\
         Existing changelog style examples:\n\
         {TONE_EXAMPLES}\n"
    )
}

/// Describe one day's issues for the model
#[must_use]
pub fn user_prompt(bucket: &DayBucket) -> String {
    let issues = bucket
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            // blank only decides the placeholder, the text itself goes through untouched
            let description = item
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(NO_DESCRIPTION);
            format!(
                "Issue {}:\nTitle: {}\nDescription:\n{description}",
                i + 1,
                item.title
            )
        })
        .collect::<Vec<_>>()
        .join(ISSUE_SEPARATOR);

    format!(
        "Generate changelog MDX content for the following issue(s) completed on {}:\n\n{issues}\n",
        bucket.day_key()
    )
}
