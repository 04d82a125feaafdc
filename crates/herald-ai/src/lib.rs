pub mod ai_provider;
pub mod placeholders;
pub mod prompts;
pub mod providers;
pub mod synthesizer;

pub use ai_provider::{create_provider, AiConfig, AiProvider, TextGenerator};
pub use placeholders::{add_image_placeholders, slugify};
pub use synthesizer::BlockSynthesizer;
