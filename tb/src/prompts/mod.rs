//! Prompt Template System
//!
//! Loads and renders the `.pmt` instruction templates, one per prediction.
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{name}.pmt` (user override from config)
//! 2. Embedded fallback compiled into the binary
//!
//! Templates use Handlebars syntax; interpolated user text uses the
//! triple-stash form so it is passed through unescaped.

pub mod embedded;
mod loader;

pub use loader::PromptLoader;
