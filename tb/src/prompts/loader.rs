//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (`prediction.prompts-dir`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `user_dir` before the embedded templates
    ///
    /// A directory that does not exist is ignored.
    pub fn new(user_dir: Option<&Path>) -> Self {
        debug!(?user_dir, "PromptLoader::new: called");
        let user_dir = user_dir.filter(|d| d.is_dir()).map(Path::to_path_buf);
        if user_dir.is_none() {
            debug!("PromptLoader::new: no user override directory");
        }

        Self {
            hbs: Handlebars::new(),
            user_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self::new(None)
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{prompts-dir}/{name}.pmt`
    /// 2. Embedded fallback
    pub fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in user override");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with any serializable context
    pub fn render<C: Serialize>(&self, template_name: &str, context: &C) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_embedded_categorize() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader
            .render("categorize", &serde_json::json!({ "description": "Reply to <client> email" }))
            .unwrap();
        // Triple-stash leaves user text unescaped
        assert!(rendered.contains("Task: Reply to <client> email"));
        assert!(rendered.contains("Routine Operations"));
    }

    #[test]
    fn test_render_personalize_history() {
        let loader = PromptLoader::embedded_only();
        let context = serde_json::json!({
            "historicalData": [
                { "taskDescription": "Pay invoices", "taskType": "admin", "duration": "15-minute" }
            ],
            "newTaskDescription": "File receipts"
        });
        let rendered = loader.render("personalize", &context).unwrap();
        assert!(rendered.contains("- Task: Pay invoices, Type: admin, Duration: 15-minute"));
        assert!(rendered.contains("File receipts"));
        assert!(!rendered.contains("no history yet"));

        let empty = serde_json::json!({ "historicalData": [], "newTaskDescription": "File receipts" });
        assert!(loader.render("personalize", &empty).unwrap().contains("no history yet"));
    }

    #[test]
    fn test_user_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("estimate.pmt"), "custom {{{taskDescription}}}").unwrap();

        let loader = PromptLoader::new(Some(dir.path()));
        let rendered = loader
            .render("estimate", &serde_json::json!({ "taskDescription": "walk" }))
            .unwrap();
        assert_eq!(rendered, "custom walk");

        // Templates missing from the override directory come from the binary
        assert!(loader.load_template("group").unwrap().contains("60 minutes"));
    }

    #[test]
    fn test_missing_override_dir_is_ignored() {
        let loader = PromptLoader::new(Some(Path::new("/definitely/not/a/real/dir")));
        assert!(loader.load_template("parse").is_ok());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
