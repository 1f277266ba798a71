//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

pub const CATEGORIZE: &str = include_str!("../../prompts/categorize.pmt");
pub const CLASSIFY: &str = include_str!("../../prompts/classify.pmt");
pub const ESTIMATE: &str = include_str!("../../prompts/estimate.pmt");
pub const DECOMPOSE: &str = include_str!("../../prompts/decompose.pmt");
pub const PERSONALIZE: &str = include_str!("../../prompts/personalize.pmt");
pub const GROUP: &str = include_str!("../../prompts/group.pmt");
pub const PARSE: &str = include_str!("../../prompts/parse.pmt");

/// Names of every embedded template
pub const NAMES: [&str; 7] = [
    "categorize",
    "classify",
    "estimate",
    "decompose",
    "personalize",
    "group",
    "parse",
];

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "categorize" => Some(CATEGORIZE),
        "classify" => Some(CLASSIFY),
        "estimate" => Some(ESTIMATE),
        "decompose" => Some(DECOMPOSE),
        "personalize" => Some(PERSONALIZE),
        "group" => Some(GROUP),
        "parse" => Some(PARSE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_is_embedded() {
        for name in NAMES {
            let template = get_embedded(name).unwrap();
            assert!(!template.trim().is_empty(), "{} is empty", name);
        }
    }

    #[test]
    fn test_categorize_lists_every_category() {
        for category in crate::domain::Category::all() {
            assert!(CATEGORIZE.contains(category.label()), "missing {}", category);
        }
    }

    #[test]
    fn test_group_states_the_cap() {
        assert!(GROUP.contains("60 minutes"));
        assert!(GROUP.contains("{{#each tasks}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
