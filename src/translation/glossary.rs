use regex::{NoExpand, RegexBuilder};

use crate::database::models::GlossaryEntry;

/// Replace whole-word, case-insensitive occurrences of each glossary term
///
/// Entries are applied in order; terms are matched literally.
pub fn apply_glossary(text: &str, entries: &[GlossaryEntry]) -> String {
    let mut result = text.to_string();

    for entry in entries {
        let term = entry.term.trim();
        if term.is_empty() {
            continue;
        }

        let pattern = format!(r"\b{}\b", regex::escape(term));
        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => {
                result = re.replace_all(&result, NoExpand(&entry.translation)).into_owned();
            }
            Err(e) => log::warn!("Skipping glossary term '{}': {}", term, e),
        }
    }

    result
}
