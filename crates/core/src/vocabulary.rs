//! Vocabulary derivation.
//!
//! Categories and lenses are never stored on their own. They are recomputed
//! from a full catalog snapshot after every fetch or mutation, so the option
//! lists can never drift from the data. The flip side: once the last entry
//! using a value is deleted, that value disappears from selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::photo::{PhotoEntry, OTHER_OPTION};

/// Distinct, non-empty facet values in use, each list sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub categories: Vec<String>,
    pub lenses: Vec<String>,
}

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
}

/// Derive the vocabulary from `entries`.
///
/// Pure and deterministic: the result depends only on the set of values
/// present, not on entry order or how many times it is called.
pub fn derive_vocabulary<'a, I>(entries: I) -> Vocabulary
where
    I: IntoIterator<Item = &'a PhotoEntry>,
{
    let mut categories = BTreeSet::new();
    let mut lenses = BTreeSet::new();

    for entry in entries {
        let category = entry.category.trim();
        if !category.is_empty() {
            categories.insert(category.to_string());
        }
        let lens = entry.lens.trim();
        if !lens.is_empty() {
            lenses.insert(lens.to_string());
        }
    }

    Vocabulary {
        categories: categories.into_iter().collect(),
        lenses: lenses.into_iter().collect(),
    }
}

impl Vocabulary {
    /// Category options for the admin form, with "other" appended.
    pub fn category_options(&self) -> Vec<FacetOption> {
        with_other(&self.categories)
    }

    /// Lens options for the admin form, with "other" appended.
    pub fn lens_options(&self) -> Vec<FacetOption> {
        with_other(&self.lenses)
    }

    pub fn has_category(&self, value: &str) -> bool {
        self.categories.iter().any(|c| c == value)
    }

    pub fn has_lens(&self, value: &str) -> bool {
        self.lenses.iter().any(|l| l == value)
    }
}

fn with_other(values: &[String]) -> Vec<FacetOption> {
    values
        .iter()
        .map(|v| FacetOption {
            value: v.clone(),
            label: display_label(v),
        })
        .chain(std::iter::once(FacetOption {
            value: OTHER_OPTION.to_string(),
            label: display_label(OTHER_OPTION),
        }))
        .collect()
}

/// Human-facing label: the stored value with its first character upper-cased.
pub fn display_label(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::entry;

    #[test]
    fn derives_distinct_non_empty_values() {
        let entries = vec![
            entry(1, "insect", "macro-90mm"),
            entry(2, "flora", "macro-100mm"),
            entry(3, "insect", "macro-100mm"),
            entry(4, "  ", ""),
        ];

        let vocab = derive_vocabulary(&entries);

        assert_eq!(vocab.categories, vec!["flora", "insect"]);
        assert_eq!(vocab.lenses, vec!["macro-100mm", "macro-90mm"]);
    }

    #[test]
    fn derivation_is_idempotent_and_order_insensitive() {
        let mut entries = vec![
            entry(1, "insect", "macro-90mm"),
            entry(2, "flora", "macro-100mm"),
            entry(3, "fungi", "macro-90mm"),
        ];
        let first = derive_vocabulary(&entries);
        let again = derive_vocabulary(&entries);
        entries.reverse();
        let reversed = derive_vocabulary(&entries);

        assert_eq!(first, again);
        assert_eq!(first, reversed);
    }

    #[test]
    fn deleting_last_user_of_a_value_drops_it() {
        let mut entries = vec![entry(1, "insect", "macro-90mm"), entry(2, "fungi", "macro-90mm")];
        assert!(derive_vocabulary(&entries).has_category("fungi"));

        entries.retain(|e| e.id != 2);
        assert!(!derive_vocabulary(&entries).has_category("fungi"));
    }

    #[test]
    fn options_end_with_other() {
        let vocab = derive_vocabulary(&[entry(1, "insect", "macro-90mm")]);
        let options = vocab.category_options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "Insect");
        assert_eq!(options.last().map(|o| o.value.as_str()), Some(OTHER_OPTION));
        assert_eq!(vocab.lens_options().last().map(|o| o.label.as_str()), Some("Other"));
    }

    #[test]
    fn display_label_capitalizes_first_char_only() {
        assert_eq!(display_label("macro-90mm"), "Macro-90mm");
        assert_eq!(display_label("éclair"), "Éclair");
        assert_eq!(display_label(""), "");
    }
}
