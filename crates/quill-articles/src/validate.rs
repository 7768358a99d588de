//! Field rules run before a draft may be submitted.

use std::collections::BTreeMap;

use quill_common::ValidationPolicy;

use crate::draft::{ArticleDraft, FormField};

/// At most one message per field, iterated in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    /// Record `message` for `field`, honouring `policy` when one is already set.
    pub fn record(&mut self, field: FormField, message: &str, policy: ValidationPolicy) {
        match policy {
            ValidationPolicy::LastFailureWins => {
                self.0.insert(field, message.to_owned());
            }
            ValidationPolicy::FirstFailureWins => {
                self.0.entry(field).or_insert_with(|| message.to_owned());
            }
        }
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

struct Rule {
    field: FormField,
    passes: fn(&ArticleDraft) -> bool,
    message: &'static str,
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.trim().chars().count();
    (min..=max).contains(&len)
}

/// Presence before length for each field. Order matters: under
/// `LastFailureWins` a failing length rule replaces the presence message.
const RULES: &[Rule] = &[
    Rule {
        field: FormField::Title,
        passes: |d| present(&d.title),
        message: "Title is required",
    },
    Rule {
        field: FormField::Title,
        passes: |d| length_between(&d.title, 3, 200),
        message: "Title must be between 3 and 200 characters",
    },
    Rule {
        field: FormField::Category,
        passes: |d| present(&d.category),
        message: "Category is required",
    },
    Rule {
        field: FormField::ShortDescription,
        passes: |d| present(&d.short_description),
        message: "Short description is required",
    },
    Rule {
        field: FormField::ShortDescription,
        passes: |d| length_between(&d.short_description, 10, 500),
        message: "Short description must be between 10 and 500 characters",
    },
    Rule {
        field: FormField::Content,
        passes: |d| present(&d.content),
        message: "Content is required",
    },
    Rule {
        field: FormField::Content,
        passes: |d| length_between(&d.content, 50, 50_000),
        message: "Content must be between 50 and 50000 characters",
    },
];

/// Run every rule against `draft`. An empty result means the draft may be sent.
pub fn validate_draft(draft: &ArticleDraft, policy: ValidationPolicy) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for rule in RULES {
        if !(rule.passes)(draft) {
            errors.record(rule.field, rule.message, policy);
        }
    }
    errors
}
