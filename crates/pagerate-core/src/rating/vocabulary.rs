//! Quality pill vocabularies and in-progress selections

use std::collections::BTreeSet;

use super::model::Rating;

/// Report-level positives (popup flow and wizard step one)
pub const REPORT_POSITIVE: &[&str] = &[
    "Clear insights",
    "Easy to understand",
    "Visually appealing",
    "Actionable data",
    "Well organized",
    "Comprehensive",
    "Relevant content",
    "Professional design",
];

/// Report-level negatives (popup flow and wizard step one)
pub const REPORT_NEGATIVE: &[&str] = &[
    "Hard to read",
    "Too cluttered",
    "Missing context",
    "Unclear data",
    "Poor layout",
    "Not actionable",
    "Irrelevant info",
    "Design issues",
];

/// Short per-section list used in wizard step two
pub const SECTION_POSITIVE: &[&str] = &[
    "Clear",
    "Helpful",
    "Well designed",
    "Informative",
    "Easy to read",
];

pub const SECTION_NEGATIVE: &[&str] = &[
    "Confusing",
    "Unclear",
    "Too busy",
    "Missing info",
    "Hard to read",
];

/// Sidebar list; only the first [`SIDEBAR_LIMIT`] are offered
pub const SIDEBAR_POSITIVE: &[&str] = &[
    "Clear messaging",
    "Strong visuals",
    "Compelling data",
    "Easy to understand",
    "Actionable insights",
    "Professional design",
    "Relevant metrics",
    "Good storytelling",
    "Effective layout",
    "Valuable recommendations",
];

pub const SIDEBAR_NEGATIVE: &[&str] = &[
    "Confusing layout",
    "Too much data",
    "Unclear messaging",
    "Poor visual hierarchy",
    "Missing context",
    "Hard to read",
    "Irrelevant metrics",
    "Weak recommendations",
    "Design issues",
    "Information overload",
];

pub const SIDEBAR_LIMIT: usize = 6;

/// A fixed, ordered list of quality tags for one polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    tags: &'static [&'static str],
}

impl Vocabulary {
    pub const fn new(tags: &'static [&'static str]) -> Self {
        Self { tags }
    }

    /// First `limit` tags of a longer list
    pub fn truncated(tags: &'static [&'static str], limit: usize) -> Self {
        Self {
            tags: &tags[..limit.min(tags.len())],
        }
    }

    pub fn tags(&self) -> &'static [&'static str] {
        self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn position(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| *t == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }
}

/// Which vocabulary family a rating draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyScope {
    /// The whole report (popup flow, wizard step one)
    Report,
    /// One section in wizard step two
    Section,
    /// The sidebar list
    Sidebar,
}

impl VocabularyScope {
    pub fn vocabulary(&self, rating: Rating) -> Vocabulary {
        match (self, rating) {
            (VocabularyScope::Report, Rating::Up) => Vocabulary::new(REPORT_POSITIVE),
            (VocabularyScope::Report, Rating::Down) => Vocabulary::new(REPORT_NEGATIVE),
            (VocabularyScope::Section, Rating::Up) => Vocabulary::new(SECTION_POSITIVE),
            (VocabularyScope::Section, Rating::Down) => Vocabulary::new(SECTION_NEGATIVE),
            (VocabularyScope::Sidebar, Rating::Up) => {
                Vocabulary::truncated(SIDEBAR_POSITIVE, SIDEBAR_LIMIT)
            }
            (VocabularyScope::Sidebar, Rating::Down) => {
                Vocabulary::truncated(SIDEBAR_NEGATIVE, SIDEBAR_LIMIT)
            }
        }
    }
}

/// Pills currently toggled on, always reported in vocabulary order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualitySelection {
    vocabulary: Vocabulary,
    selected: BTreeSet<usize>,
}

impl QualitySelection {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            selected: BTreeSet::new(),
        }
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }

    /// Toggle a tag. Returns the new membership, or `None` when the tag is
    /// not part of the displayed vocabulary.
    pub fn toggle(&mut self, tag: &str) -> Option<bool> {
        let index = self.vocabulary.position(tag)?;
        self.toggle_index(index)
    }

    pub fn toggle_index(&mut self, index: usize) -> Option<bool> {
        if index >= self.vocabulary.len() {
            return None;
        }
        if self.selected.remove(&index) {
            Some(false)
        } else {
            self.selected.insert(index);
            Some(true)
        }
    }

    /// Select every known tag in `tags`; unknown ones are ignored
    pub fn select_all<S: AsRef<str>>(&mut self, tags: &[S]) {
        for tag in tags {
            if let Some(index) = self.vocabulary.position(tag.as_ref()) {
                self.selected.insert(index);
            }
        }
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.vocabulary
            .position(tag)
            .is_some_and(|i| self.selected.contains(&i))
    }

    pub fn is_index_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|&i| self.vocabulary.tags().get(i))
            .map(|t| t.to_string())
            .collect()
    }
}
