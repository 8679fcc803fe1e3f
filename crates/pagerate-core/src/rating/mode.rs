//! Presentation modes
//!
//! The three rating surfaces share one state machine and differ only in
//! vocabulary, storage key, copy and confirmation timing.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::model::Rating;
use super::vocabulary::{Vocabulary, VocabularyScope};
use crate::constants::{flow, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Centered popup per page rating
    #[default]
    Popup,
    /// Two-step report wizard
    Wizard,
    /// Sidebar with inline feedback module
    Inline,
}

/// Heading and hint shown above a pill list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl PresentationMode {
    pub const ALL: [PresentationMode; 3] = [
        PresentationMode::Popup,
        PresentationMode::Wizard,
        PresentationMode::Inline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationMode::Popup => "popup",
            PresentationMode::Wizard => "wizard",
            PresentationMode::Inline => "inline",
        }
    }

    /// Storage namespace for this mode's records
    pub fn namespace(&self) -> &'static str {
        match self {
            PresentationMode::Popup => keys::POPUP,
            PresentationMode::Wizard => keys::WIZARD,
            PresentationMode::Inline => keys::INLINE,
        }
    }

    /// Whether records are a per-page map (popup, inline) or a session log (wizard)
    pub fn is_session_log(&self) -> bool {
        matches!(self, PresentationMode::Wizard)
    }

    pub fn default_reset_delay(&self) -> Duration {
        match self {
            PresentationMode::Popup => flow::POPUP_RESET,
            PresentationMode::Wizard => flow::WIZARD_RESET,
            PresentationMode::Inline => flow::INLINE_RESET,
        }
    }

    /// Vocabulary family for a page-level rating
    pub fn page_scope(&self) -> VocabularyScope {
        match self {
            PresentationMode::Popup => VocabularyScope::Report,
            PresentationMode::Wizard => VocabularyScope::Section,
            PresentationMode::Inline => VocabularyScope::Sidebar,
        }
    }

    pub fn page_vocabulary(&self, rating: Rating) -> Vocabulary {
        self.page_scope().vocabulary(rating)
    }

    /// Pill prompt for the page-level (or, in the wizard, report-level) rating
    pub fn prompt(&self, rating: Rating) -> Prompt {
        match (self, rating) {
            (PresentationMode::Popup, Rating::Up) => Prompt {
                title: "What's good about this page?",
                subtitle: "Select qualities that work well (optional)",
            },
            (PresentationMode::Popup, Rating::Down) => Prompt {
                title: "What could be improved?",
                subtitle: "Select areas for improvement (optional)",
            },
            (PresentationMode::Wizard, Rating::Up) => Prompt {
                title: "What worked in this report?",
                subtitle: "Select qualities that work well (optional)",
            },
            (PresentationMode::Wizard, Rating::Down) => Prompt {
                title: "What could be improved?",
                subtitle: "Select areas for improvement (optional)",
            },
            (PresentationMode::Inline, Rating::Up) => Prompt {
                title: "What did you like?",
                subtitle: "Pick any that apply",
            },
            (PresentationMode::Inline, Rating::Down) => Prompt {
                title: "What could be improved?",
                subtitle: "Pick any that apply",
            },
        }
    }

    /// Confirmation copy once a rating is stored
    pub fn confirmation(&self, rating: Rating) -> String {
        match self {
            PresentationMode::Popup => {
                format!("Your {} feedback has been submitted.", rating.sentiment())
            }
            PresentationMode::Wizard => "Thanks for rating this report!".to_string(),
            PresentationMode::Inline => "Thank you for your detailed feedback!".to_string(),
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresentationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "popup" => Ok(PresentationMode::Popup),
            "wizard" | "integrated" => Ok(PresentationMode::Wizard),
            "inline" | "sidebar" => Ok(PresentationMode::Inline),
            other => Err(format!(
                "unknown mode '{}', expected popup, wizard or inline",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_mode_has_its_own_namespace() {
        let namespaces: std::collections::HashSet<_> =
            PresentationMode::ALL.iter().map(|m| m.namespace()).collect();
        assert_eq!(namespaces.len(), 3);
    }

    #[test]
    fn test_mode_aliases() {
        assert_eq!(
            "sidebar".parse::<PresentationMode>().unwrap(),
            PresentationMode::Inline
        );
        assert_eq!(
            "Wizard".parse::<PresentationMode>().unwrap(),
            PresentationMode::Wizard
        );
    }

    #[test]
    fn test_page_vocabulary_sizes() {
        assert_eq!(PresentationMode::Popup.page_vocabulary(Rating::Up).len(), 8);
        assert_eq!(PresentationMode::Wizard.page_vocabulary(Rating::Down).len(), 5);
        assert_eq!(PresentationMode::Inline.page_vocabulary(Rating::Up).len(), 6);
    }
}
