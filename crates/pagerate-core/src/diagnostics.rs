//! Non-fatal problems surfaced to the host
//!
//! The store never fails a UI action outright. When something goes wrong it
//! logs, carries on with a fallback and pushes a [`Diagnostic`] so the viewer
//! can tell the user.

use std::fmt;

use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A write did not reach the backend; the value lives in memory only
    WriteFailed { namespace: String, error: String },
    /// A stored blob could not be parsed and was treated as empty
    MalformedBlob { namespace: String, error: String },
    /// The backend could not be read
    ReadFailed { namespace: String, error: String },
}

impl Diagnostic {
    pub fn namespace(&self) -> &str {
        match self {
            Diagnostic::WriteFailed { namespace, .. }
            | Diagnostic::MalformedBlob { namespace, .. }
            | Diagnostic::ReadFailed { namespace, .. } => namespace,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::WriteFailed { namespace, error } => {
                write!(f, "Could not save {} ({}); kept for this session", namespace, error)
            }
            Diagnostic::MalformedBlob { namespace, error } => {
                write!(f, "Ignored unreadable {} data ({})", namespace, error)
            }
            Diagnostic::ReadFailed { namespace, error } => {
                write!(f, "Could not read {} ({})", namespace, error)
            }
        }
    }
}

pub type DiagnosticSender = mpsc::UnboundedSender<Diagnostic>;
pub type DiagnosticReceiver = mpsc::UnboundedReceiver<Diagnostic>;

pub fn channel() -> (DiagnosticSender, DiagnosticReceiver) {
    mpsc::unbounded_channel()
}
