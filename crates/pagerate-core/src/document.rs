//! Multi-page documents
//!
//! A page starts at every line beginning with `# ` or at a form feed. Text
//! before the first page heading is the document title block.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("document has no pages")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number as a string
    pub id: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let mut title = String::new();
        let mut pages: Vec<(String, Vec<&str>)> = Vec::new();
        let mut preamble: Vec<&str> = Vec::new();

        for raw in text.lines() {
            let mut line = raw;
            // Form feeds start a page even without a heading
            while let Some(pos) = line.find('\u{c}') {
                let (before, after) = line.split_at(pos);
                push_line(&mut pages, &mut preamble, before);
                pages.push((String::new(), Vec::new()));
                line = &after[1..];
            }

            if let Some(heading) = line.strip_prefix("# ") {
                let heading = heading.trim().to_string();
                match pages.last_mut() {
                    Some((t, body)) if t.is_empty() && body.iter().all(|l| l.trim().is_empty()) => {
                        *t = heading;
                        body.clear();
                    }
                    _ => pages.push((heading, Vec::new())),
                }
            } else {
                push_line(&mut pages, &mut preamble, line);
            }
        }

        for line in &preamble {
            if let Some(t) = line.strip_prefix("% ").or_else(|| line.strip_prefix("title: ")) {
                title = t.trim().to_string();
                break;
            }
        }
        if title.is_empty() {
            title = preamble
                .iter()
                .map(|l| l.trim())
                .find(|l| !l.is_empty())
                .unwrap_or("Untitled report")
                .to_string();
        }

        if pages.is_empty() {
            let body = preamble.join("\n").trim().to_string();
            if body.is_empty() {
                return Err(DocumentError::Empty);
            }
            return Ok(Self {
                title: title.clone(),
                pages: vec![Page {
                    id: "1".to_string(),
                    title,
                    body,
                }],
            });
        }

        let pages = pages
            .into_iter()
            .filter(|(t, body)| !t.is_empty() || body.iter().any(|l| !l.trim().is_empty()))
            .enumerate()
            .map(|(i, (t, body))| {
                let id = (i + 1).to_string();
                Page {
                    title: if t.is_empty() {
                        format!("Page {}", id)
                    } else {
                        t
                    },
                    id,
                    body: body.join("\n").trim_matches('\n').trim_end().to_string(),
                }
            })
            .collect::<Vec<_>>();

        if pages.is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(Self { title, pages })
    }

    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn index_of(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == page_id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Built-in five page report used when no file is given
    pub fn sample() -> Self {
        Self {
            title: "Quarterly Performance Report".to_string(),
            pages: SAMPLE_PAGES
                .iter()
                .enumerate()
                .map(|(i, (title, body))| Page {
                    id: (i + 1).to_string(),
                    title: title.to_string(),
                    body: body.to_string(),
                })
                .collect(),
        }
    }
}

fn push_line<'a>(pages: &mut [(String, Vec<&'a str>)], preamble: &mut Vec<&'a str>, line: &'a str) {
    match pages.last_mut() {
        Some((_, body)) => body.push(line),
        None => preamble.push(line),
    }
}

const SAMPLE_PAGES: &[(&str, &str)] = &[
    (
        "Executive Summary",
        "Revenue grew 12% quarter over quarter, driven by the enterprise tier.\n\n\
         Churn held at 2.1%. Net retention reached 114%, the highest since launch.\n\n\
         Key risks: onboarding time for mid-market accounts and support backlog \
         during the migration window.",
    ),
    (
        "Revenue Breakdown",
        "Enterprise      $4.2M   +18%\n\
         Mid-market      $2.7M    +9%\n\
         Self-serve      $1.1M    +3%\n\n\
         Enterprise expansion accounts for two thirds of new revenue. Self-serve \
         growth slowed after the pricing change in month two.",
    ),
    (
        "Customer Health",
        "Active accounts: 1,284 (+6%)\n\
         Accounts at risk: 41 (-12%)\n\n\
         Health scores improved in every segment except education, where seasonal \
         usage dipped. The success team will run check-ins with the 41 at-risk \
         accounts before renewal.",
    ),
    (
        "Product Usage",
        "Weekly active users: 38,900\n\
         Reports generated: 212,000\n\
         Median time to first report: 9 minutes (down from 14)\n\n\
         The new template gallery is the most used entry point for new users.",
    ),
    (
        "Recommendations",
        "1. Extend the enterprise onboarding playbook to mid-market.\n\
         2. Revisit self-serve pricing tiers before next quarter.\n\
         3. Staff the support queue ahead of the migration window.\n\
         4. Track template gallery adoption as a leading indicator.",
    ),
];
