//! Rating flow state machine
//!
//! One controller drives all three presentation modes. Page modes (popup,
//! inline) rate a single page at a time and upsert a [`RatingRecord`] per
//! page. The wizard rates the whole report first, then optionally each page,
//! and appends one [`OverallRatingRecord`] per session.
//!
//! Timed edges (the return to idle after a confirmation) are held as a single
//! deadline. Every state change replaces or clears it, so an edge scheduled
//! for an earlier state can never fire into a later one.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::mode::{PresentationMode, Prompt};
use super::model::{OverallRatingRecord, PageRating, Rating, RatingRecord};
use super::vocabulary::{QualitySelection, Vocabulary, VocabularyScope};
use crate::storage::RatingStateStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    /// Tag is not in the vocabulary currently on screen
    #[error("'{0}' is not one of the offered qualities")]
    UnknownQuality(String),

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("{action} is not available in {mode} mode")]
    Unsupported {
        action: &'static str,
        mode: PresentationMode,
    },
}

/// What a rating is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingTarget {
    Page(String),
    /// The whole report (wizard step one)
    Report,
}

impl RatingTarget {
    pub fn page_id(&self) -> Option<&str> {
        match self {
            RatingTarget::Page(id) => Some(id),
            RatingTarget::Report => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    /// Wizard opened, waiting for the overall thumb
    CollectingRating,
    CollectingQualities {
        target: RatingTarget,
        rating: Rating,
    },
    /// Wizard step two
    CollectingPageRatings,
    Submitted {
        target: RatingTarget,
        rating: Rating,
        /// False when the store write failed and the record is session-only
        persisted: bool,
    },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::CollectingRating => "collecting a rating",
            FlowState::CollectingQualities { .. } => "collecting qualities",
            FlowState::CollectingPageRatings => "collecting page ratings",
            FlowState::Submitted { .. } => "showing confirmation",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, FlowState::Idle)
    }

    /// Any state that shows rating UI
    pub fn is_open(&self) -> bool {
        !self.is_idle()
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rating being composed
#[derive(Debug, Clone)]
struct Draft {
    target: RatingTarget,
    rating: Rating,
    selection: QualitySelection,
    comment: String,
}

impl Draft {
    fn new(target: RatingTarget, rating: Rating, vocabulary: Vocabulary) -> Self {
        Self {
            target,
            rating,
            selection: QualitySelection::new(vocabulary),
            comment: String::new(),
        }
    }
}

/// One page's entry in wizard step two
#[derive(Debug, Clone)]
pub struct PageDraft {
    pub rating: Rating,
    pub selection: QualitySelection,
}

#[derive(Debug, Clone, Default)]
struct WizardDraft {
    pages: BTreeMap<String, PageDraft>,
    /// Page whose pills the keyboard currently toggles
    focused_page: Option<String>,
    page_comment: String,
}

/// Pages rated so far out of the document's total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub rated: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} pages rated", self.rated, self.total)
    }
}

pub struct RatingFlowController {
    mode: PresentationMode,
    reset_delay: Duration,
    store: RatingStateStore,
    state: FlowState,
    draft: Option<Draft>,
    wizard: WizardDraft,
    /// Thumb shown on each page: stored ratings plus the open draft
    marks: BTreeMap<String, Rating>,
    deadline: Option<Instant>,
}

impl RatingFlowController {
    pub fn new(mode: PresentationMode, store: RatingStateStore) -> Self {
        let mut controller = Self {
            mode,
            reset_delay: mode.default_reset_delay(),
            store,
            state: FlowState::Idle,
            draft: None,
            wizard: WizardDraft::default(),
            marks: BTreeMap::new(),
            deadline: None,
        };
        controller.load_marks();
        controller
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn store(&self) -> &RatingStateStore {
        &self.store
    }

    /// Pending timed edge, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn load_marks(&mut self) {
        self.marks.clear();
        if self.mode.is_session_log() {
            return;
        }
        let records: BTreeMap<String, RatingRecord> = self.store.get_all(self.mode.namespace());
        self.marks
            .extend(records.into_iter().map(|(page, record)| (page, record.rating)));
        debug!("Loaded {} page marks for {}", self.marks.len(), self.mode);
    }

    fn stored_record(&self, page_id: &str) -> Option<RatingRecord> {
        self.store.get(self.mode.namespace(), page_id)
    }

    fn restore_mark(&mut self, page_id: &str) {
        match self.stored_record(page_id) {
            Some(record) => {
                self.marks.insert(page_id.to_string(), record.rating);
            }
            None => {
                self.marks.remove(page_id);
            }
        }
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    fn wizard_only(&self, action: &'static str) -> Result<(), FlowError> {
        if self.mode.is_session_log() {
            Ok(())
        } else {
            Err(FlowError::Unsupported {
                action,
                mode: self.mode,
            })
        }
    }

    /// Thumb clicked on a page
    ///
    /// In the wizard this rates the report in step one and the page in step
    /// two.
    pub fn select_rating(&mut self, page_id: &str, rating: Rating) -> Result<(), FlowError> {
        if self.mode.is_session_log() {
            return match self.state {
                FlowState::CollectingPageRatings => self.rate_page(page_id, rating),
                FlowState::Idle | FlowState::Submitted { .. } => {
                    self.begin()?;
                    self.select_overall(rating)
                }
                _ => self.select_overall(rating),
            };
        }

        let keep = self.draft.as_ref().is_some_and(|d| {
            d.target.page_id() == Some(page_id)
                && d.rating == rating
                && matches!(self.state, FlowState::CollectingQualities { .. })
        });

        if !keep {
            if let Some(previous) = self.draft.take() {
                if let Some(previous_page) = previous.target.page_id() {
                    if previous_page != page_id {
                        self.restore_mark(previous_page);
                    }
                }
            }

            let target = RatingTarget::Page(page_id.to_string());
            let mut draft = Draft::new(target, rating, self.mode.page_vocabulary(rating));

            if self.mode == PresentationMode::Inline {
                if let Some(stored) = self.stored_record(page_id) {
                    if stored.rating == rating {
                        draft.selection.select_all(&stored.qualities);
                        draft.comment = stored.comment;
                    }
                }
            }
            self.draft = Some(draft);
        }

        self.marks.insert(page_id.to_string(), rating);
        self.state = FlowState::CollectingQualities {
            target: RatingTarget::Page(page_id.to_string()),
            rating,
        };
        self.deadline = None;
        Ok(())
    }

    /// Open the wizard
    pub fn begin(&mut self) -> Result<(), FlowError> {
        self.wizard_only("begin")?;
        match self.state {
            FlowState::Idle | FlowState::Submitted { .. } => {
                self.draft = None;
                self.wizard = WizardDraft::default();
                self.state = FlowState::CollectingRating;
                self.deadline = None;
                Ok(())
            }
            _ => Err(self.invalid("begin")),
        }
    }

    /// Wizard step one thumb
    pub fn select_overall(&mut self, rating: Rating) -> Result<(), FlowError> {
        self.wizard_only("select_overall")?;
        match &self.state {
            FlowState::CollectingRating
            | FlowState::CollectingQualities {
                target: RatingTarget::Report,
                ..
            } => {}
            _ => return Err(self.invalid("rate the report")),
        }

        let keep = self.draft.as_ref().is_some_and(|d| d.rating == rating);
        if !keep {
            let comment = self
                .draft
                .take()
                .map(|d| d.comment)
                .unwrap_or_default();
            let mut draft = Draft::new(
                RatingTarget::Report,
                rating,
                VocabularyScope::Report.vocabulary(rating),
            );
            draft.comment = comment;
            self.draft = Some(draft);
        }

        self.state = FlowState::CollectingQualities {
            target: RatingTarget::Report,
            rating,
        };
        Ok(())
    }

    /// Toggle a pill in whatever list is on screen
    pub fn toggle_quality(&mut self, tag: &str) -> Result<bool, FlowError> {
        match &self.state {
            FlowState::CollectingQualities { .. } => {
                let draft = self
                    .draft
                    .as_mut()
                    .ok_or(FlowError::InvalidTransition {
                        action: "toggle a quality",
                        state: "idle",
                    })?;
                draft
                    .selection
                    .toggle(tag)
                    .ok_or_else(|| FlowError::UnknownQuality(tag.to_string()))
            }
            FlowState::CollectingPageRatings => {
                let page = self
                    .wizard
                    .focused_page
                    .clone()
                    .ok_or_else(|| self.invalid("toggle a quality"))?;
                self.toggle_page_quality(&page, tag)
            }
            _ => Err(self.invalid("toggle a quality")),
        }
    }

    /// Toggle the pill at `index` of the visible list
    pub fn toggle_quality_at(&mut self, index: usize) -> Result<bool, FlowError> {
        let tag = self
            .vocabulary()
            .and_then(|v| v.tags().get(index).copied())
            .ok_or_else(|| FlowError::UnknownQuality(format!("#{}", index + 1)))?;
        self.toggle_quality(tag)
    }

    /// Wizard step two thumb on one page
    pub fn rate_page(&mut self, page_id: &str, rating: Rating) -> Result<(), FlowError> {
        self.wizard_only("rate_page")?;
        if self.state != FlowState::CollectingPageRatings {
            return Err(self.invalid("rate a page"));
        }

        let keep = self
            .wizard
            .pages
            .get(page_id)
            .is_some_and(|p| p.rating == rating);
        if !keep {
            self.wizard.pages.insert(
                page_id.to_string(),
                PageDraft {
                    rating,
                    selection: QualitySelection::new(
                        VocabularyScope::Section.vocabulary(rating),
                    ),
                },
            );
        }
        self.wizard.focused_page = Some(page_id.to_string());
        Ok(())
    }

    pub fn toggle_page_quality(&mut self, page_id: &str, tag: &str) -> Result<bool, FlowError> {
        self.wizard_only("toggle_page_quality")?;
        if self.state != FlowState::CollectingPageRatings {
            return Err(self.invalid("toggle a page quality"));
        }
        let page = self
            .wizard
            .pages
            .get_mut(page_id)
            .ok_or(FlowError::InvalidTransition {
                action: "toggle a page quality",
                state: "page not rated",
            })?;
        page.selection
            .toggle(tag)
            .ok_or_else(|| FlowError::UnknownQuality(tag.to_string()))
    }

    /// Replace the comment of the open step
    pub fn set_comment(&mut self, text: &str) -> Result<(), FlowError> {
        let comment = self.comment_mut()?;
        comment.clear();
        comment.push_str(text);
        Ok(())
    }

    pub fn push_comment_char(&mut self, c: char) -> Result<(), FlowError> {
        self.comment_mut()?.push(c);
        Ok(())
    }

    pub fn pop_comment_char(&mut self) -> Result<(), FlowError> {
        self.comment_mut()?.pop();
        Ok(())
    }

    /// Free text for wizard step two
    pub fn set_page_comment(&mut self, text: &str) -> Result<(), FlowError> {
        self.wizard_only("set_page_comment")?;
        if self.state != FlowState::CollectingPageRatings {
            return Err(self.invalid("edit the page comment"));
        }
        self.wizard.page_comment = text.to_string();
        Ok(())
    }

    fn comment_mut(&mut self) -> Result<&mut String, FlowError> {
        match self.state {
            FlowState::CollectingQualities { .. } => match self.draft.as_mut() {
                Some(draft) => Ok(&mut draft.comment),
                None => Err(FlowError::InvalidTransition {
                    action: "edit the comment",
                    state: "idle",
                }),
            },
            FlowState::CollectingPageRatings => Ok(&mut self.wizard.page_comment),
            _ => Err(self.invalid("edit the comment")),
        }
    }

    /// Submit the open step
    ///
    /// Wizard step one advances to step two without writing. Every other
    /// submit writes and shows the confirmation until `now + reset delay`.
    pub fn submit(&mut self, now: Instant) -> Result<(), FlowError> {
        match &self.state {
            FlowState::CollectingQualities {
                target: RatingTarget::Report,
                ..
            } => {
                self.state = FlowState::CollectingPageRatings;
                self.wizard.focused_page = None;
                Ok(())
            }
            FlowState::CollectingQualities {
                target: RatingTarget::Page(_),
                ..
            } => self.submit_page(now),
            FlowState::CollectingPageRatings => self.submit_session(now, true),
            _ => Err(self.invalid("submit")),
        }
    }

    fn submit_page(&mut self, now: Instant) -> Result<(), FlowError> {
        let draft = self.draft.take().ok_or_else(|| self.invalid("submit"))?;
        let Some(page_id) = draft.target.page_id().map(str::to_string) else {
            return Err(self.invalid("submit"));
        };

        let record = RatingRecord::new(page_id.clone(), draft.rating)
            .with_qualities(draft.selection.to_vec())
            .with_comment(draft.comment.trim());

        let persisted = match self.store.put(self.mode.namespace(), &page_id, &record) {
            Ok(()) => true,
            Err(e) => {
                warn!("Rating for page {} kept in memory only: {}", page_id, e);
                false
            }
        };
        info!(
            "Page {} rated {} with {} qualities ({})",
            page_id,
            record.rating,
            record.qualities.len(),
            self.mode
        );

        self.marks.insert(page_id.clone(), record.rating);
        self.enter_submitted(RatingTarget::Page(page_id), record.rating, persisted, now);
        Ok(())
    }

    fn submit_session(&mut self, now: Instant, include_pages: bool) -> Result<(), FlowError> {
        let draft = self.draft.take().ok_or_else(|| self.invalid("submit"))?;
        let wizard = std::mem::take(&mut self.wizard);

        let mut record = OverallRatingRecord::new(draft.rating);
        record.qualities = draft.selection.to_vec();
        record.comment = draft.comment.trim().to_string();
        if include_pages {
            record.per_page = wizard
                .pages
                .into_iter()
                .map(|(page, p)| {
                    (
                        page,
                        PageRating {
                            rating: p.rating,
                            qualities: p.selection.to_vec(),
                        },
                    )
                })
                .collect();
            record.page_comment = wizard.page_comment.trim().to_string();
        }

        let persisted = match self.store.append(self.mode.namespace(), &record) {
            Ok(()) => true,
            Err(e) => {
                warn!("Report rating {} kept in memory only: {}", record.id, e);
                false
            }
        };
        info!(
            "Report rated {} with {} page ratings",
            record.rating,
            record.per_page.len()
        );

        self.enter_submitted(RatingTarget::Report, record.rating, persisted, now);
        Ok(())
    }

    fn enter_submitted(
        &mut self,
        target: RatingTarget,
        rating: Rating,
        persisted: bool,
        now: Instant,
    ) {
        self.state = FlowState::Submitted {
            target,
            rating,
            persisted,
        };
        self.deadline = Some(now + self.reset_delay);
    }

    /// Leave the open step without adding detail
    ///
    /// Page modes discard the draft. Wizard step two records the overall
    /// rating alone.
    pub fn skip(&mut self, now: Instant) -> Result<(), FlowError> {
        match self.state {
            FlowState::CollectingPageRatings => self.submit_session(now, false),
            FlowState::CollectingRating | FlowState::CollectingQualities { .. } => {
                self.cancel();
                Ok(())
            }
            _ => Err(self.invalid("skip")),
        }
    }

    /// Abandon the flow without writing
    pub fn cancel(&mut self) {
        if let Some(draft) = self.draft.take() {
            if let Some(page_id) = draft.target.page_id() {
                self.restore_mark(page_id);
            }
        }
        self.wizard = WizardDraft::default();
        self.state = FlowState::Idle;
        self.deadline = None;
    }

    /// Escape key: wizard step two skips, everything else cancels
    pub fn escape(&mut self, now: Instant) -> Result<(), FlowError> {
        match self.state {
            FlowState::CollectingPageRatings => self.skip(now),
            FlowState::Submitted { .. } => {
                self.dismiss();
                Ok(())
            }
            _ => {
                self.cancel();
                Ok(())
            }
        }
    }

    /// Close the confirmation early
    pub fn dismiss(&mut self) {
        if matches!(self.state, FlowState::Submitted { .. }) {
            self.state = FlowState::Idle;
            self.deadline = None;
        }
    }

    /// Apply an expired timed edge. Returns true when the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if matches!(self.state, FlowState::Submitted { .. }) {
                    self.state = FlowState::Idle;
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Vocabulary of the pill list on screen
    pub fn vocabulary(&self) -> Option<Vocabulary> {
        match self.state {
            FlowState::CollectingQualities { .. } => {
                self.draft.as_ref().map(|d| d.selection.vocabulary())
            }
            FlowState::CollectingPageRatings => self
                .focused_page_draft()
                .map(|(_, p)| p.selection.vocabulary()),
            _ => None,
        }
    }

    /// Selection behind the pill list on screen
    pub fn selection(&self) -> Option<&QualitySelection> {
        match self.state {
            FlowState::CollectingQualities { .. } => self.draft.as_ref().map(|d| &d.selection),
            FlowState::CollectingPageRatings => self.focused_page_draft().map(|(_, p)| &p.selection),
            _ => None,
        }
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.draft.as_ref().map(|d| self.mode.prompt(d.rating))
    }

    /// Comment of the open step
    pub fn comment(&self) -> &str {
        match self.state {
            FlowState::CollectingPageRatings => &self.wizard.page_comment,
            _ => self.draft.as_ref().map(|d| d.comment.as_str()).unwrap_or(""),
        }
    }

    /// Rating of the report draft, in the wizard
    pub fn overall_rating(&self) -> Option<Rating> {
        self.draft
            .as_ref()
            .filter(|d| d.target == RatingTarget::Report)
            .map(|d| d.rating)
    }

    pub fn focused_page_draft(&self) -> Option<(&str, &PageDraft)> {
        let page = self.wizard.focused_page.as_deref()?;
        self.wizard.pages.get(page).map(|p| (page, p))
    }

    pub fn marks(&self) -> &BTreeMap<String, Rating> {
        &self.marks
    }

    /// Thumb to highlight on a page
    pub fn mark(&self, page_id: &str) -> Option<Rating> {
        if self.mode.is_session_log() {
            return self.wizard.pages.get(page_id).map(|p| p.rating);
        }
        self.marks.get(page_id).copied()
    }

    pub fn progress(&self, total: usize) -> Progress {
        let rated = if self.mode.is_session_log() {
            self.wizard.pages.len()
        } else {
            self.store.count(self.mode.namespace())
        };
        Progress {
            rated: rated.min(total),
            total,
        }
    }

    /// Completed wizard sessions, oldest first
    pub fn sessions(&self) -> Vec<OverallRatingRecord> {
        if self.mode.is_session_log() {
            self.store.log(self.mode.namespace())
        } else {
            Vec::new()
        }
    }

    pub fn confirmation(&self) -> Option<String> {
        match &self.state {
            FlowState::Submitted { rating, .. } => Some(self.mode.confirmation(*rating)),
            _ => None,
        }
    }

    /// Drop every stored rating for this mode and reset the flow
    pub fn clear_all(&mut self) {
        if let Err(e) = self.store.clear(self.mode.namespace(), None) {
            warn!("Failed to clear {}: {}", self.mode.namespace(), e);
        }
        self.cancel();
        self.marks.clear();
        info!("Cleared stored ratings for {}", self.mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    fn controller(mode: PresentationMode) -> RatingFlowController {
        RatingFlowController::new(mode, RatingStateStore::in_memory())
    }

    fn stored(c: &RatingFlowController) -> BTreeMap<String, RatingRecord> {
        c.store().get_all(c.mode().namespace())
    }

    #[test]
    fn test_popup_submit_writes_record() {
        let mut c = controller(PresentationMode::Popup);
        let now = Instant::now();

        c.select_rating("3", Rating::Up).unwrap();
        c.toggle_quality("Clear insights").unwrap();
        c.toggle_quality("Well organized").unwrap();
        c.set_comment("great chart").unwrap();
        c.submit(now).unwrap();

        let records = stored(&c);
        assert_eq!(records.len(), 1);
        let record = &records["3"];
        assert_eq!(record.page_id, "3");
        assert_eq!(record.rating, Rating::Up);
        assert_eq!(record.qualities, vec!["Clear insights", "Well organized"]);
        assert_eq!(record.comment, "great chart");
        assert!(matches!(
            c.state(),
            FlowState::Submitted {
                persisted: true,
                ..
            }
        ));

        assert!(!c.tick(now + Duration::from_millis(1999)));
        assert!(c.tick(now + Duration::from_secs(2)));
        assert_eq!(c.state(), &FlowState::Idle);
    }

    #[test]
    fn test_skip_writes_nothing() {
        let mut c = controller(PresentationMode::Popup);

        c.select_rating("2", Rating::Down).unwrap();
        c.skip(Instant::now()).unwrap();

        assert!(stored(&c).is_empty());
        assert_eq!(c.state(), &FlowState::Idle);
        assert_eq!(c.mark("2"), None);
    }

    #[test]
    fn test_unknown_quality_is_rejected() {
        let mut c = controller(PresentationMode::Popup);
        c.select_rating("1", Rating::Up).unwrap();

        let err = c.toggle_quality("Too cluttered").unwrap_err();
        assert_eq!(err, FlowError::UnknownQuality("Too cluttered".into()));
        assert!(c.selection().unwrap().is_empty());
    }

    #[test]
    fn test_double_toggle_is_idempotent() {
        let mut c = controller(PresentationMode::Inline);
        c.select_rating("1", Rating::Up).unwrap();
        c.toggle_quality("Strong visuals").unwrap();
        let before = c.selection().unwrap().to_vec();

        assert!(c.toggle_quality("Clear messaging").unwrap());
        assert!(!c.toggle_quality("Clear messaging").unwrap());
        assert_eq!(c.selection().unwrap().to_vec(), before);
    }

    #[test]
    fn test_other_polarity_clears_pills() {
        let mut c = controller(PresentationMode::Popup);
        c.select_rating("1", Rating::Up).unwrap();
        c.toggle_quality("Comprehensive").unwrap();

        c.select_rating("1", Rating::Up).unwrap();
        assert_eq!(c.selection().unwrap().len(), 1);

        c.select_rating("1", Rating::Down).unwrap();
        assert!(c.selection().unwrap().is_empty());
        assert_eq!(c.vocabulary().unwrap().tags()[0], "Hard to read");
    }

    #[test]
    fn test_new_rating_supersedes_pending_reset() {
        let mut c = controller(PresentationMode::Popup);
        let now = Instant::now();

        c.select_rating("1", Rating::Up).unwrap();
        c.submit(now).unwrap();
        c.select_rating("2", Rating::Down).unwrap();

        assert!(!c.tick(now + Duration::from_secs(5)));
        assert!(matches!(c.state(), FlowState::CollectingQualities { .. }));
    }

    #[test]
    fn test_resubmit_replaces_page_record() {
        let mut c = controller(PresentationMode::Popup);
        let now = Instant::now();

        c.select_rating("4", Rating::Up).unwrap();
        c.submit(now).unwrap();
        c.select_rating("4", Rating::Down).unwrap();
        c.toggle_quality("Poor layout").unwrap();
        c.submit(now).unwrap();

        let records = stored(&c);
        assert_eq!(records.len(), 1);
        assert_eq!(records["4"].rating, Rating::Down);
    }

    #[test]
    fn test_inline_prefills_same_polarity() {
        let mut c = controller(PresentationMode::Inline);
        let now = Instant::now();

        c.select_rating("2", Rating::Up).unwrap();
        c.toggle_quality("Compelling data").unwrap();
        c.set_comment("nice").unwrap();
        c.submit(now).unwrap();
        c.dismiss();

        c.select_rating("2", Rating::Up).unwrap();
        assert!(c.selection().unwrap().is_selected("Compelling data"));
        assert_eq!(c.comment(), "nice");

        c.select_rating("2", Rating::Down).unwrap();
        assert!(c.selection().unwrap().is_empty());
        assert_eq!(c.comment(), "");
    }

    #[test]
    fn test_cancel_restores_stored_mark() {
        let mut c = controller(PresentationMode::Inline);
        c.select_rating("1", Rating::Up).unwrap();
        c.submit(Instant::now()).unwrap();

        c.select_rating("1", Rating::Down).unwrap();
        assert_eq!(c.mark("1"), Some(Rating::Down));
        c.cancel();
        assert_eq!(c.mark("1"), Some(Rating::Up));
    }

    #[test]
    fn test_progress_counts_stored_pages() {
        let mut c = controller(PresentationMode::Inline);
        let now = Instant::now();
        for page in ["1", "3"] {
            c.select_rating(page, Rating::Up).unwrap();
            c.submit(now).unwrap();
        }
        assert_eq!(c.progress(5).to_string(), "2 of 5 pages rated");
    }

    #[test]
    fn test_marks_load_from_store() {
        let mut store = RatingStateStore::in_memory();
        store
            .put("pageFeedback", "5", &RatingRecord::new("5", Rating::Down))
            .unwrap();

        let c = RatingFlowController::new(PresentationMode::Popup, store);
        assert_eq!(c.mark("5"), Some(Rating::Down));
    }

    #[test]
    fn test_store_failure_keeps_mark() {
        let store = RatingStateStore::new(Box::new(MemoryBackend::with_quota(4)));
        let mut c = RatingFlowController::new(PresentationMode::Popup, store);

        c.select_rating("1", Rating::Up).unwrap();
        c.submit(Instant::now()).unwrap();

        assert!(matches!(
            c.state(),
            FlowState::Submitted {
                persisted: false,
                ..
            }
        ));
        assert_eq!(c.mark("1"), Some(Rating::Up));
        assert_eq!(stored(&c).len(), 1);
    }

    #[test]
    fn test_wizard_two_step_submit() {
        let mut c = controller(PresentationMode::Wizard);
        let now = Instant::now();

        c.begin().unwrap();
        assert_eq!(c.state(), &FlowState::CollectingRating);
        c.select_overall(Rating::Up).unwrap();
        c.toggle_quality("Actionable data").unwrap();
        c.submit(now).unwrap();
        assert_eq!(c.state(), &FlowState::CollectingPageRatings);
        assert_eq!(c.overall_rating(), Some(Rating::Up));
        assert!(c.sessions().is_empty());

        c.rate_page("2", Rating::Down).unwrap();
        c.toggle_quality("Too busy").unwrap();
        c.rate_page("4", Rating::Up).unwrap();
        c.toggle_page_quality("4", "Informative").unwrap();
        c.set_page_comment("page 2 is dense").unwrap();
        c.submit(now).unwrap();

        let sessions = c.sessions();
        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.qualities, vec!["Actionable data"]);
        assert_eq!(session.per_page["2"].qualities, vec!["Too busy"]);
        assert_eq!(session.per_page["4"].rating, Rating::Up);
        assert_eq!(session.page_comment, "page 2 is dense");

        assert_eq!(c.overall_rating(), None);
        assert!(!c.tick(now + Duration::from_secs(2)));
        assert!(c.tick(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_wizard_skip_step_two_keeps_overall_only() {
        let mut c = controller(PresentationMode::Wizard);
        let now = Instant::now();

        c.select_rating("1", Rating::Down).unwrap();
        c.submit(now).unwrap();
        c.rate_page("1", Rating::Down).unwrap();
        c.escape(now).unwrap();

        let sessions = c.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].rating, Rating::Down);
        assert!(sessions[0].per_page.is_empty());
    }

    #[test]
    fn test_wizard_cancel_step_one_writes_nothing() {
        let mut c = controller(PresentationMode::Wizard);
        c.begin().unwrap();
        c.select_overall(Rating::Up).unwrap();
        c.escape(Instant::now()).unwrap();

        assert_eq!(c.state(), &FlowState::Idle);
        assert!(c.sessions().is_empty());
    }

    #[test]
    fn test_wizard_sessions_append_in_order() {
        let mut c = controller(PresentationMode::Wizard);
        let now = Instant::now();

        for rating in [Rating::Up, Rating::Down, Rating::Up] {
            c.begin().unwrap();
            c.select_overall(rating).unwrap();
            c.submit(now).unwrap();
            c.skip(now).unwrap();
        }

        let ratings: Vec<_> = c.sessions().iter().map(|s| s.rating).collect();
        assert_eq!(ratings, vec![Rating::Up, Rating::Down, Rating::Up]);
    }

    #[test]
    fn test_begin_is_wizard_only() {
        let mut c = controller(PresentationMode::Popup);
        assert!(matches!(c.begin(), Err(FlowError::Unsupported { .. })));
    }

    #[test]
    fn test_submit_while_idle_is_invalid() {
        let mut c = controller(PresentationMode::Popup);
        assert!(matches!(
            c.submit(Instant::now()),
            Err(FlowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_clear_all_resets_marks() {
        let mut c = controller(PresentationMode::Inline);
        c.select_rating("1", Rating::Up).unwrap();
        c.submit(Instant::now()).unwrap();

        c.clear_all();
        assert!(c.marks().is_empty());
        assert!(stored(&c).is_empty());
        assert_eq!(c.state(), &FlowState::Idle);
    }
}
