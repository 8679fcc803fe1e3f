//! Scroll position, debounced visibility and animated page navigation

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::visibility::{compute_visibility, PageSection, PageVisibility};
use crate::config::ScrollConfig;

/// Animated scroll towards a page start
#[derive(Debug, Clone)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    target_index: usize,
    started: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Ease-out cubic position at `now`
    fn position(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Tracks which page of a laid-out document is most visible
///
/// Scroll events only record the offset. Visibility is recomputed by
/// [`ScrollTracker::poll`] once events have been quiet for the debounce
/// window, or once an animated scroll has settled. While an animation runs,
/// recomputation is suspended.
#[derive(Debug)]
pub struct ScrollTracker {
    sections: Vec<PageSection>,
    viewport: f64,
    offset: f64,
    header_offset: f64,
    debounce: Duration,
    settle: Duration,
    snap_threshold: f64,
    last_scroll: Option<Instant>,
    animation: Option<ScrollAnimation>,
    visibility: Option<PageVisibility>,
}

impl ScrollTracker {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            sections: Vec::new(),
            viewport: 0.0,
            offset: 0.0,
            header_offset: config.header_offset.max(0.0),
            debounce: config.debounce(),
            settle: config.settle(),
            snap_threshold: config.snap_threshold,
            last_scroll: None,
            animation: None,
            visibility: None,
        }
    }

    /// Replace the page layout. Visibility is recomputed immediately and
    /// returned when it changed.
    pub fn set_layout(
        &mut self,
        sections: Vec<PageSection>,
        viewport: f64,
    ) -> Option<PageVisibility> {
        // Keep the same page in view across re-layouts
        let anchor = self.active_index();
        let relayout = !self.sections.is_empty();
        let pending = self.animation.take();

        self.sections = sections;
        self.viewport = viewport.max(0.0);
        self.last_scroll = None;

        // A running animation keeps going, retargeted to its page's new start
        if let Some(mut animation) = pending {
            if let Some(section) = self.sections.get(animation.target_index) {
                animation.to = self.clamp(section.start - self.header_offset);
                animation.from = self.clamp(animation.from);
                self.offset = self.clamp(self.offset);
                trace!(
                    "Retargeted scroll to page {} at {}",
                    animation.target_index,
                    animation.to
                );
                self.animation = Some(animation);
                return None;
            }
        }

        if relayout {
            if let Some(section) = anchor.and_then(|i| self.sections.get(i)) {
                self.offset = section.start - self.header_offset;
            }
        }
        self.offset = self.clamp(self.offset);
        self.recompute()
    }

    pub fn sections(&self) -> &[PageSection] {
        &self.sections
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Offset in whole rows, for rendering
    pub fn offset_rows(&self) -> usize {
        self.offset.round().max(0.0) as usize
    }

    pub fn content_height(&self) -> f64 {
        self.sections.iter().map(PageSection::end).fold(0.0, f64::max)
    }

    pub fn max_offset(&self) -> f64 {
        (self.content_height() - self.viewport).max(0.0)
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_offset())
    }

    /// A scroll event reported the new offset
    pub fn on_scroll(&mut self, offset: f64, now: Instant) {
        if self.animation.is_some() {
            return;
        }
        self.offset = self.clamp(offset);
        self.last_scroll = Some(now);
    }

    /// Free scroll by `delta` rows; stops any running animation
    pub fn scroll_by(&mut self, delta: f64, now: Instant) {
        if let Some(animation) = self.animation.take() {
            self.offset = animation.position(now);
        }
        self.offset = self.clamp(self.offset + delta);
        self.last_scroll = Some(now);
    }

    /// Wheel or swipe delta in rows. Snaps one page when the magnitude
    /// exceeds the threshold; ignored while an animation runs.
    pub fn on_wheel(&mut self, delta: f64, now: Instant) -> bool {
        if self.animation.is_some() || delta.abs() <= self.snap_threshold {
            return false;
        }
        if delta > 0.0 {
            self.next_page(now)
        } else {
            self.prev_page(now)
        }
    }

    /// Start an animated scroll to the start of page `index`. Out-of-range
    /// indices are ignored. A running animation is replaced.
    pub fn scroll_to_page(&mut self, index: usize, now: Instant) -> bool {
        let Some(section) = self.sections.get(index) else {
            debug!("Ignoring scroll to page index {} of {}", index, self.sections.len());
            return false;
        };

        let to = self.clamp(section.start - self.header_offset);
        let from = match &self.animation {
            Some(animation) => animation.position(now),
            None => self.offset,
        };

        trace!("Animating scroll {} -> {} (page {})", from, to, index);
        self.offset = from;
        self.last_scroll = None;
        self.animation = Some(ScrollAnimation {
            from,
            to,
            target_index: index,
            started: now,
            duration: self.settle,
        });
        true
    }

    /// Page navigation starts from the animation target while one runs
    fn nav_index(&self) -> usize {
        self.animation
            .as_ref()
            .map(|a| a.target_index)
            .or_else(|| self.active_index())
            .unwrap_or(0)
    }

    pub fn next_page(&mut self, now: Instant) -> bool {
        let next = self.nav_index() + 1;
        if next >= self.sections.len() {
            return false;
        }
        self.scroll_to_page(next, now)
    }

    pub fn prev_page(&mut self, now: Instant) -> bool {
        let current = self.nav_index();
        if current == 0 || self.sections.is_empty() {
            return false;
        }
        self.scroll_to_page(current - 1, now)
    }

    pub fn first_page(&mut self, now: Instant) -> bool {
        self.scroll_to_page(0, now)
    }

    pub fn last_page(&mut self, now: Instant) -> bool {
        match self.sections.len() {
            0 => false,
            n => self.scroll_to_page(n - 1, now),
        }
    }

    /// Advance the animation and run any due recomputation. Returns the new
    /// visibility when the active page or the fractions changed.
    pub fn poll(&mut self, now: Instant) -> Option<PageVisibility> {
        if let Some(animation) = &self.animation {
            if animation.is_done(now) {
                self.offset = animation.to;
                self.animation = None;
                return self.recompute();
            }
            self.offset = animation.position(now);
            return None;
        }

        match self.last_scroll {
            Some(last) if now.saturating_duration_since(last) >= self.debounce => {
                self.last_scroll = None;
                self.recompute()
            }
            _ => None,
        }
    }

    fn recompute(&mut self) -> Option<PageVisibility> {
        let next = compute_visibility(
            self.offset,
            self.viewport,
            &self.sections,
            self.header_offset,
        );
        if next == self.visibility {
            return None;
        }
        if let Some(vis) = &next {
            if self.visibility.as_ref().map(|v| v.active_index) != Some(vis.active_index) {
                debug!("Active page is now {}", vis.active_page_id);
            }
        }
        self.visibility = next.clone();
        next
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn visibility(&self) -> Option<&PageVisibility> {
        self.visibility.as_ref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.visibility.as_ref().map(|v| v.active_index)
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.visibility.as_ref().map(|v| v.active_page_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ScrollTracker {
        let mut tracker = ScrollTracker::new(&ScrollConfig::default());
        let sections = (0..5)
            .map(|i| PageSection::new((i + 1).to_string(), i as f64 * 100.0, 100.0))
            .collect();
        tracker.set_layout(sections, 100.0);
        tracker
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_initial_layout_sets_first_page() {
        let t = tracker();
        assert_eq!(t.active_index(), Some(0));
        assert_eq!(t.max_offset(), 400.0);
    }

    #[test]
    fn test_scroll_events_are_debounced() {
        let mut t = tracker();
        let start = Instant::now();

        t.on_scroll(200.0, start);
        t.on_scroll(330.0, start + ms(30));
        assert!(t.poll(start + ms(60)).is_none());

        let vis = t.poll(start + ms(80)).unwrap();
        assert_eq!(vis.active_index, 3);
        assert!(t.poll(start + ms(200)).is_none());
    }

    #[test]
    fn test_scroll_to_page_suspends_until_settled() {
        let mut t = tracker();
        let start = Instant::now();

        assert!(t.scroll_to_page(3, start));
        assert!(t.poll(start + ms(100)).is_none());
        assert!(t.is_animating());
        assert!(t.offset() > 0.0 && t.offset() < 300.0);
        assert_eq!(t.active_index(), Some(0));

        let vis = t.poll(start + ms(600)).unwrap();
        assert_eq!(vis.active_index, 3);
        assert_eq!(t.offset(), 300.0);
        assert!(!t.is_animating());
    }

    #[test]
    fn test_new_target_supersedes_animation() {
        let mut t = tracker();
        let start = Instant::now();

        t.scroll_to_page(1, start);
        t.scroll_to_page(4, start + ms(100));

        assert!(t.poll(start + ms(650)).is_none());
        let vis = t.poll(start + ms(700)).unwrap();
        assert_eq!(vis.active_index, 4);
    }

    #[test]
    fn test_out_of_range_page_is_ignored() {
        let mut t = tracker();
        assert!(!t.scroll_to_page(5, Instant::now()));
        assert!(!t.is_animating());
    }

    #[test]
    fn test_wheel_snaps_past_threshold() {
        let mut t = tracker();
        let start = Instant::now();

        assert!(!t.on_wheel(1.0, start));
        assert!(t.on_wheel(3.0, start));
        // Ignored while animating
        assert!(!t.on_wheel(3.0, start + ms(10)));

        let vis = t.poll(start + ms(600)).unwrap();
        assert_eq!(vis.active_index, 1);

        assert!(t.on_wheel(-3.0, start + ms(700)));
        assert_eq!(t.poll(start + ms(1300)).unwrap().active_index, 0);
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut t = tracker();
        let start = Instant::now();

        assert!(!t.prev_page(start));
        assert!(t.last_page(start));
        t.poll(start + ms(600));
        assert!(!t.next_page(start + ms(700)));
    }

    #[test]
    fn test_next_page_chains_from_animation_target() {
        let mut t = tracker();
        let start = Instant::now();

        t.next_page(start);
        t.next_page(start + ms(50));
        let vis = t.poll(start + ms(700)).unwrap();
        assert_eq!(vis.active_index, 2);
    }

    #[test]
    fn test_scroll_by_clamps_and_cancels_animation() {
        let mut t = tracker();
        let start = Instant::now();

        t.scroll_to_page(4, start);
        t.scroll_by(-10_000.0, start + ms(100));
        assert!(!t.is_animating());
        assert_eq!(t.offset(), 0.0);

        t.scroll_by(10_000.0, start + ms(110));
        assert_eq!(t.offset(), 400.0);
    }

    #[test]
    fn test_relayout_keeps_active_page() {
        let mut t = tracker();
        let start = Instant::now();
        t.scroll_to_page(2, start);
        t.poll(start + ms(600));

        let taller = (0..5)
            .map(|i| PageSection::new((i + 1).to_string(), i as f64 * 150.0, 150.0))
            .collect();
        t.set_layout(taller, 100.0);
        assert_eq!(t.offset(), 300.0);
        assert_eq!(t.active_index(), Some(2));
    }

    #[test]
    fn test_relayout_during_animation_still_reaches_target() {
        let mut t = tracker();
        let start = Instant::now();
        t.scroll_to_page(3, start);

        let sections = (0..5)
            .map(|i| PageSection::new((i + 1).to_string(), i as f64 * 100.0, 100.0))
            .collect();
        assert!(t.set_layout(sections, 93.0).is_none());
        assert!(t.is_animating());

        let vis = t.poll(start + ms(700)).unwrap();
        assert_eq!(vis.active_index, 3);
        assert_eq!(t.offset(), 300.0);
        assert!(!t.is_animating());
    }

    #[test]
    fn test_relayout_retargets_to_new_page_start() {
        let mut t = tracker();
        let start = Instant::now();
        t.scroll_to_page(2, start);

        let taller = (0..5)
            .map(|i| PageSection::new((i + 1).to_string(), i as f64 * 150.0, 150.0))
            .collect();
        t.set_layout(taller, 100.0);

        t.poll(start + ms(600));
        assert_eq!(t.offset(), 300.0);
        assert_eq!(t.active_index(), Some(2));
    }
}
