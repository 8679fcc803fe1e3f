//! Page visibility geometry

/// Vertical extent of one page in layout rows
#[derive(Debug, Clone, PartialEq)]
pub struct PageSection {
    pub page_id: String,
    pub start: f64,
    pub height: f64,
}

impl PageSection {
    pub fn new(page_id: impl Into<String>, start: f64, height: f64) -> Self {
        Self {
            page_id: page_id.into(),
            start,
            height,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.height
    }
}

/// Which page is most visible, and how visible every page is
#[derive(Debug, Clone, PartialEq)]
pub struct PageVisibility {
    pub active_index: usize,
    pub active_page_id: String,
    /// Visible share of each page, in `[0, 1]`
    pub fractions: Vec<f64>,
}

/// Compute per-page visibility for a viewport
///
/// The visible band is `[offset + header_offset, offset + viewport)`. A
/// page's fraction is the share of its own height inside that band. The
/// active page is the one with the largest fraction, the lowest index on a
/// tie, and index 0 when nothing is visible. Returns `None` only when there
/// are no sections.
pub fn compute_visibility(
    offset: f64,
    viewport: f64,
    sections: &[PageSection],
    header_offset: f64,
) -> Option<PageVisibility> {
    let first = sections.first()?;

    let top = offset + header_offset;
    let bottom = offset + viewport;

    let fractions: Vec<f64> = sections
        .iter()
        .map(|s| {
            if s.height <= 0.0 {
                return 0.0;
            }
            let overlap = (bottom.min(s.end()) - top.max(s.start)).max(0.0);
            (overlap / s.height).clamp(0.0, 1.0)
        })
        .collect();

    let mut active_index = 0;
    for (i, &fraction) in fractions.iter().enumerate() {
        if fraction > fractions[active_index] {
            active_index = i;
        }
    }

    let active_page_id = sections
        .get(active_index)
        .map(|s| s.page_id.clone())
        .unwrap_or_else(|| first.page_id.clone());

    Some(PageVisibility {
        active_index,
        active_page_id,
        fractions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(count: usize, height: f64) -> Vec<PageSection> {
        (0..count)
            .map(|i| PageSection::new((i + 1).to_string(), i as f64 * height, height))
            .collect()
    }

    #[test]
    fn test_most_visible_page_wins() {
        let sections = uniform(5, 100.0);
        let vis = compute_visibility(330.0, 100.0, &sections, 0.0).unwrap();

        assert_eq!(vis.active_index, 3);
        assert_eq!(vis.active_page_id, "4");
        assert!((vis.fractions[3] - 0.7).abs() < 1e-9);
        assert!((vis.fractions[4] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let sections = uniform(3, 100.0);
        let vis = compute_visibility(50.0, 100.0, &sections, 0.0).unwrap();
        assert_eq!(vis.active_index, 0);
    }

    #[test]
    fn test_nothing_visible_defaults_to_first() {
        let sections = uniform(3, 100.0);
        let vis = compute_visibility(1000.0, 100.0, &sections, 0.0).unwrap();
        assert_eq!(vis.active_index, 0);
        assert!(vis.fractions.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_fractions_stay_in_unit_range() {
        let sections = vec![
            PageSection::new("1", 0.0, 10.0),
            PageSection::new("2", 10.0, 0.0),
            PageSection::new("3", 10.0, 500.0),
        ];
        let vis = compute_visibility(0.0, 200.0, &sections, 0.0).unwrap();

        assert_eq!(vis.fractions[0], 1.0);
        assert_eq!(vis.fractions[1], 0.0);
        assert!(vis.fractions.iter().all(|f| (0.0..=1.0).contains(f)));
        assert_eq!(vis.active_index, 0);
    }

    #[test]
    fn test_header_offset_hides_top_rows() {
        let sections = uniform(2, 100.0);
        // Rows 0..60 are under the header, so page 1 shows 40 rows and page 2 shows 60
        let vis = compute_visibility(0.0, 160.0, &sections, 60.0).unwrap();
        assert_eq!(vis.active_index, 1);
    }

    #[test]
    fn test_no_sections() {
        assert!(compute_visibility(0.0, 100.0, &[], 0.0).is_none());
    }

    #[test]
    fn test_every_offset_has_exactly_one_active_page() {
        let sections = uniform(5, 100.0);

        // Past the end included
        for step in 0..=90 {
            let offset = step as f64 * 7.0;
            let vis = compute_visibility(offset, 100.0, &sections, 0.0).unwrap();

            assert!(vis.active_index < sections.len(), "offset {}", offset);
            assert_eq!(vis.active_page_id, sections[vis.active_index].page_id);
            assert_eq!(vis.fractions.len(), sections.len());
            assert!(vis.fractions.iter().all(|f| (0.0..=1.0).contains(f)));

            let best = vis.fractions.iter().cloned().fold(0.0, f64::max);
            assert_eq!(vis.fractions[vis.active_index], best, "offset {}", offset);
            if offset < 500.0 {
                assert!(best > 0.0, "offset {}", offset);
            }
        }
    }
}
