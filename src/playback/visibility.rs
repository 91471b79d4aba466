//! Visibility Tracker
//!
//! Picks the single card that currently owns the centre of the scroll
//! container. Two estimators feed it:
//! - intersection: highest ratio against a centre band of the viewport
//! - scroll: smallest distance between card centre and viewport centre
//!
//! Either may publish; a publish only counts when it changes the index.
//! Both converge once scrolling settles, so the last writer wins.

use leptos_viewport::{CardBox, IntersectionEntry, ViewportBox};

/// Which signal proposed an index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimator {
    Intersection,
    Scroll,
    /// Implicit choice on mount or resize (single card)
    Layout,
}

/// `active_index == None` means no card is active: before the first
/// measurement, on an empty list, or after detach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub active_index: Option<usize>,
    pub candidate_count: usize,
}

#[derive(Debug, Default)]
pub struct VisibilityTracker {
    state: VisibilityState,
    /// Latest intersection ratio per index
    ratios: Vec<f64>,
    last_source: Option<Estimator>,
    detached: bool,
}

impl VisibilityTracker {
    pub fn new(candidate_count: usize) -> Self {
        Self {
            state: VisibilityState { active_index: None, candidate_count },
            ratios: vec![0.0; candidate_count],
            ..Default::default()
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.active_index
    }

    /// Estimator behind the current index
    pub fn last_source(&self) -> Option<Estimator> {
        self.last_source
    }

    /// Called once the list is in the DOM. A lone card is active at once.
    pub fn mount(&mut self) -> Option<usize> {
        if self.state.candidate_count == 1 {
            self.publish(0, Estimator::Layout)
        } else {
            None
        }
    }

    /// Fold an observer batch into the cached ratios and publish the winner
    pub fn on_intersections(&mut self, batch: &[IntersectionEntry]) -> Option<usize> {
        if self.detached {
            return None;
        }
        for entry in batch {
            if let Some(slot) = self.ratios.get_mut(entry.index) {
                *slot = entry.ratio;
            }
        }
        let winner = most_intersecting(&self.ratios)?;
        self.publish(winner, Estimator::Intersection)
    }

    /// Publish the card closest to the viewport centre
    pub fn on_scroll_sample(&mut self, viewport: ViewportBox, cards: &[CardBox]) -> Option<usize> {
        if self.detached {
            return None;
        }
        let in_range: Vec<CardBox> = cards
            .iter()
            .copied()
            .filter(|c| c.index < self.state.candidate_count)
            .collect();
        let winner = closest_to_center(viewport, &in_range)?;
        self.publish(winner, Estimator::Scroll)
    }

    /// Accept `proposed` if it differs from the current index.
    /// Returns the new index when it changed.
    pub fn publish(&mut self, proposed: usize, source: Estimator) -> Option<usize> {
        if self.detached || proposed >= self.state.candidate_count {
            return None;
        }
        if self.state.active_index == Some(proposed) {
            return None;
        }
        log::debug!(
            "[VISIBILITY] active {:?} -> {} ({:?})",
            self.state.active_index,
            proposed,
            source
        );
        self.state.active_index = Some(proposed);
        self.last_source = Some(source);
        Some(proposed)
    }

    /// The list unmounted; no further publishes
    pub fn detach(&mut self) {
        self.detached = true;
        self.state.active_index = None;
    }
}

/// Index with the highest positive ratio, lowest index on ties
pub fn most_intersecting(ratios: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &ratio) in ratios.iter().enumerate() {
        if !(ratio > 0.0) {
            continue;
        }
        match best {
            Some((_, r)) if ratio <= r => {}
            _ => best = Some((index, ratio)),
        }
    }
    best.map(|(index, _)| index)
}

/// Card whose vertical centre is nearest the viewport centre line,
/// lowest index on ties
pub fn closest_to_center(viewport: ViewportBox, cards: &[CardBox]) -> Option<usize> {
    let center_line = viewport.scroll_top + viewport.height / 2.0;
    let mut best: Option<(usize, f64)> = None;
    for card in cards {
        let distance = (card.top + card.height / 2.0 - center_line).abs();
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((index, d)) if distance > d || (distance == d && card.index > index) => {}
            _ => best = Some((card.index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacked(count: usize, height: f64) -> Vec<CardBox> {
        (0..count)
            .map(|index| CardBox { index, top: index as f64 * height, height })
            .collect()
    }

    fn entry(index: usize, ratio: f64) -> IntersectionEntry {
        IntersectionEntry { index, ratio }
    }

    #[test]
    fn empty_list_stays_unset() {
        let mut tracker = VisibilityTracker::new(0);
        assert_eq!(tracker.mount(), None);
        assert_eq!(tracker.on_intersections(&[entry(0, 1.0)]), None);
        let viewport = ViewportBox { scroll_top: 0.0, height: 800.0 };
        assert_eq!(tracker.on_scroll_sample(viewport, &[]), None);
        assert_eq!(tracker.active_index(), None);
    }

    #[test]
    fn single_card_active_on_mount() {
        let mut tracker = VisibilityTracker::new(1);
        assert_eq!(tracker.mount(), Some(0));
        assert_eq!(tracker.last_source(), Some(Estimator::Layout));
    }

    #[test]
    fn highest_ratio_wins_ties_to_lowest_index() {
        assert_eq!(most_intersecting(&[0.2, 0.9, 0.9]), Some(1));
        assert_eq!(most_intersecting(&[0.0, 0.0]), None);
        assert_eq!(most_intersecting(&[0.5, f64::NAN, 0.4]), Some(0));
    }

    #[test]
    fn intersection_ratios_are_cached_across_batches() {
        let mut tracker = VisibilityTracker::new(3);
        assert_eq!(tracker.on_intersections(&[entry(0, 0.6)]), Some(0));
        // A batch only carries changed entries; card 0 is still cached.
        assert_eq!(tracker.on_intersections(&[entry(1, 0.3)]), None);
        assert_eq!(tracker.on_intersections(&[entry(0, 0.0), entry(1, 0.8)]), Some(1));
    }

    #[test]
    fn out_of_range_entries_are_ignored() {
        let mut tracker = VisibilityTracker::new(2);
        assert_eq!(tracker.on_intersections(&[entry(5, 1.0)]), None);
        assert_eq!(tracker.publish(2, Estimator::Scroll), None);
    }

    #[test]
    fn scroll_picks_closest_centre() {
        let cards = stacked(3, 800.0);
        let viewport = ViewportBox { scroll_top: 1500.0, height: 800.0 };
        // centre line 1900 -> card 2 centre 2000 (100) vs card 1 centre 1200 (700)
        assert_eq!(closest_to_center(viewport, &cards), Some(2));
    }

    #[test]
    fn scroll_ties_go_to_lowest_index() {
        let cards = stacked(2, 800.0);
        // centre line 800: card 0 centre 400, card 1 centre 1200, both 400 away
        let viewport = ViewportBox { scroll_top: 400.0, height: 800.0 };
        assert_eq!(closest_to_center(viewport, &cards), Some(0));
        let reversed: Vec<CardBox> = cards.into_iter().rev().collect();
        assert_eq!(closest_to_center(viewport, &reversed), Some(0));
    }

    #[test]
    fn republishing_same_index_is_a_no_op() {
        let mut tracker = VisibilityTracker::new(3);
        assert_eq!(tracker.publish(1, Estimator::Intersection), Some(1));
        assert_eq!(tracker.publish(1, Estimator::Scroll), None);
        assert_eq!(tracker.last_source(), Some(Estimator::Intersection));
    }

    #[test]
    fn both_estimators_agree_on_centre_card() {
        let mut tracker = VisibilityTracker::new(3);
        let viewport = ViewportBox { scroll_top: 800.0, height: 800.0 };
        assert_eq!(tracker.on_intersections(&[entry(1, 0.9)]), Some(1));
        assert_eq!(tracker.on_scroll_sample(viewport, &stacked(3, 800.0)), None);
        assert_eq!(tracker.active_index(), Some(1));
    }

    #[test]
    fn detach_stops_publishing() {
        let mut tracker = VisibilityTracker::new(3);
        tracker.publish(0, Estimator::Scroll);
        tracker.detach();
        assert_eq!(tracker.active_index(), None);
        assert_eq!(tracker.on_intersections(&[entry(2, 1.0)]), None);
        assert_eq!(tracker.publish(1, Estimator::Scroll), None);
    }
}
