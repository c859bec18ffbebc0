//! Limit-based "load more" pagination.

/// Owns the requested window size for a session.
///
/// The window only grows until [`reset`](Self::reset), which the session
/// calls when the set of accounts changes.
#[derive(Debug, Clone)]
pub struct PaginationManager {
    initial: usize,
    increment: usize,
    window: usize,
    last_fetch: Option<(usize, usize)>,
}

impl PaginationManager {
    pub fn new(initial: usize, increment: usize) -> Self {
        let initial = initial.max(1);
        Self {
            initial,
            increment: increment.max(1),
            window: initial,
            last_fetch: None,
        }
    }

    /// Current window: the minimum number of records the next fetch asks for.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Grow the window by one increment and return the new size.
    pub fn load_more(&mut self) -> usize {
        self.window = self.window.saturating_add(self.increment);
        self.window
    }

    /// Record the outcome of a fetch made with `requested` as the window.
    pub fn record(&mut self, returned: usize, requested: usize) {
        self.last_fetch = Some((returned, requested));
    }

    /// Whether more records are likely available. True until a fetch
    /// returns fewer records than it requested.
    pub fn has_more(&self) -> bool {
        self.last_fetch
            .is_none_or(|(returned, requested)| returned >= requested)
    }

    pub fn reset(&mut self) {
        self.window = self.initial;
        self.last_fetch = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_window() {
        let pages = PaginationManager::new(8, 8);
        assert_eq!(pages.window(), 8);
        assert!(pages.has_more());
    }

    #[test]
    fn test_load_more_grows_by_increment() {
        let mut pages = PaginationManager::new(8, 8);
        assert_eq!(pages.load_more(), 16);
        assert_eq!(pages.load_more(), 24);
        assert_eq!(pages.window(), 24);
    }

    #[test]
    fn test_has_more_false_after_short_page() {
        let mut pages = PaginationManager::new(8, 8);
        pages.record(8, 8);
        assert!(pages.has_more());
        pages.record(5, 16);
        assert!(!pages.has_more());
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut pages = PaginationManager::new(4, 2);
        pages.load_more();
        pages.record(1, 6);
        pages.reset();
        assert_eq!(pages.window(), 4);
        assert!(pages.has_more());
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let mut pages = PaginationManager::new(0, 0);
        assert_eq!(pages.window(), 1);
        assert_eq!(pages.load_more(), 2);
    }
}
