//! Sorted index of arrival instants.
//!
//! The question the tracker answers is "which stop had Santa already reached
//! by this moment?" That is the rightmost arrival at or before the query
//! time, found by binary search over the sorted arrivals. The index is built
//! in one go and never updated in place; a reload builds a new one.

use tracing::trace;

use crate::domain::Timestamp;

/// Outcome of a binary search over the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Search {
    /// Position of the rightmost arrival at or before the query, if any.
    pub position: Option<usize>,

    /// Number of entries compared against the query.
    pub probes: u32,
}

/// Arrival instants sorted ascending.
///
/// Duplicate instants are kept; they sit next to each other after sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrivalsIndex {
    arrivals: Vec<Timestamp>,
}

impl ArrivalsIndex {
    /// Build the index from arrivals in any order.
    pub fn from_arrivals(arrivals: impl IntoIterator<Item = Timestamp>) -> Self {
        let mut arrivals: Vec<Timestamp> = arrivals.into_iter().collect();
        arrivals.sort_unstable();
        Self { arrivals }
    }

    /// Number of indexed arrivals.
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// All arrivals, ascending.
    pub fn as_slice(&self) -> &[Timestamp] {
        &self.arrivals
    }

    /// The earliest arrival.
    pub fn first(&self) -> Option<Timestamp> {
        self.arrivals.first().copied()
    }

    /// The latest arrival.
    pub fn last(&self) -> Option<Timestamp> {
        self.arrivals.last().copied()
    }

    /// Latest arrival not after `query`.
    ///
    /// Returns `None` when the index is empty or `query` predates every
    /// arrival. Once the last arrival has passed, it keeps being returned.
    ///
    /// ```
    /// use santa_tracker::domain::Timestamp;
    /// use santa_tracker::itinerary::ArrivalsIndex;
    ///
    /// let t = Timestamp::from_millis;
    /// let index = ArrivalsIndex::from_arrivals([t(30), t(10), t(20)]);
    ///
    /// assert_eq!(index.find_current(t(5)), None);
    /// assert_eq!(index.find_current(t(10)), Some(t(10)));
    /// assert_eq!(index.find_current(t(25)), Some(t(20)));
    /// assert_eq!(index.find_current(t(1_000)), Some(t(30)));
    /// ```
    pub fn find_current(&self, query: Timestamp) -> Option<Timestamp> {
        self.search(query).position.map(|i| self.arrivals[i])
    }

    /// Arrivals at or before `query`, ascending.
    pub fn reached_by(&self, query: Timestamp) -> &[Timestamp] {
        match self.search(query).position {
            Some(i) => &self.arrivals[..=i],
            None => &[],
        }
    }

    /// Binary search for the rightmost arrival `<= query`.
    ///
    /// Uses at most `floor(log2(n)) + 1` probes for `n` entries.
    pub fn search(&self, query: Timestamp) -> Search {
        let mut left = 0;
        let mut right = self.arrivals.len();
        let mut position = None;
        let mut probes = 0;

        // Invariant: everything before `left` is <= query, everything from
        // `right` on is > query.
        while left < right {
            probes += 1;
            let mid = left + (right - left) / 2;

            if self.arrivals[mid] <= query {
                position = Some(mid);
                left = mid + 1;
            } else {
                right = mid;
            }
        }

        trace!(
            entries = self.arrivals.len(),
            probes,
            query = %query,
            found = ?position,
            "arrival search finished"
        );

        Search { position, probes }
    }
}
