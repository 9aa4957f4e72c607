use crate::timeline::error::TimelineError;
use crate::timeline::structs::LocationSample;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Which neighbour wins when a query sits exactly halfway between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TieBreak {
    /// Prefer the sample after the query.
    #[default]
    Later,
    /// Prefer the sample before the query.
    Earlier,
}

/// A chronologically sorted, read-only sequence of [`LocationSample`]s.
///
/// Built once, then shared freely between threads for lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    /// Sorted by `timestamp_utc`; equal timestamps keep their insertion order.
    samples: Vec<LocationSample>,
}

impl Timeline {
    /// Sorts `samples` by timestamp (stable) and freezes them into a timeline.
    pub fn from_samples(mut samples: Vec<LocationSample>) -> Self {
        samples.sort_by_key(LocationSample::sort_key);
        Self { samples }
    }

    pub fn samples(&self) -> &[LocationSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&LocationSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&LocationSample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocationSample> {
        self.samples.iter()
    }

    /// First and last timestamp covered by the timeline.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.first()?.timestamp_utc, self.last()?.timestamp_utc))
    }

    /// Finds the sample closest in time to `query`, ties going to the later sample.
    ///
    /// # Errors
    ///
    /// [`TimelineError::EmptyTimeline`] if there are no samples at all.
    pub fn nearest(&self, query: NaiveDateTime) -> Result<&LocationSample, TimelineError> {
        self.nearest_with(query, TieBreak::default())
    }

    /// Finds the sample closest in time to `query` using an explicit tie-break.
    pub fn nearest_with(
        &self,
        query: NaiveDateTime,
        tie_break: TieBreak,
    ) -> Result<&LocationSample, TimelineError> {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return Err(TimelineError::EmptyTimeline);
        };

        // Lower bound: index of the first sample not earlier than the query.
        let position = self.samples.partition_point(|s| s.timestamp_utc < query);
        if position == 0 {
            return Ok(first);
        }
        if position == self.samples.len() {
            return Ok(last);
        }

        let before = &self.samples[position - 1];
        let after = &self.samples[position];
        let to_before = query - before.timestamp_utc;
        let to_after = after.timestamp_utc - query;

        Ok(match to_after.cmp(&to_before) {
            Ordering::Less => after,
            Ordering::Greater => before,
            Ordering::Equal => match tie_break {
                TieBreak::Later => after,
                TieBreak::Earlier => before,
            },
        })
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a LocationSample;
    type IntoIter = std::slice::Iter<'a, LocationSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
