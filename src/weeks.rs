//! Week-set arithmetic over the semester range.
//!
//! A [`WeekSet`] is a subset of `{1..weeks_total}` stored as a fixed-size
//! bitmask, so the disjointness test the conflict checker runs on every
//! candidate is a handful of word operations.

use thiserror::Error;

/// Errors from week-set construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeekSetError {
    #[error("week {week} outside 1..={weeks_total}")]
    OutOfRange { week: u32, weeks_total: u32 },
    #[error("malformed week range '{0}' (expected 'a-b' with a <= b)")]
    MalformedRange(String),
}

/// Subset of the semester weeks `{1..weeks_total}`.
///
/// Invariant: bits above `weeks_total` are never set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WeekSet {
    words: Vec<u64>,
    weeks_total: u32,
}

impl WeekSet {
    /// The empty set over a semester of `weeks_total` weeks.
    pub fn empty(weeks_total: u32) -> Self {
        let n_words = (weeks_total as usize).div_ceil(64);
        Self {
            words: vec![0; n_words],
            weeks_total,
        }
    }

    /// The full range `1..=weeks_total`.
    pub fn all(weeks_total: u32) -> Self {
        let mut set = Self::empty(weeks_total);
        for word in 0..set.words.len() {
            let lo = word as u32 * 64;
            let bits = (weeks_total - lo).min(64);
            set.words[word] = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        }
        set
    }

    /// Builds a set from an explicit week enumeration.
    pub fn from_list(weeks: &[u32], weeks_total: u32) -> Result<Self, WeekSetError> {
        let mut set = Self::empty(weeks_total);
        for &week in weeks {
            set.insert(week)?;
        }
        Ok(set)
    }

    /// Builds a set from a union of inclusive intervals in "a-b" form.
    pub fn from_ranges(ranges: &[String], weeks_total: u32) -> Result<Self, WeekSetError> {
        let mut set = Self::empty(weeks_total);
        for text in ranges {
            let (lo, hi) = parse_range(text)?;
            for week in lo..=hi {
                set.insert(week)?;
            }
        }
        Ok(set)
    }

    /// Adds one week, rejecting values outside the semester.
    pub fn insert(&mut self, week: u32) -> Result<(), WeekSetError> {
        if week == 0 || week > self.weeks_total {
            return Err(WeekSetError::OutOfRange {
                week,
                weeks_total: self.weeks_total,
            });
        }
        let bit = week - 1;
        self.words[(bit / 64) as usize] |= 1u64 << (bit % 64);
        Ok(())
    }

    /// Whether `week` is in the set.
    pub fn contains(&self, week: u32) -> bool {
        if week == 0 || week > self.weeks_total {
            return false;
        }
        let bit = week - 1;
        self.words[(bit / 64) as usize] & (1u64 << (bit % 64)) != 0
    }

    /// Whether the two sets share any week.
    ///
    /// Two events may occupy the same (slot, room) iff this is false.
    pub fn intersects(&self, other: &WeekSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    /// Set union over the same semester range.
    pub fn union(&self, other: &WeekSet) -> WeekSet {
        debug_assert_eq!(self.weeks_total, other.weeks_total);
        let words = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| a | b)
            .collect();
        WeekSet {
            words,
            weeks_total: self.weeks_total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of weeks in the set.
    pub fn len(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    pub fn weeks_total(&self) -> u32 {
        self.weeks_total
    }

    /// Weeks in ascending order.
    pub fn to_sorted_list(&self) -> Vec<u32> {
        (1..=self.weeks_total).filter(|&w| self.contains(w)).collect()
    }

    /// Compact rendering: consecutive weeks collapse to "a-b" runs,
    /// e.g. "1-6,10,12-14".
    pub fn to_ranges_string(&self) -> String {
        let weeks = self.to_sorted_list();
        if weeks.is_empty() {
            return String::new();
        }
        let mut parts: Vec<String> = Vec::new();
        let (mut start, mut prev) = (weeks[0], weeks[0]);
        for &w in &weeks[1..] {
            if w == prev + 1 {
                prev = w;
                continue;
            }
            parts.push(render_run(start, prev));
            start = w;
            prev = w;
        }
        parts.push(render_run(start, prev));
        parts.join(",")
    }
}

fn render_run(a: u32, b: u32) -> String {
    if a == b {
        a.to_string()
    } else {
        format!("{}-{}", a, b)
    }
}

fn parse_range(text: &str) -> Result<(u32, u32), WeekSetError> {
    let malformed = || WeekSetError::MalformedRange(text.to_string());
    let (lo, hi) = text.split_once('-').ok_or_else(malformed)?;
    let lo: u32 = lo.trim().parse().map_err(|_| malformed())?;
    let hi: u32 = hi.trim().parse().map_err(|_| malformed())?;
    if lo > hi {
        return Err(malformed());
    }
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_range() {
        let set = WeekSet::all(16);
        assert_eq!(set.len(), 16);
        assert!(set.contains(1));
        assert!(set.contains(16));
        assert!(!set.contains(17));
        assert!(!set.contains(0));
    }

    #[test]
    fn test_all_beyond_one_word() {
        let set = WeekSet::all(70);
        assert_eq!(set.len(), 70);
        assert!(set.contains(64));
        assert!(set.contains(70));
        assert!(!set.contains(71));
    }

    #[test]
    fn test_list_round_trip() {
        let weeks = vec![1, 3, 5, 16];
        let set = WeekSet::from_list(&weeks, 16).unwrap();
        assert_eq!(set.to_sorted_list(), weeks);
    }

    #[test]
    fn test_list_rejects_out_of_range() {
        let err = WeekSet::from_list(&[1, 17], 16).unwrap_err();
        assert_eq!(
            err,
            WeekSetError::OutOfRange {
                week: 17,
                weeks_total: 16
            }
        );
        assert!(WeekSet::from_list(&[0], 16).is_err());
    }

    #[test]
    fn test_ranges() {
        let set =
            WeekSet::from_ranges(&["1-4".to_string(), "10-12".to_string()], 16).unwrap();
        assert_eq!(set.to_sorted_list(), vec![1, 2, 3, 4, 10, 11, 12]);
    }

    #[test]
    fn test_ranges_malformed() {
        assert!(WeekSet::from_ranges(&["4-1".to_string()], 16).is_err());
        assert!(WeekSet::from_ranges(&["abc".to_string()], 16).is_err());
        assert!(WeekSet::from_ranges(&["3".to_string()], 16).is_err());
    }

    #[test]
    fn test_disjoint_and_intersecting() {
        let first = WeekSet::from_ranges(&["1-8".to_string()], 16).unwrap();
        let second = WeekSet::from_ranges(&["9-16".to_string()], 16).unwrap();
        assert!(!first.intersects(&second));

        let overlapping = WeekSet::from_ranges(&["8-16".to_string()], 16).unwrap();
        assert!(first.intersects(&overlapping));
    }

    #[test]
    fn test_union() {
        let a = WeekSet::from_list(&[1, 2], 8).unwrap();
        let b = WeekSet::from_list(&[2, 7], 8).unwrap();
        assert_eq!(a.union(&b).to_sorted_list(), vec![1, 2, 7]);
    }

    #[test]
    fn test_ranges_string() {
        let set = WeekSet::from_list(&[1, 2, 3, 5, 9, 10], 16).unwrap();
        assert_eq!(set.to_ranges_string(), "1-3,5,9-10");
        assert_eq!(WeekSet::empty(16).to_ranges_string(), "");
        assert_eq!(WeekSet::from_list(&[4], 16).unwrap().to_ranges_string(), "4");
    }
}
