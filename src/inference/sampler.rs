//! Bounded frequency sampler for leaf values
//!
//! A [`Sampler`] counts the occurrences of every value it sees and reports the
//! [`SAMPLER_CAPACITY`] most common ones. The retained values feed the "most
//! common values" documentation generated for every schema field.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;

/// Maximum number of distinct values retained by a sampler
pub const SAMPLER_CAPACITY: usize = 5;

/// A value that can be kept in a [`Sampler`]
pub trait SampleValue: Ord + Clone {
    /// Human readable rendering used in field documentation
    fn render(&self) -> String;
}

impl SampleValue for bool {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl SampleValue for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl SampleValue for BigDecimal {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl SampleValue for Vec<u8> {
    fn render(&self) -> String {
        let hex: String = self.iter().map(|b| format!("{:02x}", b)).collect();
        format!("0x{}", hex)
    }
}

/// Fixed-capacity multiset ranking values by occurrence count
///
/// Counters are kept for every distinct value, evicted ones included, so a
/// value that becomes frequent late still displaces earlier ones. Only the
/// [`SAMPLER_CAPACITY`] most frequent values are retained for reporting.
/// Ties between equally frequent values are broken by value order, so the
/// retained set does not depend on the order in which samplers are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sampler<T: SampleValue> {
    /// Occurrence counters of every value ever pushed or merged
    tally: BTreeMap<T, u64>,
    /// Total number of pushes
    seen: u64,
}

impl<T: SampleValue> Sampler<T> {
    /// Create an empty sampler
    pub fn new() -> Self {
        Self {
            tally: BTreeMap::new(),
            seen: 0,
        }
    }

    /// Create a sampler holding a single occurrence of `value`
    pub fn from_value(value: T) -> Self {
        let mut sampler = Self::new();
        sampler.push(value);
        sampler
    }

    /// Record one occurrence of `value` and return it
    pub fn push(&mut self, value: T) -> T {
        *self.tally.entry(value.clone()).or_insert(0) += 1;
        self.seen += 1;
        value
    }

    /// Merge two samplers into a new one
    ///
    /// Counters are summed over the values seen by either side, evicted ones
    /// included, and the retained set is chosen from the combined totals.
    pub fn merge(&self, other: &Sampler<T>) -> Sampler<T> {
        let mut tally = self.tally.clone();
        for (value, count) in &other.tally {
            *tally.entry(value.clone()).or_insert(0) += count;
        }

        Sampler {
            tally,
            seen: self.seen + other.seen,
        }
    }

    /// Retained values with their counters, most frequent first
    pub fn sorted_entries(&self) -> Vec<(u64, String)> {
        self.ranked()
            .into_iter()
            .map(|(value, count)| (count, value.render()))
            .collect()
    }

    /// Number of distinct values currently retained
    pub fn len(&self) -> usize {
        self.tally.len().min(SAMPLER_CAPACITY)
    }

    pub fn is_empty(&self) -> bool {
        self.tally.is_empty()
    }

    /// Total number of occurrences pushed, evicted values included
    pub fn total(&self) -> u64 {
        self.seen
    }

    /// Counter of a retained value
    pub fn count_of(&self, value: &T) -> Option<u64> {
        self.ranked()
            .into_iter()
            .find(|(retained, _)| *retained == value)
            .map(|(_, count)| count)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.count_of(value).is_some()
    }

    /// Iterate retained values in value order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let mut retained: Vec<&T> = self.ranked().into_iter().map(|(value, _)| value).collect();
        retained.sort();
        retained.into_iter()
    }

    /// The retained values: the most frequent first, at most [`SAMPLER_CAPACITY`]
    fn ranked(&self) -> Vec<(&T, u64)> {
        let mut entries: Vec<(&T, u64)> = self.tally.iter().map(|(v, c)| (v, *c)).collect();
        // BTreeMap iteration is value ordered and the sort is stable
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(SAMPLER_CAPACITY);
        entries
    }
}

impl Sampler<BigDecimal> {
    /// Merge numeric samplers that may come from different numeric kinds
    ///
    /// Every value is re-read as an arbitrary precision decimal, so `5` sampled
    /// as an int and `5.0` sampled as a decimal share one counter.
    pub fn merge_numeric(&self, other: &Sampler<BigDecimal>) -> Sampler<BigDecimal> {
        let mut reparsed = Sampler::new();
        for (value, count) in self.tally.iter().chain(other.tally.iter()) {
            let decimal = value.render().parse::<BigDecimal>().unwrap_or_else(|_| value.clone());
            *reparsed.tally.entry(decimal).or_insert(0) += count;
        }
        reparsed.seen = self.seen + other.seen;
        reparsed
    }
}

impl<T: SampleValue> Default for Sampler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    fn strings(values: &[&str]) -> Sampler<String> {
        let mut sampler = Sampler::new();
        for value in values {
            sampler.push(value.to_string());
        }
        sampler
    }

    #[test]
    fn test_push_counts_duplicates() {
        let sampler = strings(&["a", "b", "a"]);
        assert_eq!(sampler.len(), 2);
        assert_eq!(sampler.count_of(&"a".to_string()), Some(2));
        assert_eq!(sampler.total(), 3);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut sampler = Sampler::new();
        for i in 0..100 {
            sampler.push(i.to_string());
            assert!(sampler.len() <= SAMPLER_CAPACITY);
        }
        assert_eq!(sampler.total(), 100);
    }

    #[test]
    fn test_trim_keeps_most_frequent() {
        let sampler = strings(&["x", "x", "x", "a", "b", "c", "d", "e", "f"]);
        assert_eq!(sampler.len(), SAMPLER_CAPACITY);
        assert!(sampler.contains(&"x".to_string()));
        assert_eq!(sampler.sorted_entries()[0], (3, "x".to_string()));
    }

    #[test]
    fn test_merge_sums_counters_before_trimming() {
        // "z" is rare on each side but the most common value overall
        let left = strings(&["z", "z", "a", "b", "c", "d"]);
        let right = strings(&["z", "z", "e", "f", "g", "h"]);

        let merged = left.merge(&right);
        assert_eq!(merged.len(), SAMPLER_CAPACITY);
        assert_eq!(merged.count_of(&"z".to_string()), Some(4));
        assert_eq!(merged.total(), 12);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let left = strings(&["a", "b", "c", "d"]);
        let right = strings(&["e", "f", "g"]);
        assert_eq!(left.merge(&right), right.merge(&left));
    }

    #[test]
    fn test_sorted_entries_descending() {
        let sampler = strings(&["b", "a", "b", "c", "b", "a"]);
        let entries = sampler.sorted_entries();
        assert_eq!(
            entries,
            vec![
                (3, "b".to_string()),
                (2, "a".to_string()),
                (1, "c".to_string())
            ]
        );
    }

    #[test]
    fn test_merge_numeric_collapses_representations() {
        let ints = Sampler::from_value(BigDecimal::from(5));
        let decimals = Sampler::from_value(BigDecimal::from_str("5.0").unwrap());

        let merged = ints.merge_numeric(&decimals);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.count_of(&BigDecimal::from(5)), Some(2));
    }

    #[test]
    fn test_late_frequent_value_enters_full_sampler() {
        let mut sampler = strings(&["a", "b", "c", "d", "e"]);
        for _ in 0..1000 {
            sampler.push("f".to_string());
        }

        assert_eq!(sampler.len(), SAMPLER_CAPACITY);
        assert_eq!(sampler.sorted_entries()[0], (1000, "f".to_string()));
        assert!(!sampler.contains(&"e".to_string()));
    }

    #[test]
    fn test_merge_keeps_counters_of_evicted_values() {
        // "g" is evicted on both sides but is the most common value overall
        let left = strings(&["a", "a", "b", "b", "c", "c", "d", "d", "e", "e", "g"]);
        let right = strings(&["a", "a", "b", "b", "c", "c", "d", "d", "e", "e", "g"]);
        assert!(!left.contains(&"g".to_string()));

        let merged = left.merge(&right).merge(&strings(&["g", "g", "g"]));
        assert_eq!(merged.sorted_entries()[0], (5, "g".to_string()));
    }

    #[test]
    fn test_bytes_render_as_hex() {
        let sampler = Sampler::from_value(vec![0x0a_u8, 0xff]);
        assert_eq!(sampler.sorted_entries()[0].1, "0x0aff");
    }
}
