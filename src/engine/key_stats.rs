use crate::engine::charset::{ALPHABET_SIZE, CharIndex};
use crate::session::result::KeyTime;

/// Per-character aggregates: occurrences, misses and the running mean of
/// time-to-type in milliseconds.
///
/// Stored mean is `0.0` while a character has no occurrences, which keeps an
/// untouched table all-zero on disk. [`KeyStatsStore::mean_ms`] turns that into
/// the not-a-number "no data yet" sentinel.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyStatsStore {
    pub(crate) mean_ms: Vec<f64>,
    pub(crate) occurrences: Vec<u64>,
    pub(crate) misses: Vec<u64>,
}

impl Default for KeyStatsStore {
    fn default() -> Self {
        Self {
            mean_ms: vec![0.0; ALPHABET_SIZE],
            occurrences: vec![0; ALPHABET_SIZE],
            misses: vec![0; ALPHABET_SIZE],
        }
    }
}

impl KeyStatsStore {
    pub fn record(&mut self, key: CharIndex, time_ms: f64, missed: bool) {
        let i = key.index();
        let count = self.occurrences[i] as f64;
        self.mean_ms[i] = (self.mean_ms[i] * count + time_ms) / (count + 1.0);
        self.occurrences[i] += 1;
        if missed {
            self.misses[i] += 1;
        }
    }

    /// Folds one completed drill into the table. A position counts as a miss
    /// when the first character typed there differs from the expected one.
    pub fn apply_drill(&mut self, per_key: &[KeyTime]) {
        for kt in per_key {
            self.record(kt.expected, kt.time_ms, kt.typed != kt.expected);
        }
    }

    pub fn occurrences(&self, key: CharIndex) -> u64 {
        self.occurrences[key.index()]
    }

    pub fn misses(&self, key: CharIndex) -> u64 {
        self.misses[key.index()]
    }

    pub fn mean_ms(&self, key: CharIndex) -> f64 {
        if self.occurrences(key) == 0 {
            f64::NAN
        } else {
            self.mean_ms[key.index()]
        }
    }

    /// `misses / occurrences`, not-a-number when the key was never typed.
    pub fn error_rate(&self, key: CharIndex) -> f64 {
        self.misses(key) as f64 / self.occurrences(key) as f64
    }

    /// True when every field is zero, i.e. the table was never updated.
    pub fn is_untouched(&self) -> bool {
        self.occurrences.iter().all(|&n| n == 0)
            && self.misses.iter().all(|&n| n == 0)
            && self.mean_ms.iter().all(|m| m.to_bits() == 0)
    }
}
