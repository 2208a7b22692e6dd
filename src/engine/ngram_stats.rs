use crate::engine::charset::{ALPHABET_SIZE, CharIndex};
use crate::session::result::KeyTime;

pub const BIGRAM_TABLE_SIZE: usize = ALPHABET_SIZE * ALPHABET_SIZE;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Ordered pair of consecutive expected characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigramKey(pub CharIndex, pub CharIndex);

impl BigramKey {
    pub fn slot(self) -> usize {
        self.0.index() * ALPHABET_SIZE + self.1.index()
    }

    pub fn from_slot(slot: usize) -> Option<Self> {
        if slot >= BIGRAM_TABLE_SIZE {
            return None;
        }
        let first = CharIndex::from_index(slot / ALPHABET_SIZE)?;
        let second = CharIndex::from_index(slot % ALPHABET_SIZE)?;
        Some(Self(first, second))
    }

    pub fn all() -> impl Iterator<Item = BigramKey> {
        CharIndex::all().flat_map(|a| CharIndex::all().map(move |b| BigramKey(a, b)))
    }

    pub fn as_string(self) -> String {
        [self.0.to_char(), self.1.to_char()].iter().collect()
    }
}

// ---------------------------------------------------------------------------
// BigramStatsStore
// ---------------------------------------------------------------------------

/// Dense `first × second` table. Same zero-storage / not-a-number-on-read
/// convention as [`crate::engine::key_stats::KeyStatsStore`]; the mean is
/// over the summed time-to-type of both characters.
#[derive(Clone, Debug, PartialEq)]
pub struct BigramStatsStore {
    pub(crate) mean_ms: Vec<f64>,
    pub(crate) occurrences: Vec<u64>,
    pub(crate) misses: Vec<u64>,
}

impl Default for BigramStatsStore {
    fn default() -> Self {
        Self {
            mean_ms: vec![0.0; BIGRAM_TABLE_SIZE],
            occurrences: vec![0; BIGRAM_TABLE_SIZE],
            misses: vec![0; BIGRAM_TABLE_SIZE],
        }
    }
}

impl BigramStatsStore {
    pub fn record(&mut self, key: BigramKey, total_time_ms: f64, missed: bool) {
        let slot = key.slot();
        let count = self.occurrences[slot] as f64;
        self.mean_ms[slot] = (self.mean_ms[slot] * count + total_time_ms) / (count + 1.0);
        self.occurrences[slot] += 1;
        if missed {
            self.misses[slot] += 1;
        }
    }

    /// Every adjacent pair of positions contributes once, keyed by the
    /// expected characters. The pair is a miss if either position errored.
    pub fn apply_drill(&mut self, per_key: &[KeyTime]) {
        for window in per_key.windows(2) {
            let a = &window[0];
            let b = &window[1];
            self.record(
                BigramKey(a.expected, b.expected),
                a.time_ms + b.time_ms,
                a.errored || b.errored,
            );
        }
    }

    pub fn occurrences(&self, key: BigramKey) -> u64 {
        self.occurrences[key.slot()]
    }

    pub fn misses(&self, key: BigramKey) -> u64 {
        self.misses[key.slot()]
    }

    pub fn mean_ms(&self, key: BigramKey) -> f64 {
        if self.occurrences(key) == 0 {
            f64::NAN
        } else {
            self.mean_ms[key.slot()]
        }
    }

    pub fn error_rate(&self, key: BigramKey) -> f64 {
        self.misses(key) as f64 / self.occurrences(key) as f64
    }

    pub fn observed(&self) -> impl Iterator<Item = BigramKey> + '_ {
        self.occurrences
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .filter_map(|(slot, _)| BigramKey::from_slot(slot))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
