use crate::engine::charset::{ALPHABET_SIZE, CharIndex};
use crate::session::result::KeyTime;

/// Counts of (expected, typed) pairs. The diagonal holds correct keystrokes.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix {
    pub(crate) cells: Vec<u64>,
    pub(crate) total_hits: u64,
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        Self {
            cells: vec![0; ALPHABET_SIZE * ALPHABET_SIZE],
            total_hits: 0,
        }
    }
}

impl ConfusionMatrix {
    pub fn record(&mut self, expected: CharIndex, typed: CharIndex) {
        self.cells[expected.index() * ALPHABET_SIZE + typed.index()] += 1;
    }

    pub fn apply_drill(&mut self, per_key: &[KeyTime]) {
        for kt in per_key {
            self.record(kt.expected, kt.typed);
        }
        self.total_hits += per_key.len() as u64;
    }

    pub fn get(&self, expected: CharIndex, typed: CharIndex) -> u64 {
        self.cells[expected.index() * ALPHABET_SIZE + typed.index()]
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn cell_sum(&self) -> u64 {
        self.cells.iter().sum()
    }

    pub fn row(&self, expected: CharIndex) -> &[u64] {
        let start = expected.index() * ALPHABET_SIZE;
        &self.cells[start..start + ALPHABET_SIZE]
    }
}
