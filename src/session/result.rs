use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::charset::CharIndex;
use crate::session::drill::{DrillPhase, DrillState};

/// What was recorded for one position of the drill text: the first key
/// typed there and how long it took since the previous accepted key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyTime {
    pub expected: CharIndex,
    pub typed: CharIndex,
    pub time_ms: f64,
    pub errored: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrillResult {
    pub n_chars: usize,
    pub errors: usize,
    /// Percentage of positions typed right on the first attempt.
    pub accuracy: f64,
    pub cpm: f64,
    pub wpm: f64,
    /// Sum of per-key times; idle time before the first key is included.
    pub total_ms: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub per_key: Vec<KeyTime>,
}

impl DrillResult {
    /// Summary of a completed drill. Canceled or unfinished drills produce
    /// nothing, so they can never reach the stats tables.
    pub fn from_drill(drill: &DrillState<'_>) -> Option<Self> {
        if drill.phase != DrillPhase::Completed {
            return None;
        }

        let expected = drill.layout().chars();
        let per_key: Vec<KeyTime> = expected
            .iter()
            .enumerate()
            .map(|(i, &exp)| KeyTime {
                expected: exp,
                typed: drill.typed[i].unwrap_or(exp),
                time_ms: drill.time_ms[i],
                errored: drill.errored[i],
            })
            .collect();

        let n_chars = per_key.len();
        let total_ms: f64 = per_key.iter().map(|kt| kt.time_ms).sum();
        let cpm = if total_ms > 0.0 {
            n_chars as f64 / total_ms * 60_000.0
        } else {
            0.0
        };
        let accuracy = if n_chars > 0 {
            (n_chars - drill.errors) as f64 / n_chars as f64 * 100.0
        } else {
            100.0
        };

        Some(Self {
            n_chars,
            errors: drill.errors,
            accuracy,
            cpm,
            wpm: cpm / 5.0,
            total_ms,
            timestamp: Utc::now(),
            per_key,
        })
    }

    pub fn correct(&self) -> usize {
        self.n_chars - self.errors
    }
}
