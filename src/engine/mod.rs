pub mod charset;
pub mod confusion;
pub mod key_stats;
pub mod ngram_stats;
pub mod ranking;
pub mod sampler;

use crate::engine::confusion::ConfusionMatrix;
use crate::engine::key_stats::KeyStatsStore;
use crate::engine::ngram_stats::BigramStatsStore;
use crate::session::result::KeyTime;

/// How many characters and bigrams the ranking lists and the sampler's
/// second tier consider.
pub const WORST_N: usize = 10;

/// All persisted statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsModel {
    pub confusion: ConfusionMatrix,
    pub monogram: KeyStatsStore,
    pub bigram: BigramStatsStore,
}

impl StatsModel {
    pub fn apply_drill(&mut self, per_key: &[KeyTime]) {
        self.confusion.apply_drill(per_key);
        self.monogram.apply_drill(per_key);
        self.bigram.apply_drill(per_key);
    }

    /// No round has ever been recorded. Only the monogram table decides.
    pub fn is_fresh(&self) -> bool {
        self.monogram.is_untouched()
    }
}
