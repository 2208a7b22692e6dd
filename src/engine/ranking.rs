use std::cmp::Ordering;

use crate::engine::StatsModel;
use crate::engine::charset::CharIndex;
use crate::engine::key_stats::KeyStatsStore;
use crate::engine::ngram_stats::{BigramKey, BigramStatsStore};

/// Snapshot of how weak a key (character or bigram) is.
///
/// `error_rate` is not-a-number when the key was never typed. Such entries
/// are ordered as the weakest of all, ahead of a key that is always missed,
/// so "no data yet" stays distinguishable from "0% errors".
#[derive(Clone, Copy, Debug)]
pub struct Weakness<K> {
    pub key: K,
    pub error_rate: f64,
    pub mean_ms: f64,
}

impl<K> Weakness<K> {
    pub fn has_data(&self) -> bool {
        !self.error_rate.is_nan()
    }

    /// Total order on weakness: `Greater` means `self` is weaker.
    /// Higher error rate is weaker; equal rates fall back to slower mean time.
    pub fn cmp_weakness(&self, other: &Self) -> Ordering {
        match (self.has_data(), other.has_data()) {
            (false, false) => Ordering::Equal,
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (true, true) => self
                .error_rate
                .total_cmp(&other.error_rate)
                .then_with(|| self.mean_ms.total_cmp(&other.mean_ms)),
        }
    }
}

/// Weakest first. Ties beyond rate and time keep ascending key order.
pub fn worst_first<K: Ord>(mut items: Vec<Weakness<K>>) -> Vec<Weakness<K>> {
    items.sort_by(|a, b| b.cmp_weakness(a).then_with(|| a.key.cmp(&b.key)));
    items
}

/// Strongest first; keys without data end up last.
pub fn best_first<K: Ord>(mut items: Vec<Weakness<K>>) -> Vec<Weakness<K>> {
    items.sort_by(|a, b| a.cmp_weakness(b).then_with(|| a.key.cmp(&b.key)));
    items
}

pub fn char_weaknesses(
    stats: &KeyStatsStore,
    keys: impl IntoIterator<Item = CharIndex>,
) -> Vec<Weakness<CharIndex>> {
    keys.into_iter()
        .map(|key| Weakness {
            key,
            error_rate: stats.error_rate(key),
            mean_ms: stats.mean_ms(key),
        })
        .collect()
}

pub fn bigram_weaknesses(
    stats: &BigramStatsStore,
    keys: impl IntoIterator<Item = BigramKey>,
) -> Vec<Weakness<BigramKey>> {
    keys.into_iter()
        .map(|key| Weakness {
            key,
            error_rate: stats.error_rate(key),
            mean_ms: stats.mean_ms(key),
        })
        .collect()
}

/// Worst and best `n` characters and bigrams, as shown before a round.
/// Characters come from `alphabet`; bigrams only from observed pairs.
#[derive(Clone, Debug, Default)]
pub struct RankingSummary {
    pub worst_chars: Vec<Weakness<CharIndex>>,
    pub best_chars: Vec<Weakness<CharIndex>>,
    pub worst_bigrams: Vec<Weakness<BigramKey>>,
    pub best_bigrams: Vec<Weakness<BigramKey>>,
}

impl RankingSummary {
    pub fn compute(stats: &StatsModel, alphabet: &[CharIndex], n: usize) -> Self {
        let chars = char_weaknesses(&stats.monogram, alphabet.iter().copied());
        let bigrams = bigram_weaknesses(&stats.bigram, stats.bigram.observed());

        let mut worst_chars = worst_first(chars.clone());
        worst_chars.truncate(n);
        let mut best_chars = best_first(chars);
        best_chars.truncate(n);
        let mut worst_bigrams = worst_first(bigrams.clone());
        worst_bigrams.truncate(n);
        let mut best_bigrams = best_first(bigrams);
        best_bigrams.truncate(n);

        Self {
            worst_chars,
            best_chars,
            worst_bigrams,
            best_bigrams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(ch: char) -> CharIndex {
        CharIndex::from_char(ch).unwrap()
    }

    fn w(ch: char, error_rate: f64, mean_ms: f64) -> Weakness<CharIndex> {
        Weakness {
            key: idx(ch),
            error_rate,
            mean_ms,
        }
    }

    fn keys(ranked: &[Weakness<CharIndex>]) -> String {
        ranked.iter().map(|w| w.key.to_char()).collect()
    }

    #[test]
    fn no_data_ranks_worse_than_always_missed() {
        let ranked = worst_first(vec![w('a', 1.0, 900.0), w('b', f64::NAN, f64::NAN)]);
        assert_eq!(keys(&ranked), "ba");
        assert_eq!(
            w('b', f64::NAN, f64::NAN).cmp_weakness(&w('a', 1.0, 900.0)),
            Ordering::Greater
        );
    }

    #[test]
    fn ties_on_rate_break_by_slower_time() {
        let ranked = worst_first(vec![
            w('a', 0.1, 100.0),
            w('b', 0.1, 300.0),
            w('c', 0.5, 50.0),
        ]);
        assert_eq!(keys(&ranked), "cba");
    }

    #[test]
    fn best_first_keeps_no_data_at_the_end() {
        let ranked = best_first(vec![
            w('x', f64::NAN, f64::NAN),
            w('a', 0.2, 100.0),
            w('b', 0.0, 150.0),
            w('c', 0.0, 120.0),
        ]);
        assert_eq!(keys(&ranked), "cbax");
    }

    #[test]
    fn all_no_data_is_stable_by_key() {
        let ranked = worst_first(vec![
            w('q', f64::NAN, f64::NAN),
            w('c', f64::NAN, f64::NAN),
            w('m', f64::NAN, f64::NAN),
        ]);
        assert_eq!(keys(&ranked), "cmq");
    }

    #[test]
    fn ordering_is_antisymmetric() {
        let samples = [
            w('a', f64::NAN, f64::NAN),
            w('b', 0.0, 10.0),
            w('c', 0.0, 20.0),
            w('d', 1.0, 5.0),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(a.cmp_weakness(b), b.cmp_weakness(a).reverse());
            }
        }
    }

    #[test]
    fn char_weaknesses_reads_table() {
        let mut stats = KeyStatsStore::default();
        stats.record(idx('e'), 120.0, true);
        stats.record(idx('e'), 80.0, false);
        let list = char_weaknesses(&stats, [idx('e'), idx('z')]);
        assert_eq!(list[0].error_rate, 0.5);
        assert_eq!(list[0].mean_ms, 100.0);
        assert!(!list[1].has_data());
    }

    #[test]
    fn summary_limits_lists_and_skips_unseen_bigrams() {
        use crate::session::result::KeyTime;

        let mut model = StatsModel::default();
        let per_key: Vec<KeyTime> = "the cat"
            .chars()
            .map(|ch| KeyTime {
                expected: idx(ch),
                typed: if ch == 'a' { idx('s') } else { idx(ch) },
                time_ms: 100.0,
                errored: ch == 'a',
            })
            .collect();
        model.apply_drill(&per_key);

        let alphabet: Vec<CharIndex> = "acehtz".chars().map(idx).collect();
        let summary = RankingSummary::compute(&model, &alphabet, 3);

        // 'z' was never typed, so it leads; 'a' is the only miss.
        assert_eq!(keys(&summary.worst_chars), "zac");
        assert!(!summary.worst_chars[0].has_data());
        assert_eq!(keys(&summary.best_chars), "ceh");

        let pairs: Vec<String> = summary.worst_bigrams.iter().map(|w| w.key.as_string()).collect();
        assert_eq!(pairs, vec!["at", "ca", " c"]);
        assert!(summary.best_bigrams.iter().all(|w| w.error_rate == 0.0));
    }
}
