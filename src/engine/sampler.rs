use rand::Rng;

use crate::engine::WORST_N;
use crate::engine::charset::CharIndex;
use crate::engine::key_stats::KeyStatsStore;
use crate::engine::ranking::{char_weaknesses, worst_first};
use crate::text::word_list::WordList;

/// Draws a word list biased toward the weakest characters in `stats`.
///
/// The result always holds exactly `target_count` words (clamped to
/// `1..=words.len()`), possibly with repeats. Empty input yields an empty
/// list.
pub fn resample<R: Rng>(
    words: &WordList,
    stats: &KeyStatsStore,
    target_count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> WordList {
    let indices = select_indices(words, stats, target_count, max_attempts, rng);
    words.sample(&indices)
}

/// Index selection behind [`resample`], in tier order:
/// a quarter of the words contain the single weakest character, the next
/// half contain any of the ten weakest, the rest are drawn uniformly.
pub fn select_indices<R: Rng>(
    words: &WordList,
    stats: &KeyStatsStore,
    target_count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Vec<usize> {
    if words.is_empty() {
        return Vec::new();
    }
    let target = target_count.clamp(1, words.len());
    let max_attempts = max_attempts.max(1);

    let ranked: Vec<CharIndex> = worst_first(char_weaknesses(stats, words.alphabet()))
        .into_iter()
        .map(|w| w.key)
        .collect();
    let weakest = &ranked[..ranked.len().min(1)];
    let top_n = &ranked[..ranked.len().min(WORST_N)];

    let mut indices = Vec::with_capacity(target);
    let mut fallbacks = 0usize;

    let tiers = [(weakest, target / 4), (top_n, 3 * target / 4)];
    for (chars, quota) in tiers {
        while indices.len() < quota {
            let (index, fell_back) = draw_containing(words, chars, max_attempts, rng);
            fallbacks += usize::from(fell_back);
            indices.push(index);
        }
    }
    while indices.len() < target {
        indices.push(rng.gen_range(0..words.len()));
    }

    if fallbacks > 0 {
        tracing::warn!(
            fallbacks,
            max_attempts,
            "weak-character draws hit the attempt cap, used uniform picks"
        );
    }
    tracing::debug!(
        target,
        weakest = ?weakest.first().map(|c| c.to_char()),
        "resampled word list"
    );

    indices
}

/// Rejection-samples a word containing any of `chars`. After
/// `max_attempts` misses the next uniform draw is taken as is.
fn draw_containing<R: Rng>(
    words: &WordList,
    chars: &[CharIndex],
    max_attempts: usize,
    rng: &mut R,
) -> (usize, bool) {
    if !chars.is_empty() {
        for _ in 0..max_attempts {
            let index = rng.gen_range(0..words.len());
            if words.contains_any(index, chars) {
                return (index, false);
            }
        }
    }
    (rng.gen_range(0..words.len()), true)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn idx(ch: char) -> CharIndex {
        CharIndex::from_char(ch).unwrap()
    }

    fn practiced(chars: &str) -> KeyStatsStore {
        let mut stats = KeyStatsStore::default();
        for ch in chars.chars() {
            for _ in 0..10 {
                stats.record(idx(ch), 100.0, false);
            }
        }
        stats
    }

    #[test]
    fn returns_exact_count_with_no_data() {
        let words = WordList::parse("cat dog bat fish bird cow pig hen");
        let stats = KeyStatsStore::default();
        let mut rng = SmallRng::seed_from_u64(7);
        for target in 1..=words.len() {
            let out = resample(&words, &stats, target, 50, &mut rng);
            assert_eq!(out.len(), target);
        }
    }

    #[test]
    fn returns_exact_count_when_every_character_ties() {
        let words = WordList::parse("cat dog bat fish bird cow pig hen");
        // Same error rate and mean time for every character in the list.
        let mut stats = KeyStatsStore::default();
        for ch in words.alphabet() {
            for n in 0..10 {
                stats.record(ch, 150.0, n < 2);
            }
        }
        let mut rng = SmallRng::seed_from_u64(5);
        for target in 1..=words.len() {
            let out = resample(&words, &stats, target, 50, &mut rng);
            assert_eq!(out.len(), target);
        }

        // Ties fall back to key order, so 'a' is the weakest.
        let indices = select_indices(&words, &stats, 8, 1000, &mut rng);
        assert_eq!(indices.len(), 8);
        assert!(indices[..2].iter().all(|&i| words.contains_char(i, idx('a'))));
    }

    #[test]
    fn clamps_target_into_range() {
        let words = WordList::parse("one two three");
        let stats = KeyStatsStore::default();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(resample(&words, &stats, 0, 10, &mut rng).len(), 1);
        assert_eq!(resample(&words, &stats, 99, 10, &mut rng).len(), 3);
    }

    #[test]
    fn weakest_character_fills_first_quarter() {
        let words = WordList::parse("zoo zap zip apple table candle bread stone plant grass river ocean");
        // Everything typed cleanly except 'z', which is always missed.
        let mut stats = practiced("abcdefghijklmnopqrstuvwxy");
        for _ in 0..5 {
            stats.record(idx('z'), 300.0, true);
        }
        let mut rng = SmallRng::seed_from_u64(42);
        let indices = select_indices(&words, &stats, 12, 1000, &mut rng);

        assert_eq!(indices.len(), 12);
        let z = idx('z');
        assert!(indices[..3].iter().all(|&i| words.contains_char(i, z)));
    }

    #[test]
    fn top_tier_words_contain_a_weak_character() {
        let words = WordList::parse("aa bb cc dd ee ff gg hh ii jj kk ll mm nn oo pp qq rr ss tt");
        // Ten letters never practiced rank as the ten weakest.
        let stats = practiced("klmnopqrst");
        let weak: Vec<CharIndex> = "abcdefghij".chars().map(idx).collect();
        let mut rng = SmallRng::seed_from_u64(3);
        let indices = select_indices(&words, &stats, 20, 1000, &mut rng);

        assert_eq!(indices.len(), 20);
        assert!(indices[..15].iter().all(|&i| words.contains_any(i, &weak)));
    }

    #[test]
    fn rare_weak_character_still_terminates() {
        let mut text = "plain ".repeat(500);
        text.push_str("quiz");
        let words = WordList::parse(&text);
        let mut stats = practiced("plain");
        stats.record(idx('q'), 500.0, true);
        stats.record(idx('u'), 500.0, true);
        stats.record(idx('z'), 500.0, true);
        let mut rng = SmallRng::seed_from_u64(11);
        let out = resample(&words, &stats, 400, 1, &mut rng);
        assert_eq!(out.len(), 400);
    }

    #[test]
    fn same_seed_same_selection() {
        let words = WordList::bundled().unwrap();
        let stats = practiced("etaoin");
        let a = select_indices(&words, &stats, 40, 100, &mut SmallRng::seed_from_u64(9));
        let b = select_indices(&words, &stats, 40, 100, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
