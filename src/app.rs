use anyhow::{Context, Result};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use typtr::config::Config;
use typtr::engine::charset::CharIndex;
use typtr::engine::ranking::RankingSummary;
use typtr::engine::{StatsModel, WORST_N, sampler};
use typtr::session::cancel::CancelToken;
use typtr::session::result::DrillResult;
use typtr::store::history::HistoryStore;
use typtr::store::stats_file::StatsStore;
use typtr::text::word_list::WordList;

/// Characters ranked on the start screen: those of the word list plus the
/// space typed between words.
fn display_alphabet(words: &WordList) -> Vec<CharIndex> {
    let mut alphabet = words.alphabet();
    if !alphabet.contains(&CharIndex::SPACE) {
        alphabet.insert(0, CharIndex::SPACE);
    }
    alphabet
}

/// Words picked for one round, before they are laid out.
pub struct RoundWords {
    pub words: WordList,
    pub indices: Vec<usize>,
}

pub struct App {
    pub config: Config,
    pub stats: StatsModel,
    pub rankings: RankingSummary,
    pub last_result: Option<DrillResult>,
    pub cancel: CancelToken,
    base_words: WordList,
    alphabet: Vec<CharIndex>,
    stats_store: StatsStore,
    history: HistoryStore,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, cancel: CancelToken) -> Result<Self> {
        let base_words = match &config.word_list {
            Some(path) => WordList::from_file(path)?,
            None => WordList::bundled()?,
        };
        let data_dir = config.data_dir();
        let stats_store = StatsStore::with_base_dir(&data_dir)?;
        let history = HistoryStore::with_base_dir(&data_dir)?;
        let last_result = history.last()?;
        let alphabet = display_alphabet(&base_words);

        tracing::info!(
            words = base_words.len(),
            data_dir = %data_dir.display(),
            "typtr starting"
        );

        Ok(Self {
            config,
            stats: StatsModel::default(),
            rankings: RankingSummary::default(),
            last_result,
            cancel,
            base_words,
            alphabet,
            stats_store,
            history,
            rng: SmallRng::from_entropy(),
        })
    }

    /// Reloads stats from disk and picks the words for the next round.
    /// An untouched model drills the base list as is; otherwise the list is
    /// resampled toward the weakest characters first.
    pub fn prepare_round(&mut self) -> Result<RoundWords> {
        self.stats = self.stats_store.load()?;
        self.rankings = RankingSummary::compute(&self.stats, &self.alphabet, WORST_N);

        let words = if self.stats.is_fresh() {
            tracing::info!("fresh stats, drilling the base word list");
            self.base_words.clone()
        } else {
            let target = self.config.sample_size.unwrap_or(self.base_words.len());
            sampler::resample(
                &self.base_words,
                &self.stats.monogram,
                target,
                self.config.max_sample_attempts,
                &mut self.rng,
            )
        };

        let indices = (0..self.config.words_per_round)
            .map(|_| self.rng.gen_range(0..words.len()))
            .collect();
        Ok(RoundWords { words, indices })
    }

    /// Folds a completed round into the stats and persists it before the
    /// next round reads the file again.
    pub fn finish_round(&mut self, result: DrillResult) -> Result<()> {
        self.stats.apply_drill(&result.per_key);
        self.stats_store
            .save(&self.stats)
            .context("saving stats after round")?;
        self.history.append(&result)?;

        tracing::info!(
            n_chars = result.n_chars,
            errors = result.errors,
            wpm = result.wpm,
            "round completed"
        );
        self.last_result = Some(result);
        Ok(())
    }
}
