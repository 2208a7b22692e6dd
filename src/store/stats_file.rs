use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::StatsModel;
use crate::engine::charset::ALPHABET_SIZE;
use crate::engine::ngram_stats::BIGRAM_TABLE_SIZE;

pub const STATS_FILE_NAME: &str = "typtr_data.dat";

const CONFUSION_LEN: usize = (BIGRAM_TABLE_SIZE + 1) * 8;
const MONOGRAM_LEN: usize = ALPHABET_SIZE * 8 * 3;
const BIGRAM_LEN: usize = BIGRAM_TABLE_SIZE * 8 * 3;
/// Exact size of an encoded model. The format has no header.
pub const STATS_FILE_LEN: usize = CONFUSION_LEN + MONOGRAM_LEN + BIGRAM_LEN;

#[derive(Debug, Error)]
pub enum StatsFileError {
    #[error("{op} stats file '{}': {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stats file '{}' is truncated ({found} of {expected} bytes)", .path.display())]
    Truncated {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Little-endian, in order: confusion cells + total, monogram means,
/// occurrences, misses, then the bigram table in the same field order.
pub fn encode(model: &StatsModel) -> Vec<u8> {
    let mut out = Vec::with_capacity(STATS_FILE_LEN);

    put_u64s(&mut out, &model.confusion.cells);
    out.extend_from_slice(&model.confusion.total_hits.to_le_bytes());

    put_f64s(&mut out, &model.monogram.mean_ms);
    put_u64s(&mut out, &model.monogram.occurrences);
    put_u64s(&mut out, &model.monogram.misses);

    put_f64s(&mut out, &model.bigram.mean_ms);
    put_u64s(&mut out, &model.bigram.occurrences);
    put_u64s(&mut out, &model.bigram.misses);

    out
}

/// Inverse of [`encode`]. Returns `None` when `bytes` is shorter than
/// [`STATS_FILE_LEN`]; trailing bytes are ignored.
pub fn decode(bytes: &[u8]) -> Option<StatsModel> {
    if bytes.len() < STATS_FILE_LEN {
        return None;
    }
    let mut reader = ByteReader { bytes, pos: 0 };
    let mut model = StatsModel::default();

    reader.fill_u64s(&mut model.confusion.cells);
    model.confusion.total_hits = reader.u64();

    reader.fill_f64s(&mut model.monogram.mean_ms);
    reader.fill_u64s(&mut model.monogram.occurrences);
    reader.fill_u64s(&mut model.monogram.misses);

    reader.fill_f64s(&mut model.bigram.mean_ms);
    reader.fill_u64s(&mut model.bigram.occurrences);
    reader.fill_u64s(&mut model.bigram.misses);

    Some(model)
}

fn put_u64s(out: &mut Vec<u8>, values: &[u64]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

fn put_f64s(out: &mut Vec<u8>, values: &[f64]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

/// Sequential reader over a buffer whose length was checked up front.
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl ByteReader<'_> {
    fn take8(&mut self) -> [u8; 8] {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.bytes[self.pos..self.pos + 8]);
        self.pos += 8;
        word
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take8())
    }

    fn fill_u64s(&mut self, dst: &mut [u64]) {
        for v in dst {
            *v = self.u64();
        }
    }

    fn fill_f64s(&mut self, dst: &mut [f64]) {
        for v in dst {
            *v = f64::from_le_bytes(self.take8());
        }
    }
}

fn io_err(op: &'static str, path: &Path) -> impl FnOnce(io::Error) -> StatsFileError {
    let path = path.to_path_buf();
    move |source| StatsFileError::Io { op, path, source }
}

// ---------------------------------------------------------------------------
// StatsStore
// ---------------------------------------------------------------------------

pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn with_base_dir(base_dir: &Path) -> Result<Self, StatsFileError> {
        fs::create_dir_all(base_dir).map_err(|source| StatsFileError::Io {
            op: "creating directory for",
            path: base_dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: base_dir.join(STATS_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is the first-run state and loads as all-zero tables.
    /// Every other failure is returned.
    pub fn load(&self) -> Result<StatsModel, StatsFileError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no stats file yet, starting fresh");
                return Ok(StatsModel::default());
            }
            Err(source) => {
                return Err(StatsFileError::Io {
                    op: "reading",
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let model = decode(&bytes).ok_or_else(|| StatsFileError::Truncated {
            path: self.path.clone(),
            expected: STATS_FILE_LEN,
            found: bytes.len(),
        })?;
        if bytes.len() > STATS_FILE_LEN {
            tracing::warn!(
                extra = bytes.len() - STATS_FILE_LEN,
                "ignoring trailing bytes in stats file"
            );
        }
        tracing::debug!(
            keystrokes = model.confusion.total_hits(),
            "loaded stats"
        );
        Ok(model)
    }

    /// Writes a sibling temp file, syncs it, then renames it over the target.
    pub fn save(&self, model: &StatsModel) -> Result<(), StatsFileError> {
        let tmp_path = self.path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path).map_err(io_err("creating", &tmp_path))?;
        file.write_all(&encode(model))
            .map_err(io_err("writing", &tmp_path))?;
        file.sync_all().map_err(io_err("syncing", &tmp_path))?;
        fs::rename(&tmp_path, &self.path).map_err(io_err("replacing", &self.path))?;

        tracing::info!(path = %self.path.display(), "saved stats");
        Ok(())
    }
}
