use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::result::DrillResult;

pub const HISTORY_FILE_NAME: &str = "history.json";
/// Oldest rounds are dropped once the file holds this many.
pub const MAX_HISTORY: usize = 500;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryData {
    #[serde(default)]
    pub rounds: Vec<DrillResult>,
}

/// Summaries of completed rounds, newest last.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn with_base_dir(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)
            .with_context(|| format!("creating data directory '{}'", base_dir.display()))?;
        Ok(Self {
            path: base_dir.join(HISTORY_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unparsable history loads as empty; it is diagnostic only.
    pub fn load(&self) -> Result<HistoryData> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(HistoryData::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading history file '{}'", self.path.display()));
            }
        };
        match serde_json::from_str(&content) {
            Ok(data) => Ok(data),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "discarding unparsable history");
                Ok(HistoryData::default())
            }
        }
    }

    pub fn save(&self, data: &HistoryData) -> Result<()> {
        let tmp_path = self.path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating '{}'", tmp_path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("writing '{}'", tmp_path.display()))?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replacing history file '{}'", self.path.display()))?;
        Ok(())
    }

    pub fn append(&self, result: &DrillResult) -> Result<()> {
        let mut data = self.load()?;
        data.rounds.push(result.clone());
        if data.rounds.len() > MAX_HISTORY {
            let excess = data.rounds.len() - MAX_HISTORY;
            data.rounds.drain(..excess);
        }
        self.save(&data)
    }

    pub fn last(&self) -> Result<Option<DrillResult>> {
        Ok(self.load()?.rounds.pop())
    }
}
