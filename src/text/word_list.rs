use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use thiserror::Error;

use crate::engine::charset::{ALPHABET_SIZE, CharIndex};

#[derive(Embed)]
#[folder = "assets/words/"]
struct WordAssets;

pub const BUNDLED_WORD_LIST: &str = "top-en.txt";

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("reading word list file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("word list '{0}' contains no usable words")]
    Empty(String),
    #[error("bundled word list '{0}' is missing")]
    MissingAsset(String),
}

/// One word: `len` bytes starting at `offset` in the owning buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordSpan {
    pub offset: usize,
    pub len: usize,
}

/// Immutable list of words over a single owned buffer.
///
/// Spans are non-empty, non-overlapping and strictly increasing in offset.
/// Every word consists of printable ASCII only; tokens containing anything
/// else are dropped at parse time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordList {
    buffer: String,
    spans: Vec<WordSpan>,
}

impl WordList {
    /// Tokenizes on runs of whitespace. Empty tokens never produce spans.
    pub fn parse(text: &str) -> Self {
        let mut spans = Vec::new();
        let mut start: Option<usize> = None;

        for (pos, byte) in text.bytes().enumerate() {
            if byte.is_ascii_whitespace() {
                if let Some(s) = start.take() {
                    push_token(text, s, pos, &mut spans);
                }
            } else if start.is_none() {
                start = Some(pos);
            }
        }
        if let Some(s) = start {
            push_token(text, s, text.len(), &mut spans);
        }

        Self {
            buffer: text.to_string(),
            spans,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, WordListError> {
        let bytes = fs::read(path).map_err(|source| WordListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&String::from_utf8_lossy(&bytes));
        if list.is_empty() {
            return Err(WordListError::Empty(path.display().to_string()));
        }
        Ok(list)
    }

    pub fn bundled() -> Result<Self, WordListError> {
        let file = WordAssets::get(BUNDLED_WORD_LIST)
            .ok_or_else(|| WordListError::MissingAsset(BUNDLED_WORD_LIST.to_string()))?;
        let list = Self::parse(&String::from_utf8_lossy(file.data.as_ref()));
        if list.is_empty() {
            return Err(WordListError::Empty(BUNDLED_WORD_LIST.to_string()));
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[WordSpan] {
        &self.spans
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.spans
            .get(index)
            .map(|span| &self.buffer[span.offset..span.offset + span.len])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.spans
            .iter()
            .map(|span| &self.buffer[span.offset..span.offset + span.len])
    }

    pub fn contains_char(&self, index: usize, ch: CharIndex) -> bool {
        self.get(index)
            .is_some_and(|word| word.as_bytes().contains(&ch.byte()))
    }

    pub fn contains_any(&self, index: usize, chars: &[CharIndex]) -> bool {
        self.get(index).is_some_and(|word| {
            word.bytes()
                .any(|b| chars.iter().any(|ch| ch.byte() == b))
        })
    }

    /// Distinct characters used by any word, in index order.
    pub fn alphabet(&self) -> Vec<CharIndex> {
        let mut seen = [false; ALPHABET_SIZE];
        for word in self.iter() {
            for ch in word.bytes().filter_map(CharIndex::from_byte) {
                seen[ch.index()] = true;
            }
        }
        CharIndex::all().filter(|ch| seen[ch.index()]).collect()
    }

    /// Owned copy holding only the selected words, in the given order.
    /// Repeated indices produce repeated words; indices past the end are skipped.
    pub fn sample(&self, indices: &[usize]) -> WordList {
        let mut buffer = String::new();
        let mut spans = Vec::with_capacity(indices.len());

        for word in indices.iter().filter_map(|&i| self.get(i)) {
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            spans.push(WordSpan {
                offset: buffer.len(),
                len: word.len(),
            });
            buffer.push_str(word);
        }

        WordList { buffer, spans }
    }
}

fn push_token(text: &str, start: usize, end: usize, spans: &mut Vec<WordSpan>) {
    let token = &text.as_bytes()[start..end];
    if token.iter().all(|&b| CharIndex::from_byte(b).is_some()) {
        spans.push(WordSpan {
            offset: start,
            len: end - start,
        });
    }
}
