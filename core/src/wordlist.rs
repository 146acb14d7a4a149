//! Line-oriented word list reader

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::request::ProbeRequest;

/// Path that selects standard input instead of a file
pub const STDIN_PATH: &str = "-";

/// Word list loading errors
#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    /// The source could not be opened or read
    #[error("unable to read word list {path}: {source}")]
    Unreadable {
        /// Path given by the caller (`-` for stdin)
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Ordered path segments, one per non-blank line of the source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    entries: Vec<String>,
    source: PathBuf,
}

impl WordList {
    /// Read a word list from `path`, or from stdin when the path is `-`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WordListError> {
        let path = path.as_ref();
        let unreadable = |source| WordListError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let list = if path == Path::new(STDIN_PATH) {
            Self::from_reader(io::stdin().lock(), path).map_err(unreadable)?
        } else {
            let file = File::open(path).map_err(unreadable)?;
            Self::from_reader(file, path).map_err(unreadable)?
        };

        tracing::debug!(path = %path.display(), entries = list.len(), "Loaded word list");
        Ok(list)
    }

    /// Read a word list from any reader
    ///
    /// `\n` and `\r\n` endings are stripped, blank lines skipped and invalid
    /// UTF-8 replaced.
    pub fn from_reader<R: Read>(mut reader: R, source: impl Into<PathBuf>) -> io::Result<Self> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;

        let entries = String::from_utf8_lossy(&raw)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            entries,
            source: source.into(),
        })
    }

    /// Build a word list from in-memory entries, skipping blank ones
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(Into::into)
                .filter(|entry: &String| !entry.trim().is_empty())
                .collect(),
            source: PathBuf::new(),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Where the list was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// One request per entry against `url`, in list order
    pub fn to_requests(&self, url: &str) -> Vec<ProbeRequest> {
        self.iter()
            .map(|segment| ProbeRequest::new(url, segment))
            .collect()
    }
}
