//! Data Memory.
//!
//! A flat array of words addressed by index. There is no protection model:
//! accesses outside the array are skipped without raising a fault, and the
//! caller decides what an absent load value means.

use tracing::debug;

use crate::common::{AccessType, Word};

/// Default number of words in data memory.
pub const DEFAULT_MEMORY_WORDS: usize = 64;

/// Word-addressed data memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataMemory {
    words: Vec<Word>,
    last_write: Option<usize>,
}

impl Default for DataMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_WORDS)
    }
}

impl DataMemory {
    /// Creates a zero-filled memory of `size` words.
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; size],
            last_write: None,
        }
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` for a zero-sized memory.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Maps a computed address to an index, or `None` when out of range.
    fn index(&self, addr: Word, access: AccessType) -> Option<usize> {
        let idx = usize::try_from(addr).ok().filter(|&i| i < self.words.len());
        if idx.is_none() {
            debug!(addr, size = self.words.len(), "skipping out-of-range {access}");
        }
        idx
    }

    /// Reads the word at `addr`, or `None` if the address is out of range.
    pub fn load(&self, addr: Word) -> Option<Word> {
        self.index(addr, AccessType::Read).map(|i| self.words[i])
    }

    /// Writes `val` at `addr` and records it as the last write.
    ///
    /// # Returns
    ///
    /// `true` if the store landed, `false` if the address was out of range.
    pub fn store(&mut self, addr: Word, val: Word) -> bool {
        match self.index(addr, AccessType::Write) {
            Some(i) => {
                self.words[i] = val;
                self.last_write = Some(i);
                true
            }
            None => false,
        }
    }

    /// Writes `val` at `idx` without touching the last-write marker.
    ///
    /// Used to seed memory before a run. Out-of-range indices are ignored.
    pub fn preload(&mut self, idx: usize, val: Word) {
        if let Some(word) = self.words.get_mut(idx) {
            *word = val;
        }
    }

    /// Address of the most recent store, if any.
    pub fn last_write(&self) -> Option<usize> {
        self.last_write
    }

    /// All words, indexed by address.
    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }

    /// Dumps memory to stdout in four columns, marking the last write.
    pub fn dump(&self) {
        const COLUMNS: usize = 4;
        let rows = self.words.len().div_ceil(COLUMNS);
        for row in 0..rows {
            let line: Vec<String> = (0..COLUMNS)
                .map(|col| col * rows + row)
                .filter(|&i| i < self.words.len())
                .map(|i| {
                    let mark = if self.last_write == Some(i) { '*' } else { ' ' };
                    format!("{:04}:{}{:<10}", i, mark, self.words[i])
                })
                .collect();
            println!("{}", line.join(" ").trim_end());
        }
    }
}
