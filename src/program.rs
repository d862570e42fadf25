//! Program loading and listing.
//!
//! The program image is copied into a buffer at its base address, the same way the Chip8 interpreter loads a ROM
//! after the 0x200 bytes reserved for itself, so that buffer indices and displayed offsets are the same thing.

use crate::{decode, Decoded, Error, Result, Syntax};

use std::fs::read;
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;

use clap::ValueEnum;
use tracing::{debug, warn};

/// What to do with the last byte of an odd-length program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum OddByte {
    /// Stop at the last complete word.
    #[default]
    Ignore,
    /// Decode the last byte paired with a zero low byte.
    Pad,
}

/// A program loaded at its base address, ready to be listed.
#[derive(Clone, Debug)]
pub struct Program {
    memory: Vec<u8>,
    base: u16,
    /// One past the last byte of the last decodable word.
    end: usize,
}

impl Program {
    /// Where Chip8 programs are loaded.
    pub const DEFAULT_BASE: u16 = 0x200;
    /// Offsets are 16-bit, a program cannot end past this.
    pub const ADDRESS_SPACE: usize = 0x1_0000;

    /// Reads the program file at `path` and loads it at `base`.
    pub fn open(path: impl AsRef<Path>, base: u16, odd: OddByte) -> Result<Self> {
        let path = path.as_ref();
        let bytes = read(path).map_err(|source| Error::Open { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), len = bytes.len(), "read program");

        Self::from_bytes(&bytes, base, odd)
    }

    /// Loads the given program image at `base`, which must be even.
    pub fn from_bytes(program: &[u8], base: u16, odd: OddByte) -> Result<Self> {
        if base % 2 != 0 {
            return Err(Error::UnalignedBase(base));
        }

        let start = base as usize;
        let padded = program.len() % 2 == 1 && odd == OddByte::Pad;
        let image_len = program.len() + padded as usize;

        if start + image_len > Self::ADDRESS_SPACE {
            return Err(Error::ProgramTooLarge { len: program.len(), base });
        }

        let mut memory = vec![0; start + image_len];
        memory[start..start + program.len()].copy_from_slice(program);

        let end = start + (image_len & !1);
        if program.len() % 2 == 1 {
            match odd {
                OddByte::Ignore => warn!(offset = end, "odd-length program, ignoring trailing byte"),
                OddByte::Pad => debug!(offset = end - 2, "odd-length program, padding trailing byte"),
            }
        }

        debug!(base, len = program.len(), words = (end - start) / 2, "loaded program");
        Ok(Self { memory, base, end })
    }

    pub const fn base(&self) -> u16 {
        self.base
    }

    /// Offset one past the last listed word.
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of instruction words that will be listed.
    pub fn word_count(&self) -> usize {
        (self.end - self.base as usize) / 2
    }

    pub fn is_empty(&self) -> bool {
        self.word_count() == 0
    }

    /// The whole buffer, including the zeroed area below the base address.
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Iterates the decoded words in program order.
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(&self.memory, self.base as usize, self.end)
    }

    /// Returns the rendered lines in program order.
    pub fn listing(&self, syntax: Syntax) -> Vec<String> {
        self.lines()
            .map(|line| line.display(syntax).to_string())
            .collect()
    }

    /// Same as [Self::listing], with the words split in chunks decoded on their own threads.
    ///
    /// At most `jobs` threads are used, and never more than the words to decode or the available parallelism.
    /// Chunks are sent back through a channel tagged with their index and put back in program order.
    pub fn listing_parallel(&self, jobs: NonZeroUsize, syntax: Syntax) -> Result<Vec<String>> {
        let words = self.word_count();
        let available = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let workers = worker_count(jobs, words, available);
        if workers <= 1 {
            return Ok(self.listing(syntax));
        }

        let chunk_words = words.div_ceil(workers);
        let chunks = words.div_ceil(chunk_words);
        debug!(jobs = jobs.get(), workers, chunks, chunk_words, words, "parallel listing");

        let (tx, rx) = kanal::unbounded::<(usize, Vec<String>)>();
        thread::scope(|scope| {
            for index in 0..chunks {
                let tx = tx.clone();
                let start = self.base as usize + index * chunk_words * 2;
                let end = (start + chunk_words * 2).min(self.end);
                let memory = self.memory.as_slice();

                scope.spawn(move || {
                    let lines = Lines::new(memory, start, end)
                        .map(|line| line.display(syntax).to_string())
                        .collect();
                    // A failed send shows up as a missing chunk on the receiving side.
                    let _ = tx.send((index, lines));
                });
            }
        });
        drop(tx);

        let mut received = Vec::with_capacity(chunks);
        for _ in 0..chunks {
            received.push(rx.recv().map_err(|_| Error::WorkerDisconnected)?);
        }
        received.sort_unstable_by_key(|(index, _)| *index);

        Ok(received.into_iter().flat_map(|(_, lines)| lines).collect())
    }
}

/// Number of threads to decode `words` words with, at least 1.
fn worker_count(jobs: NonZeroUsize, words: usize, available: usize) -> usize {
    jobs.get().min(words).min(available).max(1)
}

/// Iterator over the decoded words of a buffer, stepping by 2 bytes.
#[derive(Clone, Debug)]
pub struct Lines<'a> {
    memory: &'a [u8],
    pc: usize,
    end: usize,
}

impl<'a> Lines<'a> {
    /// Iterates the complete words in `[start, end)`. `end` is clamped to the buffer length.
    pub fn new(memory: &'a [u8], start: usize, end: usize) -> Self {
        Self {
            memory,
            pc: start,
            end: end.min(memory.len()),
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pc + 2 > self.end {
            return None;
        }

        let line = decode(self.memory, self.pc);
        self.pc += 2;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.pc) / 2;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Lines<'_> {}
