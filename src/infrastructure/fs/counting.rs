//! Counting File System Decorator
//!
//! Wraps another FileSystem and tallies each kind of query. The CLI reports
//! the tallies in verbose mode; tests use them to prove that memoized
//! lookups do not touch the disk again.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;

use crate::domain::ports::file_system::{DirEntryInfo, FileSystem, FsResult};

/// Query tallies shared between a [`CountingFs`] and its observers
#[derive(Debug, Default)]
pub struct FsCounters {
    existence_checks: Cell<usize>,
    reads: Cell<usize>,
    listings: Cell<usize>,
    real_paths: Cell<usize>,
}

impl FsCounters {
    pub fn existence_checks(&self) -> usize {
        self.existence_checks.get()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn listings(&self) -> usize {
        self.listings.get()
    }

    pub fn real_paths(&self) -> usize {
        self.real_paths.get()
    }

    pub fn snapshot(&self) -> FsStats {
        FsStats {
            existence_checks: self.existence_checks(),
            reads: self.reads(),
            listings: self.listings(),
            real_paths: self.real_paths(),
        }
    }

    fn bump(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }
}

/// Point-in-time copy of [`FsCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FsStats {
    pub existence_checks: usize,
    pub reads: usize,
    pub listings: usize,
    pub real_paths: usize,
}

/// FileSystem decorator that counts queries
#[derive(Debug, Clone)]
pub struct CountingFs<F> {
    inner: F,
    counters: Rc<FsCounters>,
}

impl<F: FileSystem> CountingFs<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            counters: Rc::new(FsCounters::default()),
        }
    }

    /// Shared handle to the tallies
    pub fn counters(&self) -> Rc<FsCounters> {
        Rc::clone(&self.counters)
    }
}

impl<F: FileSystem> FileSystem for CountingFs<F> {
    fn file_exists(&self, path: &Path) -> bool {
        FsCounters::bump(&self.counters.existence_checks);
        self.inner.file_exists(path)
    }

    fn dir_exists(&self, path: &Path) -> bool {
        FsCounters::bump(&self.counters.existence_checks);
        self.inner.dir_exists(path)
    }

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        FsCounters::bump(&self.counters.reads);
        self.inner.read_to_string(path)
    }

    fn list_dir(&self, dir: &Path) -> FsResult<Vec<DirEntryInfo>> {
        FsCounters::bump(&self.counters.listings);
        self.inner.list_dir(dir)
    }

    fn real_path(&self, path: &Path) -> PathBuf {
        FsCounters::bump(&self.counters.real_paths);
        self.inner.real_path(path)
    }
}
