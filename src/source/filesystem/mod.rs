//! Local files and directories.
//!
//! [`FilesystemSource`] walks every configured path in order. Directories
//! are walked recursively; only regular files are scanned (symlinks, devices
//! and sockets found while walking are skipped). Each file is offered to the
//! configured [`ContentHandler`] first and otherwise chunked raw with the
//! boundary-safe [`Chunker`].
//!
//! Failures for a single file never abort the walk. A monolithic scan logs
//! them and records them in [`FilesystemSource::skipped`]; per-unit chunking
//! sends each one as a [`ChunkResult::Error`].
//!
//! Directories are walked in file-name order.

mod filter;

pub use filter::Filter;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use serde::Deserialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{
    Connection, ContentHandler, NoopHandler, Source, SourceState, SourceUnitChunker,
    SourceUnitEnumerator, SourceUnitUnmarshaller, Validator,
};
use crate::buffer::ResetReader;
use crate::chunk::{
    Chunk, ChunkResult, CommonSourceUnitUnmarshaller, EnumerationResult, SourceMetadata,
    SourceType, SourceUnit,
};
use crate::chunker::Chunker;
use crate::config::ChunkConfig;
use crate::context::{Context, cancellable_write};
use crate::error::{Error, Result};
use crate::progress::{Progress, ProgressSnapshot};
use crate::util::clean_path;

/// Connection payload accepted by [`FilesystemSource::init`].
///
/// ```json
/// { "paths": ["./.env"], "directories": ["/srv/app"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesystemConnection {
    /// Files (or directories) to scan.
    pub paths: Vec<PathBuf>,
    /// Directories to scan; appended after `paths`.
    pub directories: Vec<PathBuf>,
}

/// Ready-made configuration for building a source without a connection
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilesystemConfig {
    /// Files and directories to scan, in order.
    pub paths: Vec<PathBuf>,
    /// Include patterns for the path filter.
    pub include: Vec<String>,
    /// Exclude patterns for the path filter.
    pub exclude: Vec<String>,
}

/// A file or path that was skipped during the last monolithic scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// The path that was skipped.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Scans local files and directories.
pub struct FilesystemSource {
    name: String,
    source_id: i64,
    job_id: i64,
    verify: bool,
    paths: Vec<PathBuf>,
    filter: Option<Filter>,
    chunker: Chunker,
    handler: Arc<dyn ContentHandler>,
    progress: Progress,
    lifecycle: Mutex<Lifecycle>,
    skipped: Mutex<Vec<SkippedItem>>,
}

#[derive(Debug, Default)]
struct Lifecycle {
    state: SourceState,
    // Scans in flight; unit chunking may run several at once.
    active: usize,
}

/// Holds the source in [`SourceState::Scanning`]; the last guard dropped
/// moves it to [`SourceState::Done`].
struct ScanGuard<'a> {
    lifecycle: &'a Mutex<Lifecycle>,
}

impl<'a> ScanGuard<'a> {
    fn begin(lifecycle: &'a Mutex<Lifecycle>) -> Self {
        let mut l = lock(lifecycle);
        l.active += 1;
        l.state = SourceState::Scanning;
        Self { lifecycle }
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        let mut l = lock(self.lifecycle);
        l.active = l.active.saturating_sub(1);
        if l.active == 0 {
            l.state = SourceState::Done;
        }
    }
}

impl FilesystemSource {
    /// Creates an uninitialized source with default chunk sizes and no
    /// content handler.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            source_id: 0,
            job_id: 0,
            verify: false,
            paths: Vec::new(),
            filter: None,
            chunker: Chunker::default(),
            handler: Arc::new(NoopHandler),
            progress: Progress::new(),
            lifecycle: Mutex::new(Lifecycle::default()),
            skipped: Mutex::new(Vec::new()),
        }
    }

    /// Builds an initialized source from a [`FilesystemConfig`].
    pub fn from_config(
        name: impl Into<String>,
        job_id: i64,
        source_id: i64,
        verify: bool,
        config: FilesystemConfig,
    ) -> Result<Self> {
        let mut source = Self::new();
        source.name = name.into();
        source.job_id = job_id;
        source.source_id = source_id;
        source.verify = verify;
        source.paths = config.paths;
        if !config.include.is_empty() || !config.exclude.is_empty() {
            source.filter = Some(Filter::new(&config.include, &config.exclude)?);
        }
        source.set_state(SourceState::Initialized);
        Ok(source)
    }

    /// Restricts directory walks to paths passing `filter`.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Overrides the read/peek sizes.
    pub fn with_chunk_config(mut self, config: ChunkConfig) -> Result<Self> {
        config.validate()?;
        self.chunker = Chunker::new(config);
        Ok(self)
    }

    /// Installs the structured content handler files are offered to first.
    pub fn with_handler(mut self, handler: Arc<dyn ContentHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// Configured paths, in scan order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Current lifecycle state.
    ///
    /// [`SourceState::Scanning`] while any of `chunks`, `enumerate` or
    /// `chunk_unit` is running.
    pub fn state(&self) -> SourceState {
        lock(&self.lifecycle).state
    }

    /// Items skipped during the last monolithic scan. Unit-mode failures are
    /// reported on the result channel instead.
    pub fn skipped(&self) -> Vec<SkippedItem> {
        lock(&self.skipped).clone()
    }

    fn set_state(&self, state: SourceState) {
        lock(&self.lifecycle).state = state;
    }

    fn begin_scan(&self) -> Result<ScanGuard<'_>> {
        match self.state() {
            SourceState::Uninitialized => Err(Error::NotInitialized),
            _ => Ok(ScanGuard::begin(&self.lifecycle)),
        }
    }

    fn skip(&self, path: &Path, reason: &Error) {
        lock(&self.skipped).push(SkippedItem {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        });
    }

    /// Scans a file or directory. Failures of single files inside a
    /// directory go to `failed` and the walk continues.
    fn scan_path(
        &self,
        ctx: &Context,
        path: &Path,
        chunks: &Sender<Chunk>,
        failed: &mut dyn FnMut(&Path, Error),
    ) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|source| Error::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.is_dir() {
            self.scan_dir(ctx, path, chunks, failed)
        } else {
            self.scan_file(ctx, path, chunks)
        }
    }

    fn scan_dir(
        &self,
        ctx: &Context,
        root: &Path,
        chunks: &Sender<Chunk>,
        failed: &mut dyn FnMut(&Path, Error),
    ) -> Result<()> {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(root = %root.display(), error = %e, "unable to walk entry");
                    continue;
                }
            };

            // Checked here to keep directories and other non-regular entries
            // out of the logs below.
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if self.filter.as_ref().is_some_and(|f| !f.pass(path)) {
                continue;
            }

            match self.scan_file(ctx, path, chunks) {
                Ok(()) => {}
                Err(Error::ChannelClosed) => return Err(Error::ChannelClosed),
                Err(e) => {
                    info!(path = %path.display(), error = %e, "error scanning file");
                    failed(path, e);
                }
            }
        }
        Ok(())
    }

    fn scan_file(&self, ctx: &Context, path: &Path, chunks: &Sender<Chunk>) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|source| Error::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(Error::NotRegularFile {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), size = metadata.len(), "scanning file");

        let template = Chunk::template(
            self.name.as_str(),
            self.source_id,
            SourceType::Filesystem,
            Some(SourceMetadata::filesystem(path)),
            self.verify,
        );

        let mut reader = ResetReader::new(file);
        if self
            .handler
            .handle_file(ctx, &mut reader, &template, chunks)
        {
            return Ok(());
        }

        reader.reset()?;
        reader.stop();

        for segment in self.chunker.chunk(reader) {
            let segment = segment?;
            chunks
                .send(template.with_data(segment.into_data()))
                .map_err(|_| Error::ChannelClosed)?;
        }
        Ok(())
    }
}

impl Default for FilesystemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilesystemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesystemSource")
            .field("name", &self.name)
            .field("source_id", &self.source_id)
            .field("job_id", &self.job_id)
            .field("verify", &self.verify)
            .field("paths", &self.paths)
            .field("filter", &self.filter)
            .field("chunker", &self.chunker)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Source for FilesystemSource {
    fn source_type(&self) -> SourceType {
        SourceType::Filesystem
    }

    fn source_id(&self) -> i64 {
        self.source_id
    }

    fn job_id(&self) -> i64 {
        self.job_id
    }

    fn init(
        &mut self,
        _ctx: &Context,
        name: &str,
        job_id: i64,
        source_id: i64,
        verify: bool,
        connection: &Connection,
        _concurrency: usize,
    ) -> Result<()> {
        if self.state() != SourceState::Uninitialized {
            return Err(Error::AlreadyInitialized);
        }

        let conn: FilesystemConnection =
            serde_json::from_value(connection.clone()).map_err(Error::Connection)?;

        self.name = name.to_string();
        self.job_id = job_id;
        self.source_id = source_id;
        self.verify = verify;
        self.paths = conn.paths;
        self.paths.extend(conn.directories);
        self.set_state(SourceState::Initialized);
        Ok(())
    }

    fn chunks(&self, ctx: &Context, chunks: &Sender<Chunk>) -> Result<()> {
        let _scan = self.begin_scan()?;
        lock(&self.skipped).clear();
        self.chunk_paths(ctx, chunks)
    }

    fn get_progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    fn as_validator(&self) -> Option<&dyn Validator> {
        Some(self)
    }

    fn as_unit_enumerator(&self) -> Option<&dyn SourceUnitEnumerator> {
        Some(self)
    }

    fn as_unit_chunker(&self) -> Option<&dyn SourceUnitChunker> {
        Some(self)
    }

    fn as_unit_unmarshaller(&self) -> Option<&dyn SourceUnitUnmarshaller> {
        Some(self)
    }
}

impl FilesystemSource {
    fn chunk_paths(&self, ctx: &Context, chunks: &Sender<Chunk>) -> Result<()> {
        let total = self.paths.len();
        for (i, path) in self.paths.iter().enumerate() {
            if ctx.is_done() {
                return Ok(());
            }
            self.progress
                .set_progress_complete(i, total, format!("Path: {}", path.display()), "");

            let clean = clean_path(path);
            let mut skip_file = |file: &Path, e: Error| self.skip(file, &e);
            match self.scan_path(ctx, &clean, chunks, &mut skip_file) {
                Ok(()) => {}
                Err(Error::ChannelClosed) => return Err(Error::ChannelClosed),
                Err(e @ Error::Stat { .. }) => {
                    warn!(path = %clean.display(), error = %e, "unable to get file info");
                    self.skip(&clean, &e);
                }
                Err(e) => {
                    info!(path = %clean.display(), error = %e, "error scanning filesystem");
                    self.skip(&clean, &e);
                }
            }
        }
        self.progress.set_progress_complete(total, total, "", "");
        Ok(())
    }
}

impl Validator for FilesystemSource {
    fn validate(&self) -> Vec<Error> {
        if self.paths.is_empty() {
            return vec![Error::InvalidConfig {
                message: "no paths configured",
            }];
        }
        self.paths
            .iter()
            .filter_map(|path| {
                fs::metadata(path).err().map(|source| Error::Stat {
                    path: path.clone(),
                    source,
                })
            })
            .collect()
    }
}

impl SourceUnitEnumerator for FilesystemSource {
    /// Every configured path, file or directory, is one unit. Paths that
    /// are not valid UTF-8 cannot round-trip through a unit ID and are sent
    /// as [`Error::NonUtf8Path`].
    fn enumerate(&self, ctx: &Context, units: &Sender<EnumerationResult>) -> Result<()> {
        let _scan = self.begin_scan()?;
        for path in &self.paths {
            let item = match path.to_str() {
                Some(id) => EnumerationResult::ok(id),
                None => EnumerationResult::err(Error::NonUtf8Path { path: path.clone() }),
            };
            cancellable_write(ctx, units, item)?;
        }
        Ok(())
    }
}

impl SourceUnitChunker for FilesystemSource {
    fn chunk_unit(
        &self,
        ctx: &Context,
        unit: &dyn SourceUnit,
        chunks: &Sender<ChunkResult>,
    ) -> Result<()> {
        let _scan = self.begin_scan()?;
        let id = unit.source_unit_id();
        let path = clean_path(Path::new(id));

        let (scanned, failures) = thread::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded(0);
            let worker = scope.spawn(move || {
                let mut failures = Vec::new();
                let scanned = self.scan_path(ctx, &path, &tx, &mut |_: &Path, e: Error| {
                    failures.push(e);
                });
                (scanned, failures)
            });
            let relayed = relay(ctx, rx, chunks);
            let outcome = worker
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            relayed.and(Ok(outcome))
        })?;

        // Files inside a directory unit that could not be scanned.
        for e in failures {
            cancellable_write(ctx, chunks, ChunkResult::err(e))?;
        }

        match scanned {
            Ok(()) => Ok(()),
            // The relay side already reported why the worker could not send.
            Err(Error::ChannelClosed) => Ok(()),
            Err(e) => {
                info!(unit = id, error = %e, "error scanning filesystem");
                let message = e.to_string();
                cancellable_write(ctx, chunks, ChunkResult::err(e))?;
                Err(Error::UnitFailed {
                    unit: id.to_string(),
                    message,
                })
            }
        }
    }
}

impl SourceUnitUnmarshaller for FilesystemSource {
    fn unmarshal_source_unit(&self, data: &[u8]) -> Result<Box<dyn SourceUnit>> {
        CommonSourceUnitUnmarshaller.unmarshal_source_unit(data)
    }
}

/// Forwards every chunk from the worker. Dropping `rx` on return unblocks a
/// worker stuck on its send.
fn relay(ctx: &Context, rx: Receiver<Chunk>, out: &Sender<ChunkResult>) -> Result<()> {
    for chunk in rx {
        cancellable_write(ctx, out, ChunkResult::ok(chunk))?;
    }
    Ok(())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
