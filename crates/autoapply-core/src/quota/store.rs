use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;

use super::lock::CounterLock;
use super::{ApplicationCounter, ApplicationCounterStore, CounterError};

/// Counter persisted as `{"successfullyApplied": N}`.
#[derive(Debug, Clone)]
pub struct JsonCounterStore {
    path: PathBuf,
}

impl JsonCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default path: `~/.local/state/autoapply/application_counter.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("autoapply")?;
        Ok(xdg_dirs
            .get_state_home()
            .join("autoapply")
            .join("application_counter.json"))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> CounterError {
        CounterError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<ApplicationCounter, CounterError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ApplicationCounter::default())
            }
            Err(e) => return Err(self.io_err(e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| CounterError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, counter: &ApplicationCounter) -> Result<(), CounterError> {
        let json = serde_json::to_vec_pretty(counter).map_err(|source| CounterError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);
        let mut file = std::fs::File::create(&tmp).map_err(|e| self.io_err(e))?;
        file.write_all(&json).map_err(|e| self.io_err(e))?;
        file.sync_all().map_err(|e| self.io_err(e))?;
        drop(file);
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))
    }

    fn ensure_parent(&self) -> Result<(), CounterError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))
            }
            _ => Ok(()),
        }
    }
}

impl ApplicationCounterStore for JsonCounterStore {
    fn load(&self) -> Result<ApplicationCounter, CounterError> {
        self.read()
    }

    fn commit(&self, delta: u32) -> Result<ApplicationCounter, CounterError> {
        self.ensure_parent()?;
        let _lock = CounterLock::acquire(&self.path)?;
        let current = self.read()?;
        let next = ApplicationCounter::new(current.successfully_applied.saturating_add(delta));
        self.write(&next)?;
        tracing::debug!(
            path = %self.path.display(),
            applied = next.successfully_applied,
            delta,
            "committed application counter"
        );
        Ok(next)
    }
}

/// Counter kept in memory; for tests and simulation.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counter: Mutex<ApplicationCounter>,
    commits: Mutex<Vec<u32>>,
}

impl MemoryCounterStore {
    pub fn new(successfully_applied: u32) -> Self {
        Self {
            counter: Mutex::new(ApplicationCounter::new(successfully_applied)),
            commits: Mutex::new(Vec::new()),
        }
    }

    /// Deltas passed to `commit`, in order.
    pub fn commits(&self) -> Vec<u32> {
        self.commits.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ApplicationCounterStore for MemoryCounterStore {
    fn load(&self) -> Result<ApplicationCounter, CounterError> {
        Ok(*self.counter.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn commit(&self, delta: u32) -> Result<ApplicationCounter, CounterError> {
        let mut counter = self.counter.lock().unwrap_or_else(|e| e.into_inner());
        counter.successfully_applied = counter.successfully_applied.saturating_add(delta);
        self.commits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(delta);
        Ok(*counter)
    }
}
