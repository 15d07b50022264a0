//! Advisory exclusive lock held around counter read-modify-write.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use super::CounterError;

/// Holds an exclusive `flock` on a sidecar lock file until dropped.
/// On non-Unix targets only the file is created.
pub(super) struct CounterLock {
    #[allow(dead_code)]
    file: File,
}

pub(super) fn lock_path(counter_path: &Path) -> PathBuf {
    let mut name = counter_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    counter_path.with_file_name(name)
}

impl CounterLock {
    pub(super) fn acquire(counter_path: &Path) -> Result<Self, CounterError> {
        let path = lock_path(counter_path);
        let io_err = |source: std::io::Error| CounterError::Io {
            path: path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(io_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            let r = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
            if r != 0 {
                return Err(io_err(std::io::Error::last_os_error()));
            }
        }
        Ok(Self { file })
    }
}

impl Drop for CounterLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            unsafe {
                libc::flock(self.file.as_raw_fd(), libc::LOCK_UN);
            }
        }
    }
}
