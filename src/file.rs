use crate::identity::{ChunkIdentity, LevelTagIdentity};
use crate::options::{FilePolicy, RegionOptions};
use crate::position::RegionPosition;
use crate::region::Region;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Region stored in a file on disk.
pub type RegionFile = Region<RegionFileSource>;

/// Path-backed source honoring a [`FilePolicy`].
///
/// Keeps its own cursor so the file can be reopened between accesses
/// without losing the position.
#[derive(Debug)]
pub struct RegionFileSource {
    path: PathBuf,
    policy: FilePolicy,
    file: Option<File>,
    position: u64,
}

impl RegionFileSource {
    /// Creates the file when it does not exist.
    pub fn new<P: AsRef<Path>>(path: P, policy: FilePolicy) -> Result<Self, io::Error> {
        let path = path.as_ref().to_path_buf();
        let file = open_file(&path)?;

        let file = match policy {
            FilePolicy::HoldOpen => Some(file),
            FilePolicy::ReopenEachAccess => None,
        };

        Ok(RegionFileSource {
            path,
            policy,
            file,
            position: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> FilePolicy {
        self.policy
    }

    /// Returns true while a file handle is retained.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Releases the retained handle; it is reopened on next access.
    pub fn close(&mut self) {
        self.file = None;
    }

    /// Runs `f` on a handle positioned at the current cursor.
    ///
    /// Handles opened for a single access are closed before returning.
    fn with_file<T>(
        &mut self,
        f: impl FnOnce(&mut File) -> Result<T, io::Error>,
    ) -> Result<T, io::Error> {
        let position = self.position;

        match self.policy {
            FilePolicy::HoldOpen => {
                let file = match self.file.take() {
                    Some(file) => file,
                    None => open_file(&self.path)?,
                };
                let file = self.file.insert(file);

                file.seek(SeekFrom::Start(position))?;
                f(file)
            }
            FilePolicy::ReopenEachAccess => {
                let mut file = open_file(&self.path)?;
                file.seek(SeekFrom::Start(position))?;
                f(&mut file)
            }
        }
    }
}

fn open_file(path: &Path) -> Result<File, io::Error> {
    OpenOptions::new()
        .write(true)
        .read(true)
        .create(true)
        .open(path)
}

impl Read for RegionFileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.with_file(|file| file.read(buf))?;
        self.position += read as u64;

        Ok(read)
    }
}

impl Write for RegionFileSource {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.with_file(|file| file.write(buf))?;
        self.position += written as u64;

        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Seek for RegionFileSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(position) => {
                self.position = position;
                return Ok(position);
            }
            SeekFrom::Current(offset) => (self.position, offset),
            SeekFrom::End(offset) => (self.with_file(|file| Ok(file.metadata()?.len()))?, offset),
        };

        let position = if offset >= 0 {
            base.checked_add(offset as u64)
        } else {
            base.checked_sub(offset.unsigned_abs())
        };

        match position {
            Some(position) => {
                self.position = position;
                Ok(position)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}

impl Region<RegionFileSource> {
    /// Opens region file at path, creating an empty one when missing.
    pub fn open<P: AsRef<Path>>(
        path: P,
        position: RegionPosition,
        options: &RegionOptions,
    ) -> Result<Self, io::Error> {
        Self::open_with(path, position, options, &LevelTagIdentity)
    }

    pub fn open_with<P: AsRef<Path>>(
        path: P,
        position: RegionPosition,
        options: &RegionOptions,
        identity: &dyn ChunkIdentity,
    ) -> Result<Self, io::Error> {
        let source = RegionFileSource::new(path, options.file_policy)?;

        Region::load_with(position, source, options, identity)
    }

    pub fn path(&self) -> PathBuf {
        self.source().path().to_path_buf()
    }

    /// Releases the file handle; no-op if none is held.
    pub fn close(&mut self) {
        self.source_mut().close();
    }
}
