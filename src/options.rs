use flate2::Compression;

/// How a path-backed region holds its file handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FilePolicy {
    /// One handle is kept until the region is closed or dropped.
    HoldOpen,
    /// The file is opened and closed around every access.
    ReopenEachAccess,
}

/// How much of a region is validated when it is loaded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IntegrityCheck {
    /// Only the offset table: sector ranges must be inside the file and disjoint.
    ///
    /// Chunks stored in the wrong slot go unnoticed.
    Sectors,
    /// Sector ranges plus every chunk is decompressed and its embedded
    /// position compared with its slot.
    Full,
}

/// Settings chosen when a region is loaded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegionOptions {
    pub file_policy: FilePolicy,
    pub integrity_check: IntegrityCheck,
    /// Zlib level used for chunks written through this region.
    pub compression: Compression,
}

impl RegionOptions {
    pub fn with_file_policy(mut self, file_policy: FilePolicy) -> Self {
        self.file_policy = file_policy;
        self
    }

    pub fn with_integrity_check(mut self, integrity_check: IntegrityCheck) -> Self {
        self.integrity_check = integrity_check;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

impl Default for RegionOptions {
    fn default() -> Self {
        RegionOptions {
            file_policy: FilePolicy::HoldOpen,
            integrity_check: IntegrityCheck::Full,
            compression: Compression::new(2),
        }
    }
}
