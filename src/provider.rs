use crate::file::{RegionFile, RegionFileSource};
use crate::options::RegionOptions;
use crate::position::RegionPosition;
use crate::region::Region;
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{fs, io};

/// Source of region files, addressed by region position.
pub trait RegionProvider<S> {
    /// Opens the region, creating it when missing.
    fn get_region(&self, region_pos: RegionPosition) -> Result<Region<S>, io::Error>;

    /// Returns true when the region already exists.
    fn has_region(&self, region_pos: RegionPosition) -> bool;
}

/// Region files named `r.<x>.<z>.mcr` inside one folder.
#[derive(Debug, Clone)]
pub struct FolderRegionProvider {
    /// Folder where region files located.
    folder_path: PathBuf,
    options: RegionOptions,
}

impl FolderRegionProvider {
    pub fn new<P: AsRef<Path>>(folder: P) -> FolderRegionProvider {
        Self::with_options(folder, RegionOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(folder: P, options: RegionOptions) -> FolderRegionProvider {
        FolderRegionProvider {
            folder_path: folder.as_ref().to_path_buf(),
            options,
        }
    }

    pub fn folder_path(&self) -> &Path {
        &self.folder_path
    }

    pub fn region_path(&self, position: RegionPosition) -> PathBuf {
        self.folder_path.join(region_position_filename(position))
    }

    /// Positions of every region file present in the folder.
    pub fn iter_positions(&self) -> Result<impl Iterator<Item = RegionPosition>, io::Error> {
        let mut positions: Vec<_> = read_dir(&self.folder_path)?
            .filter_map(|dir| dir.ok())
            .filter_map(|dir| region_pos_from_filename(&dir.path()).ok())
            .collect();

        positions.sort();

        Ok(positions.into_iter())
    }
}

impl RegionProvider<RegionFileSource> for FolderRegionProvider {
    fn get_region(&self, position: RegionPosition) -> Result<RegionFile, io::Error> {
        if !self.folder_path.exists() {
            fs::create_dir_all(&self.folder_path)?;
        }

        RegionFile::open(self.region_path(position), position, &self.options)
    }

    fn has_region(&self, position: RegionPosition) -> bool {
        self.region_path(position).is_file()
    }
}

fn region_pos_from_filename(path: &Path) -> Result<RegionPosition, io::Error> {
    // we can use lossy because of the bound check later
    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    let parts: Vec<_> = filename.split('.').collect();

    let (x, z) = parse_coords(parts).ok_or(io::ErrorKind::InvalidInput)?;

    Ok(RegionPosition::new(x, z))
}

fn region_position_filename(pos: RegionPosition) -> String {
    format!("r.{}.{}.mcr", pos.x, pos.z)
}

fn parse_coords(parts: Vec<&str>) -> Option<(i32, i32)> {
    let incorrect_format = parts.len() != 4 || parts[0] != "r" || parts[3] != "mcr";

    if incorrect_format {
        return None;
    }

    Some((i32::from_str(parts[1]).ok()?, i32::from_str(parts[2]).ok()?))
}
