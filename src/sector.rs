use crate::error::SectorError;
use bitvec::prelude::*;
use log::debug;

/// Region sector length in bytes.
pub const SECTOR_BYTES: usize = 4096;
/// Sectors reserved for the offset and timestamp tables.
pub const HEADER_SECTORS: usize = 2;

/// Tracks which sectors of a region file are used.
///
/// The first two sectors hold the header and are always used.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorAllocator {
    used_sectors: BitVec,
}

impl SectorAllocator {
    pub fn new(total_sectors: usize) -> Self {
        let mut used_sectors = bitvec![0; total_sectors.max(HEADER_SECTORS)];

        for index in 0..HEADER_SECTORS {
            used_sectors.set(index, true);
        }

        SectorAllocator { used_sectors }
    }

    /// Marks a run as used.
    ///
    /// Nothing is marked unless the whole run is inside the file and free.
    pub fn reserve(&mut self, start: usize, count: usize) -> Result<(), SectorError> {
        let total_sectors = self.total();

        if start + count > total_sectors {
            return Err(SectorError::OutOfFile {
                sector: start.max(total_sectors),
                total_sectors,
            });
        }

        if let Some(sector) = (start..start + count).find(|&index| self.used_sectors[index]) {
            return Err(SectorError::Overlap { sector });
        }

        for index in start..start + count {
            self.used_sectors.set(index, true);
        }

        Ok(())
    }

    /// Marks a run as free. Sectors past the end and header sectors are ignored.
    pub fn release(&mut self, start: usize, count: usize) {
        let end = (start + count).min(self.total());

        for index in start.max(HEADER_SECTORS)..end {
            self.used_sectors.set(index, false);
        }
    }

    /// Finds the lowest run of `count` free sectors and marks it used.
    ///
    /// Grows by exactly `count` sectors when no run is big enough; the caller
    /// must extend the underlying file to match.
    pub fn allocate(&mut self, count: usize) -> usize {
        let mut run_start = 0;
        let mut run_length = 0;

        if count > 0 {
            for index in 0..self.total() {
                // Sector occupied and we can't place the run here.
                if self.used_sectors[index] {
                    run_length = 0;
                    continue;
                }

                if run_length == 0 {
                    run_start = index;
                }

                run_length += 1;

                if run_length == count {
                    debug!(
                        target: "region-store",
                        "{} sectors can be placed in free gap from {} to {}",
                        count, run_start, index
                    );

                    for sector in run_start..run_start + count {
                        self.used_sectors.set(sector, true);
                    }

                    return run_start;
                }
            }
        }

        let start = self.total();

        debug!(
            target: "region-store",
            "No free gap of {} sectors, growing from {} sectors", count, start
        );

        for _ in 0..count {
            self.used_sectors.push(true);
        }

        start
    }

    pub fn is_free(&self, sector: usize) -> bool {
        sector < self.total() && !self.used_sectors[sector]
    }

    pub fn used(&self) -> usize {
        self.used_sectors.count_ones()
    }

    pub fn total(&self) -> usize {
        self.used_sectors.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SectorError;
    use crate::sector::SectorAllocator;

    #[test]
    fn test_only_header_used() {
        let sectors = SectorAllocator::new(8);

        assert_eq!(sectors.used(), 2);
        assert_eq!(sectors.total(), 8);
        assert!(!sectors.is_free(0));
        assert!(!sectors.is_free(1));
        assert!(sectors.is_free(2));
    }

    #[test]
    fn test_small_file_still_reserves_header() {
        let sectors = SectorAllocator::new(0);

        assert_eq!(sectors.total(), 2);
        assert_eq!(sectors.used(), 2);
    }

    #[test]
    fn test_reserve_overlap() {
        let mut sectors = SectorAllocator::new(10);

        sectors.reserve(3, 3).unwrap();

        assert_eq!(
            sectors.reserve(5, 2),
            Err(SectorError::Overlap { sector: 5 })
        );
        // Failed reservation leaves the run untouched.
        assert!(sectors.is_free(6));
        assert_eq!(
            sectors.reserve(1, 1),
            Err(SectorError::Overlap { sector: 1 })
        );
    }

    #[test]
    fn test_reserve_out_of_file() {
        let mut sectors = SectorAllocator::new(5);

        match sectors.reserve(3, 3) {
            Err(SectorError::OutOfFile { total_sectors, .. }) => assert_eq!(total_sectors, 5),
            result => panic!("Expected `OutOfFile` but got `{:?}`", result),
        }

        // Nothing was marked by the failed reservation.
        assert_eq!(sectors.used(), 2);

        sectors.reserve(3, 2).unwrap();
        assert_eq!(sectors.used(), 4);
        assert!(sectors.is_free(2));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut sectors = SectorAllocator::new(6);

        sectors.reserve(2, 3).unwrap();
        sectors.release(2, 3);
        sectors.release(2, 3);
        sectors.release(4, 10);

        assert_eq!(sectors.used(), 2);
    }

    #[test]
    fn test_release_keeps_header() {
        let mut sectors = SectorAllocator::new(4);

        sectors.release(0, 4);

        assert!(!sectors.is_free(0));
        assert!(!sectors.is_free(1));
    }

    #[test]
    fn test_allocate_first_fit() {
        let mut sectors = SectorAllocator::new(10);

        sectors.reserve(3, 1).unwrap();
        sectors.reserve(6, 1).unwrap();

        // Gap at 2 is too small for 2 sectors, gap at 4..6 is the first fit.
        assert_eq!(sectors.allocate(2), 4);
        assert_eq!(sectors.allocate(1), 2);
        assert_eq!(sectors.allocate(3), 7);
        assert_eq!(sectors.total(), 10);
        assert_eq!(sectors.used(), 10);
    }

    #[test]
    fn test_allocate_grows_by_count() {
        let mut sectors = SectorAllocator::new(4);

        sectors.reserve(2, 1).unwrap();

        // A single trailing free sector is not enough, so the file grows.
        assert_eq!(sectors.allocate(2), 4);
        assert_eq!(sectors.total(), 6);
        assert!(sectors.is_free(3));
        assert!(!sectors.is_free(4));
        assert!(!sectors.is_free(5));
    }
}
