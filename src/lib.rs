//! # bamscan
//!
//! Region-restricted scanning of indexed BAM files. Open a file with its
//! index, ask for the records overlapping a region or a set of regions,
//! decide per record whether it is well mapped, and pull a compact summary
//! (fragment length and strand) out of the records that are.
//!
//! ```no_run
//! use bamscan_core::{AlignmentFile, AlignmentRecord, LengthMode, MappingFilter, RegionSet};
//!
//! let mut file = AlignmentFile::open("reads.bam", "reads.bam.bai")?;
//! let regions: RegionSet = [(0, 1000, 2000), (1, 0, 500)].into_iter().collect();
//! let filter = MappingFilter { min_mapq: 20, require_proper_pair: false };
//!
//! let mut iter = file.iter_regions(&regions)?;
//! let mut record = AlignmentRecord::new();
//! while let Some(data) = iter.next_well_mapped(&mut record, &filter, LengthMode::Aligned) {
//!     println!("{}", data?);
//! }
//! # Ok::<(), bamscan_core::Error>(())
//! ```

// Declare the modules.
pub mod alignment_file;
pub mod alignment_record;
pub mod cli;
pub mod commands;
pub mod error;
pub mod region_iterator;
pub mod subcommands;
pub mod utils;

// Re-exports
pub use alignment_file::{AlignmentFile, Reference};
pub use alignment_record::{AlignData, AlignmentRecord, LengthMode};
pub use cli::{InputBam, MappingFilter, OutputFormat};
pub use error::Error;
pub use region_iterator::RegionIterator;
pub use subcommands::{extract, references};
pub use utils::*;
