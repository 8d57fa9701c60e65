//! Utils module providing shared datatypes for bamscan
//! Includes genomic coordinates, region inputs, and BAM-related types

pub mod genomic_region;
pub mod intersects;
pub mod interval;
pub mod read_state;
pub mod region_set;

// Re-export public utility types and functions to expose the utils API
pub use genomic_region::*;
pub use intersects::*;
pub use interval::*;
pub use read_state::*;
pub use region_set::*;
