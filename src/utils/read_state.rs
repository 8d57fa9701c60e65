//! ReadState enum for representing BAM alignment states
//! Derived from the flag field of a record

use rust_htslib::bam;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alignment state of a read; six mapped possibilities + unmapped
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadState {
    #[default]
    /// Primary alignment to the reference strand
    #[serde(rename = "primary_forward")]
    PrimaryFwd,
    /// Primary alignment opposite the reference strand
    #[serde(rename = "primary_reverse")]
    PrimaryRev,
    /// Secondary alignment to the reference strand
    #[serde(rename = "secondary_forward")]
    SecondaryFwd,
    /// Secondary alignment opposite the reference strand
    #[serde(rename = "secondary_reverse")]
    SecondaryRev,
    /// Supplementary alignment to the reference strand
    #[serde(rename = "supplementary_forward")]
    SupplementaryFwd,
    /// Supplementary alignment opposite the reference strand
    #[serde(rename = "supplementary_reverse")]
    SupplementaryRev,
    /// Marked as unmapped in the BAM file. Strand is not
    /// reported for unmapped reads.
    #[serde(rename = "unmapped")]
    Unmapped,
}

impl ReadState {
    /// Whether the state is on the reverse strand. Unmapped reads are never reverse.
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        matches!(
            self,
            ReadState::PrimaryRev | ReadState::SecondaryRev | ReadState::SupplementaryRev
        )
    }
}

/// Classifies a record using its flags. Unmapped wins over everything
/// else, and supplementary wins over secondary as htslib tools do.
impl From<&bam::Record> for ReadState {
    fn from(record: &bam::Record) -> Self {
        match (
            record.is_unmapped(),
            record.is_supplementary(),
            record.is_secondary(),
            record.is_reverse(),
        ) {
            (true, _, _, _) => ReadState::Unmapped,
            (false, true, _, false) => ReadState::SupplementaryFwd,
            (false, true, _, true) => ReadState::SupplementaryRev,
            (false, false, true, false) => ReadState::SecondaryFwd,
            (false, false, true, true) => ReadState::SecondaryRev,
            (false, false, false, false) => ReadState::PrimaryFwd,
            (false, false, false, true) => ReadState::PrimaryRev,
        }
    }
}

/// Implements printing of read state
impl fmt::Display for ReadState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ReadState::PrimaryFwd => "primary_forward",
            ReadState::SecondaryFwd => "secondary_forward",
            ReadState::SupplementaryFwd => "supplementary_forward",
            ReadState::PrimaryRev => "primary_reverse",
            ReadState::SecondaryRev => "secondary_reverse",
            ReadState::SupplementaryRev => "supplementary_reverse",
            ReadState::Unmapped => "unmapped",
        };
        write!(f, "{printable}")
    }
}
