//! Shared fixtures: small indexed BAM files written to the temp directory
#![allow(dead_code)]

use rust_htslib::bam;
use rust_htslib::bam::record::{Cigar, CigarString};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

pub const PAIRED: u16 = 0x1;
pub const PROPER_PAIR: u16 = 0x2;
pub const UNMAPPED: u16 = 0x4;
pub const REVERSE: u16 = 0x10;
pub const SECONDARY: u16 = 0x100;

/// BAM file and index in the temp directory, removed on drop
#[derive(Debug)]
pub struct TempBam {
    pub bam: PathBuf,
    pub index: PathBuf,
}

impl Drop for TempBam {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.bam);
        let _ = fs::remove_file(&self.index);
    }
}

/// Writes reads, which must already be in coordinate order, with the given
/// contigs in the header, and builds a BAI index at `<bam>.bai`.
pub fn write_indexed_bam(contigs: &[(&str, u64)], reads: Vec<bam::Record>) -> TempBam {
    write_bam(contigs, reads, bam::index::Type::Bai, "bai")
}

/// Same as `write_indexed_bam`, but builds a CSI index at `<bam>.csi`
pub fn write_csi_indexed_bam(contigs: &[(&str, u64)], reads: Vec<bam::Record>) -> TempBam {
    write_bam(contigs, reads, bam::index::Type::Csi(14), "csi")
}

fn write_bam(
    contigs: &[(&str, u64)],
    reads: Vec<bam::Record>,
    index_type: bam::index::Type,
    index_ext: &str,
) -> TempBam {
    let bam_path = std::env::temp_dir().join(format!("{}.bam", Uuid::new_v4()));
    let index_path = PathBuf::from(format!("{}.{index_ext}", bam_path.display()));
    let temp = TempBam {
        bam: bam_path,
        index: index_path,
    };

    let header = {
        let mut header = bam::Header::new();
        for (name, length) in contigs {
            let _: &mut _ = header.push_record(
                bam::header::HeaderRecord::new(b"SQ")
                    .push_tag(b"SN", name)
                    .push_tag(b"LN", length),
            );
        }
        header
    };

    {
        let mut writer =
            bam::Writer::from_path(&temp.bam, &header, bam::Format::Bam).expect("no error");
        let mut prev_key = (false, -1, -1);
        for read in reads {
            let key = (read.tid() < 0, read.tid(), read.pos());
            assert!(prev_key <= key, "fixture reads must be coordinate sorted");
            prev_key = key;
            writer.write(&read).expect("no error");
        }
    }

    bam::index::build(
        temp.bam.as_path(),
        Some(temp.index.as_path()),
        index_type,
        1,
    )
    .expect("no error");
    temp
}

/// Placed record with the given cigar; sequence length matches the cigar
pub fn mapped(name: &str, tid: i32, pos: i64, cigar: Vec<Cigar>, flags: u16, mapq: u8) -> bam::Record {
    let query_len: usize = cigar
        .iter()
        .map(|op| match op {
            Cigar::Match(n) | Cigar::Ins(n) | Cigar::SoftClip(n) | Cigar::Equal(n) | Cigar::Diff(n) => {
                *n as usize
            }
            _ => 0,
        })
        .sum();
    let mut record = bam::Record::new();
    record.set(
        name.as_bytes(),
        Some(&CigarString(cigar)),
        &vec![b'A'; query_len],
        &vec![30; query_len],
    );
    record.set_flags(flags);
    record.set_tid(tid);
    record.set_pos(pos);
    record.set_mapq(mapq);
    record.set_mtid(-1);
    record.set_mpos(-1);
    record
}

/// Unmapped record, placed at `tid`/`pos` or unplaced with `-1`/`-1`
pub fn unmapped(name: &str, tid: i32, pos: i64) -> bam::Record {
    let mut record = bam::Record::new();
    record.set(name.as_bytes(), None, b"ACGTACGT", &[30; 8]);
    record.set_flags(UNMAPPED);
    record.set_tid(tid);
    record.set_pos(pos);
    record.set_mapq(0);
    record.set_mtid(-1);
    record.set_mpos(-1);
    record
}

pub const CONTIGS: [(&str, u64); 2] = [("chrI", 10_000), ("chrII", 5_000)];

/// Reads on two contigs plus placed and unplaced unmapped reads:
///
/// | name      | contig | span        | notes                    |
/// |-----------|--------|-------------|--------------------------|
/// | a         | chrI   | 90-150      | mapq 60                  |
/// | b         | chrI   | 150-200     | mapq 60, reverse         |
/// | c         | chrI   | 200-300     | mapq 60                  |
/// | d         | chrI   | 250         | unmapped, placed         |
/// | e         | chrI   | 950-1050    | mapq 5                   |
/// | f         | chrI   | 1500-1510   | secondary, 2S5M2I3M2D    |
/// | g         | chrI   | 1999-2009   | mapq 60                  |
/// | h         | chrI   | 2000-2010   | mapq 60                  |
/// | i         | chrII  | 100-150     | proper pair, TLEN -300   |
/// | u         | -      | -           | unmapped, unplaced       |
pub fn standard_reads() -> Vec<bam::Record> {
    let mut i = mapped(
        "i",
        1,
        100,
        vec![Cigar::Match(50)],
        PAIRED | PROPER_PAIR | REVERSE,
        60,
    );
    i.set_mtid(1);
    i.set_mpos(350);
    i.set_insert_size(-300);
    vec![
        mapped("a", 0, 90, vec![Cigar::Match(60)], 0, 60),
        mapped("b", 0, 150, vec![Cigar::Match(50)], REVERSE, 60),
        mapped("c", 0, 200, vec![Cigar::Match(100)], 0, 60),
        unmapped("d", 0, 250),
        mapped("e", 0, 950, vec![Cigar::Match(100)], 0, 5),
        mapped(
            "f",
            0,
            1500,
            vec![
                Cigar::SoftClip(2),
                Cigar::Match(5),
                Cigar::Ins(2),
                Cigar::Match(3),
                Cigar::Del(2),
            ],
            SECONDARY,
            60,
        ),
        mapped("g", 0, 1999, vec![Cigar::Match(10)], 0, 60),
        mapped("h", 0, 2000, vec![Cigar::Match(10)], 0, 60),
        i,
        unmapped("u", -1, -1),
    ]
}

pub fn standard_bam() -> TempBam {
    write_indexed_bam(&CONTIGS, standard_reads())
}

/// Offsets of the BGZF blocks of a file, the trailing empty block included.
/// BSIZE (total block size minus one) sits at byte 16 of each block header.
pub fn bgzf_block_starts(bytes: &[u8]) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut offset = 0;
    while offset + 18 <= bytes.len() {
        assert_eq!(bytes[offset..offset + 4], [31, 139, 8, 4], "not a BGZF block");
        starts.push(offset);
        offset += usize::from(u16::from_le_bytes([bytes[offset + 16], bytes[offset + 17]])) + 1;
    }
    assert_eq!(offset, bytes.len(), "trailing bytes after last block");
    starts
}

/// Many reads on one contig, enough to fill several BGZF blocks.
/// The index is built before `cut_in_middle_block` truncates the file.
pub fn multi_block_bam(count: i64) -> TempBam {
    let reads = (0..count)
        .map(|k| mapped(&format!("read{k}"), 0, k * 3, vec![Cigar::Match(50)], 0, 60))
        .collect();
    write_indexed_bam(&[("chrI", 100_000)], reads)
}

/// Cuts the BAM file a few bytes into a block halfway through the file, so
/// the records before it still decode and the block itself cannot be read.
/// Returns the number of blocks the file had.
pub fn cut_in_middle_block(temp: &TempBam) -> usize {
    let bytes = fs::read(&temp.bam).expect("no error");
    let starts = bgzf_block_starts(&bytes);
    let middle = starts[starts.len() / 2];
    fs::write(&temp.bam, &bytes[..middle + 30]).expect("no error");
    starts.len()
}
