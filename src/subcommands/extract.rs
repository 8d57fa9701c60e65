//! # Extracts summaries of well-mapped reads
//!
//! Scans records, keeps the well-mapped ones, and writes the fragment length
//! and strand of each along with its read id, contig, start, and alignment
//! type. Output is either a tab-separated table or one JSON object per line.

use crate::{AlignData, AlignmentRecord, Error, LengthMode, MappingFilter, OutputFormat, ReadState};
use serde::Serialize;
use std::io;

/// One output line. Field names are the TSV column names.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    read_id: &'a str,
    contig: &'a str,
    start: u64,
    alignment_type: ReadState,
    frag_len: u64,
    strand: char,
}

impl SummaryRow<'_> {
    const TSV_HEADER: &'static str = "read_id\tcontig\tstart\talignment_type\tfrag_len\tstrand";

    fn write_tsv<W: io::Write>(&self, handle: &mut W) -> Result<(), Error> {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.read_id, self.contig, self.start, self.alignment_type, self.frag_len, self.strand
        )?;
        Ok(())
    }
}

/// Writes one summary per well-mapped record, returning how many were written.
///
/// `contigs` are the reference names of the file, indexed by reference id.
///
/// # Errors
/// Returns the first error met while reading records, classifying them, or
/// writing to the output handle.
pub fn run<W, D>(
    handle: &mut W,
    contigs: &[String],
    records: D,
    filter: &MappingFilter,
    mode: LengthMode,
    format: OutputFormat,
) -> Result<usize, Error>
where
    W: io::Write,
    D: IntoIterator<Item = Result<AlignmentRecord, Error>>,
{
    if format == OutputFormat::Tsv {
        writeln!(handle, "{}", SummaryRow::TSV_HEADER)?;
    }

    let mut count = 0;
    let mut data = AlignData::default();
    for k in records {
        let record = k?;
        if !record.passes(filter)? {
            continue;
        }
        record.extract_data_with(mode, &mut data)?;

        let tid = record.contig_id()?.ok_or(Error::Unmapped)?;
        let contig = contigs
            .get(usize::try_from(tid)?)
            .ok_or_else(|| Error::HeaderError(format!("reference id {tid} not in header")))?;
        let row = SummaryRow {
            read_id: record.read_id()?,
            contig,
            start: record.start()?.ok_or(Error::Unmapped)?,
            alignment_type: record.read_state()?,
            frag_len: data.len,
            strand: if data.is_reverse { '-' } else { '+' },
        };
        match format {
            OutputFormat::Tsv => row.write_tsv(handle)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *handle, &row)?;
                writeln!(handle)?;
            }
        }
        count += 1;
    }
    Ok(count)
}
