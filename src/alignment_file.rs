//! # AlignmentFile
//!
//! Opens a BAM file together with its pre-built index and keeps the
//! reference list from the header. The open is staged so that every kind of
//! failure is reported as exactly one error kind: a file that is not a BAM
//! container is an `OpenError`, a header we cannot use is a `HeaderError`,
//! and an index that is missing, unreadable, or describes more references
//! than the header is an `IndexError`.
//!
//! Iterators borrow the file mutably, so a file cannot be closed or dropped
//! while one of its iterators is alive.

use crate::{Error, RawRegion, RegionIterator, RegionSet};
use rust_htslib::bam::{self, Read as _};
use rust_htslib::bgzf;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Read as _};
use std::path::{Path, PathBuf};

const BAM_MAGIC: [u8; 4] = *b"BAM\x01";
const BAI_MAGIC: [u8; 4] = *b"BAI\x01";
const CSI_MAGIC: [u8; 4] = *b"CSI\x01";

/// One reference sequence (e.g. a chromosome) from the header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Name, unique within the file
    pub name: String,
    /// Length in bases
    pub length: u64,
}

/// An open BAM file with its index and header.
pub struct AlignmentFile {
    reader: Option<bam::IndexedReader>,
    references: Vec<Reference>,
    path: PathBuf,
    index_path: PathBuf,
}

impl fmt::Debug for AlignmentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignmentFile")
            .field("path", &self.path)
            .field("index_path", &self.index_path)
            .field("is_open", &self.is_open())
            .field("references", &self.references)
            .finish()
    }
}

impl AlignmentFile {
    /// Opens a BAM file with an explicitly supplied index (BAI or CSI).
    ///
    /// # Errors
    /// `OpenError` if the file cannot be read or is not BAM, `HeaderError`
    /// if its header cannot be used, `IndexError` if the index cannot be
    /// loaded or does not match the header.
    ///
    /// ```no_run
    /// use bamscan_core::AlignmentFile;
    /// let file = AlignmentFile::open("reads.bam", "reads.bam.bai")?;
    /// for (name, len) in file.reference_names().iter().zip(file.reference_lengths()) {
    ///     println!("{name}\t{len}");
    /// }
    /// # Ok::<(), bamscan_core::Error>(())
    /// ```
    pub fn open<P, Q>(path: P, index_path: Q) -> Result<Self, Error>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let path = path.as_ref();
        let index_path = index_path.as_ref();
        log::debug!(
            "opening {} with index {}",
            path.display(),
            index_path.display()
        );

        check_bam_magic(path)?;

        let references = {
            let plain_reader = bam::Reader::from_path(path)
                .map_err(|e| Error::HeaderError(format!("{}: {e}", path.display())))?;
            let header = plain_reader.header();
            parse_references(
                header.target_names(),
                (0..header.target_count()).map(|tid| header.target_len(tid)),
            )?
        };

        check_index_references(index_path, references.len())?;

        let reader = bam::IndexedReader::from_path_and_index(path, index_path).map_err(|e| {
            Error::IndexError {
                path: index_path.display().to_string(),
                msg: e.to_string(),
            }
        })?;

        log::debug!(
            "opened {} with {} references",
            path.display(),
            references.len()
        );
        Ok(AlignmentFile {
            reader: Some(reader),
            references,
            path: path.to_path_buf(),
            index_path: index_path.to_path_buf(),
        })
    }

    /// Opens a BAM file using the index at `<path>.bai`.
    ///
    /// # Errors
    /// Same as [`AlignmentFile::open`].
    pub fn open_default<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut index_path = path.as_os_str().to_owned();
        index_path.push(".bai");
        AlignmentFile::open(path, PathBuf::from(index_path))
    }

    /// References in header order
    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }
    /// Reference names in header order
    #[must_use]
    pub fn reference_names(&self) -> Vec<&str> {
        self.references.iter().map(|r| r.name.as_str()).collect()
    }
    /// Reference lengths, parallel to `reference_names`
    #[must_use]
    pub fn reference_lengths(&self) -> Vec<u64> {
        self.references.iter().map(|r| r.length).collect()
    }
    /// Numeric id of a reference name
    #[must_use]
    pub fn tid(&self, name: &str) -> Option<u32> {
        self.references
            .iter()
            .position(|r| r.name == name)
            .and_then(|i| u32::try_from(i).ok())
    }
    /// Path of the BAM file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Path of the index
    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
    /// Whether the file handle, index and header are still held
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Releases the file handle, index and header. Calling it again is a
    /// no-op. The reference list stays readable.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            log::debug!("released {}", self.path.display());
        }
    }

    /// Scans every record in the file, unmapped ones included.
    ///
    /// # Errors
    /// `PreconditionError` if the file was closed, `SeekError` if the
    /// index cannot position the reader.
    pub fn iter_all(&mut self) -> Result<RegionIterator<'_>, Error> {
        RegionIterator::whole_file(self)
    }

    /// Scans records overlapping one half-open interval `[start, end)`.
    ///
    /// # Errors
    /// `PreconditionError` if the file was closed, `SeekError` if the
    /// reference id is unknown or the coordinates are out of bounds.
    pub fn iter_region(&mut self, tid: i32, start: i64, end: i64) -> Result<RegionIterator<'_>, Error> {
        let regions: RegionSet = [RawRegion { tid, start, end }].into_iter().collect();
        RegionIterator::over_regions(self, &regions)
    }

    /// Scans records overlapping any region of a set, in one ordered pass.
    ///
    /// # Errors
    /// `PreconditionError` if the file was closed, `SeekError` if any
    /// region cannot be looked up.
    pub fn iter_regions(&mut self, regions: &RegionSet) -> Result<RegionIterator<'_>, Error> {
        RegionIterator::over_regions(self, regions)
    }

    pub(crate) fn reader_mut(&mut self) -> Result<&mut bam::IndexedReader, Error> {
        self.reader.as_mut().ok_or_else(|| {
            Error::PreconditionError(format!(
                "alignment file {} has been released",
                self.path.display()
            ))
        })
    }
}

/// Builds the reference list, requiring UTF-8 unique names and a length
/// for every reference.
fn parse_references<'a, I, J>(names: I, lengths: J) -> Result<Vec<Reference>, Error>
where
    I: IntoIterator<Item = &'a [u8]>,
    J: IntoIterator<Item = Option<u64>>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .zip(lengths)
        .enumerate()
        .map(|(tid, (name, length))| {
            let name = String::from_utf8(name.to_vec()).map_err(|_| {
                Error::HeaderError(format!("reference {tid} has a name that is not UTF-8"))
            })?;
            let length = length
                .ok_or_else(|| Error::HeaderError(format!("reference '{name}' has no length")))?;
            if !seen.insert(name.clone()) {
                return Err(Error::HeaderError(format!(
                    "reference '{name}' appears more than once"
                )));
            }
            Ok(Reference { name, length })
        })
        .collect()
}

/// The file must decompress to the BAM magic number.
fn check_bam_magic(path: &Path) -> Result<(), Error> {
    let open_error = |msg: String| Error::OpenError {
        path: path.display().to_string(),
        msg,
    };
    let mut reader = bgzf::Reader::from_path(path).map_err(|e| open_error(e.to_string()))?;
    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|e| open_error(e.to_string()))?;
    if magic == BAM_MAGIC {
        Ok(())
    } else {
        Err(open_error("not a BAM file (bad magic number)".to_string()))
    }
}

/// Reads the reference count from a BAI or CSI index header and checks it
/// against the BAM header. An index may describe fewer references than the
/// header (trailing references without reads), never more.
fn check_index_references(index_path: &Path, header_references: usize) -> Result<(), Error> {
    let index_error = |msg: String| Error::IndexError {
        path: index_path.display().to_string(),
        msg,
    };
    let mut reader =
        bgzf::Reader::from_path(index_path).map_err(|e| index_error(e.to_string()))?;
    let index_references = read_index_reference_count(&mut reader)
        .map_err(|e| index_error(e.to_string()))?
        .ok_or_else(|| index_error("neither a BAI nor a CSI index".to_string()))?;
    let index_references = usize::try_from(index_references)
        .map_err(|_| index_error("negative reference count".to_string()))?;
    if index_references > header_references {
        return Err(index_error(format!(
            "index describes {index_references} references but the header has {header_references}"
        )));
    }
    Ok(())
}

/// `Ok(None)` if the magic number is not a known index format
fn read_index_reference_count<R: io::Read>(reader: &mut R) -> io::Result<Option<i32>> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    match magic {
        BAI_MAGIC => read_le_i32(reader).map(Some),
        CSI_MAGIC => {
            let _min_shift = read_le_i32(reader)?;
            let _depth = read_le_i32(reader)?;
            let l_aux = u64::try_from(read_le_i32(reader)?)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "negative aux length"))?;
            let skipped = io::copy(&mut reader.by_ref().take(l_aux), &mut io::sink())?;
            if skipped != l_aux {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "truncated CSI header",
                ));
            }
            read_le_i32(reader).map(Some)
        }
        _ => Ok(None),
    }
}

fn read_le_i32<R: io::Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}
