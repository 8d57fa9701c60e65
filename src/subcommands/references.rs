//! # Lists the references of a BAM file
//!
//! Writes one line per reference with its name and length, in header order.

use crate::{Error, Reference};
use std::io;

/// Writes `name<TAB>length` per reference
///
/// ```
/// use bamscan_core::{Reference, references};
///
/// let refs = vec![
///     Reference { name: "chrI".to_string(), length: 1000 },
///     Reference { name: "chrII".to_string(), length: 2000 },
/// ];
/// let mut output = Vec::new();
/// references::run(&mut output, &refs)?;
/// assert_eq!(String::from_utf8(output).expect("utf8"), "chrI\t1000\nchrII\t2000\n");
/// # Ok::<(), bamscan_core::Error>(())
/// ```
///
/// # Errors
/// Returns an error if writing to the output handle fails.
pub fn run<W: io::Write>(handle: &mut W, references: &[Reference]) -> Result<(), Error> {
    for reference in references {
        writeln!(handle, "{}\t{}", reference.name, reference.length)?;
    }
    Ok(())
}
