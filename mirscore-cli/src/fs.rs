//! Buffered whole-file reading for record inputs.

use eyre::{Report, WrapErr};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads an entire file into a string through a buffered reader.
pub fn read_file_to_string(filepath: impl AsRef<Path>) -> Result<String, Report> {
    const BUF_SIZE: usize = 2 * 1024 * 1024;

    let filepath = filepath.as_ref();

    let file = File::open(filepath).wrap_err_with(|| format!("When opening file: {filepath:#?}"))?;
    let mut reader = BufReader::with_capacity(BUF_SIZE, file);

    let mut data = String::new();
    reader.read_to_string(&mut data).wrap_err_with(|| format!("When reading file: {filepath:#?}"))?;

    Ok(data)
}
