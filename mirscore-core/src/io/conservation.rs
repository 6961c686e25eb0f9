//! Conservation-range TSV: `chromosome \t start \t score`, one range per
//! line. Malformed or out-of-order rows are skipped with
//! a warning by [`ConservationTable::from_rows`] -- there is no hard-parse
//! failure case here, only the recoverable policy already implemented there.

use crate::conservation::ConservationTable;
use csv::ReaderBuilder;
use log::warn;
use std::io;
use std::path::Path;

/// Parses conservation ranges from `text`, skipping (and logging) rows that
/// don't have exactly three columns or whose score doesn't parse as a float.
#[must_use]
pub fn parse_tsv(text: &str) -> ConservationTable {
    let mut reader = ReaderBuilder::new().delimiter(b'\t').has_headers(false).flexible(true).from_reader(text.as_bytes());
    let rows = reader.records().filter_map(|record| {
        let record = record.ok()?;
        if record.len() != 3 {
            warn!("conservation tsv: row with {} columns -- skipping", record.len());
            return None;
        }
        let chromosome = record[0].to_string();
        let Ok(start) = record[1].parse() else {
            warn!("conservation tsv: unparseable start position {:?} -- skipping", &record[1]);
            return None;
        };
        let Ok(score) = record[2].parse() else {
            warn!("conservation tsv: unparseable score {:?} -- skipping", &record[2]);
            return None;
        };
        Some((chromosome, start, score))
    });
    ConservationTable::from_rows(rows)
}

/// Reads and parses a conservation TSV file.
pub fn from_path(path: impl AsRef<Path>) -> io::Result<ConservationTable> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_tsv(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_well_formed_rows() {
        let table = parse_tsv("chr1\t1\t0.1\nchr1\t100\t0.5\n");
        assert_eq!(table.score_at("chr1", 50), 0.1);
        assert_eq!(table.score_at("chr1", 150), 0.5);
    }

    #[test]
    fn skips_malformed_rows() {
        let table = parse_tsv("chr1\t1\t0.1\nchr1\tnot-a-number\t0.5\nchr1\t200\t0.9\n");
        assert_eq!(table.score_at("chr1", 200), 0.9);
    }
}
