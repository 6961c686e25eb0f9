//! Sequence records: `>ID|exon_starts|exon_ends|strand|chromosome` headers
//! followed by one or more body lines.

use super::RecordParseError;
use crate::conservation::ConservationTable;
use crate::nucleotide::ChromosomePosition;
use crate::sequence::{SplicedSequence, Strand};

fn parse_positions(field: &str) -> Result<Vec<ChromosomePosition>, RecordParseError> {
    field
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|e| RecordParseError::MalformedPosition(s.to_string(), e)))
        .collect()
}

fn parse_strand(field: &str) -> Result<Strand, RecordParseError> {
    match field {
        "1" => Ok(Strand::Plus),
        "-1" => Ok(Strand::Minus),
        other => Err(RecordParseError::MalformedStrand(other.to_string())),
    }
}

/// Parses one sequence record. The ID field may itself contain `|`
/// characters: the header is split from the right into its four trailing
/// fields (`exon_starts`, `exon_ends`, `strand`, `chromosome`) and whatever
/// remains is the ID, pipes included.
pub fn parse_sequence_record(text: &str, conservation: &ConservationTable) -> Result<SplicedSequence, RecordParseError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(RecordParseError::MissingHeader)?;
    let header = header.strip_prefix('>').ok_or(RecordParseError::MissingHeader)?;

    let fields: Vec<&str> = header.split('|').collect();
    if fields.len() < 5 {
        return Err(RecordParseError::MalformedHeader(fields.len()));
    }
    let chromosome = fields[fields.len() - 1];
    let strand = parse_strand(fields[fields.len() - 2])?;
    let exon_ends = parse_positions(fields[fields.len() - 3])?;
    let exon_starts = parse_positions(fields[fields.len() - 4])?;
    let id = fields[..fields.len() - 4].join("|");

    let body: String = lines.collect();
    Ok(SplicedSequence::new(id, &body, chromosome, strand, &exon_starts, &exon_ends, conservation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plus_strand_header() {
        let record = ">tx1|1,20|10,29|1|chr1\nAAAAAAAAAA";
        let seq = parse_sequence_record(record, &ConservationTable::empty()).unwrap();
        assert_eq!(seq.id(), "tx1");
        assert_eq!(seq.chromosome(), "chr1");
        assert_eq!(seq.strand(), Strand::Plus);
        assert_eq!(seq.total_length(), 20);
    }

    #[test]
    fn id_with_embedded_pipes_is_preserved() {
        let record = ">gene|tx1|1|10|1|chr1\nAAAAAAAAAA";
        let seq = parse_sequence_record(record, &ConservationTable::empty()).unwrap();
        assert_eq!(seq.id(), "gene|tx1");
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = parse_sequence_record("AAAA", &ConservationTable::empty());
        assert!(matches!(err, Err(RecordParseError::MissingHeader)));
    }

    #[test]
    fn too_few_header_fields_is_an_error() {
        let err = parse_sequence_record(">tx1|1|10\nAAAA", &ConservationTable::empty());
        assert!(matches!(err, Err(RecordParseError::MalformedHeader(3))));
    }
}
