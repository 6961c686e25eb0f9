//! Variant records: tab-separated `(id, reference, alternative,
//! chromosome, strand, plus_strand_position)` rows.

use super::RecordParseError;
use crate::sequence::Strand;
use crate::variant::Variant;
use csv::ReaderBuilder;

const FIELD_COUNT: usize = 6;

fn parse_strand(field: &str) -> Result<Strand, RecordParseError> {
    match field {
        "1" => Ok(Strand::Plus),
        "-1" => Ok(Strand::Minus),
        other => Err(RecordParseError::MalformedStrand(other.to_string())),
    }
}

/// Parses a single tab-separated variant row.
pub fn parse_variant_record(line: &str) -> Result<Variant, RecordParseError> {
    let mut reader = ReaderBuilder::new().delimiter(b'\t').has_headers(false).from_reader(line.as_bytes());
    let record = reader.records().next().ok_or(RecordParseError::EmptyInput)?.map_err(|_| RecordParseError::MalformedVariantRecord(0))?;
    if record.len() != FIELD_COUNT {
        return Err(RecordParseError::MalformedVariantRecord(record.len()));
    }
    let id = &record[0];
    let reference = &record[1];
    let alternative = &record[2];
    let chromosome = &record[3];
    let strand = parse_strand(&record[4])?;
    let position = record[5].parse().map_err(|e| RecordParseError::MalformedPosition(record[5].to_string(), e))?;

    Ok(Variant::new(id, chromosome, position, strand, reference, alternative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_well_formed_row() {
        let variant = parse_variant_record("v1\tG\tC\tchr1\t1\t500").unwrap();
        assert_eq!(variant.id(), "v1");
        assert_eq!(variant.chromosome(), "chr1");
        assert_eq!(variant.anchor(), 500);
    }

    #[test]
    fn wrong_field_count_is_an_error() {
        let err = parse_variant_record("v1\tG\tC\tchr1\t1");
        assert!(matches!(err, Err(RecordParseError::MalformedVariantRecord(5))));
    }

    #[test]
    fn bad_strand_is_an_error() {
        let err = parse_variant_record("v1\tG\tC\tchr1\t2\t500");
        assert!(matches!(err, Err(RecordParseError::MalformedStrand(_))));
    }
}
