mod cli;
mod fs;
mod logging;
mod predictor;

use crate::predictor::ProcessStructurePredictor;
use eyre::{Context, Report};
use mirscore_core::io::{conservation, fasta, variant};
use mirscore_core::ConservationTable;

fn main() -> Result<(), Report> {
    let args = cli::parse_cli_args();
    logging::setup_logger(&args.verbose, args.verbosity, args.silent);

    let conservation_table = match &args.conservation {
        Some(path) => {
            let text = fs::read_file_to_string(path)?;
            conservation::parse_tsv(&text)
        }
        None => ConservationTable::empty(),
    };

    let mirna_text = fs::read_file_to_string(&args.mirna)?;
    let mirna = fasta::parse_sequence_record(&mirna_text, &conservation_table)
        .wrap_err_with(|| format!("When parsing miRNA sequence record from {:#?}", args.mirna))?;

    let mrna_text = fs::read_file_to_string(&args.mrna)?;
    let mrna = fasta::parse_sequence_record(&mrna_text, &conservation_table)
        .wrap_err_with(|| format!("When parsing mRNA sequence record from {:#?}", args.mrna))?;

    let variant_text = fs::read_file_to_string(&args.variant)?;
    let variant_record = variant::parse_variant_record(variant_text.trim_end())
        .wrap_err_with(|| format!("When parsing variant record from {:#?}", args.variant))?;

    let predictor = ProcessStructurePredictor::new(args.predictor.clone());

    let score = mirscore_core::deregulation_score(&mirna, &mrna, &variant_record, args.predicted_position, &predictor)
        .wrap_err("When computing deregulation score")?;

    println!("{score}");

    Ok(())
}
