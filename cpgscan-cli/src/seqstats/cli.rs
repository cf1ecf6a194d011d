use clap::{Command, arg};

pub const SEQSTATS_CMD: &str = "seqstats";

pub fn create_seqstats_cli() -> Command {
    Command::new(SEQSTATS_CMD)
        .about("Compute base composition and CpG statistics for every sequence of a FASTA file.")
        .arg(
            arg!(--input <INPUT>)
                .required(true)
                .help("FASTA file, or a directory of FASTA files"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(true)
                .help("Output CSV (or directory of CSVs when the input is a directory)"),
        )
}
