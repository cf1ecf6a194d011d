use clap::{Arg, Command, arg};

pub const MOTIF_CMD: &str = "motif";

pub fn create_motif_cli() -> Command {
    Command::new(MOTIF_CMD)
        .about("Locate a motif in aligned genomes and tabulate how often each position carries it.")
        .arg(
            arg!(--config <CONFIG>)
                .required(false)
                .help("TOML file describing the alignment, reference map and motif runs"),
        )
        .arg(
            arg!(--alignment <ALIGNMENT>)
                .required(false)
                .conflicts_with("config")
                .help("Two-line alignment FASTA (plain or .gz)"),
        )
        .arg(
            Arg::new("reference-map")
                .long("reference-map")
                .required(false)
                .conflicts_with("config")
                .help("CSV mapping alignment indices to reference coordinates"),
        )
        .arg(
            arg!(--accessions <ACCESSIONS>)
                .required(false)
                .conflicts_with("config")
                .help("Accession IDs to keep, one per line"),
        )
        .arg(
            arg!(--motif <MOTIF>)
                .required(false)
                .conflicts_with_all(["config", "zap"])
                .help("Motif pattern, e.g. CG or CN{4}GNCG"),
        )
        .arg(
            arg!(--zap <SPACER>)
                .required(false)
                .conflicts_with("config")
                .help("Spacer length m of the ZAP-binding motif C n{m} G n C G"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .conflicts_with("config")
                .help("Path of the frequency table to write"),
        )
}
