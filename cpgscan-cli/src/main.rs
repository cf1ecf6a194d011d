mod motif;
mod seqstats;
mod timeseries;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "cpgscan";
    pub const BIN_NAME: &str = "cpgscan";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("CpG and ZAP-binding motif analysis of large viral genome collections.")
        .subcommand_required(true)
        .subcommand(motif::cli::create_motif_cli())
        .subcommand(seqstats::cli::create_seqstats_cli())
        .subcommand(timeseries::cli::create_timeseries_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // MOTIF LOCATOR
        //
        Some((motif::cli::MOTIF_CMD, matches)) => {
            motif::handlers::run_motif(matches)?;
        }

        //
        // SEQUENCE STATISTICS
        //
        Some((seqstats::cli::SEQSTATS_CMD, matches)) => {
            seqstats::handlers::run_seqstats(matches)?;
        }

        //
        // TIME-SERIES CORRELATION
        //
        Some((timeseries::cli::TIMESERIES_CMD, matches)) => {
            timeseries::handlers::run_timeseries(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        build_parser().debug_assert();
    }
}
