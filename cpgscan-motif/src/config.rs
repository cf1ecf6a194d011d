use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CPG_OUT, DEFAULT_ZAP_SPACERS, default_zap_out};
use crate::errors::{MotifError, MotifResult};
use crate::pattern::{MotifPattern, build_motif_pattern};

///
/// One motif to scan for. Exactly one of `motif` (pattern grammar, e.g. `CG`) or `zap`
/// (ZAP-binding motif spacer length) must be set.
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct MotifRun {
    pub motif: Option<String>,
    pub zap: Option<usize>,
    pub output: Option<String>,
}

impl MotifRun {
    pub fn cpg() -> Self {
        MotifRun {
            motif: Some(MotifPattern::cpg().to_string()),
            zap: None,
            output: Some(DEFAULT_CPG_OUT.to_string()),
        }
    }

    pub fn zap(m: usize) -> Self {
        MotifRun {
            motif: None,
            zap: Some(m),
            output: Some(default_zap_out(m)),
        }
    }

    pub fn pattern(&self) -> MotifResult<MotifPattern> {
        match (&self.motif, self.zap) {
            (Some(motif), None) => motif.parse(),
            (None, Some(m)) => Ok(build_motif_pattern(m)),
            _ => Err(MotifError::InvalidRunConfig(
                "each run needs exactly one of `motif` or `zap`".to_string(),
            )),
        }
    }

    ///
    /// File name of the frequency table for this run. ZAP runs and the CpG baseline have
    /// defaults, any other motif needs an explicit `output`.
    ///
    pub fn output_name(&self) -> MotifResult<String> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }
        if let Some(m) = self.zap {
            return Ok(default_zap_out(m));
        }
        if self.pattern()? == MotifPattern::cpg() {
            return Ok(DEFAULT_CPG_OUT.to_string());
        }
        Err(MotifError::InvalidRunConfig(format!(
            "run for motif `{}` has no output file name",
            self.motif.as_deref().unwrap_or_default()
        )))
    }
}

///
/// The CpG baseline followed by every default ZAP-binding motif.
///
pub fn default_runs() -> Vec<MotifRun> {
    std::iter::once(MotifRun::cpg())
        .chain(DEFAULT_ZAP_SPACERS.iter().map(|&m| MotifRun::zap(m)))
        .collect()
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct MotifRunConfig {
    pub alignment: PathBuf,
    pub reference_map: PathBuf,
    pub accessions: Option<PathBuf>,
    pub output_dir: PathBuf,
    #[serde(default = "default_runs")]
    pub runs: Vec<MotifRun>,
}

impl MotifRunConfig {
    fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.alignment = resolve(self.alignment);
        self.reference_map = resolve(self.reference_map);
        self.accessions = self.accessions.map(resolve);
        self.output_dir = resolve(self.output_dir);
        self
    }
}

impl TryFrom<&Path> for MotifRunConfig {
    type Error = MotifError;

    ///
    /// Load a run configuration from a TOML file. Relative paths inside the file are taken
    /// relative to the directory holding the file.
    ///
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: MotifRunConfig = toml::from_str(&toml_str)?;

        if config.runs.is_empty() {
            return Err(MotifError::InvalidRunConfig(
                "at least one run is required".to_string(),
            ));
        }

        let base = path.parent().unwrap_or(Path::new(""));
        Ok(config.resolve_paths(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn get_test_path(file_name: &str) -> PathBuf {
        PathBuf::from("../tests/data/motif").join(file_name)
    }

    #[rstest]
    fn test_try_from_toml() {
        let path = get_test_path("runs.toml");
        let config = MotifRunConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.alignment, get_test_path("alignment.fasta"));
        assert_eq!(config.accessions, Some(get_test_path("accession_ids.txt")));
        assert_eq!(config.runs.len(), 2);
        assert_eq!(config.runs[1].pattern().unwrap(), build_motif_pattern(4));
    }

    #[rstest]
    fn test_runs_default_to_cpg_and_zap_family() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.toml");
        std::fs::write(
            &path,
            "alignment = \"msa.fasta\"\nreference_map = \"mapping.csv\"\noutput_dir = \"csv_files\"\n",
        )
        .unwrap();

        let config = MotifRunConfig::try_from(path.as_path()).unwrap();
        let outputs: Vec<String> = config
            .runs
            .iter()
            .map(|r| r.output_name().unwrap())
            .collect();

        assert_eq!(config.runs.len(), 6);
        assert_eq!(outputs[0], "counter_file_cpg.csv");
        assert_eq!(outputs[5], "counter_file_zap_8_motif.csv");
        assert_eq!(config.accessions, None);
        assert_eq!(config.output_dir, dir.path().join("csv_files"));
    }

    #[rstest]
    fn test_run_needs_exactly_one_motif() {
        let run = MotifRun {
            motif: Some("CG".to_string()),
            zap: Some(4),
            output: None,
        };
        assert!(matches!(run.pattern(), Err(MotifError::InvalidRunConfig(_))));
    }

    #[rstest]
    #[case("CG", Some("counter_file_cpg.csv"))]
    #[case("CNG", None)]
    fn test_output_name_defaults(#[case] motif: &str, #[case] expected: Option<&str>) {
        let run = MotifRun {
            motif: Some(motif.to_string()),
            zap: None,
            output: None,
        };
        assert_eq!(run.output_name().ok().as_deref(), expected);
    }
}
