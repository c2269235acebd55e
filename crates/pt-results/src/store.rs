//! Run storage API.
//!
//! Layout: `<root>/<YYYYmmdd-HHMMSS>_<case>/` holding `manifest.json`,
//! one `dump_<index:06>.json` per dump, and `summary.json` once the run ends.

use crate::types::{DumpRecord, FieldSnapshot, RunManifest, RunSummary};
use crate::{ResultsError, ResultsResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST: &str = "manifest.json";
const SUMMARY: &str = "summary.json";

fn dump_file_name(index: usize) -> String {
    format!("dump_{index:06}.json")
}

/// Directory name for a run of `case_name` started at `started`.
pub fn run_dir_name(case_name: &str, started: DateTime<Utc>) -> String {
    let case: String = case_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let case = if case.is_empty() { "case".to_string() } else { case };
    format!("{}_{case}", started.format("%Y%m%d-%H%M%S"))
}

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST).exists()
    }

    /// Create the run directory and write its manifest.
    ///
    /// If `manifest.run_id` is taken a numeric suffix is appended; the
    /// returned writer carries the final id.
    pub fn create_run(&self, mut manifest: RunManifest) -> ResultsResult<RunWriter> {
        if manifest.run_id.is_empty() || manifest.run_id.contains(['/', '\\']) {
            return Err(ResultsError::InvalidPath {
                message: format!("run id {:?} is not a directory name", manifest.run_id),
            });
        }
        let base = manifest.run_id.clone();
        let mut suffix = 1;
        while self.run_dir(&manifest.run_id).exists() {
            suffix += 1;
            manifest.run_id = format!("{base}-{suffix}");
        }

        let dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(MANIFEST), serde_json::to_string_pretty(&manifest)?)?;
        tracing::debug!(dir = %dir.display(), "created run directory");

        Ok(RunWriter {
            dir,
            manifest,
            dumps_written: 0,
        })
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join(MANIFEST);

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_dump(&self, run_id: &str, index: usize) -> ResultsResult<DumpRecord> {
        let path = self.run_dir(run_id).join(dump_file_name(index));
        if !path.exists() {
            return Err(ResultsError::DumpNotFound {
                run_id: run_id.to_string(),
                index,
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Dump indices present in a run, ascending.
    pub fn list_dumps(&self, run_id: &str) -> ResultsResult<Vec<usize>> {
        if !self.has_run(run_id) {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let mut indices = Vec::new();
        for entry in fs::read_dir(self.run_dir(run_id))? {
            let name = entry?.file_name().to_string_lossy().to_string();
            if let Some(index) = name
                .strip_prefix("dump_")
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|digits| digits.parse().ok())
            {
                indices.push(index);
            }
        }
        indices.sort_unstable();
        Ok(indices)
    }

    pub fn load_summary(&self, run_id: &str) -> ResultsResult<Option<RunSummary>> {
        let path = self.run_dir(run_id).join(SUMMARY);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Every run under the root, optionally filtered by case name, oldest first.
    pub fn list_runs(&self, case_name: Option<&str>) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && case_name.is_none_or(|name| manifest.case_name == name)
                {
                    runs.push(manifest);
                }
            }
        }

        runs.sort_by(|a, b| a.run_id.cmp(&b.run_id));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

/// Appends dumps to one run directory.
#[derive(Debug)]
pub struct RunWriter {
    dir: PathBuf,
    manifest: RunManifest,
    dumps_written: usize,
}

impl RunWriter {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn run_id(&self) -> &str {
        &self.manifest.run_id
    }

    pub fn manifest(&self) -> &RunManifest {
        &self.manifest
    }

    pub fn dumps_written(&self) -> usize {
        self.dumps_written
    }

    /// Write the next dump; its index is the number of dumps before it.
    pub fn write_dump(
        &mut self,
        iteration: usize,
        pseudo_time: f64,
        fields: Vec<FieldSnapshot>,
    ) -> ResultsResult<PathBuf> {
        let record = DumpRecord {
            index: self.dumps_written,
            iteration,
            pseudo_time,
            fields,
        };
        let path = self.dir.join(dump_file_name(record.index));
        fs::write(&path, serde_json::to_string(&record)?)?;
        self.dumps_written += 1;
        Ok(path)
    }

    pub fn write_summary(&self, summary: &RunSummary) -> ResultsResult<()> {
        fs::write(
            self.dir.join(SUMMARY),
            serde_json::to_string_pretty(summary)?,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn run_dir_name_is_timestamped_and_sanitized() {
        let started = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            run_dir_name("laminar channel/2", started),
            "20260304-050607_laminar_channel_2"
        );
        assert_eq!(run_dir_name("", started), "20260304-050607_case");
    }

    #[test]
    fn dump_names_are_zero_padded() {
        assert_eq!(dump_file_name(0), "dump_000000.json");
        assert_eq!(dump_file_name(42), "dump_000042.json");
    }
}
