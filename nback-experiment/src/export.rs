//! Writes the record collection to the data directory.

use nback_core::{Condition, TrialRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// `<id>-<remainder>-<date>_nback.<ext>`
pub fn file_name(condition: &Condition, date: &str, format: ExportFormat) -> String {
    format!(
        "{}-{}-{}_nback.{}",
        condition.participant_id,
        condition.remainder,
        date,
        format.extension()
    )
}

const HEADER: [&str; 9] = [
    "ppt_ID",
    "condition",
    "section",
    "trial",
    "stim",
    "is_target",
    "response",
    "rt",
    "correct",
];

fn cell(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn flag(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// One header row, then one row per record; absent values are empty cells
pub fn write_csv<W: Write>(records: &[TrialRecord], mut out: W) -> std::io::Result<()> {
    writeln!(out, "{}", HEADER.join(","))?;
    for r in records {
        let response = match r.response {
            Some(nback_core::ResponseKey::Match) => "match",
            Some(nback_core::ResponseKey::Differ) => "differ",
            None => "",
        };
        let row = [
            r.participant_id.to_string(),
            cell(&r.condition),
            r.section.label().to_string(),
            r.trial.to_string(),
            r.stim.to_string(),
            flag(r.is_target).to_string(),
            response.to_string(),
            r.rt.map(|rt| rt.to_string()).unwrap_or_default(),
            r.correct.map(flag).unwrap_or_default().to_string(),
        ];
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()
}

pub fn write_json<W: Write>(records: &[TrialRecord], mut out: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut out, records)?;
    out.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Creates `dir` if needed and writes every record to a single file
pub fn write_records(
    dir: &Path,
    condition: &Condition,
    date: &str,
    format: ExportFormat,
    records: &[TrialRecord],
) -> Result<PathBuf, ExportError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ExportError::Io { path, source }
    };
    fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = dir.join(file_name(condition, date, format));
    let file = fs::File::create(&path).map_err(io_err(&path))?;
    let out = std::io::BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(records, out).map_err(io_err(&path))?,
        ExportFormat::Json => write_json(records, out)?,
    }
    info!(path = %path.display(), records = records.len(), "records written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nback_core::{Letter, ResponseKey, Section, Trial};
    use std::time::Duration;

    fn sample() -> Vec<TrialRecord> {
        let mut hit = Trial::new(2, Letter::G, true);
        hit.respond(ResponseKey::Match, Duration::from_millis(500));
        let miss = Trial::new(3, Letter::P, false);
        vec![
            hit.into_record(9, "visual-easy", Section::Pre),
            miss.into_record(9, "visual-easy", Section::Pre),
        ]
    }

    #[test]
    fn csv_leaves_absent_values_empty() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "ppt_ID,condition,section,trial,stim,is_target,response,rt,correct");
        assert_eq!(lines[1], "9,visual-easy,pre,3,G,True,match,0.5,True");
        assert_eq!(lines[2], "9,visual-easy,pre,4,P,False,,,");
    }

    #[test]
    fn cells_with_commas_are_quoted() {
        assert_eq!(cell("a,b"), "\"a,b\"");
        assert_eq!(cell("say \"hi\", ok"), "\"say \"\"hi\"\", ok\"");
        assert_eq!(cell("plain"), "plain");
    }

    #[test]
    fn json_uses_column_names() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["ppt_ID"], 9);
        assert_eq!(value[0]["section"], "pre");
        assert_eq!(value[1]["response"], serde_json::Value::Null);
    }

    #[test]
    fn file_name_keeps_raw_remainder() {
        let condition = Condition::assign(12);
        assert_eq!(
            file_name(&condition, "2026-10-17", ExportFormat::Csv),
            "12-0-2026-10-17_nback.csv"
        );
    }

    #[test]
    fn writes_into_a_fresh_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");
        let condition = Condition::assign(9);
        let path = write_records(&dir, &condition, "2026-10-17", ExportFormat::Json, &sample())
            .unwrap();
        assert!(path.ends_with("9-1-2026-10-17_nback.json"));
        let back: Vec<TrialRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, sample());
    }
}
