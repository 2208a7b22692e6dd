use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::engine::StatsModel;
use crate::engine::charset::CharIndex;

pub const CONFUSION_CSV: &str = "confusion.csv";
pub const MONOGRAM_CSV: &str = "monogram.csv";
pub const BIGRAM_CSV: &str = "bigram.csv";

/// Writes the three diagnostic tables into `out_dir`, creating it if needed.
/// Returns the written paths.
pub fn export_all(model: &StatsModel, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating export directory '{}'", out_dir.display()))?;

    let writers: [(&str, fn(&StatsModel, &mut csv::Writer<fs::File>) -> csv::Result<()>); 3] = [
        (CONFUSION_CSV, write_confusion),
        (MONOGRAM_CSV, write_monogram),
        (BIGRAM_CSV, write_bigram),
    ];

    let mut written = Vec::with_capacity(writers.len());
    for (name, write) in writers {
        let path = out_dir.join(name);
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("creating '{}'", path.display()))?;
        write(model, &mut wtr).with_context(|| format!("writing '{}'", path.display()))?;
        wtr.flush()
            .with_context(|| format!("flushing '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "exported csv");
        written.push(path);
    }
    Ok(written)
}

/// Header `expected,<code>...`, then one row per expected character code.
pub fn write_confusion<W: io::Write>(model: &StatsModel, wtr: &mut csv::Writer<W>) -> csv::Result<()> {
    let mut header = vec!["expected".to_string()];
    header.extend(CharIndex::all().map(|c| c.byte().to_string()));
    wtr.write_record(&header)?;

    for expected in CharIndex::all() {
        let mut row = vec![expected.byte().to_string()];
        row.extend(model.confusion.row(expected).iter().map(u64::to_string));
        wtr.write_record(&row)?;
    }
    Ok(())
}

/// `char,occurrences,misses,avg_time`; `avg_time` is blank without data.
pub fn write_monogram<W: io::Write>(model: &StatsModel, wtr: &mut csv::Writer<W>) -> csv::Result<()> {
    wtr.write_record(["char", "occurrences", "misses", "avg_time"])?;
    for ch in CharIndex::all() {
        wtr.write_record([
            ch.byte().to_string(),
            model.monogram.occurrences(ch).to_string(),
            model.monogram.misses(ch).to_string(),
            format_mean(model.monogram.mean_ms(ch)),
        ])?;
    }
    Ok(())
}

/// Observed pairs only.
pub fn write_bigram<W: io::Write>(model: &StatsModel, wtr: &mut csv::Writer<W>) -> csv::Result<()> {
    wtr.write_record(["first", "second", "occurrences", "misses", "avg_time"])?;
    for key in model.bigram.observed() {
        wtr.write_record([
            key.0.byte().to_string(),
            key.1.byte().to_string(),
            model.bigram.occurrences(key).to_string(),
            model.bigram.misses(key).to_string(),
            format_mean(model.bigram.mean_ms(key)),
        ])?;
    }
    Ok(())
}

fn format_mean(mean: f64) -> String {
    if mean.is_nan() {
        String::new()
    } else {
        format!("{mean:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::result::KeyTime;
    use tempfile::TempDir;

    fn idx(ch: char) -> CharIndex {
        CharIndex::from_char(ch).unwrap()
    }

    fn model() -> StatsModel {
        let mut model = StatsModel::default();
        model.apply_drill(&[
            KeyTime { expected: idx('o'), typed: idx('o'), time_ms: 120.0, errored: false },
            KeyTime { expected: idx('n'), typed: idx('m'), time_ms: 200.0, errored: true },
        ]);
        model
    }

    fn to_string(write: fn(&StatsModel, &mut csv::Writer<Vec<u8>>) -> csv::Result<()>) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write(&model(), &mut wtr).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn confusion_has_header_and_one_row_per_code() {
        let out = to_string(write_confusion);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 1 + 95);
        assert!(lines[0].starts_with("expected,32,33,"));
        assert!(lines[0].ends_with(",126"));

        let n_row = lines.iter().find(|l| l.starts_with("110,")).unwrap();
        let cells: Vec<&str> = n_row.split(',').collect();
        // column for 'm' (109) is at 1 + (109 - 32)
        assert_eq!(cells[1 + 77], "1");
        assert_eq!(cells[1 + 78], "0");
    }

    #[test]
    fn monogram_leaves_avg_blank_without_data() {
        let out = to_string(write_monogram);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "char,occurrences,misses,avg_time");
        assert_eq!(lines.len(), 1 + 95);
        assert!(lines.contains(&"111,1,0,120.000"));
        assert!(lines.contains(&"110,1,1,200.000"));
        assert!(lines.contains(&"97,0,0,"));
    }

    #[test]
    fn bigram_lists_observed_pairs() {
        let out = to_string(write_bigram);
        assert_eq!(out, "first,second,occurrences,misses,avg_time\n111,110,1,1,320.000\n");
    }

    #[test]
    fn export_all_writes_three_files() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("csv");
        let written = export_all(&model(), &out_dir).unwrap();
        assert_eq!(written.len(), 3);
        for name in [CONFUSION_CSV, MONOGRAM_CSV, BIGRAM_CSV] {
            assert!(out_dir.join(name).is_file());
        }
    }
}
