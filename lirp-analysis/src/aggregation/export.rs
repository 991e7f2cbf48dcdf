use super::accumulator::FinalizedTable;
use crate::error::AnalysisResult;
use crate::instance_key::{DemandTier, PeriodCount};
use crate::results::SolverVariant;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct CsvRow {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Demand")]
    demand: String,
    #[serde(rename = "Solver")]
    solver: &'static str,
    #[serde(rename = "% Opt")]
    count_optimal: u32,
    #[serde(rename = "Avg Gap")]
    avg_gap: f64,
    #[serde(rename = "Max Gap")]
    max_gap: f64,
    #[serde(rename = "Better or Equal")]
    better_or_equal: u32,
    #[serde(rename = "Avg Time")]
    avg_time: f64,
    #[serde(rename = "Samples")]
    samples: u32,
}

pub fn write_csv<W: Write>(table: &FinalizedTable, writer: W) -> AnalysisResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for (key, bucket) in table.rows() {
        writer.serialize(CsvRow {
            period: key.period.periods(),
            demand: key.demand.to_string(),
            solver: key.variant.short_name(),
            count_optimal: bucket.count_optimal,
            avg_gap: bucket.avg_gap,
            max_gap: bucket.max_gap,
            better_or_equal: bucket.count_better_or_equal,
            avg_time: bucket.avg_time,
            samples: bucket.samples,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// One row per (period, demand) pair, one column group per solver variant.
pub fn to_latex(table: &FinalizedTable) -> String {
    let groups = SolverVariant::ALL.len();
    let headers: Vec<String> = SolverVariant::ALL
        .iter()
        .enumerate()
        .map(|(idx, variant)| {
            let align = if idx + 1 == groups { "c" } else { "c|" };
            format!("\\multicolumn{{4}}{{{}}}{{{}}}", align, variant.short_name())
        })
        .collect();

    let mut lines = vec![
        "\\begin{table}[ht]".to_string(),
        "\\centering".to_string(),
        format!("\\caption{{Optimality gaps, {}}}", table.kind.title()),
        format!("\\begin{{tabular}}{{ll{}}}", "|rrrr".repeat(groups)),
        "\\hline".to_string(),
        format!(" & & {} \\\\", headers.join(" & ")),
        format!(
            "Periods & Demand & {} \\\\",
            vec!["\\% Opt & Avg Gap & Max Gap & BoE"; groups].join(" & ")
        ),
        "\\hline".to_string(),
    ];
    for period in PeriodCount::ALL {
        for demand in DemandTier::ALL {
            let cells: Vec<String> = SolverVariant::ALL
                .iter()
                .map(|&variant| match table.get(period, demand, variant) {
                    Some(b) => format!(
                        "{} & {:.4} & {:.4} & {}",
                        b.count_optimal, b.avg_gap, b.max_gap, b.count_better_or_equal
                    ),
                    None => "- & - & - & -".to_string(),
                })
                .collect();
            lines.push(format!(
                "{} & {} & {} \\\\",
                period,
                demand,
                cells.join(" & ")
            ));
        }
    }
    lines.push("\\hline".to_string());
    lines.push("\\end{tabular}".to_string());
    lines.push("\\end{table}".to_string());
    lines.join("\n") + "\n"
}

/// Writes `<stem>.csv` and `<stem>.tex` into `dir`, returning both paths.
pub fn export_table(table: &FinalizedTable, dir: &Path) -> AnalysisResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let stem = table.kind.file_stem();

    let csv_path = dir.join(format!("{}.csv", stem));
    write_csv(table, fs::File::create(&csv_path)?)?;

    let tex_path = dir.join(format!("{}.tex", stem));
    fs::write(&tex_path, to_latex(table))?;

    Ok(vec![csv_path, tex_path])
}
