use autosudoku_core::{StepTrace, TraceResult};
use std::io;
use std::path::{Path, PathBuf};

/// Filled-cell counts loaded from a trace file, ready to plot
#[derive(Debug, Clone)]
pub struct GraphView {
    pub counts: Vec<usize>,
    pub source: PathBuf,
}

impl GraphView {
    /// Parse a trace file and reduce it to the plotted series
    pub fn load(path: &Path) -> TraceResult<Self> {
        let trace = StepTrace::load(path)?;
        Ok(Self {
            counts: trace.filled_counts(),
            source: path.to_path_buf(),
        })
    }
}

/// Plot the series as text: `height` rows of plot area with a y-axis
/// gutter, then the x axis and its step labels. The y axis always spans
/// 0..=81 filled cells; the x axis is sampled down (or stretched) to
/// `width` columns.
pub fn chart_lines(counts: &[usize], width: usize, height: usize) -> Vec<String> {
    if counts.is_empty() {
        return Vec::new();
    }
    let width = width.max(2);
    let height = height.max(2);

    let mut rows = vec![vec![' '; width]; height];
    for x in 0..width {
        let index = if counts.len() == 1 {
            0
        } else {
            x * (counts.len() - 1) / (width - 1)
        };
        let count = counts[index].min(81);
        let y = (height - 1) - count * (height - 1) / 81;
        rows[y][x] = '*';
    }

    let mut lines = Vec::with_capacity(height + 2);
    for (i, row) in rows.iter().enumerate() {
        let label = match i {
            0 => "81",
            i if i == height - 1 => " 0",
            _ => "  ",
        };
        lines.push(format!("{} |{}", label, row.iter().collect::<String>()));
    }
    lines.push(format!("   +{}", "-".repeat(width)));
    lines.push(format!("    1{:>pad$}", counts.len(), pad = width.saturating_sub(1)));
    lines
}

/// Standalone viewer for `--graph`: print the chart for an existing trace
/// file to stdout, no terminal UI involved.
pub fn print_graph(path: &Path) -> io::Result<()> {
    let trace = match StepTrace::load(path) {
        Ok(trace) => trace,
        Err(e) => {
            eprintln!("cannot read {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let counts = trace.filled_counts();
    if counts.is_empty() {
        println!("{} holds no snapshots", path.display());
        return Ok(());
    }

    println!("Solving process: {} steps", counts.len());
    println!();
    for line in chart_lines(&counts, 72, 20) {
        println!("{}", line);
    }
    Ok(())
}
