use comfy_table::{Cell, CellAlignment, Table as Grid};
use rand::Rng;

use crate::models::{ColumnKind, Scalar};
use crate::table::Table;

pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

pub struct ColumnInfo {
    pub name: String,
    pub non_empty: usize,
    pub kind: ColumnKind,
}

/// Linear-interpolated quantile of already sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn numbers(table: &Table, index: usize) -> Option<Vec<f64>> {
    let mut out = Vec::new();
    for raw in table.column_values(index) {
        match Scalar::infer(raw) {
            Scalar::Empty => {}
            Scalar::Number(n) => out.push(n),
            _ => return None,
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Summary statistics for every column whose non-empty cells are all numbers.
pub fn describe(table: &Table) -> Vec<ColumnStats> {
    let mut stats = Vec::new();
    for (i, name) in table.columns().iter().enumerate() {
        let Some(mut values) = numbers(table, i) else {
            continue;
        };
        values.sort_by(|a, b| a.total_cmp(b));
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        });
        stats.push(ColumnStats {
            name: name.clone(),
            count,
            mean,
            std,
            min: values[0],
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values[count - 1],
        });
    }
    stats
}

pub fn info(table: &Table) -> Vec<ColumnInfo> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut non_empty = 0;
            let mut kind = ColumnKind::Empty;
            for raw in table.column_values(i) {
                let cell = Scalar::infer(raw).kind();
                if cell != ColumnKind::Empty {
                    non_empty += 1;
                }
                kind = kind.merge(cell);
            }
            ColumnInfo {
                name: name.clone(),
                non_empty,
                kind,
            }
        })
        .collect()
}

pub fn head(table: &Table, n: usize) -> Vec<usize> {
    (0..table.len().min(n)).collect()
}

pub fn tail(table: &Table, n: usize) -> Vec<usize> {
    (table.len().saturating_sub(n)..table.len()).collect()
}

/// Up to `n` distinct random row indices, in stored order.
pub fn sample<R: Rng + ?Sized>(table: &Table, n: usize, rng: &mut R) -> Vec<usize> {
    let amount = n.min(table.len());
    let mut picked = rand::seq::index::sample(rng, table.len(), amount).into_vec();
    picked.sort_unstable();
    picked
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_rows(table: &Table, indices: &[usize]) -> Grid {
    let mut grid = Grid::new();
    let mut header = vec![Cell::new("#")];
    header.extend(table.columns().iter().map(Cell::new));
    grid.set_header(header);
    for &i in indices {
        let Some(row) = table.row(i) else { continue };
        let mut cells = vec![Cell::new(i)];
        cells.extend(row.values().iter().map(Cell::new));
        grid.add_row(cells);
    }
    grid
}

fn num(v: f64) -> Cell {
    Cell::new(format!("{v:.2}")).set_alignment(CellAlignment::Right)
}

pub fn render_stats(stats: &[ColumnStats]) -> Grid {
    let mut grid = Grid::new();
    grid.set_header(vec!["Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]);
    for s in stats {
        grid.add_row(vec![
            Cell::new(&s.name),
            Cell::new(s.count).set_alignment(CellAlignment::Right),
            num(s.mean),
            s.std.map(num).unwrap_or_else(|| Cell::new("-")),
            num(s.min),
            num(s.q25),
            num(s.median),
            num(s.q75),
            num(s.max),
        ]);
    }
    grid
}

pub fn render_info(table: &Table, infos: &[ColumnInfo]) -> String {
    let mut grid = Grid::new();
    grid.set_header(vec!["#", "Column", "Non-empty", "Kind"]);
    for (i, c) in infos.iter().enumerate() {
        grid.add_row(vec![
            Cell::new(i),
            Cell::new(&c.name),
            Cell::new(c.non_empty),
            Cell::new(c.kind.label()),
        ]);
    }
    format!(
        "{} rows x {} columns\n{grid}",
        table.len(),
        table.column_count()
    )
}
