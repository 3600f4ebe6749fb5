use std::collections::BTreeMap;

use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment, Table as Grid};

use crate::error::{Result, TallyError};
use crate::fmt::money;
use crate::models::{parse_amount, Scalar};
use crate::table::Table;

pub const DATE_COLUMN: &str = "date";
pub const CATEGORY_COLUMN: &str = "category";
pub const AMOUNT_COLUMN: &str = "amount";

const HISTOGRAM_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    date: Option<NaiveDate>,
    category: Option<&'a str>,
    amount: f64,
}

/// Read-only spending snapshot of a budget table. Rows whose amount doesn't
/// parse are left out.
pub struct Spending<'a> {
    entries: Vec<Entry<'a>>,
    has_date: bool,
    has_category: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

impl<'a> Spending<'a> {
    pub fn from_table(table: &'a Table) -> Result<Self> {
        let amount_idx = table
            .find_column(AMOUNT_COLUMN)
            .ok_or_else(|| TallyError::UnknownColumn(AMOUNT_COLUMN.to_string()))?;
        let date_idx = table.find_column(DATE_COLUMN);
        let category_idx = table.find_column(CATEGORY_COLUMN);

        let entries = table
            .rows()
            .filter_map(|row| {
                let values = row.values();
                let amount = parse_amount(&values[amount_idx])?;
                Some(Entry {
                    date: date_idx.and_then(|i| Scalar::infer(&values[i]).as_date()),
                    category: category_idx.map(|i| values[i].as_str()),
                    amount,
                })
            })
            .collect();

        Ok(Self {
            entries,
            has_date: date_idx.is_some(),
            has_category: category_idx.is_some(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only entries dated within `from..=to`; undated entries are dropped.
    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        if from.is_none() && to.is_none() {
            return self;
        }
        self.entries.retain(|e| match e.date {
            Some(d) => from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t),
            None => false,
        });
        self
    }

    fn require_category(&self) -> Result<()> {
        if self.has_category {
            Ok(())
        } else {
            Err(TallyError::UnknownColumn(CATEGORY_COLUMN.to_string()))
        }
    }

    fn dated(&self) -> Result<Vec<(NaiveDate, f64)>> {
        if !self.has_date {
            return Err(TallyError::UnknownColumn(DATE_COLUMN.to_string()));
        }
        let mut dated: Vec<_> = self
            .entries
            .iter()
            .filter_map(|e| e.date.map(|d| (d, e.amount)))
            .collect();
        dated.sort_by_key(|(d, _)| *d);
        Ok(dated)
    }

    /// Amounts grouped by category, in order of first appearance.
    fn grouped(&self) -> Result<Vec<(&'a str, Vec<f64>)>> {
        self.require_category()?;
        let mut groups: Vec<(&'a str, Vec<f64>)> = Vec::new();
        for e in &self.entries {
            let cat = e.category.unwrap_or_default();
            match groups.iter_mut().find(|(c, _)| *c == cat) {
                Some((_, amounts)) => amounts.push(e.amount),
                None => groups.push((cat, vec![e.amount])),
            }
        }
        Ok(groups)
    }

    pub fn by_category(&self) -> Result<Vec<(String, f64)>> {
        Ok(self
            .grouped()?
            .into_iter()
            .map(|(c, amounts)| (c.to_string(), amounts.iter().sum()))
            .collect())
    }

    /// Average spend per category, highest first.
    pub fn average_by_category(&self) -> Result<Vec<(String, f64)>> {
        let mut averages: Vec<_> = self
            .grouped()?
            .into_iter()
            .map(|(c, amounts)| {
                let avg = amounts.iter().sum::<f64>() / amounts.len() as f64;
                (c.to_string(), avg)
            })
            .collect();
        averages.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(averages)
    }

    pub fn over_time(&self) -> Result<Vec<(NaiveDate, f64)>> {
        self.dated()
    }

    /// Totals per `YYYY-MM`, ascending.
    pub fn monthly(&self) -> Result<Vec<(String, f64)>> {
        let mut months: BTreeMap<String, f64> = BTreeMap::new();
        for (d, amount) in self.dated()? {
            *months.entry(d.format("%Y-%m").to_string()).or_default() += amount;
        }
        Ok(months.into_iter().collect())
    }

    pub fn category_stats(&self) -> Result<Vec<CategoryStats>> {
        Ok(self
            .grouped()?
            .into_iter()
            .map(|(c, amounts)| {
                let count = amounts.len();
                let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
                let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                CategoryStats {
                    category: c.to_string(),
                    count,
                    min,
                    mean: amounts.iter().sum::<f64>() / count as f64,
                    max,
                }
            })
            .collect())
    }

    pub fn cumulative(&self) -> Result<Vec<(NaiveDate, f64)>> {
        let mut running = 0.0;
        Ok(self
            .dated()?
            .into_iter()
            .map(|(d, amount)| {
                running += amount;
                (d, running)
            })
            .collect())
    }

    /// Equal-width histogram of amounts.
    pub fn histogram(&self, bins: usize) -> Vec<Bin> {
        if self.entries.is_empty() || bins == 0 {
            return Vec::new();
        }
        let min = self.entries.iter().map(|e| e.amount).fold(f64::INFINITY, f64::min);
        let max = self.entries.iter().map(|e| e.amount).fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            return vec![Bin {
                lo: min,
                hi: max,
                count: self.entries.len(),
            }];
        }
        let width = (max - min) / bins as f64;
        let mut out: Vec<Bin> = (0..bins)
            .map(|i| Bin {
                lo: min + width * i as f64,
                hi: min + width * (i + 1) as f64,
                count: 0,
            })
            .collect();
        for e in &self.entries {
            let idx = (((e.amount - min) / width).floor() as usize).min(bins - 1);
            out[idx].count += 1;
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn money_cell(v: f64) -> Cell {
    Cell::new(money(v)).set_alignment(CellAlignment::Right)
}

pub fn render_pairs<K: std::fmt::Display>(title: &str, header: &str, rows: &[(K, f64)]) -> String {
    let mut grid = Grid::new();
    grid.set_header(vec![header, "Amount"]);
    for (k, v) in rows {
        grid.add_row(vec![Cell::new(k), money_cell(*v)]);
    }
    format!("{title}\n{grid}")
}

pub fn render_category_stats(stats: &[CategoryStats]) -> String {
    let mut grid = Grid::new();
    grid.set_header(vec!["Category", "Count", "Min", "Mean", "Max"]);
    for s in stats {
        grid.add_row(vec![
            Cell::new(&s.category),
            Cell::new(s.count).set_alignment(CellAlignment::Right),
            money_cell(s.min),
            money_cell(s.mean),
            money_cell(s.max),
        ]);
    }
    format!("Spend Distribution by Category\n{grid}")
}

pub fn render_histogram(bins: &[Bin]) -> String {
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let mut out = String::from("Amount Distribution\n");
    for b in bins {
        let bar = "#".repeat(b.count * HISTOGRAM_WIDTH / peak);
        out.push_str(&format!(
            "{:>12} to {:<12} | {bar} ({})\n",
            money(b.lo),
            money(b.hi),
            b.count
        ));
    }
    out
}
