use std::io::{BufRead, Write};

use chrono::NaiveDate;
use colored::Colorize;
use rand::Rng;

use crate::console::{Console, Reply};
use crate::error::Result;
use crate::models::parse_date;
use crate::overview::{describe, head, info, render_info, render_rows, render_stats, sample, tail};
use crate::summary::{render_category_stats, render_histogram, render_pairs, Spending};
use crate::table::Table;

const PREVIEW_ROWS: usize = 5;
const SAMPLE_ROWS: usize = 10;
const HISTOGRAM_BINS: usize = 10;

const OVERVIEW_MENU: &[&str] = &[
    "1. Descriptive statistics of your data",
    "2. General information about your data",
    "3. First 5 rows of your data",
    "4. Last 5 rows of your data",
    "5. 10 random rows from your data",
    "6. Return to the main menu",
];

const SUMMARY_MENU: &[&str] = &[
    "a) Spend by category",
    "b) Average spend",
    "c) Spend over time",
    "d) Monthly spend",
    "e) Stats by category",
    "f) Cumulative spend",
    "g) Amount distribution",
    "h) Return to main menu",
    "r) Set date range",
];

fn show_rows<R: BufRead, W: Write>(
    table: &Table,
    indices: &[usize],
    console: &mut Console<R, W>,
) -> Result<()> {
    if table.is_empty() {
        return console.say("The table has no rows yet.".yellow());
    }
    console.say(render_rows(table, indices))
}

pub fn data_overview<R: BufRead, W: Write, G: Rng>(
    table: &Table,
    console: &mut Console<R, W>,
    rng: &mut G,
) -> Result<()> {
    loop {
        console.say("\nPlease select from one of the options below to view your data.\n")?;
        for item in OVERVIEW_MENU {
            console.say(item)?;
        }
        let Some(choice) = console.read_line("Please select from 1-6: ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                let stats = describe(table);
                if stats.is_empty() {
                    console.say("No numeric columns to describe.".yellow())?;
                } else {
                    console.say(render_stats(&stats))?;
                }
            }
            "2" => console.say(render_info(table, &info(table)))?,
            "3" => show_rows(table, &head(table, PREVIEW_ROWS), console)?,
            "4" => show_rows(table, &tail(table, PREVIEW_ROWS), console)?,
            "5" => show_rows(table, &sample(table, SAMPLE_ROWS, rng), console)?,
            "6" | "q" | "Q" => return Ok(()),
            _ => console.say("You must enter a number between 1-6.".red())?,
        }
    }
}

/// Ask for an optional date. Outer `None` means the user quit.
fn prompt_date<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
) -> Result<Option<Option<NaiveDate>>> {
    loop {
        let Reply::Line(raw) = console.ask(&format!("{label} date (YYYY-MM-DD, blank for none): "))? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(Some(None));
        }
        match parse_date(&raw) {
            Some(d) => return Ok(Some(Some(d))),
            None => console.say(format!("'{raw}' is not a date I recognise.").red())?,
        }
    }
}

fn range_label(from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    let fmt = |d: Option<NaiveDate>| d.map_or("any".to_string(), |d| d.to_string());
    format!("{} to {}", fmt(from), fmt(to))
}

pub fn summaries<R: BufRead, W: Write>(table: &Table, console: &mut Console<R, W>) -> Result<()> {
    if table.is_empty() {
        return console.say("No data loaded. Please load or add some data first.".yellow());
    }
    let mut from: Option<NaiveDate> = None;
    let mut to: Option<NaiveDate> = None;

    loop {
        let spending = match Spending::from_table(table) {
            Ok(s) => s.between(from, to),
            Err(e) => {
                return console.say(format!("Can't summarise this table: {e}").red());
            }
        };

        console.say("\nPlease select which summary you would like from the options below:\n")?;
        if from.is_some() || to.is_some() {
            let label = format!("(dates {}: {} rows)", range_label(from, to), spending.len());
            console.say(label.dimmed())?;
        }
        for item in SUMMARY_MENU {
            console.say(item)?;
        }
        let Some(choice) = console.read_line("Select a summary from a-h: ")? else {
            return Ok(());
        };
        let choice = choice.to_lowercase();

        let rendered = match choice.as_str() {
            "a" => spending
                .by_category()
                .map(|rows| render_pairs("Spending by Category", "Category", &rows)),
            "b" => spending
                .average_by_category()
                .map(|rows| render_pairs("Average Spend by Category", "Category", &rows)),
            "c" => spending
                .over_time()
                .map(|rows| render_pairs("Spend Over Time", "Date", &rows)),
            "d" => spending
                .monthly()
                .map(|rows| render_pairs("Monthly Spend", "Month", &rows)),
            "e" => spending.category_stats().map(|stats| render_category_stats(&stats)),
            "f" => spending
                .cumulative()
                .map(|rows| render_pairs("Cumulative Spend Over Time", "Date", &rows)),
            "g" => Ok(render_histogram(&spending.histogram(HISTOGRAM_BINS))),
            "h" | "q" => return Ok(()),
            "r" => {
                if let Some(start) = prompt_date(console, "From")? {
                    if let Some(end) = prompt_date(console, "To")? {
                        from = start;
                        to = end;
                        console.say(format!("Summaries now cover {}.", range_label(from, to)))?;
                    }
                }
                continue;
            }
            _ => {
                console.say("Please select a valid value between a-h.".red())?;
                continue;
            }
        };

        match rendered {
            Ok(text) if spending.is_empty() => {
                console.say(text)?;
                console.say("No rows with a usable amount in this range.".yellow())?;
            }
            Ok(text) => console.say(text)?,
            Err(e) => console.say(format!("Can't build this summary: {e}").red())?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{scripted, transcript};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn budget() -> Table {
        let mut table = Table::default();
        for r in [
            ["2024-01-05", "Rent", "900", "January"],
            ["2024-01-20", "Food", "30", "Dinner"],
            ["2024-02-10", "Food", "10", "Lunch"],
        ] {
            table.push_row(r.iter().map(|v| v.to_string()).collect()).unwrap();
        }
        table
    }

    #[test]
    fn test_overview_head_and_invalid_choice() {
        let table = budget();
        let mut console = scripted("3\n9\n6\n");
        data_overview(&table, &mut console, &mut StdRng::seed_from_u64(1)).unwrap();
        let out = transcript(console);
        assert!(out.contains("January"));
        assert!(out.contains("You must enter a number between 1-6."));
    }

    #[test]
    fn test_overview_describe_and_info() {
        let table = budget();
        let mut console = scripted("1\n2\n");
        data_overview(&table, &mut console, &mut StdRng::seed_from_u64(1)).unwrap();
        let out = transcript(console);
        assert!(out.contains("313.33"));
        assert!(out.contains("3 rows x 4 columns"));
    }

    #[test]
    fn test_summaries_by_category_and_monthly() {
        let table = budget();
        let mut console = scripted("a\nD\nh\n");
        summaries(&table, &mut console).unwrap();
        let out = transcript(console);
        assert!(out.contains("Spending by Category"));
        assert!(out.contains("$900.00"));
        assert!(out.contains("2024-01"));
        assert!(out.contains("$930.00"));
    }

    #[test]
    fn test_summaries_date_range() {
        let table = budget();
        let mut console = scripted("r\n2024-02-01\n\na\nh\n");
        summaries(&table, &mut console).unwrap();
        let out = transcript(console);
        assert!(out.contains("Summaries now cover 2024-02-01 to any."));
        assert!(out.contains("(dates 2024-02-01 to any: 1 rows)"));
        assert!(out.contains("$10.00"));
        assert!(!out.contains("$900.00"));
    }

    #[test]
    fn test_summaries_missing_category_column() {
        let table = Table::from_parts(
            vec!["date".to_string(), "amount".to_string()],
            vec![vec!["2024-01-01".to_string(), "5".to_string()]],
        )
        .unwrap();
        let mut console = scripted("a\nh\n");
        summaries(&table, &mut console).unwrap();
        assert!(transcript(console).contains("Can't build this summary: Unknown column: category"));
    }

    #[test]
    fn test_summaries_on_empty_table() {
        let mut console = scripted("a\n");
        summaries(&Table::default(), &mut console).unwrap();
        assert!(transcript(console).contains("No data loaded."));
    }
}
