//! Interactive row and column editing. Each flow returns whether the table
//! was changed.

use std::io::{BufRead, Write};

use colored::Colorize;

use crate::console::{Confirm, Console, Reply};
use crate::editor::{apply, Edit};
use crate::error::{Result, TallyError};
use crate::overview::render_rows;
use crate::table::Table;

/// Prompt for one value per column. `None` if the user quit part way.
fn prompt_row<R: BufRead, W: Write>(
    table: &Table,
    console: &mut Console<R, W>,
) -> Result<Option<Vec<String>>> {
    let mut values = Vec::with_capacity(table.column_count());
    for column in table.columns() {
        match console.ask(&format!("{column}: "))? {
            Reply::Line(value) => values.push(value),
            Reply::Quit => return Ok(None),
        }
    }
    Ok(Some(values))
}

pub fn add_rows<R: BufRead, W: Write>(table: &mut Table, console: &mut Console<R, W>) -> Result<bool> {
    let mut changed = false;
    loop {
        console.say("Follow the prompts below to enter a new row, or enter q to quit.")?;
        let Some(values) = prompt_row(table, console)? else {
            console.say("Entry cancelled. Nothing was added.".yellow())?;
            return Ok(changed);
        };
        let outcome = apply(table, Edit::AddRow(values))?;
        console.say(outcome.to_string().green())?;
        changed = true;
        if console.confirm("Add another row?")? != Confirm::Yes {
            return Ok(changed);
        }
    }
}

pub fn add_columns<R: BufRead, W: Write>(
    table: &mut Table,
    console: &mut Console<R, W>,
) -> Result<bool> {
    let mut changed = false;
    loop {
        let Reply::Line(name) = console.ask("New column title (q to quit): ")? else {
            return Ok(changed);
        };
        match apply(table, Edit::AddColumn(name)) {
            Ok(outcome) => {
                console.say(outcome.to_string().green())?;
                changed = true;
                if console.confirm("Add another column?")? != Confirm::Yes {
                    return Ok(changed);
                }
            }
            Err(e @ (TallyError::DuplicateColumn(_) | TallyError::EmptyColumnName)) => {
                console.say(format!("{e}. Please choose another title.").red())?;
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn delete_row<R: BufRead, W: Write>(table: &mut Table, console: &mut Console<R, W>) -> Result<bool> {
    if table.is_empty() {
        console.say("There are no rows to delete.".yellow())?;
        return Ok(false);
    }
    let all: Vec<usize> = (0..table.len()).collect();
    console.say(render_rows(table, &all))?;

    let last = table.len() - 1;
    loop {
        let Reply::Line(input) = console.ask(&format!("Row to delete (0-{last}), or q to quit: "))? else {
            return Ok(false);
        };
        let index = match input.parse::<usize>() {
            Ok(i) if i <= last => i,
            _ => {
                console.say(format!("Please enter a row number between 0 and {last}.").red())?;
                continue;
            }
        };

        if let Some(row) = table.row(index) {
            let width = table.columns().iter().map(|c| c.len()).max().unwrap_or(0);
            for (column, value) in row.iter() {
                console.say(format!("  {column:<width$}  {value}"))?;
            }
        }
        return match console.confirm("Delete this row?")? {
            Confirm::Yes => {
                let outcome = apply(table, Edit::DeleteRow(index))?;
                console.say(outcome.to_string().green())?;
                Ok(true)
            }
            Confirm::No | Confirm::Quit => {
                console.say("Row not deleted.")?;
                Ok(false)
            }
        };
    }
}

pub fn delete_column<R: BufRead, W: Write>(
    table: &mut Table,
    console: &mut Console<R, W>,
) -> Result<bool> {
    if table.column_count() <= 1 {
        console.say("The table has only one column left, so it can't be deleted.".yellow())?;
        return Ok(false);
    }
    console.say(format!("Columns: {}", table.columns().join(", ")))?;

    loop {
        let Reply::Line(name) = console.ask("Column to delete (q to quit): ")? else {
            return Ok(false);
        };
        let Some(idx) = table.find_column(&name) else {
            console.say(format!("There is no column named '{name}'.").red())?;
            continue;
        };
        let stored = table.columns()[idx].clone();

        return match console.confirm(&format!("Delete column '{stored}' from every row?"))? {
            Confirm::Yes => {
                let outcome = apply(table, Edit::DeleteColumn(stored))?;
                console.say(outcome.to_string().green())?;
                Ok(true)
            }
            Confirm::No | Confirm::Quit => {
                console.say("Column not deleted.")?;
                Ok(false)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{scripted, transcript};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn three_rows() -> Table {
        let mut table = Table::default();
        for desc in ["first", "second", "third"] {
            table.push_row(strings(&["2024-01-01", "Food", "1", desc])).unwrap();
        }
        table
    }

    #[test]
    fn test_add_rows_appends_each_completed_row() {
        let mut table = Table::default();
        let mut console = scripted("2024-01-01\nFood\n12.50\nLunch\ny\n2024-01-02\nRent\n900\nJan\nn\n");
        assert!(add_rows(&mut table, &mut console).unwrap());
        assert_eq!(table.len(), 2);
        assert_eq!(&table.row(0).unwrap()["amount"], "12.50");
        assert_eq!(&table.row(1).unwrap()["category"], "Rent");
    }

    #[test]
    fn test_add_rows_cancel_mid_entry_discards_partial_row() {
        let mut table = Table::default();
        let mut console = scripted("2024-01-01\nFood\nQ\n");
        assert!(!add_rows(&mut table, &mut console).unwrap());
        assert!(table.is_empty());
        assert!(transcript(console).contains("Entry cancelled"));
    }

    #[test]
    fn test_add_rows_cancel_after_first_row_keeps_it() {
        let mut table = Table::default();
        let mut console = scripted("2024-01-01\nFood\n1\nx\ny\nq\n");
        assert!(add_rows(&mut table, &mut console).unwrap());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_add_columns_rejects_collisions_then_accepts() {
        let mut table = three_rows();
        let mut console = scripted("amount\n\nAmount\nn\n");
        assert!(add_columns(&mut table, &mut console).unwrap());
        assert_eq!(table.column_count(), 5);
        assert_eq!(table.columns()[4], "Amount");
        assert_eq!(table.len(), 3);
        assert!(table.rows().all(|r| r["Amount"].is_empty()));
        let out = transcript(console);
        assert!(out.contains("Column already exists: amount"));
        assert!(out.contains("Column name cannot be empty"));
    }

    #[test]
    fn test_add_columns_quit_without_changes() {
        let mut table = three_rows();
        let mut console = scripted("q\n");
        assert!(!add_columns(&mut table, &mut console).unwrap());
        assert_eq!(table.column_count(), 4);
    }

    #[test]
    fn test_delete_row_reprompts_until_valid_then_deletes() {
        let mut table = three_rows();
        let mut console = scripted("abc\n7\n-1\n1\ny\n");
        assert!(delete_row(&mut table, &mut console).unwrap());
        assert_eq!(table.len(), 2);
        assert_eq!(&table.row(1).unwrap()["description"], "third");
        let out = transcript(console);
        assert_eq!(out.matches("Please enter a row number between 0 and 2.").count(), 3);
        assert!(out.contains("Row 1 deleted: 2024-01-01, Food, 1, second"));
        assert!(out.contains("  description  second"));
    }

    #[test]
    fn test_delete_row_declined_leaves_table() {
        let mut table = three_rows();
        let before = table.clone();
        let mut console = scripted("0\nn\n");
        assert!(!delete_row(&mut table, &mut console).unwrap());
        assert_eq!(table, before);
        assert!(transcript(console).contains("Row not deleted."));
    }

    #[test]
    fn test_delete_row_on_empty_table() {
        let mut table = Table::default();
        let mut console = scripted("");
        assert!(!delete_row(&mut table, &mut console).unwrap());
        assert!(transcript(console).contains("There are no rows to delete."));
    }

    #[test]
    fn test_delete_column_case_insensitive() {
        let mut table = three_rows();
        let mut console = scripted("nope\nDESCRIPTION\nyes\n");
        assert!(delete_column(&mut table, &mut console).unwrap());
        assert_eq!(table.columns(), &strings(&["date", "category", "amount"]));
        assert!(transcript(console).contains("There is no column named 'nope'."));
    }

    #[test]
    fn test_delete_column_refused_for_last_column() {
        let mut table = Table::from_parts(strings(&["only"]), Vec::new()).unwrap();
        let mut console = scripted("only\ny\n");
        assert!(!delete_column(&mut table, &mut console).unwrap());
        assert_eq!(table.column_count(), 1);
        assert!(transcript(console).contains("only one column left"));
    }

    #[test]
    fn test_delete_column_declined() {
        let mut table = three_rows();
        let mut console = scripted("amount\nn\n");
        assert!(!delete_column(&mut table, &mut console).unwrap());
        assert_eq!(table.column_count(), 4);
    }
}
