use std::fmt;

use crate::error::Result;
use crate::table::Table;

/// One mutation of a [`Table`]. Every edit is validated before anything is
/// touched, so a failed edit leaves the table exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    AddRow(Vec<String>),
    AddColumn(String),
    DeleteRow(usize),
    DeleteColumn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    RowAdded { index: usize },
    ColumnAdded { name: String },
    RowDeleted { index: usize, values: Vec<String> },
    ColumnDeleted { name: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowAdded { index } => write!(f, "Row {index} added."),
            Self::ColumnAdded { name } => write!(f, "Column '{name}' added."),
            Self::RowDeleted { index, values } => {
                write!(f, "Row {index} deleted: {}", values.join(", "))
            }
            Self::ColumnDeleted { name } => write!(f, "Column '{name}' deleted."),
        }
    }
}

pub fn apply(table: &mut Table, edit: Edit) -> Result<Outcome> {
    let outcome = match edit {
        Edit::AddRow(values) => Outcome::RowAdded {
            index: table.push_row(values)?,
        },
        Edit::AddColumn(name) => {
            table.push_column(&name)?;
            Outcome::ColumnAdded { name }
        }
        Edit::DeleteRow(index) => Outcome::RowDeleted {
            index,
            values: table.remove_row(index)?,
        },
        Edit::DeleteColumn(name) => Outcome::ColumnDeleted {
            name: table.remove_column(&name)?,
        },
    };
    log::debug!("{outcome}");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_add_row_to_default_table() {
        let mut table = Table::default();
        let outcome = apply(
            &mut table,
            Edit::AddRow(strings(&["2024-01-01", "Food", "12.50", "Lunch"])),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::RowAdded { index: 0 });
        assert_eq!(table.len(), 1);
        assert_eq!(&table.row(0).unwrap()["amount"], "12.50");
    }

    #[test]
    fn test_add_column_to_empty_table() {
        let mut table = Table::from_parts(strings(&["A", "B"]), Vec::new()).unwrap();
        apply(&mut table, Edit::AddColumn("C".to_string())).unwrap();
        assert_eq!(table.columns(), &strings(&["A", "B", "C"]));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_add_then_delete_column_restores_table() {
        let mut table = Table::default();
        apply(
            &mut table,
            Edit::AddRow(strings(&["2024-01-01", "Food", "12.50", "Lunch"])),
        )
        .unwrap();
        let before = table.clone();

        apply(&mut table, Edit::AddColumn("Notes".to_string())).unwrap();
        let outcome = apply(&mut table, Edit::DeleteColumn("NOTES".to_string())).unwrap();

        assert_eq!(outcome, Outcome::ColumnDeleted { name: "Notes".to_string() });
        assert_eq!(table, before);
    }

    #[test]
    fn test_delete_row_shifts_indices() {
        let mut table = Table::default();
        for desc in ["first", "second", "third"] {
            apply(&mut table, Edit::AddRow(strings(&["", "", "", desc]))).unwrap();
        }
        let outcome = apply(&mut table, Edit::DeleteRow(1)).unwrap();
        assert!(matches!(outcome, Outcome::RowDeleted { index: 1, ref values } if values[3] == "second"));
        assert_eq!(table.len(), 2);
        assert_eq!(&table.row(1).unwrap()["description"], "third");
    }

    #[test]
    fn test_delete_last_column_leaves_table_untouched() {
        let mut table = Table::from_parts(strings(&["only"]), vec![strings(&["x"])]).unwrap();
        let before = table.clone();
        let err = apply(&mut table, Edit::DeleteColumn("only".to_string())).unwrap_err();
        assert!(matches!(err, TallyError::LastColumn));
        assert_eq!(table, before);
    }

    #[test]
    fn test_failed_edits_do_not_mutate() {
        let mut table = Table::default();
        let before = table.clone();
        assert!(apply(&mut table, Edit::AddRow(strings(&["too", "short"]))).is_err());
        assert!(apply(&mut table, Edit::AddColumn("date".to_string())).is_err());
        assert!(apply(&mut table, Edit::AddColumn("   ".to_string())).is_err());
        assert!(apply(&mut table, Edit::DeleteRow(0)).is_err());
        assert!(apply(&mut table, Edit::DeleteColumn("missing".to_string())).is_err());
        assert_eq!(table, before);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::RowAdded { index: 2 }.to_string(), "Row 2 added.");
        let deleted = Outcome::RowDeleted {
            index: 0,
            values: vec!["2024-01-01".to_string(), "Food".to_string()],
        };
        assert_eq!(deleted.to_string(), "Row 0 deleted: 2024-01-01, Food");
        assert_eq!(
            Outcome::ColumnDeleted { name: "notes".to_string() }.to_string(),
            "Column 'notes' deleted."
        );
    }
}
