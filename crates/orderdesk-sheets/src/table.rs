//! In-memory copy of a worksheet as rows of display strings.

use std::collections::HashSet;

use orderdesk_core::SHEET_COLUMNS;

use crate::error::SheetsError;

/// Column the order log reads existing order numbers from.
pub const ORDER_NUMBER_COLUMN: &str = "Sales order number *";

/// A worksheet: one header row followed by data rows.
///
/// Data rows are padded to the header width so cells line up by index.
/// Blank rows between data rows are kept as placeholders so that writing the
/// table back never moves an existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Default for SheetTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl SheetTable {
    /// A table with the fulfillment header and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            header: SHEET_COLUMNS.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from the raw value grid returned by the API.
    ///
    /// The first row is the header. Trailing rows whose cells are all blank
    /// are dropped, as are blank trailing header cells; blank rows further
    /// up stay in place. A grid with no header yields [`SheetTable::empty`].
    #[must_use]
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut iter = values.into_iter();
        let Some(mut header) = iter.next() else {
            return Self::empty();
        };
        while header.last().is_some_and(|c| c.trim().is_empty()) {
            header.pop();
        }
        if header.is_empty() {
            return Self::empty();
        }

        let width = header.len();
        let mut rows: Vec<Vec<String>> = iter
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        while rows.last().is_some_and(|row| is_blank(row)) {
            rows.pop();
        }

        Self { header, rows }
    }

    /// Index of the header cell equal to `name`, ignoring surrounding
    /// whitespace.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }

    /// Distinct non-blank values of the order number column.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::MissingColumn`] if the header has no
    /// [`ORDER_NUMBER_COLUMN`].
    pub fn order_numbers(&self) -> Result<HashSet<String>, SheetsError> {
        let idx = self
            .column(ORDER_NUMBER_COLUMN)
            .ok_or_else(|| SheetsError::MissingColumn(ORDER_NUMBER_COLUMN.to_string()))?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(idx))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Appends rows below the existing ones, placing each cell under the
    /// header named by the same position in `columns`.
    ///
    /// Header columns the rows do not mention are left blank. A name in
    /// `columns` that the header lacks is added as a new header column,
    /// unless it is a required column (ending in `*`).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::MissingColumn`] if a required column is absent
    /// from the header. The table is unchanged in that case.
    pub fn append_rows<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        rows: impl IntoIterator<Item = Vec<String>>,
    ) -> Result<(), SheetsError> {
        let mut header = self.header.clone();
        let mut targets = Vec::with_capacity(columns.len());
        for name in columns {
            let name = name.as_ref().trim();
            let idx = match header.iter().position(|h| h.trim() == name) {
                Some(idx) => idx,
                None if name.ends_with('*') => {
                    return Err(SheetsError::MissingColumn(name.to_string()));
                }
                None => {
                    header.push(name.to_string());
                    header.len() - 1
                }
            };
            targets.push(idx);
        }

        let width = header.len();
        if width > self.header.len() {
            for row in &mut self.rows {
                if row.len() < width {
                    row.resize(width, String::new());
                }
            }
        }
        self.header = header;

        for row in rows {
            let mut placed = vec![String::new(); width];
            for (cell, &idx) in row.into_iter().zip(&targets) {
                placed[idx] = cell;
            }
            self.rows.push(placed);
        }
        Ok(())
    }

    /// Number of data rows, blank placeholders included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header followed by rows, the shape the values endpoint accepts.
    #[must_use]
    pub fn to_values(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn empty_grid_gets_standard_header() {
        let table = SheetTable::from_values(Vec::new());
        assert_eq!(table.header.len(), SHEET_COLUMNS.len());
        assert!(table.is_empty());
        assert!(table.order_numbers().unwrap().is_empty());
    }

    #[test]
    fn interior_blank_rows_are_kept_and_trailing_ones_dropped() {
        let table = SheetTable::from_values(grid(&[
            &["Channel *", "Sales order number *", "SKU *"],
            &["Influencer D2C", "MKT0101241"],
            &["", " ", ""],
            &["Influencer B2B", "SLS0101241", "X-1"],
            &[],
            &["", ""],
        ]));
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0], vec!["Influencer D2C", "MKT0101241", ""]);
        assert_eq!(table.rows[1], vec!["", " ", ""]);
        assert_eq!(table.rows[2][2], "X-1");
    }

    #[test]
    fn written_grid_covers_every_row_read() {
        let values = grid(&[
            &["Channel *", "Sales order number *"],
            &["a", "MKT0101241"],
            &[],
            &[],
            &["a", "MKT0101242"],
        ]);
        let read_rows = values.len();
        let mut table = SheetTable::from_values(values.clone());
        table
            .append_rows(
                &["Channel *", "Sales order number *"],
                vec![vec!["b".to_string(), "MKT0101243".to_string()]],
            )
            .unwrap();

        let written = table.to_values();
        assert_eq!(written.len(), read_rows + 1);
        for (i, row) in values.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                assert_eq!(&written[i][j], cell, "cell ({i}, {j}) moved");
            }
        }
        assert_eq!(written[read_rows][1], "MKT0101243");
    }

    #[test]
    fn order_numbers_are_distinct_and_trimmed() {
        let table = SheetTable::from_values(grid(&[
            &["Channel *", "Sales order number *"],
            &["a", "MKT0101241"],
            &["a", " MKT0101241 "],
            &["a", "MKT0101242"],
            &["a", ""],
        ]));
        let numbers = table.order_numbers().unwrap();
        assert_eq!(numbers.len(), 2);
        assert!(numbers.contains("MKT0101241"));
        assert!(numbers.contains("MKT0101242"));
    }

    #[test]
    fn missing_order_number_column_is_an_error() {
        let table = SheetTable::from_values(grid(&[&["Channel *", "SKU *"], &["a", "b"]]));
        assert!(matches!(
            table.order_numbers(),
            Err(SheetsError::MissingColumn(col)) if col == ORDER_NUMBER_COLUMN
        ));
    }

    #[test]
    fn append_then_values_keeps_existing_rows_first() {
        let mut table = SheetTable::from_values(grid(&[
            &["Channel *", "Sales order number *"],
            &["a", "OLD"],
        ]));
        table
            .append_rows(
                &["Channel *", "Sales order number *"],
                vec![vec!["b".to_string(), "NEW".to_string()]],
            )
            .unwrap();
        let values = table.to_values();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0][1], "Sales order number *");
        assert_eq!(values[1][1], "OLD");
        assert_eq!(values[2][1], "NEW");
    }

    #[test]
    fn appended_cells_follow_header_names_not_positions() {
        let mut table = SheetTable::from_values(grid(&[
            &["Sales order number *", "Notes", "Channel *"],
            &["MKT0101241", "", "Influencer D2C"],
        ]));
        table
            .append_rows(
                &["Channel *", "Sales order number *"],
                vec![vec!["Influencer B2B".to_string(), "MKT0101242".to_string()]],
            )
            .unwrap();
        assert_eq!(table.rows[1], vec!["MKT0101242", "", "Influencer B2B"]);
    }

    #[test]
    fn missing_optional_column_is_added_to_header() {
        let mut table = SheetTable::from_values(grid(&[
            &["Channel *", "Sales order number *"],
            &["Influencer D2C", "MKT0101241"],
        ]));
        table
            .append_rows(
                &["Sales order number *", "Lot"],
                vec![vec!["MKT0101242".to_string(), "L-7".to_string()]],
            )
            .unwrap();
        assert_eq!(table.header, vec!["Channel *", "Sales order number *", "Lot"]);
        assert_eq!(table.rows[0], vec!["Influencer D2C", "MKT0101241", ""]);
        assert_eq!(table.rows[1], vec!["", "MKT0101242", "L-7"]);
    }

    #[test]
    fn missing_required_column_leaves_table_unchanged() {
        let mut table = SheetTable::from_values(grid(&[
            &["Sales order number *"],
            &["MKT0101241"],
        ]));
        let before = table.clone();
        let err = table
            .append_rows(
                &["Sales order number *", "SKU *"],
                vec![vec!["MKT0101242".to_string(), "S-1".to_string()]],
            )
            .unwrap_err();
        assert!(matches!(err, SheetsError::MissingColumn(col) if col == "SKU *"));
        assert_eq!(table, before);
    }

    #[test]
    fn trailing_blank_header_cells_are_ignored() {
        let table = SheetTable::from_values(grid(&[&["Channel *", "Sales order number *", ""]]));
        assert_eq!(table.header.len(), 2);
        assert_eq!(table.column("Sales order number *"), Some(1));
        assert_eq!(table.column("Nope"), None);
    }
}
