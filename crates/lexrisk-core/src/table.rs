//! Column-driven data tables.
//!
//! A table is a list of column descriptors plus rows that can answer
//! `cell(key)`. Sorting is only allowed on columns marked sortable.

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("column is not sortable: {0}")]
    NotSortable(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A single cell's value, used both for display and for ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            CellValue::Number(n) => format!("{n:.2}"),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (CellValue::Empty, _) => Ordering::Less,
            (_, CellValue::Empty) => Ordering::Greater,
            (a, b) => a.display().cmp(&b.display()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n.into())
    }
}

impl From<u8> for CellValue {
    fn from(n: u8) -> Self {
        CellValue::Number(n.into())
    }
}

/// A row that can be looked up by column key.
pub trait TableRow {
    fn cell(&self, key: &str) -> CellValue;
}

impl<T: TableRow + ?Sized> TableRow for &T {
    fn cell(&self, key: &str) -> CellValue {
        (**self).cell(key)
    }
}

/// Column descriptor.
pub struct Column<R> {
    pub key: &'static str,
    pub title: &'static str,
    pub sortable: bool,
    /// Fixed display width in characters; sized to content when `None`.
    pub width: Option<usize>,
    pub align: Align,
    /// Custom display; the cell value is shown when `None`.
    pub render: Option<fn(&R) -> String>,
}

impl<R> Column<R> {
    pub fn new(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            sortable: false,
            width: None,
            align: Align::Left,
            render: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn render(mut self, render: fn(&R) -> String) -> Self {
        self.render = Some(render);
        self
    }
}

pub struct Table<R> {
    pub columns: Vec<Column<R>>,
}

impl<R: TableRow> Table<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self { columns }
    }

    /// Stable sort of `rows` by a sortable column.
    pub fn sort(&self, rows: &mut [R], key: &str, direction: SortDirection) -> Result<(), TableError> {
        let column = self
            .columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| TableError::UnknownColumn(key.to_string()))?;
        if !column.sortable {
            return Err(TableError::NotSortable(key.to_string()));
        }
        rows.sort_by(|a, b| {
            let ord = a.cell(key).compare(&b.cell(key));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        Ok(())
    }

    fn display_cell(column: &Column<R>, row: &R) -> String {
        match column.render {
            Some(render) => render(row),
            None => row.cell(column.key).display(),
        }
    }

    /// Lay the table out as aligned plain text, header first.
    pub fn render(&self, rows: &[R]) -> String {
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| self.columns.iter().map(|c| Self::display_cell(c, row)).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                c.width.unwrap_or_else(|| {
                    cells
                        .iter()
                        .map(|r| r[i].chars().count())
                        .chain(std::iter::once(c.title.chars().count()))
                        .max()
                        .unwrap_or(0)
                })
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self.columns.iter().map(|c| c.title.to_string()).collect();
        push_line(&mut out, &self.columns, &widths, &header);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &self.columns, &widths, &rule);
        for row in &cells {
            push_line(&mut out, &self.columns, &widths, row);
        }
        out
    }
}

fn push_line<R>(out: &mut String, columns: &[Column<R>], widths: &[usize], cells: &[String]) {
    let line: Vec<String> = columns
        .iter()
        .zip(widths)
        .zip(cells)
        .map(|((c, w), text)| pad(&fit(text, *w), *w, c.align))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut s: String = text.chars().take(width - 1).collect();
    s.push('…');
    s
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    let gap = width.saturating_sub(len);
    match align {
        Align::Left => format!("{text}{}", " ".repeat(gap)),
        Align::Right => format!("{}{text}", " ".repeat(gap)),
        Align::Center => {
            let left = gap / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}
