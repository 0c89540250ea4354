//! Bordered text tables.

use std::fmt;

/// Horizontal alignment of body cells. Header cells are always centred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// A fixed-column text table rendered with `+---+` borders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    align: Align,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            align: Align::default(),
        }
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Appends a row. Missing cells render empty, extra cells are dropped.
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn widths(&self) -> Vec<usize> {
        self.header
            .iter()
            .enumerate()
            .map(|(col, title)| {
                self.rows
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn write_rule(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
        write!(f, "+")?;
        for width in widths {
            write!(f, "{}+", "-".repeat(width + 2))?;
        }
        writeln!(f)
    }

    fn write_row(
        f: &mut fmt::Formatter<'_>,
        widths: &[usize],
        cells: &[String],
        align: Align,
    ) -> fmt::Result {
        write!(f, "|")?;
        for (cell, width) in cells.iter().zip(widths) {
            match align {
                Align::Left => write!(f, " {:<width$} |", cell, width = width)?,
                Align::Center => write!(f, " {:^width$} |", cell, width = width)?,
                Align::Right => write!(f, " {:>width$} |", cell, width = width)?,
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        Self::write_rule(f, &widths)?;
        Self::write_row(f, &widths, &self.header, Align::Center)?;
        Self::write_rule(f, &widths)?;
        for row in &self.rows {
            Self::write_row(f, &widths, row, self.align)?;
        }
        if !self.rows.is_empty() {
            Self::write_rule(f, &widths)?;
        }
        Ok(())
    }
}
