// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column-aligned text tables.

use crate::color;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Column {
    name: &'static str,
    align: Align,
    muted: bool,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Self { name, align: Align::Left, muted: false }
    }

    pub fn right(name: &'static str) -> Self {
        Self { name, align: Align::Right, muted: false }
    }

    /// Left-aligned, cells printed in the muted color.
    pub fn muted(name: &'static str) -> Self {
        Self { name, align: Align::Left, muted: true }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Add a row. Missing cells render empty, extra cells are dropped.
    pub fn row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.columns.len(), String::new());
        for (cell, column) in cells.iter_mut().zip(&self.columns) {
            if column.muted {
                *cell = color::muted(cell);
            }
        }
        self.rows.push(cells);
    }

    pub fn render(&self, out: &mut (impl Write + ?Sized)) {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .map(|row| color::visible_len(&row[i]))
                    .chain(std::iter::once(column.name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self.columns.iter().map(|c| color::header(c.name)).collect();
        self.write_row(out, &header, &widths);
        for row in &self.rows {
            self.write_row(out, row, &widths);
        }
    }

    fn write_row(&self, out: &mut (impl Write + ?Sized), cells: &[String], widths: &[usize]) {
        let mut line = String::new();
        for (i, (cell, column)) in cells.iter().zip(&self.columns).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let pad = " ".repeat(widths[i].saturating_sub(color::visible_len(cell)));
            match column.align {
                Align::Left => {
                    line.push_str(cell);
                    line.push_str(&pad);
                }
                Align::Right => {
                    line.push_str(&pad);
                    line.push_str(cell);
                }
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
