//! Printing tables to a terminal in human-readable format (with
//! spaces for padding, and ANSI sequences for the title row), or as
//! TSV.

//! Does not escape anything in the fields, thus TSV output is not
//! safe if a value contains tabs or newlines (model names and cell
//! values never do).

use std::{fmt::Display, io::Write};

use anyhow::{anyhow, bail, Result};
use itertools::Itertools;
use yansi::{Paint, Style};

use crate::table_view::TableView;

/// If a value is wider than the defined column width for that value,
/// a single space is still printed between the value and the
/// next. The last column does not need a width, and no padding is
/// printed.
pub struct TerminalTable {
    widths: Vec<usize>,
    padding: String,
    /// Whether to print as TSV and omit printing ANSI codes and
    /// padding.
    pub tsv_mode: bool,
}

impl TerminalTable {
    /// The length of `widths` must be one less than the number of
    /// columns (the last column does not need a width).
    pub fn new(widths: &[usize], tsv_mode: bool) -> Self {
        let max_width = widths.iter().max().copied().unwrap_or(0);
        let padding = " ".repeat(max_width);
        Self {
            widths: widths.to_owned(),
            padding,
            tsv_mode,
        }
    }

    /// Widths fitting all values of `view`, plus 2 spaces of
    /// separation.
    pub fn for_table_view(view: &dyn TableView, tsv_mode: bool) -> Self {
        let mut widths: Vec<usize> = view
            .table_view_header()
            .iter()
            .map(|title| title.len())
            .collect();
        for row in view.table_view_body() {
            for (width, val) in widths.iter_mut().zip(&row) {
                *width = (*width).max(val.len());
            }
        }
        widths.pop();
        let widths: Vec<usize> = widths.into_iter().map(|w| w + 2).collect();
        Self::new(&widths, tsv_mode)
    }

    fn write_row<V: Display>(
        &self,
        row: &[V],
        line_style: Option<&Style>,
        out: &mut impl Write,
    ) -> Result<()> {
        let lens = (self.widths.len(), row.len());
        let (l1, l2) = lens;
        if l1
            != l2
                .checked_sub(1)
                .ok_or_else(|| anyhow!("need at least 1 column"))?
        {
            bail!("widths.len != data.len - 1: {lens:?}")
        }

        let mut is_first = true;
        for either_or_both in self.widths.iter().zip_longest(row) {
            if self.tsv_mode && !is_first {
                out.write_all(b"\t")?;
            }

            let val = either_or_both
                .as_ref()
                .right()
                .expect("value there because row len checked above");
            let s = val.to_string();
            let s_len = s.len();
            if let Some(style) = line_style {
                write!(out, "{}", s.paint(*style))?;
            } else {
                out.write_all(s.as_bytes())?;
            }

            if let Some(width) = either_or_both.left() {
                if !self.tsv_mode {
                    if *width > s_len {
                        let padding = &self.padding[0..width - s_len];
                        out.write_all(padding.as_bytes())?;
                    } else {
                        // write out at least 1 space anyway
                        out.write_all(b" ")?;
                    }
                }
            }

            is_first = false;
        }
        out.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_title_row<V: Display>(&self, titles: &[V], out: &mut impl Write) -> Result<()> {
        const STYLE: Style = Style::new().bold().italic();
        self.write_row(titles, if self.tsv_mode { None } else { Some(&STYLE) }, out)
    }

    pub fn write_data_row<V: Display>(&self, data: &[V], out: &mut impl Write) -> Result<()> {
        self.write_row(data, None, out)
    }
}

/// Print the table name on its own line, then the table.
pub fn print_table_view(view: &dyn TableView, tsv_mode: bool, out: &mut impl Write) -> Result<()> {
    let table = TerminalTable::for_table_view(view, tsv_mode);
    writeln!(out, "\n{}:", view.table_name())?;
    table.write_title_row(&view.table_view_header(), out)?;
    for row in view.table_view_body() {
        table.write_data_row(&row, out)?;
    }
    Ok(())
}
