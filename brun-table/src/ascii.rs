//! ASCII Rendering
//!
//! Display-only consumer of a table's row data: renders the rectangular
//! grid the runner prints after execution. Column widths come from the
//! widest rendered cell; absent cells render as blanks.

use crate::table::Table;

impl Table {
    /// Render this table as an ASCII grid. An empty table renders as an
    /// empty string.
    pub fn to_ascii(&self) -> String {
        let rows = self.rows();
        let Some(header) = rows.first() else {
            return String::new();
        };

        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                rows.iter()
                    .map(|row| row[i].render().chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let total = widths.iter().sum::<usize>() + 3 * header.len() + 1;
        let separator = format!("{}\n", "-".repeat(total));

        let mut out = String::new();
        out.push_str(&separator);
        render_row(&mut out, header, &widths);
        out.push_str(&separator);
        for row in &rows[1..] {
            render_row(&mut out, row, &widths);
        }
        out.push_str(&separator);
        out
    }
}

fn render_row(out: &mut String, row: &[crate::table::Cell], widths: &[usize]) {
    for (cell, width) in row.iter().zip(widths) {
        let s = cell.render();
        let pad = width.saturating_sub(s.chars().count());
        out.push_str("| ");
        out.push_str(&s);
        out.push_str(&" ".repeat(pad));
        out.push(' ');
    }
    out.push_str("|\n");
}
