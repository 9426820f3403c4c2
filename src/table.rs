//! Table reconstruction.
//!
//! Recovers the grid of a table from its header cells and body rows, derives
//! per-column alignment and width, and emits a fixed-width pipe table.

use log::warn;

/// Column alignment declared on a header cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Right,
    Center,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(alignment: pulldown_cmark::Alignment) -> Self {
        match alignment {
            pulldown_cmark::Alignment::None => Alignment::None,
            pulldown_cmark::Alignment::Left => Alignment::Left,
            pulldown_cmark::Alignment::Right => Alignment::Right,
            pulldown_cmark::Alignment::Center => Alignment::Center,
        }
    }
}

/// A rendered header cell together with its column's alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub text: String,
    pub alignment: Alignment,
}

impl HeaderCell {
    pub fn new(text: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            text: text.into(),
            alignment,
        }
    }
}

/// A table rebuilt from its rendered cells, ready to be laid out.
///
/// Body rows never hold more cells than there are header columns, but may
/// hold fewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header_cells: Vec<String>,
    pub alignments: Vec<Alignment>,
    pub column_widths: Vec<usize>,
    pub body_rows: Vec<Vec<String>>,
}

impl Table {
    /// Rebuild the grid from a header and body rows.
    ///
    /// Rows without cells are dropped and every row is truncated to the header's
    /// column count. Each column's width is the widest cell found in it, a row
    /// that stops short contributing nothing to the columns it lacks.
    pub fn rebuild(header: &[HeaderCell], body: &[Vec<String>]) -> Self {
        let columns = header.len();
        if columns == 0 {
            warn!("table has no header columns, rendering an empty grid");
        }

        let header_cells: Vec<String> = header.iter().map(|cell| cell.text.clone()).collect();
        let alignments: Vec<Alignment> = header.iter().map(|cell| cell.alignment).collect();

        let body_rows: Vec<Vec<String>> = body
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| {
                if row.len() > columns {
                    warn!(
                        "dropping {} cell(s) beyond the {columns} header column(s)",
                        row.len() - columns
                    );
                }
                row.iter().take(columns).cloned().collect()
            })
            .collect();

        let mut column_widths: Vec<usize> = header_cells.iter().map(|c| display_width(c)).collect();
        for row in &body_rows {
            for (width, cell) in column_widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }

        Self {
            header_cells,
            alignments,
            column_widths,
            body_rows,
        }
    }

    /// Lay the table out as Markdown: a leading blank line, the header, the
    /// separator, the body rows, then a blank line.
    pub fn render(&self) -> String {
        let header = self.render_row(&self.header_cells);

        let separator: Vec<String> = self
            .alignments
            .iter()
            .zip(&self.column_widths)
            .map(|(&alignment, &width)| separator_cell(alignment, width + 2))
            .collect();
        let separator = pipe_join(&separator);

        let body: Vec<String> = self.body_rows.iter().map(|row| self.render_row(row)).collect();
        let body = body.join("\n");

        format!("\n{header}\n{separator}\n{body}\n\n")
    }

    fn render_row(&self, cells: &[String]) -> String {
        let cells: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                justify(cell, self.column_widths[column] + 2, self.alignments[column])
            })
            .collect();
        pipe_join(&cells)
    }
}

/// Width of a cell's text, in characters
fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn pipe_join(cells: &[String]) -> String {
    format!("|{}|", cells.join("|"))
}

/// Pad `cell` to `width`, which includes one space of padding on each side.
fn justify(cell: &str, width: usize, alignment: Alignment) -> String {
    match alignment {
        Alignment::Center => center(cell, width),
        Alignment::Right => format!("{} ", pad_start(cell, width - 1)),
        Alignment::Left | Alignment::None => format!(" {}", pad_end(cell, width - 1)),
    }
}

fn separator_cell(alignment: Alignment, width: usize) -> String {
    match alignment {
        Alignment::Center => format!(":{}:", "-".repeat(width - 2)),
        Alignment::Right => format!("{}:", "-".repeat(width - 1)),
        Alignment::Left => format!(":{}", "-".repeat(width - 1)),
        Alignment::None => "-".repeat(width),
    }
}

fn pad_start(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{text}", " ".repeat(fill))
}

fn pad_end(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// Center `text` in `width` columns.
///
/// An odd margin puts the extra space on the right, unless `width` is odd too,
/// in which case it goes on the left.
fn center(text: &str, width: usize) -> String {
    let margin = width.saturating_sub(display_width(text));
    let left = margin / 2 + (margin & width & 1);
    format!("{}{text}{}", " ".repeat(left), " ".repeat(margin - left))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header(cells: &[(&str, Alignment)]) -> Vec<HeaderCell> {
        cells
            .iter()
            .map(|&(text, alignment)| HeaderCell::new(text, alignment))
            .collect()
    }

    #[test]
    fn rebuild_records_alignments_and_widths() {
        let table = Table::rebuild(
            &header(&[("A", Alignment::Left), ("Bb", Alignment::None)]),
            &[row(&["xyz", "1"])],
        );
        assert_eq!(table.header_cells, vec!["A", "Bb"]);
        assert_eq!(table.alignments, vec![Alignment::Left, Alignment::None]);
        assert_eq!(table.column_widths, vec![3, 2]);
    }

    #[test]
    fn alignments_drive_separator_and_padding() {
        let table = Table::rebuild(
            &header(&[
                ("Left", Alignment::Left),
                ("Center", Alignment::Center),
                ("Right", Alignment::Right),
                ("None", Alignment::None),
            ]),
            &[row(&["a", "b", "c", "d"])],
        );
        assert_eq!(
            table.render(),
            "\n\
             | Left | Center | Right | None |\n\
             |:-----|:------:|------:|------|\n\
             | a    |   b    |     c | d    |\n\n"
        );
    }

    #[test]
    fn longest_body_cell_sets_column_width() {
        let table = Table::rebuild(
            &header(&[("H", Alignment::Right), ("I", Alignment::Center)]),
            &[row(&["short", "x"]), row(&["much longer", "wide cell"])],
        );
        assert_eq!(table.column_widths, vec![11, 9]);
        let rendered = table.render();
        for line in rendered.lines().filter(|l| !l.is_empty()) {
            let cells: Vec<&str> = line.trim_matches('|').split('|').collect();
            assert_eq!(cells[0].chars().count(), 13, "{line}");
            assert_eq!(cells[1].chars().count(), 11, "{line}");
        }
        assert!(rendered.contains("|           H |"));
        assert!(rendered.contains("| much longer |"));
        assert!(rendered.contains("|------------:|:---------:|"));
    }

    #[test]
    fn no_body_rows() {
        let table = Table::rebuild(&header(&[("Only", Alignment::None)]), &[]);
        assert_eq!(table.render(), "\n| Only |\n|------|\n\n\n");
    }

    #[test]
    fn short_rows_are_kept_short() {
        let table = Table::rebuild(
            &header(&[("A", Alignment::None), ("B", Alignment::None)]),
            &[row(&["1"]), row(&["2", "3"])],
        );
        assert_eq!(table.body_rows, vec![row(&["1"]), row(&["2", "3"])]);
        assert_eq!(table.render(), "\n| A | B |\n|---|---|\n| 1 |\n| 2 | 3 |\n\n");
    }

    #[test]
    fn extra_cells_are_dropped() {
        let table = Table::rebuild(
            &header(&[("A", Alignment::None)]),
            &[row(&["1", "a much wider surplus cell"])],
        );
        assert_eq!(table.body_rows, vec![row(&["1"])]);
        assert_eq!(table.column_widths, vec![1]);
    }

    #[test]
    fn empty_rows_are_dropped() {
        let table = Table::rebuild(&header(&[("A", Alignment::None)]), &[vec![], row(&["1"])]);
        assert_eq!(table.body_rows, vec![row(&["1"])]);
    }

    #[test]
    fn zero_columns() {
        let table = Table::rebuild(&[], &[row(&["ignored"])]);
        assert!(table.column_widths.is_empty());
        assert_eq!(table.render(), "\n||\n||\n||\n\n");
    }

    #[test]
    fn cells_may_contain_former_markers() {
        let table = Table::rebuild(
            &header(&[(":cell:", Alignment::None), ("x:c:", Alignment::None)]),
            &[row(&[":row:", "y"])],
        );
        assert_eq!(table.header_cells, vec![":cell:", "x:c:"]);
        assert_eq!(table.alignments, vec![Alignment::None, Alignment::None]);
        assert_eq!(table.body_rows, vec![row(&[":row:", "y"])]);
    }

    #[test]
    fn width_counts_characters() {
        let table = Table::rebuild(&header(&[("été", Alignment::None)]), &[]);
        assert_eq!(table.column_widths, vec![3]);
    }

    #[test]
    fn centering_breaks_ties_on_width_parity() {
        assert_eq!(center("b", 8), "   b    ");
        assert_eq!(center("ab", 7), "   ab  ");
        assert_eq!(center("abc", 7), "  abc  ");
        assert_eq!(center("ab", 5), "  ab ");
    }
}
