//! Pipe table assembly
//!
//! The render engine feeds cells into a [`TableBuilder`] as it walks `tr`,
//! `th` and `td` elements; the builder lays the finished table out as a
//! GitHub Flavored Markdown pipe table. The first row is the header row and
//! the delimiter row follows it.

/// Table column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// No alignment given: `---`
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Read alignment from `align` or `style="text-align: ..."`
    pub fn from_attributes(align: Option<&str>, style: Option<&str>) -> Self {
        if let Some(align) = align {
            return match align.trim().to_ascii_lowercase().as_str() {
                "left" => Alignment::Left,
                "center" => Alignment::Center,
                "right" => Alignment::Right,
                _ => Alignment::None,
            };
        }

        let Some(style) = style else {
            return Alignment::None;
        };
        let style = style.to_ascii_lowercase();
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            if property.trim() == "text-align" {
                return match value.trim() {
                    "left" | "start" => Alignment::Left,
                    "center" => Alignment::Center,
                    "right" | "end" => Alignment::Right,
                    _ => Alignment::None,
                };
            }
        }
        Alignment::None
    }

    /// Delimiter-row cell of the given width (at least 3)
    fn delimiter(self, width: usize) -> String {
        let width = width.max(3);
        match self {
            Alignment::None => "-".repeat(width),
            Alignment::Left => format!(":{}", "-".repeat(width - 1)),
            Alignment::Center => format!(":{}:", "-".repeat(width - 2)),
            Alignment::Right => format!("{}:", "-".repeat(width - 1)),
        }
    }
}

/// One table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub alignment: Alignment,
}

/// Collects rows and cells of one table
#[derive(Debug, Default)]
pub struct TableBuilder {
    rows: Vec<Vec<Cell>>,
    row_open: bool,
    caption: Option<String>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new row
    pub fn start_row(&mut self) {
        self.rows.push(Vec::new());
        self.row_open = true;
    }

    /// Close the current row
    pub fn end_row(&mut self) {
        self.row_open = false;
    }

    /// Add a cell to the current row, opening one if needed.
    ///
    /// Cell text is collapsed to a single line and pipes are escaped.
    pub fn push_cell(&mut self, text: &str, alignment: Alignment) {
        if !self.row_open {
            self.start_row();
        }
        let text = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .replace('|', "\\|");
        if let Some(row) = self.rows.last_mut() {
            row.push(Cell { text, alignment });
        }
    }

    pub fn set_caption(&mut self, caption: &str) {
        let caption = caption.split_whitespace().collect::<Vec<_>>().join(" ");
        if !caption.is_empty() {
            self.caption = Some(caption);
        }
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell texts row by row, joined with spaces.
    ///
    /// Used when a table is nested inside another table's cell, where a
    /// pipe table cannot be represented.
    pub fn flatten(&self) -> String {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(|cell| cell.text.as_str()))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lay out the table as Markdown, or `None` if it has no cells.
    ///
    /// With `pad` set, every column is padded to its widest cell.
    pub fn render(&self, pad: bool) -> Option<String> {
        let columns = self.column_count();
        if columns == 0 {
            return None;
        }
        let rows: Vec<&Vec<Cell>> = self.rows.iter().filter(|row| !row.is_empty()).collect();

        let alignments: Vec<Alignment> = (0..columns)
            .map(|i| rows[0].get(i).map(|cell| cell.alignment).unwrap_or_default())
            .collect();

        let widths: Vec<usize> = (0..columns)
            .map(|i| {
                if !pad {
                    return 3;
                }
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.text.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let mut output = String::new();
        for (index, row) in rows.iter().enumerate() {
            output.push('|');
            for (column, width) in widths.iter().enumerate() {
                let text = row.get(column).map(|cell| cell.text.as_str()).unwrap_or("");
                output.push(' ');
                output.push_str(text);
                if pad {
                    let used = text.chars().count();
                    output.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
                }
                output.push_str(" |");
            }
            output.push('\n');

            if index == 0 {
                output.push('|');
                for (alignment, width) in alignments.iter().zip(&widths) {
                    output.push(' ');
                    output.push_str(&alignment.delimiter(*width));
                    output.push_str(" |");
                }
                output.push('\n');
            }
        }

        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(rows: &[&[&str]]) -> TableBuilder {
        let mut table = TableBuilder::new();
        for row in rows {
            table.start_row();
            for cell in *row {
                table.push_cell(cell, Alignment::None);
            }
            table.end_row();
        }
        table
    }

    #[test]
    fn test_unpadded_table() {
        let table = builder(&[&["Name", "Age"], &["Ann", "7"]]);
        assert_eq!(
            table.render(false).as_deref(),
            Some("| Name | Age |\n| --- | --- |\n| Ann | 7 |\n")
        );
    }

    #[test]
    fn test_padded_table() {
        let table = builder(&[&["Name", "Age"], &["Annabel", "7"]]);
        assert_eq!(
            table.render(true).as_deref(),
            Some("| Name    | Age |\n| ------- | --- |\n| Annabel | 7   |\n")
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = builder(&[&["a", "b", "c"], &["1"]]);
        let rendered = table.render(false).expect("table has cells");
        assert!(rendered.ends_with("| 1 |  |  |\n"), "got: {rendered}");
    }

    #[test]
    fn test_alignment_delimiters() {
        let mut table = TableBuilder::new();
        table.push_cell("l", Alignment::Left);
        table.push_cell("c", Alignment::Center);
        table.push_cell("r", Alignment::Right);
        let rendered = table.render(false).expect("table has cells");
        assert!(rendered.contains("| :-- | :-: | --: |"), "got: {rendered}");
    }

    #[test]
    fn test_alignment_from_attributes() {
        assert_eq!(Alignment::from_attributes(Some("CENTER"), None), Alignment::Center);
        assert_eq!(
            Alignment::from_attributes(None, Some("color: red; text-align: right")),
            Alignment::Right
        );
        assert_eq!(Alignment::from_attributes(None, Some("color: red")), Alignment::None);
        assert_eq!(Alignment::from_attributes(None, None), Alignment::None);
    }

    #[test]
    fn test_pipes_escaped_and_whitespace_collapsed() {
        let mut table = TableBuilder::new();
        table.push_cell("a | b\n  c", Alignment::None);
        let rendered = table.render(false).expect("table has cells");
        assert!(rendered.starts_with("| a \\| b c |"), "got: {rendered}");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(TableBuilder::new().render(true), None);
        let mut rows_only = TableBuilder::new();
        rows_only.start_row();
        rows_only.end_row();
        assert_eq!(rows_only.render(true), None);
    }

    #[test]
    fn test_flatten_and_caption() {
        let mut table = builder(&[&["a", "b"], &["c", ""]]);
        table.set_caption("  The   caption ");
        assert_eq!(table.flatten(), "a b c");
        assert_eq!(table.caption(), Some("The caption"));
    }
}
