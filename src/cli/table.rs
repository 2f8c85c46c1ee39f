/// How a column aligns its cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct TableColumn {
    pub header: String,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            alignment: Alignment::Right,
        }
    }
}

/// Plain-text table with per-column alignment, sized to its widest cell.
pub struct Table {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = column.header.chars().count();
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                width
            })
            .collect()
    }

    fn render_cells(&self, cells: &[String], widths: &[usize]) -> String {
        let rendered: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                match column.alignment {
                    Alignment::Left => format!("{:<width$}", cell, width = *width),
                    Alignment::Right => format!("{:>width$}", cell, width = *width),
                }
            })
            .collect();
        rendered.join("  ").trim_end().to_string()
    }

    /// Renders header, separator, and rows as display-ready lines.
    pub fn render(&self) -> Vec<String> {
        let widths = self.widths();
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let mut lines = vec![self.render_cells(&headers, &widths)];
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        lines.push(self.render_cells(&separator, &widths));
        for row in &self.rows {
            lines.push(self.render_cells(row, &widths));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_columns() {
        let mut table = Table::new(vec![
            TableColumn::left("Name"),
            TableColumn::right("Balance"),
        ]);
        table.push_row(vec!["Cash".into(), "1.000".into()]);
        table.push_row(vec!["Vietcombank".into(), "250".into()]);
        let lines = table.render();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Name         Balance");
        assert_eq!(lines[2], "Cash           1.000");
        assert_eq!(lines[3], "Vietcombank      250");
    }
}
