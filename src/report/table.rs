//! Bordered text grids for console output.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub align: Align,
}

impl Column {
    pub const fn text(header: &'static str) -> Self {
        Column {
            header,
            align: Align::Left,
        }
    }

    pub const fn number(header: &'static str) -> Self {
        Column {
            header,
            align: Align::Right,
        }
    }
}

struct Border {
    left: char,
    fill: char,
    joint: char,
    right: char,
}

const TOP: Border = Border { left: '╒', fill: '═', joint: '╤', right: '╕' };
const HEADER_RULE: Border = Border { left: '╞', fill: '═', joint: '╪', right: '╡' };
const ROW_RULE: Border = Border { left: '├', fill: '─', joint: '┼', right: '┤' };
const BOTTOM: Border = Border { left: '╘', fill: '═', joint: '╧', right: '╛' };

/// Render `rows` under `columns` with box-drawing borders. Rows shorter than
/// the column list are padded with empty cells.
pub fn render_grid(columns: &[Column], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.header.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() * 2 + 3);
    lines.push(rule(&TOP, &widths));
    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    lines.push(line(columns, &widths, &headers));
    lines.push(rule(&HEADER_RULE, &widths));

    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            lines.push(rule(&ROW_RULE, &widths));
        }
        let cells: Vec<&str> = (0..columns.len())
            .map(|c| row.get(c).map(String::as_str).unwrap_or(""))
            .collect();
        lines.push(line(columns, &widths, &cells));
    }

    lines.push(rule(&BOTTOM, &widths));
    lines.join("\n")
}

fn rule(border: &Border, widths: &[usize]) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|w| border.fill.to_string().repeat(w + 2))
        .collect();
    format!(
        "{}{}{}",
        border.left,
        segments.join(&border.joint.to_string()),
        border.right
    )
}

fn line(columns: &[Column], widths: &[usize], cells: &[&str]) -> String {
    let padded: Vec<String> = columns
        .iter()
        .zip(widths)
        .zip(cells)
        .map(|((column, &width), cell)| match column.align {
            Align::Left => format!(" {:<width$} ", cell, width = width),
            Align::Right => format!(" {:>width$} ", cell, width = width),
        })
        .collect();
    format!("│{}│", padded.join("│"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row_grid() {
        let columns = [Column::text("A"), Column::number("Num")];
        let rows = vec![vec!["x".to_string(), "5".to_string()]];
        let expected = [
            "╒═══╤═════╕",
            "│ A │ Num │",
            "╞═══╪═════╡",
            "│ x │   5 │",
            "╘═══╧═════╛",
        ]
        .join("\n");
        assert_eq!(render_grid(&columns, &rows), expected);
    }

    #[test]
    fn test_rows_separated_and_widened() {
        let columns = [Column::text("Name")];
        let rows = vec![vec!["Al".to_string()], vec!["Beatrice".to_string()]];
        let expected = [
            "╒══════════╕",
            "│ Name     │",
            "╞══════════╡",
            "│ Al       │",
            "├──────────┤",
            "│ Beatrice │",
            "╘══════════╛",
        ]
        .join("\n");
        assert_eq!(render_grid(&columns, &rows), expected);
    }

    #[test]
    fn test_empty_grid_has_header_only() {
        let columns = [Column::text("Exercise"), Column::number("Users")];
        let rendered = render_grid(&columns, &[]);
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.contains("Exercise"));
    }

    #[test]
    fn test_short_row_padded() {
        let columns = [Column::text("A"), Column::text("B")];
        let rows = vec![vec!["only".to_string()]];
        let rendered = render_grid(&columns, &rows);
        assert!(rendered.contains("│ only │   │"));
    }
}
