use std::fmt;

use anyhow::Result;
use console::{measure_text_width, style};
use crossterm::terminal;
use inquire::Select;

use spaces_refs::layout::{Align, Column, DisplayConfig, RowDisplay, select_display};
use spaces_refs::pathfmt;
use spaces_refs::quota::{self, Usage};
use spaces_refs::resource::Resource;

#[derive(Debug, Clone)]
struct UiOption<T> {
    value: T,
    line: String,
}

impl<T> fmt::Display for UiOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line)
    }
}

/// A rendered row, kept with its source resource for the detail view.
#[derive(Debug, Clone)]
pub struct Row<'a> {
    pub resource: &'a Resource,
    pub display: RowDisplay,
    pub lines: Vec<String>,
}

pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("info").dim(), msg);
}

pub fn print_warn(msg: &str) {
    eprintln!("{} {}", style("warn").yellow(), msg);
}

pub fn terminal_width() -> usize {
    terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(120)
        .clamp(40, 240)
}

pub fn build_rows<'a>(
    resources: &[&'a Resource],
    layout: &DisplayConfig,
    total: usize,
) -> Vec<Row<'a>> {
    let max_width = layout.truncated_width(total).saturating_sub(1).max(1);
    resources
        .iter()
        .map(|&resource| {
            let display = select_display(resource, layout.mode, max_width);
            let lines = render_row(resource, &display, layout, total);
            Row {
                resource,
                display,
                lines,
            }
        })
        .collect()
}

/// Lay out one row per `layout`'s columns. The second line, if any, is
/// indented under the name column.
pub fn render_row(
    resource: &Resource,
    row: &RowDisplay,
    layout: &DisplayConfig,
    total: usize,
) -> Vec<String> {
    let mut cells = Vec::new();
    for (spec, width) in layout.column_widths(total) {
        // One space of gutter between columns.
        let width = width.saturating_sub(1);
        let text = match spec.column {
            Column::Name => row.primary.clone(),
            Column::Source => row.secondary.clone().unwrap_or_else(|| "-".to_string()),
            Column::Size => resource
                .file_size
                .map(quota::format_bytes)
                .unwrap_or_else(|| "-".to_string()),
            Column::Actions => resource.kind.icon().to_string(),
        };
        cells.push(pad(&text, width, spec.align));
    }
    let mut lines = vec![cells.join(" ").trim_end().to_string()];
    if layout.second_line
        && let Some(second) = row.second_line.as_deref()
    {
        lines.push(format!("  {second}"));
    }
    lines
}

pub fn print_rows(rows: &[Row<'_>]) {
    for row in rows {
        let mut lines = row.lines.iter();
        if let Some(first) = lines.next() {
            if row.display.hidden.is_empty() {
                println!("{first}");
            } else {
                println!("{first} {}", style("…").dim());
            }
        }
        for line in lines {
            println!("{}", style(line).dim());
        }
    }
}

pub fn pick_row<'a>(rows: &[Row<'a>]) -> Result<Row<'a>> {
    let options = rows
        .iter()
        .cloned()
        .map(|r| UiOption {
            line: r.lines.join(" │ "),
            value: r,
        })
        .collect::<Vec<_>>();
    let picked = Select::new("Pick a reference:", options)
        .with_help_message("↑↓ to move, enter to show details, type to filter")
        .with_page_size(20.min(rows.len().max(1)))
        .prompt()?;
    Ok(picked.value)
}

pub fn print_detail(row: &Row<'_>) {
    let r = row.resource;
    println!("{}", style(&r.name).cyan().bold());
    println!("  {:<8} {} {}", style("kind").dim(), r.kind.icon(), r.kind);
    if let Some(source) = r.source() {
        println!("  {:<8} {}", style("source").dim(), source);
    }
    let size = r
        .file_size
        .map(quota::format_bytes)
        .unwrap_or_else(|| "-".to_string());
    println!("  {:<8} {}", style("size").dim(), size);
    println!("  {:<8} {}", style("full").dim(), row.display.tooltip);
    if row.display.hidden.is_empty() {
        println!("  {:<8} {}", style("hidden").dim(), style("none").dim());
    } else {
        println!("  {:<8} {}", style("hidden").dim(), row.display.hidden.join(" / "));
    }
}

pub fn print_usage(usage: &Usage, width: usize) {
    let bar_width = width.saturating_sub(usage.summary().chars().count() + 3).clamp(10, 40);
    let bar = usage_bar(usage.percentage, bar_width);
    let bar = if usage.exceeded {
        style(bar).red()
    } else if usage.percentage >= 80.0 {
        style(bar).yellow()
    } else {
        style(bar).green()
    };
    println!("[{bar}] {}", usage.summary());
}

fn usage_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

/// Fit `text` into `width` terminal cells. Wide glyphs such as the kind
/// icons count as two cells.
fn pad(text: &str, width: usize, align: Align) -> String {
    let text = if measure_text_width(text) > width {
        pathfmt::truncate_file_name(text, width)
    } else {
        text.to_string()
    };
    let fill = " ".repeat(width.saturating_sub(measure_text_width(&text)));
    match align {
        Align::Left => format!("{text}{fill}"),
        Align::Right => format!("{fill}{text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaces_refs::layout::DisplayMode;
    use spaces_refs::resource::ResourceKind;

    #[test]
    fn pads_and_clips_cells() {
        assert_eq!(pad("abc", 5, Align::Left), "abc  ");
        assert_eq!(pad("abc", 5, Align::Right), "  abc");
        assert_eq!(pad("LongComponent.tsx", 10, Align::Left), "Lon....tsx");
    }

    #[test]
    fn pads_wide_icons_by_cell_width() {
        let icon = ResourceKind::Folder.icon();
        assert_eq!(measure_text_width(icon), 2);
        assert_eq!(pad(icon, 4, Align::Right), format!("  {icon}"));
        assert_eq!(measure_text_width(&pad(icon, 4, Align::Left)), 4);
    }

    #[test]
    fn icon_column_keeps_rows_aligned() {
        let file = Resource::new("a.rs").with_size(10);
        let link = Resource::new("b.rs").with_size(10).with_kind(ResourceKind::Link);
        let layout = DisplayConfig::preset(DisplayMode::FilenameSource);
        let rows = build_rows(&[&file, &link], &layout, 80);
        assert_eq!(
            measure_text_width(&rows[0].lines[0]),
            measure_text_width(&rows[1].lines[0])
        );
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(usage_bar(50.0, 10), "#####.....");
        assert_eq!(usage_bar(0.0, 4), "....");
        assert_eq!(usage_bar(250.0, 4), "####");
    }

    #[test]
    fn renders_two_line_rows() {
        let r = Resource::new("docs/guide.md")
            .with_source("acme/handbook")
            .with_size(1536);
        let layout = DisplayConfig::preset(DisplayMode::TwoLine);
        let rows = build_rows(&[&r], &layout, 80);
        let lines = &rows[0].lines;
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("guide.md"));
        assert!(lines[0].contains("1.5 KB"));
        assert_eq!(lines[1], "  acme/handbook/docs");
    }

    #[test]
    fn renders_source_column() {
        let r = Resource::new("src/main.rs").with_source("acme/cli");
        let layout = DisplayConfig::preset(DisplayMode::FilenameSource);
        let rows = build_rows(&[&r], &layout, 80);
        let lines = &rows[0].lines;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("main.rs "));
        assert!(lines[0].contains("acme/cli/src"));
        assert!(lines[0].contains(" - "));
        assert!(rows[0].display.hidden.is_empty());
    }

    #[test]
    fn long_locations_are_truncated_to_their_column() {
        let r = Resource::new("src/components/editor/PromptEditor/PromptCanvas.tsx")
            .with_source("acme/prompt-studio");
        let layout = DisplayConfig::preset(DisplayMode::FullPathRepo);
        // Name column is 37 wide, 36 after the gutter.
        let rows = build_rows(&[&r], &layout, 60);
        assert_eq!(rows[0].display.primary, "src/components/.../PromptCanvas.tsx");
        assert!(rows[0].lines[0].starts_with("src/components/.../PromptCanvas.tsx "));
        assert!(rows[0].lines[0].contains(" acme "));
    }
}
