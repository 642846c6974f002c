//! Row layouts for the reference list.
//!
//! A [`DisplayMode`] decides which text goes in which column and which
//! piece of it gets squeezed by the path truncator; [`DisplayConfig`]
//! describes the columns themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pathfmt;
use crate::resource::Resource;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum DisplayMode {
    /// File name, then `source/dir` truncated in its own column.
    #[default]
    #[serde(rename = "by-filename+source")]
    #[value(name = "by-filename+source")]
    FilenameSource,

    /// Truncated full name, then the repository.
    #[serde(rename = "by-fullpath+repo")]
    #[value(name = "by-fullpath+repo")]
    FullPathRepo,

    /// File name with the truncated location on a second line.
    #[serde(rename = "two-line")]
    #[value(name = "two-line")]
    TwoLine,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::FilenameSource => "by-filename+source",
            DisplayMode::FullPathRepo => "by-fullpath+repo",
            DisplayMode::TwoLine => "two-line",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Source,
    Size,
    /// Per-row controls; a terminal shows the kind icon here.
    Actions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub column: Column,
    /// Relative width; only meaningful against the other visible columns.
    pub weight: u16,
    pub align: Align,
}

impl ColumnSpec {
    const fn new(column: Column, weight: u16, align: Align) -> Self {
        Self {
            column,
            weight,
            align,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub columns: Vec<ColumnSpec>,
    pub second_line: bool,
}

impl DisplayConfig {
    pub fn preset(mode: DisplayMode) -> Self {
        use Align::{Left, Right};
        use Column::{Actions, Name, Size, Source};

        let (columns, second_line) = match mode {
            DisplayMode::FilenameSource => (
                vec![
                    ColumnSpec::new(Name, 35, Left),
                    ColumnSpec::new(Source, 45, Left),
                    ColumnSpec::new(Size, 12, Right),
                    ColumnSpec::new(Actions, 8, Right),
                ],
                false,
            ),
            DisplayMode::FullPathRepo => (
                vec![
                    ColumnSpec::new(Name, 60, Left),
                    ColumnSpec::new(Source, 20, Left),
                    ColumnSpec::new(Size, 12, Right),
                    ColumnSpec::new(Actions, 8, Right),
                ],
                false,
            ),
            DisplayMode::TwoLine => (
                vec![
                    ColumnSpec::new(Name, 80, Left),
                    ColumnSpec::new(Size, 12, Right),
                    ColumnSpec::new(Actions, 8, Right),
                ],
                true,
            ),
        };
        Self {
            mode,
            columns,
            second_line,
        }
    }

    /// Split `total` characters between the columns by weight. Rounding
    /// leftovers go to the widest column so the row adds up to `total`.
    pub fn column_widths(&self, total: usize) -> Vec<(ColumnSpec, usize)> {
        let weights: usize = self.columns.iter().map(|c| c.weight as usize).sum();
        if weights == 0 {
            return self.columns.iter().map(|c| (*c, 0)).collect();
        }
        let mut out: Vec<(ColumnSpec, usize)> = self
            .columns
            .iter()
            .map(|c| (*c, total * c.weight as usize / weights))
            .collect();
        let used: usize = out.iter().map(|(_, w)| w).sum();
        if let Some(widest) = out.iter_mut().max_by_key(|(c, _)| c.weight) {
            widest.1 += total - used;
        }
        out
    }

    pub fn width_of(&self, column: Column, total: usize) -> Option<usize> {
        self.column_widths(total)
            .into_iter()
            .find(|(c, _)| c.column == column)
            .map(|(_, w)| w)
    }

    /// Width handed to [`select_display`] for a row `total` chars wide.
    pub fn truncated_width(&self, total: usize) -> usize {
        let column = match self.mode {
            DisplayMode::FilenameSource => Column::Source,
            DisplayMode::FullPathRepo | DisplayMode::TwoLine => Column::Name,
        };
        self.width_of(column, total).unwrap_or(total)
    }
}

/// Text for one list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDisplay {
    pub primary: String,
    pub secondary: Option<String>,
    pub second_line: Option<String>,
    /// Segments elided from whichever field was truncated.
    pub hidden: Vec<String>,
    /// Untruncated text of that field, for a detail view.
    pub tooltip: String,
}

pub fn select_display(resource: &Resource, mode: DisplayMode, max_width: usize) -> RowDisplay {
    match mode {
        DisplayMode::FilenameSource => {
            let location = location(resource);
            let t = location
                .as_deref()
                .map(|l| pathfmt::truncate(l, max_width));
            RowDisplay {
                primary: resource.file_name().to_string(),
                secondary: t.as_ref().map(|t| t.display.clone()),
                second_line: None,
                hidden: t.map(|t| t.hidden).unwrap_or_default(),
                tooltip: location.unwrap_or_else(|| resource.name.clone()),
            }
        }
        DisplayMode::FullPathRepo => {
            let t = pathfmt::truncate(&resource.name, max_width);
            RowDisplay {
                primary: t.display,
                secondary: resource.repo().map(str::to_string),
                second_line: None,
                hidden: t.hidden,
                tooltip: t.tooltip,
            }
        }
        DisplayMode::TwoLine => {
            let location = location(resource);
            let t = location
                .as_deref()
                .map(|l| pathfmt::truncate(l, max_width));
            RowDisplay {
                primary: resource.file_name().to_string(),
                secondary: None,
                second_line: t.as_ref().map(|t| t.display.clone()),
                hidden: t.map(|t| t.hidden).unwrap_or_default(),
                tooltip: location.unwrap_or_else(|| resource.name.clone()),
            }
        }
    }
}

/// `source/dir` with whichever half is missing dropped.
fn location(resource: &Resource) -> Option<String> {
    let dir = resource.dir_name();
    match (resource.source(), dir.is_empty()) {
        (Some(source), false) => Some(format!("{source}/{dir}")),
        (Some(source), true) => Some(source.to_string()),
        (None, false) => Some(dir.to_string()),
        (None, true) => None,
    }
}
