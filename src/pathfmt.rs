//! Fitting `/`-delimited paths into a fixed character budget.
//!
//! Widths are counted in `char`s, so a multi-byte segment costs the same as
//! an ASCII one. Every function here is total: any `&str` and any width is
//! accepted, with a width of zero treated as one.

pub const ELLIPSIS: &str = "...";

/// Result of fitting a path into a width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// Text to render.
    pub display: String,
    /// Names that were elided, in the order they appear in the input.
    pub hidden: Vec<String>,
    /// The untruncated input.
    pub tooltip: String,
}

impl Truncation {
    fn unchanged(path: &str) -> Self {
        Self {
            display: path.to_string(),
            hidden: Vec::new(),
            tooltip: path.to_string(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        !self.hidden.is_empty()
    }
}

/// Same as [`truncate_middle`] with the file name taking priority.
pub fn truncate(path: &str, max_width: usize) -> Truncation {
    truncate_middle(path, max_width, true)
}

/// Elide directories from the middle of `path` until it fits `max_width`.
///
/// The first folder and the file name anchor the result
/// (`src/.../Button.tsx`). Remaining budget is spent greedily: folders
/// from the front first, then folders nearest to the file name, each
/// addition tested on its own and the scan stopping at the first one that
/// does not fit.
///
/// When even `first/.../file` is too wide, `prioritize_end` picks which
/// side survives: the file name (`.../file`) or the first folder
/// (`first/...`). If that still does not fit, the surviving name is cut so
/// the result is exactly `max_width` wide.
pub fn truncate_middle(path: &str, max_width: usize, prioritize_end: bool) -> Truncation {
    let max_width = max_width.max(1);
    if width(path) <= max_width {
        return Truncation::unchanged(path);
    }

    let (folders, file_name) = split_segments(path);
    if folders.is_empty() {
        return Truncation {
            display: clip_end(file_name, max_width),
            hidden: vec![file_name.to_string()],
            tooltip: path.to_string(),
        };
    }

    let minimal = compose(&folders[..1], &[], file_name);
    if width(&minimal) > max_width {
        return if prioritize_end {
            keep_file_name(path, &folders, file_name, max_width)
        } else {
            keep_first_folder(path, &folders, file_name, max_width)
        };
    }

    let mut front = 1;
    while front < folders.len()
        && width(&compose(&folders[..front + 1], &[], file_name)) <= max_width
    {
        front += 1;
    }

    // `back_start` is the index of the first folder shown after the ellipsis.
    let mut back_start = folders.len();
    while back_start > front
        && width(&compose(&folders[..front], &folders[back_start - 1..], file_name)) <= max_width
    {
        back_start -= 1;
    }

    if front == back_start {
        return Truncation::unchanged(path);
    }

    Truncation {
        display: compose(&folders[..front], &folders[back_start..], file_name),
        hidden: to_owned(&folders[front..back_start]),
        tooltip: path.to_string(),
    }
}

fn keep_file_name(path: &str, folders: &[&str], file_name: &str, max_width: usize) -> Truncation {
    let short = format!("{ELLIPSIS}/{file_name}");
    let display = if width(&short) <= max_width {
        short
    } else if max_width > ELLIPSIS.len() {
        let room = max_width - ELLIPSIS.len() - 1;
        format!("{ELLIPSIS}/{}", tail(file_name, room))
    } else {
        head(ELLIPSIS, max_width)
    };
    Truncation {
        display,
        hidden: to_owned(folders),
        tooltip: path.to_string(),
    }
}

fn keep_first_folder(
    path: &str,
    folders: &[&str],
    file_name: &str,
    max_width: usize,
) -> Truncation {
    let first = folders[0];
    let short = format!("{first}/{ELLIPSIS}");
    let display = if width(&short) <= max_width {
        short
    } else if max_width > ELLIPSIS.len() {
        let room = max_width - ELLIPSIS.len() - 1;
        format!("{}/{ELLIPSIS}", head(first, room))
    } else {
        head(ELLIPSIS, max_width)
    };
    let mut hidden = to_owned(&folders[1..]);
    hidden.push(file_name.to_string());
    Truncation {
        display,
        hidden,
        tooltip: path.to_string(),
    }
}

/// Keep the tail of `path`: `.../` followed by as many trailing segments as
/// fit, nearest to the end first. The last segment is always kept; when
/// `.../last` would be no shorter than `path`, the last segment is clipped
/// on its own instead.
///
/// `char_width_factor` scales the measured width of a candidate, for
/// callers whose budget assumes a monospace cell but whose font averages
/// wider or narrower glyphs. Non-positive or non-finite factors count as 1.
pub fn truncate_start(path: &str, max_width: usize, char_width_factor: f64) -> Truncation {
    let max_width = max_width.max(1);
    let factor = if char_width_factor.is_finite() && char_width_factor > 0.0 {
        char_width_factor
    } else {
        1.0
    };
    let fits = |s: &str| width(s) as f64 * factor <= max_width as f64;
    if fits(path) {
        return Truncation::unchanged(path);
    }

    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let budget = ((max_width as f64 / factor).floor() as usize).max(1);
    if last == 0 {
        return Truncation {
            display: clip_end(path, budget),
            hidden: vec![path.to_string()],
            tooltip: path.to_string(),
        };
    }

    let mut start = last;
    while start > 1 {
        let candidate = format!("{ELLIPSIS}/{}", segments[start - 1..].join("/"));
        if !fits(&candidate) {
            break;
        }
        start -= 1;
    }

    let display = format!("{ELLIPSIS}/{}", segments[start..].join("/"));
    if width(&display) >= width(path) {
        // The prefix costs more than the parents it replaces.
        return Truncation {
            display: clip_end(segments[last], budget),
            hidden: to_owned(&segments[..last]),
            tooltip: path.to_string(),
        };
    }
    Truncation {
        display,
        hidden: to_owned(&segments[..start]),
        tooltip: path.to_string(),
    }
}

/// Shorten a bare file name, keeping its extension visible
/// (`VeryLongComponentName.tsx` at 16 -> `VeryLongC....tsx`).
pub fn truncate_file_name(name: &str, max_width: usize) -> String {
    let max_width = max_width.max(1);
    if width(name) <= max_width {
        return name.to_string();
    }
    let Some(dot) = name.rfind('.').filter(|&i| i > 0) else {
        return clip_end(name, max_width);
    };
    let (stem, ext) = name.split_at(dot);
    let room = max_width.saturating_sub(width(ext) + ELLIPSIS.len());
    if room == 0 {
        return clip_end(name, max_width);
    }
    format!("{}{ELLIPSIS}{ext}", head(stem, room))
}

/// Last segment of a `/`-delimited path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the last `/`, or `""` for a bare name.
pub fn dir_name(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..i]).unwrap_or("")
}

pub fn split_segments(path: &str) -> (Vec<&str>, &str) {
    let mut folders: Vec<&str> = path.split('/').collect();
    // `split` always yields at least one item.
    let file_name = folders.pop().unwrap_or_default();
    (folders, file_name)
}

fn compose(front: &[&str], back: &[&str], file_name: &str) -> String {
    let mut out = front.join("/");
    out.push('/');
    out.push_str(ELLIPSIS);
    for seg in back {
        out.push('/');
        out.push_str(seg);
    }
    out.push('/');
    out.push_str(file_name);
    out
}

fn clip_end(s: &str, max_width: usize) -> String {
    if width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        return head(ELLIPSIS, max_width);
    }
    format!("{}{ELLIPSIS}", head(s, max_width - ELLIPSIS.len()))
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn head(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn tail(s: &str, n: usize) -> String {
    s.chars().skip(width(s).saturating_sub(n)).collect()
}

fn to_owned(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}
