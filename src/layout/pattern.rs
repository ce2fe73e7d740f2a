use std::{fmt, str::FromStr};

use crate::foundation::{
    core::{FrameSpec, Point, Rect},
    error::{SceneError, SceneResult},
};

/// Minimum column count used by the snake pattern unless overridden.
pub const DEFAULT_MIN_COLS: usize = 6;
/// Gap used by row/column patterns when a descriptor omits `buff`.
pub const DEFAULT_BUFF: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Frame plus margins that bound a layout.
pub struct LayoutFrame {
    /// Visible frame.
    pub frame: FrameSpec,
    /// Horizontal margin on each side, as a fraction of the frame width.
    pub margin_x: f64,
    /// Vertical margin on each side, as a fraction of the frame height.
    pub margin_y: f64,
}

impl Default for LayoutFrame {
    fn default() -> Self {
        Self {
            frame: FrameSpec::default(),
            margin_x: 0.1,
            margin_y: 0.2,
        }
    }
}

impl LayoutFrame {
    /// Frame with fractional margins, each in `[0, 0.5)` of the frame size.
    pub fn new(frame: FrameSpec, margin_x: f64, margin_y: f64) -> SceneResult<Self> {
        for (name, m) in [("margin_x", margin_x), ("margin_y", margin_y)] {
            if !m.is_finite() || !(0.0..0.5).contains(&m) {
                return Err(SceneError::validation(format!(
                    "{name} must be in [0, 0.5), got {m}"
                )));
            }
        }
        Ok(Self {
            frame,
            margin_x,
            margin_y,
        })
    }

    /// Region items may occupy once margins are removed.
    pub fn usable(&self) -> Rect {
        let hw = self.frame.width * (0.5 - self.margin_x);
        let hh = self.frame.height * (0.5 - self.margin_y);
        Rect::new(-hw, -hh, hw, hh)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Geometric pattern used to place a run of items.
pub enum LayoutPattern {
    /// Row-major fill alternating direction on every row.
    Snake {
        /// Number of rows; the last may be partial.
        rows: usize,
        /// Lower bound on the column count.
        min_cols: usize,
    },
    /// Left-to-right row of equally wide items, centred.
    Row {
        /// Gap between neighbours.
        buff: f64,
        /// Width of every item.
        item_width: f64,
    },
    /// Top-to-bottom column of equally tall items, centred.
    Column {
        /// Gap between neighbours.
        buff: f64,
        /// Height of every item.
        item_height: f64,
    },
    /// Row-major fill, every row left-to-right.
    Grid {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },
}

impl LayoutPattern {
    /// Snake with the default minimum column count.
    pub fn snake(rows: usize) -> Self {
        Self::Snake {
            rows,
            min_cols: DEFAULT_MIN_COLS,
        }
    }

    /// Column count the snake pattern uses for `count` items.
    pub fn snake_columns(count: usize, rows: usize, min_cols: usize) -> usize {
        (count / rows.max(1) + 1).max(min_cols)
    }
}

/// Place `count` items on `pattern` inside `frame`.
///
/// The result has exactly `count` points, in item order. Identical inputs give identical output.
pub fn layout(
    count: usize,
    pattern: &LayoutPattern,
    frame: &LayoutFrame,
) -> SceneResult<Vec<Point>> {
    if count == 0 {
        return Err(SceneError::layout("layout needs at least one item"));
    }
    let area = frame.usable();
    match *pattern {
        LayoutPattern::Snake { rows, min_cols } => {
            if rows == 0 || min_cols == 0 {
                return Err(SceneError::layout("snake rows and min_cols must be >= 1"));
            }
            let cols = LayoutPattern::snake_columns(count, rows, min_cols);
            Ok(fill_rows(count, rows, cols, area, true))
        }
        LayoutPattern::Grid { rows, cols } => {
            if rows == 0 || cols == 0 {
                return Err(SceneError::layout("grid rows and cols must be >= 1"));
            }
            if rows.saturating_mul(cols) < count {
                return Err(SceneError::layout(format!(
                    "grid {rows}x{cols} cannot hold {count} items"
                )));
            }
            Ok(fill_rows(count, rows, cols, area, false))
        }
        LayoutPattern::Row { buff, item_width } => {
            let offsets = stack_offsets(count, buff, item_width, area.width(), "row")?;
            let cy = area.center().y;
            Ok(offsets
                .into_iter()
                .map(|dx| Point::new(area.center().x + dx, cy))
                .collect())
        }
        LayoutPattern::Column { buff, item_height } => {
            let offsets = stack_offsets(count, buff, item_height, area.height(), "column")?;
            let cx = area.center().x;
            // Offsets run low-to-high; columns read top-to-bottom.
            Ok(offsets
                .into_iter()
                .map(|dy| Point::new(cx, area.center().y - dy))
                .collect())
        }
    }
}

fn fill_rows(count: usize, rows: usize, cols: usize, area: Rect, alternate: bool) -> Vec<Point> {
    let x_spacing = if cols > 1 {
        area.width() / (cols - 1) as f64
    } else {
        0.0
    };
    let y_spacing = if rows > 1 {
        area.height() / (rows - 1) as f64
    } else {
        0.0
    };
    let start_x = if cols > 1 { area.x0 } else { area.center().x };
    let start_y = if rows > 1 { area.y1 } else { area.center().y };

    let mut out = Vec::with_capacity(count);
    'rows: for row in 0..rows {
        for col in 0..cols {
            if out.len() >= count {
                break 'rows;
            }
            let slot = if alternate && row % 2 == 1 {
                cols - 1 - col
            } else {
                col
            };
            out.push(Point::new(
                start_x + slot as f64 * x_spacing,
                start_y - row as f64 * y_spacing,
            ));
        }
    }
    out
}

fn stack_offsets(
    count: usize,
    buff: f64,
    extent: f64,
    available: f64,
    what: &str,
) -> SceneResult<Vec<f64>> {
    if !buff.is_finite() || buff < 0.0 {
        return Err(SceneError::layout(format!("{what} buff must be finite and >= 0")));
    }
    if !extent.is_finite() || extent <= 0.0 {
        return Err(SceneError::layout(format!("{what} item size must be finite and > 0")));
    }
    let total = count as f64 * extent + (count - 1) as f64 * buff;
    if total > available + 1e-9 {
        return Err(SceneError::layout(format!(
            "{what} of {count} items spans {total:.3} units but only {available:.3} are available"
        )));
    }
    let first = -total * 0.5 + extent * 0.5;
    Ok((0..count)
        .map(|i| first + i as f64 * (extent + buff))
        .collect())
}

impl fmt::Display for LayoutPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snake { rows, min_cols } => write!(f, "snake rows={rows} min_cols={min_cols}"),
            Self::Row { buff, item_width } => write!(f, "row buff={buff} width={item_width}"),
            Self::Column { buff, item_height } => {
                write!(f, "column buff={buff} height={item_height}")
            }
            Self::Grid { rows, cols } => write!(f, "grid rows={rows} cols={cols}"),
        }
    }
}

impl FromStr for LayoutPattern {
    type Err = SceneError;

    /// Parse a descriptor such as `"snake grid rows=4"` or `"row buff=1.2 width=0.8"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let kind = tokens
            .next()
            .ok_or_else(|| SceneError::validation("layout descriptor must be non-empty"))?
            .to_ascii_lowercase();

        let mut params = Params::default();
        let mut first = true;
        for tok in tokens {
            // `snake grid rows=4` reads naturally; the extra word carries no meaning.
            if first && kind == "snake" && tok.eq_ignore_ascii_case("grid") {
                first = false;
                continue;
            }
            first = false;
            let (key, value) = tok.split_once('=').ok_or_else(|| {
                SceneError::validation(format!("expected key=value in layout descriptor, got '{tok}'"))
            })?;
            params.set(&key.to_ascii_lowercase(), value)?;
        }

        let pattern = match kind.as_str() {
            "snake" => {
                params.only(&["rows", "min_cols"], "snake")?;
                LayoutPattern::Snake {
                    rows: params.rows.unwrap_or(4),
                    min_cols: params.min_cols.unwrap_or(DEFAULT_MIN_COLS),
                }
            }
            "row" => {
                params.only(&["buff", "width"], "row")?;
                LayoutPattern::Row {
                    buff: params.buff.unwrap_or(DEFAULT_BUFF),
                    item_width: params.width.unwrap_or(1.0),
                }
            }
            "column" => {
                params.only(&["buff", "height"], "column")?;
                LayoutPattern::Column {
                    buff: params.buff.unwrap_or(DEFAULT_BUFF),
                    item_height: params.height.unwrap_or(1.0),
                }
            }
            "grid" => {
                params.only(&["rows", "cols"], "grid")?;
                let (Some(rows), Some(cols)) = (params.rows, params.cols) else {
                    return Err(SceneError::validation("grid needs both rows= and cols="));
                };
                LayoutPattern::Grid { rows, cols }
            }
            other => {
                return Err(SceneError::validation(format!(
                    "unknown layout kind '{other}'"
                )));
            }
        };

        match pattern {
            LayoutPattern::Snake { rows: 0, .. } | LayoutPattern::Grid { rows: 0, .. } => {
                Err(SceneError::validation("rows must be >= 1"))
            }
            _ => Ok(pattern),
        }
    }
}

#[derive(Default)]
struct Params {
    rows: Option<usize>,
    cols: Option<usize>,
    min_cols: Option<usize>,
    buff: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    seen: Vec<String>,
}

impl Params {
    fn set(&mut self, key: &str, value: &str) -> SceneResult<()> {
        fn int(key: &str, v: &str) -> SceneResult<usize> {
            v.parse::<usize>()
                .map_err(|_| SceneError::validation(format!("{key} must be an integer, got '{v}'")))
        }
        fn float(key: &str, v: &str) -> SceneResult<f64> {
            let f = v
                .parse::<f64>()
                .map_err(|_| SceneError::validation(format!("{key} must be a number, got '{v}'")))?;
            if !f.is_finite() {
                return Err(SceneError::validation(format!("{key} must be finite")));
            }
            Ok(f)
        }

        match key {
            "rows" => self.rows = Some(int(key, value)?),
            "cols" => self.cols = Some(int(key, value)?),
            "min_cols" => self.min_cols = Some(int(key, value)?),
            "buff" => self.buff = Some(float(key, value)?),
            "width" => self.width = Some(float(key, value)?),
            "height" => self.height = Some(float(key, value)?),
            other => {
                return Err(SceneError::validation(format!(
                    "unknown layout parameter '{other}'"
                )));
            }
        }
        self.seen.push(key.to_owned());
        Ok(())
    }

    fn only(&self, allowed: &[&str], kind: &str) -> SceneResult<()> {
        match self.seen.iter().find(|k| !allowed.contains(&k.as_str())) {
            Some(k) => Err(SceneError::validation(format!(
                "parameter '{k}' does not apply to {kind} layouts"
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/pattern.rs"]
mod tests;
