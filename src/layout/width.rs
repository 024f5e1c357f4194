use anyhow::{Result, bail};

pub const DEFAULT_MIN_PERCENT: f64 = 20.0;
pub const DEFAULT_MAX_PERCENT: f64 = 70.0;
pub const DEFAULT_LEFT_PERCENT: f64 = 34.0;

/// Floor, ceiling and starting value for the left pane width, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthBounds {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl Default for WidthBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PERCENT,
            max: DEFAULT_MAX_PERCENT,
            default: DEFAULT_LEFT_PERCENT,
        }
    }
}

impl WidthBounds {
    pub fn new(min: f64, max: f64, default: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && default.is_finite()) {
            bail!("Layout widths must be finite numbers");
        }
        if !(0.0 < min && min < max && max < 100.0) {
            bail!(
                "Layout bounds must satisfy 0 < min < max < 100 (got min={}, max={})",
                min,
                max
            );
        }
        if default < min || default > max {
            bail!(
                "Default left width {} is outside the bounds [{}, {}]",
                default,
                min,
                max
            );
        }
        Ok(Self { min, max, default })
    }

    pub fn clamp(&self, percent: f64) -> f64 {
        percent.max(self.min).min(self.max)
    }
}

/// Compute the left pane width after the pointer moved `delta` columns away
/// from where the drag started.
///
/// A missing, zero or non-finite container width leaves `start_percent`
/// untouched: the split row has not been laid out yet.
pub fn next_left_width(
    start_percent: f64,
    delta: f64,
    container_width: Option<f64>,
    bounds: &WidthBounds,
) -> f64 {
    let Some(total) = container_width else {
        return start_percent;
    };
    if total == 0.0 || !total.is_finite() {
        return start_percent;
    }
    let change = (delta / total) * 100.0;
    bounds.clamp(start_percent + change)
}

/// The left pane width as seen by the rest of the workspace.
#[derive(Debug, Clone)]
pub struct WidthModel {
    percent: f64,
    bounds: WidthBounds,
}

impl WidthModel {
    pub fn new(bounds: WidthBounds) -> Self {
        Self {
            percent: bounds.default,
            bounds,
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn bounds(&self) -> &WidthBounds {
        &self.bounds
    }

    /// Store a new width, snapping it into bounds.
    pub fn set(&mut self, percent: f64) {
        if percent.is_finite() {
            self.percent = self.bounds.clamp(percent);
        }
    }

    pub fn reset(&mut self) {
        self.percent = self.bounds.default;
    }

    /// Columns given to the left pane out of a split row `total` columns
    /// wide. The divider takes the column right after them.
    pub fn left_columns(&self, total: u16) -> u16 {
        let cols = (f64::from(total) * self.percent / 100.0).round() as u16;
        cols.min(total.saturating_sub(1))
    }
}

impl Default for WidthModel {
    fn default() -> Self {
        Self::new(WidthBounds::default())
    }
}
