//! Reader controls embedded in every chunk page.

use serde::{Deserialize, Serialize};

/// One entry of a color `<select>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    /// CSS color value (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    pub value: String,
    /// Text shown in the dropdown.
    pub label: String,
}

impl ColorOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Initial values and limits of the page controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub font_size_px: u32,
    pub font_size_min_px: u32,
    pub font_size_max_px: u32,
    pub font_size_step_px: u32,

    pub line_height: f32,
    pub line_height_min: f32,
    pub line_height_max: f32,
    pub line_height_step: f32,

    /// Width of the central reading column.
    pub center_max_width_px: u32,

    pub text_color: String,
    pub center_background: String,
    pub left_background: String,
    pub right_background: String,

    pub text_colors: Vec<ColorOption>,
    pub center_backgrounds: Vec<ColorOption>,
    /// Shared by the left and right page regions.
    pub side_backgrounds: Vec<ColorOption>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            font_size_px: 16,
            font_size_min_px: 10,
            font_size_max_px: 36,
            font_size_step_px: 1,
            line_height: 1.6,
            line_height_min: 0.8,
            line_height_max: 3.0,
            line_height_step: 0.2,
            center_max_width_px: 1000,
            text_color: "#333333".to_string(),
            center_background: "#ffffff".to_string(),
            left_background: "#f5f5f5".to_string(),
            right_background: "#f5f5f5".to_string(),
            text_colors: vec![
                ColorOption::new("#111111", "Black"),
                ColorOption::new("#2F4F4F", "Dark slate gray (eye care)"),
                ColorOption::new("#333333", "Default dark gray"),
                ColorOption::new("#444444", "Medium gray"),
                ColorOption::new("#5B4636", "Warm brown (eye care)"),
                ColorOption::new("#0066cc", "Deep blue"),
                ColorOption::new("#006600", "Deep green (eye care)"),
                ColorOption::new("#8a2be2", "Purple"),
                ColorOption::new("#6B4423", "Soft brown (eye care)"),
                ColorOption::new("#4A4A4A", "Soft dark gray"),
            ],
            center_backgrounds: vec![
                ColorOption::new("#ffffff", "White"),
                ColorOption::new("#fffdf0", "Warm white"),
                ColorOption::new("#fffbe6", "Soft cream"),
                ColorOption::new("#ffffee", "Light yellow"),
                ColorOption::new("#f7fff7", "Eye-care green"),
                ColorOption::new("#f6f9ff", "Eye-care blue"),
            ],
            side_backgrounds: vec![
                ColorOption::new("#f5f5f5", "Light gray"),
                ColorOption::new("#ffffff", "White"),
                ColorOption::new("#fffdf0", "Warm white (eye care)"),
                ColorOption::new("#fffbe6", "Soft cream (eye care)"),
                ColorOption::new("#ffffee", "Light yellow (eye care)"),
                ColorOption::new("#f7fff7", "Eye-care green"),
                ColorOption::new("#f0fff0", "Honeydew"),
                ColorOption::new("#f6f9ff", "Eye-care blue"),
                ColorOption::new("#f7f0ff", "Light purple"),
                ColorOption::new("#eeeae0", "Beige gray"),
            ],
        }
    }
}

impl ViewerConfig {
    /// Clamp ranges, fix inverted limits and drop unusable colors.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();

        self.font_size_min_px = self.font_size_min_px.clamp(4, 200);
        self.font_size_max_px = self.font_size_max_px.clamp(4, 200);
        if self.font_size_min_px > self.font_size_max_px {
            std::mem::swap(&mut self.font_size_min_px, &mut self.font_size_max_px);
        }
        self.font_size_step_px = self.font_size_step_px.max(1);
        self.font_size_px = self
            .font_size_px
            .clamp(self.font_size_min_px, self.font_size_max_px);

        if !self.line_height_min.is_finite() {
            self.line_height_min = defaults.line_height_min;
        }
        if !self.line_height_max.is_finite() {
            self.line_height_max = defaults.line_height_max;
        }
        self.line_height_min = self.line_height_min.clamp(0.5, 5.0);
        self.line_height_max = self.line_height_max.clamp(0.5, 5.0);
        if self.line_height_min > self.line_height_max {
            std::mem::swap(&mut self.line_height_min, &mut self.line_height_max);
        }
        if !self.line_height_step.is_finite() || self.line_height_step <= 0.0 {
            self.line_height_step = defaults.line_height_step;
        }
        if !self.line_height.is_finite() {
            self.line_height = defaults.line_height;
        }
        self.line_height = self
            .line_height
            .clamp(self.line_height_min, self.line_height_max);

        self.center_max_width_px = self.center_max_width_px.clamp(320, 4096);

        self.text_colors = sanitize_options(self.text_colors, defaults.text_colors);
        self.center_backgrounds =
            sanitize_options(self.center_backgrounds, defaults.center_backgrounds);
        self.side_backgrounds = sanitize_options(self.side_backgrounds, defaults.side_backgrounds);

        self.text_color = pick_selected(self.text_color, &self.text_colors);
        self.center_background = pick_selected(self.center_background, &self.center_backgrounds);
        self.left_background = pick_selected(self.left_background, &self.side_backgrounds);
        self.right_background = pick_selected(self.right_background, &self.side_backgrounds);
        self
    }
}

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

fn sanitize_options(options: Vec<ColorOption>, fallback: Vec<ColorOption>) -> Vec<ColorOption> {
    let kept: Vec<ColorOption> = options
        .into_iter()
        .filter(|option| is_hex_color(&option.value))
        .collect();
    if kept.is_empty() {
        log::warn!("no usable color options configured; using built-in palette");
        fallback
    } else {
        kept
    }
}

fn pick_selected(value: String, options: &[ColorOption]) -> String {
    if options
        .iter()
        .any(|option| option.value.eq_ignore_ascii_case(&value))
    {
        return value;
    }
    options
        .first()
        .map(|option| option.value.clone())
        .unwrap_or(value)
}
