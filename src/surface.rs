/// Color in 8-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Rectangle helper in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Vertical metrics of the current font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f64,
    pub descent: f64,
    pub line_height: f64,
}

/// Immediate-mode 2D target the tree view paints on.
///
/// Coordinates are local to the widget, origin top-left, y growing down.
pub trait DrawSurface {
    fn set_color(&mut self, color: Rgb);
    fn set_font_size(&mut self, size: f64);
    fn font_metrics(&self) -> FontMetrics;
    /// Draw `text` with its line box starting at (`x`, `y`).
    fn draw_text(&mut self, x: f64, y: f64, text: &str);
    fn fill_rect(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f64,
        y: f64,
        size: f64,
        color: Rgb,
        text: String,
    },
    Fill {
        rect: Rect,
        color: Rgb,
    },
    Stroke {
        rect: Rect,
        color: Rgb,
    },
}

/// Surface that keeps every operation instead of drawing.
///
/// Line height is 1.25 × the font size, which keeps layouts exact in tests.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    color: Rgb,
    font_size: f64,
    pub ops: Vec<DrawOp>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            color: Rgb::new(0, 0, 0),
            font_size: 10.0,
            ops: Vec::new(),
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn strokes(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { .. }))
            .count()
    }

    pub fn fills(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn font_metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: self.font_size,
            descent: self.font_size * 0.25,
            line_height: self.font_size * 1.25,
        }
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            size: self.font_size,
            color: self.color,
            text: text.to_string(),
        });
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Fill {
            rect,
            color: self.color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Stroke {
            rect,
            color: self.color,
        });
    }
}
