use eframe::egui;

use crate::surface::{DrawSurface, FontMetrics, Rect, Rgb};

/// Smallest font egui is asked to lay out.
const MIN_FONT_SIZE: f32 = 1.0;

/// `DrawSurface` over an egui painter, offset to the widget's top-left corner.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    color: egui::Color32,
    font_size: f32,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self {
            painter,
            origin,
            color: egui::Color32::WHITE,
            font_size: 14.0,
        }
    }

    fn font_id(&self) -> egui::FontId {
        egui::FontId::proportional(self.font_size)
    }

    fn to_egui(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.origin + egui::vec2(rect.x as f32, rect.y as f32),
            egui::vec2(rect.width as f32, rect.height as f32),
        )
    }
}

/// egui keeps a font instance per distinct size, so sizes are snapped to half pixels.
fn quantize_font_size(size: f64) -> f32 {
    ((size as f32 * 2.0).round() / 2.0).max(MIN_FONT_SIZE)
}

impl DrawSurface for EguiSurface<'_> {
    fn set_color(&mut self, color: Rgb) {
        self.color = egui::Color32::from_rgb(color.r, color.g, color.b);
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = quantize_font_size(size);
    }

    fn font_metrics(&self) -> FontMetrics {
        let font_id = self.font_id();
        let line_height = self.painter.ctx().fonts(|fonts| fonts.row_height(&font_id)) as f64;
        let ascent = (self.font_size as f64).min(line_height);
        FontMetrics {
            ascent,
            descent: line_height - ascent,
            line_height,
        }
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str) {
        self.painter.text(
            self.origin + egui::vec2(x as f32, y as f32),
            egui::Align2::LEFT_TOP,
            text,
            self.font_id(),
            self.color,
        );
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.painter.rect_filled(self.to_egui(rect), 0.0, self.color);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.painter
            .rect_stroke(self.to_egui(rect), 0.0, egui::Stroke::new(1.0, self.color));
    }
}
