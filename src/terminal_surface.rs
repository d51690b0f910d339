use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Color, Modifier, Style};

use crate::config::ViewConfig;
use crate::surface::{DrawSurface, FontMetrics, Rect, Rgb};

/// Font sizes above this render bold.
const BOLD_FONT_SIZE: f64 = 1.2;

/// Adapt a config so one font unit is one terminal cell.
pub fn terminal_config(config: &ViewConfig) -> ViewConfig {
    ViewConfig {
        base_font_size: 1.0,
        indent_width: 2.0,
        min_visible_height: 0.5,
        ..config.clone()
    }
}

/// `DrawSurface` over a ratatui buffer region, measured in cells.
///
/// A font of size `s` occupies `s` rows, so with `terminal_config` a row at
/// natural size is exactly one line.
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: CellRect,
    color: Color,
    font_size: f64,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: CellRect) -> Self {
        Self {
            buf,
            area,
            color: Color::Reset,
            font_size: 1.0,
        }
    }

    /// Clip a surface rectangle to the cells it covers: (x0, y0, x1, y1), end exclusive.
    fn cells(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let clamp_x = |v: f64| (v.max(0.0) as u16).min(self.area.width);
        let clamp_y = |v: f64| (v.max(0.0) as u16).min(self.area.height);

        let x0 = clamp_x(rect.x.floor());
        let y0 = clamp_y(rect.y.floor());
        let x1 = clamp_x(rect.right().ceil());
        let y1 = clamp_y(rect.bottom().ceil());

        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((self.area.x + x0, self.area.y + y0, self.area.x + x1, self.area.y + y1))
    }
}

fn to_color(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

impl DrawSurface for TerminalSurface<'_> {
    fn set_color(&mut self, color: Rgb) {
        self.color = to_color(color);
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn font_metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: self.font_size,
            descent: 0.0,
            line_height: self.font_size,
        }
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str) {
        // The text lands on the cell row under the centre of its line box
        let column = x.round();
        let row = (y + self.font_size * 0.5).floor();
        if column < 0.0 || row < 0.0 {
            return;
        }
        let (column, row) = (column as u16, row as u16);
        if column >= self.area.width || row >= self.area.height {
            return;
        }

        let mut style = Style::default().fg(self.color);
        if self.font_size > BOLD_FONT_SIZE {
            style = style.add_modifier(Modifier::BOLD);
        }
        let max_width = (self.area.width - column) as usize;
        self.buf.set_stringn(
            self.area.x + column,
            self.area.y + row,
            text,
            max_width,
            style,
        );
    }

    fn fill_rect(&mut self, rect: Rect) {
        let Some((x0, y0, x1, y1)) = self.cells(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.set_bg(self.color);
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect) {
        let Some((x0, y0, x1, y1)) = self.cells(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let on_edge = x == x0 || x == x1 - 1 || y == y0 || y == y1 - 1;
                if !on_edge {
                    continue;
                }
                // Outline only empty cells so row text stays readable
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    if cell.symbol() == " " {
                        cell.set_symbol("·").set_fg(self.color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_text_lands_on_cell_row() {
        let area = CellRect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let mut surface = TerminalSurface::new(&mut buf, area);

        surface.set_font_size(1.0);
        surface.draw_text(2.0, 1.0, "src");
        surface.draw_text(0.0, 7.0, "offscreen");

        assert_eq!(row_text(&buf, 1), "  src");
        assert_eq!(row_text(&buf, 2), "");
    }

    #[test]
    fn test_text_is_clipped_to_region() {
        let area = CellRect::new(2, 1, 6, 2);
        let mut buf = Buffer::empty(CellRect::new(0, 0, 10, 4));
        let mut surface = TerminalSurface::new(&mut buf, area);

        surface.draw_text(1.0, 0.0, "a-long-name");

        assert_eq!(row_text(&buf, 1), "   a-lon");
    }

    #[test]
    fn test_enlarged_text_is_bold() {
        let area = CellRect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        let mut surface = TerminalSurface::new(&mut buf, area);

        surface.set_font_size(2.0);
        surface.draw_text(0.0, 0.0, "big");

        assert!(buf[(0, 1)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(0, 1)].symbol(), "b");
    }

    #[test]
    fn test_fill_and_stroke() {
        let area = CellRect::new(0, 0, 6, 4);
        let mut buf = Buffer::empty(area);
        let mut surface = TerminalSurface::new(&mut buf, area);

        surface.set_color(Rgb::new(10, 20, 30));
        surface.fill_rect(Rect::new(0.5, 0.0, 1.0, 1.0));
        surface.draw_text(1.0, 2.0, "x");
        surface.stroke_rect(Rect::new(0.0, 1.0, 4.0, 3.0));

        assert_eq!(buf[(0, 0)].bg, Color::Rgb(10, 20, 30));
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(10, 20, 30));
        assert_eq!(buf[(2, 0)].bg, Color::Reset);
        assert_eq!(buf[(0, 1)].symbol(), "·");
        assert_eq!(buf[(1, 2)].symbol(), "x");
        assert_eq!(buf[(2, 2)].symbol(), " ");
    }

    #[test]
    fn test_terminal_config_uses_cells() {
        let config = ViewConfig {
            debug: true,
            ..ViewConfig::default()
        };
        let cells = terminal_config(&config);
        assert_eq!(cells.base_font_size, 1.0);
        assert_eq!(cells.indent_width, 2.0);
        assert!(cells.debug);
        assert_eq!(cells.deviation(), 3.0);
    }
}
