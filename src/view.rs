use crate::config::{LayoutMode, ViewConfig};
use crate::distribution::Distribution;
use crate::error::TreeError;
use crate::fs::FileSystemProvider;
use crate::layout::{self, RowBand, ENLARGEMENT_THRESHOLD};
use crate::surface::{DrawSurface, Rect, Rgb};
use crate::tree;
use crate::weight;

pub const BACKGROUND: Rgb = Rgb::new(30, 41, 59);
pub const DIRECTORY_COLOR: Rgb = Rgb::new(139, 165, 246);
pub const FILE_COLOR: Rgb = Rgb::new(226, 232, 240);
pub const FOCUS_COLOR: Rgb = Rgb::new(51, 65, 85);
pub const DEBUG_COLOR: Rgb = Rgb::new(239, 68, 68);
pub const CURVE_COLOR: Rgb = Rgb::new(245, 158, 11);

/// Horizontal gap between the indent and the row text.
const TEXT_PADDING: f64 = 4.0;

/// Share of the width the debug curve may span at its peak.
const CURVE_WIDTH_FRACTION: f64 = 0.25;

const POINTER_MARKER_SIZE: f64 = 6.0;

/// One row as it was laid out and drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub depth: usize,
    pub name: String,
    pub is_dir: bool,
    pub scale: f64,
    pub band: RowBand,
    /// False when the band was too thin to draw.
    pub visible: bool,
}

/// Outcome of a render pass, for hit-testing and status display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub rows: Vec<RenderedRow>,
    pub unit_size: f64,
    pub global_scale: f64,
    /// Row under the pointer.
    pub focused: Option<usize>,
}

impl RenderedView {
    pub fn focused_row(&self) -> Option<&RenderedRow> {
        self.focused.and_then(|index| self.rows.get(index))
    }
}

/// Lays out and paints a directory tree on a `DrawSurface`.
///
/// Nothing is cached between passes: every call lists the hierarchy again.
#[derive(Debug, Clone)]
pub struct TreeView {
    config: ViewConfig,
}

impl TreeView {
    pub fn new(config: ViewConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ViewConfig {
        &mut self.config
    }

    pub fn render<F, S>(
        &self,
        fs: &F,
        surface: &mut S,
        width: f64,
        height: f64,
        pointer: Option<(f64, f64)>,
    ) -> Result<RenderedView, TreeError>
    where
        F: FileSystemProvider + ?Sized,
        S: DrawSurface + ?Sized,
    {
        let config = &self.config;
        let rows = tree::collect_rows(fs, &config.root)?;
        let mut items = weight::to_items(&rows, config.weights.policy());

        surface.set_font_size(config.base_font_size);
        let unit_size = surface.font_metrics().line_height;

        let mut distribution = match (config.mode, pointer) {
            (LayoutMode::Fisheye, Some((_, y))) => Some(Distribution::new(y, config.deviation())),
            _ => None,
        };

        let global_scale = layout::apply_scale(&mut items, unit_size, height, distribution.as_mut());
        let bands = layout::row_geometry(&items, unit_size);
        let focused = pointer.and_then(|(_, y)| layout::row_at(&bands, y));

        surface.set_color(BACKGROUND);
        surface.fill_rect(Rect::new(0.0, 0.0, width, height));

        if let Some(index) = focused {
            let band = bands[index];
            surface.set_color(FOCUS_COLOR);
            surface.fill_rect(Rect::new(0.0, band.top, width, band.height));
        }

        let mut rendered = Vec::with_capacity(rows.len());
        for ((row, item), band) in rows.into_iter().zip(&items).zip(&bands) {
            let visible = band.height >= config.min_visible_height;
            if visible {
                surface.set_font_size(config.base_font_size * item.scale);
                let metrics = surface.font_metrics();
                let x = row.depth as f64 * config.indent_width + TEXT_PADDING;
                let y = band.top + (band.height - metrics.line_height) * 0.5;

                surface.set_color(if row.is_dir { DIRECTORY_COLOR } else { FILE_COLOR });
                surface.draw_text(x, y, &row.name);
            }

            rendered.push(RenderedRow {
                depth: row.depth,
                name: row.name,
                is_dir: row.is_dir,
                scale: item.scale,
                band: *band,
                visible,
            });
        }

        if config.debug {
            self.draw_debug_overlay(surface, &rendered, width, height, pointer, distribution.as_ref());
        }

        tracing::debug!(
            rows = rendered.len(),
            global_scale,
            focused = ?focused,
            "layout pass"
        );

        Ok(RenderedView {
            rows: rendered,
            unit_size,
            global_scale,
            focused,
        })
    }

    fn draw_debug_overlay<S>(
        &self,
        surface: &mut S,
        rows: &[RenderedRow],
        width: f64,
        height: f64,
        pointer: Option<(f64, f64)>,
        distribution: Option<&Distribution>,
    ) where
        S: DrawSurface + ?Sized,
    {
        surface.set_color(DEBUG_COLOR);
        for row in rows.iter().filter(|row| row.visible) {
            let x = row.depth as f64 * self.config.indent_width;
            surface.stroke_rect(Rect::new(x, row.band.top, width - x, row.band.height));
        }

        if let Some((px, py)) = pointer {
            let half = POINTER_MARKER_SIZE * 0.5;
            surface.fill_rect(Rect::new(px - half, py - half, POINTER_MARKER_SIZE, POINTER_MARKER_SIZE));
        }

        // Curve is normalised to its peak, with a marker where enlargement starts
        if let Some(distribution) = distribution {
            let peak = distribution.max();
            if peak > 0.0 && peak.is_finite() {
                let span = width * CURVE_WIDTH_FRACTION;
                surface.set_color(CURVE_COLOR);

                let mut y = 0.0;
                while y < height {
                    let x = distribution.at(y) / peak * span;
                    surface.fill_rect(Rect::new(x, y, 2.0, 2.0));
                    y += 2.0;
                }

                let threshold_x = ENLARGEMENT_THRESHOLD / peak * span;
                if threshold_x <= span {
                    surface.stroke_rect(Rect::new(threshold_x, 0.0, 1.0, height));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::surface::{DrawOp, RecordingSurface};
    use crate::weight::WeightMode;

    fn sample_fs() -> MemoryFileSystem {
        let mut fs = MemoryFileSystem::new(".");
        fs.add_dir("folder1").add_file("folder1/file11").add_file("file2");
        fs
    }

    /// `count` files directly under the root, so every row but the first is depth 1.
    fn flat_fs(count: usize) -> MemoryFileSystem {
        let mut fs = MemoryFileSystem::new(".");
        for i in 0..count {
            fs.add_file(format!("file_{i:02}"));
        }
        fs
    }

    fn uniform_config() -> ViewConfig {
        ViewConfig {
            weights: WeightMode::Uniform,
            base_font_size: 8.0, // unit size 10 with the recording metrics
            ..ViewConfig::default()
        }
    }

    #[test]
    fn test_rows_drawn_in_traversal_order() {
        let view = TreeView::new(uniform_config());
        let mut surface = RecordingSurface::new();

        let rendered = view.render(&sample_fs(), &mut surface, 200.0, 400.0, None).unwrap();

        assert_eq!(
            surface.texts().collect::<Vec<_>>(),
            vec![".", "folder1", "file11", "file2"]
        );
        assert_eq!(rendered.unit_size, 10.0);
        assert_eq!(rendered.global_scale, 1.0);
        assert!(rendered.rows.iter().all(|row| row.scale == 1.0));
        assert_eq!(rendered.rows[2].band, RowBand { top: 20.0, height: 10.0 });
    }

    #[test]
    fn test_indent_and_colors() {
        let view = TreeView::new(uniform_config());
        let mut surface = RecordingSurface::new();
        view.render(&sample_fs(), &mut surface, 200.0, 400.0, None).unwrap();

        let texts: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, color, text, .. } => Some((*x, *color, text.clone())),
                _ => None,
            })
            .collect();

        assert_eq!(texts[0], (TEXT_PADDING, DIRECTORY_COLOR, ".".to_string()));
        assert_eq!(texts[2], (2.0 * 16.0 + TEXT_PADDING, FILE_COLOR, "file11".to_string()));
    }

    #[test]
    fn test_fit_mode_ignores_pointer() {
        let config = ViewConfig {
            mode: LayoutMode::Fit,
            ..uniform_config()
        };
        let view = TreeView::new(config);
        let mut surface = RecordingSurface::new();

        // 21 rows of 10px in 105px
        let rendered = view
            .render(&flat_fs(20), &mut surface, 300.0, 105.0, Some((10.0, 50.0)))
            .unwrap();

        assert!((rendered.global_scale - 0.5).abs() < 1e-12);
        assert!(rendered.rows.iter().all(|row| (row.scale - 0.5).abs() < 1e-12));
        assert_eq!(rendered.focused, Some(10));
    }

    #[test]
    fn test_fisheye_focuses_row_under_pointer() {
        let view = TreeView::new(uniform_config());
        let mut surface = RecordingSurface::new();

        // global 0.5, row 10 spans [50, 55) before enlargement
        let rendered = view
            .render(&flat_fs(20), &mut surface, 300.0, 105.0, Some((10.0, 52.5)))
            .unwrap();

        let scales: Vec<f64> = rendered.rows.iter().map(|row| row.scale).collect();
        assert!((scales[10] - 1.0).abs() < 1e-9);
        assert!(scales[0] < 0.5);

        let total: f64 = rendered.rows.iter().map(|row| row.band.height).sum();
        assert!((total - 105.0).abs() < 1e-9);
        assert_eq!(rendered.focused_row().map(|row| row.name.as_str()), Some("file_09"));
    }

    #[test]
    fn test_thin_rows_are_skipped() {
        let config = ViewConfig {
            min_visible_height: 3.0,
            mode: LayoutMode::Fit,
            ..uniform_config()
        };
        let view = TreeView::new(config);
        let mut surface = RecordingSurface::new();

        // 41 rows in 82px: 2px each
        let rendered = view.render(&flat_fs(40), &mut surface, 300.0, 82.0, None).unwrap();

        assert_eq!(surface.texts().count(), 0);
        assert!(rendered.rows.iter().all(|row| !row.visible));
    }

    #[test]
    fn test_debug_overlay_only_when_enabled() {
        let mut plain = RecordingSurface::new();
        TreeView::new(uniform_config())
            .render(&sample_fs(), &mut plain, 200.0, 40.0, Some((5.0, 5.0)))
            .unwrap();
        assert_eq!(plain.strokes(), 0);

        let config = ViewConfig {
            debug: true,
            ..uniform_config()
        };
        let mut debug = RecordingSurface::new();
        TreeView::new(config)
            .render(&sample_fs(), &mut debug, 200.0, 40.0, Some((5.0, 5.0)))
            .unwrap();

        // One box per row plus curve dots and the pointer marker
        assert!(debug.strokes() >= 4);
        assert!(debug.fills() > plain.fills() + 1);
        assert!(debug.ops.iter().any(|op| matches!(
            op,
            DrawOp::Fill { rect, color } if *color == DEBUG_COLOR && rect.width == POINTER_MARKER_SIZE
        )));
    }

    #[test]
    fn test_listing_error_fails_the_pass() {
        let config = ViewConfig {
            root: "./missing".into(),
            ..uniform_config()
        };
        let mut fs = sample_fs();
        fs.add_file("missing");
        let view = TreeView::new(config);
        let mut surface = RecordingSurface::new();

        // A file root renders as one row; a directory that cannot be listed errors
        assert!(view.render(&fs, &mut surface, 100.0, 100.0, None).is_ok());

        struct Unlistable;
        impl FileSystemProvider for Unlistable {
            fn is_directory(&self, _path: &std::path::Path) -> bool {
                true
            }
            fn list_children(&self, path: &std::path::Path) -> Result<Vec<String>, TreeError> {
                Err(TreeError::NotFound {
                    path: path.to_path_buf(),
                })
            }
        }
        assert!(view.render(&Unlistable, &mut surface, 100.0, 100.0, None).is_err());
    }
}
