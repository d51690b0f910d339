use clap::Parser;
use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;

use treelens::config::{Args, ViewConfig};
use treelens::egui_surface::EguiSurface;
use treelens::error::TreeError;
use treelens::fs::{self, FileSystemProvider};
use treelens::view::{TreeView, BACKGROUND};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve()?;

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("treelens=info")),
        )
        .init();

    fs::ensure_root(&config)?;
    tracing::info!(root = %config.root.display(), mode = ?config.mode, weights = ?config.weights, debug = config.debug, "starting");

    let source = fs::provider_for(&config);
    let failure: Rc<RefCell<Option<TreeError>>> = Rc::new(RefCell::new(None));
    let app_failure = failure.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 800.0])
            .with_title(window_title(&config, None)),
        ..Default::default()
    };

    eframe::run_native(
        "treelens",
        options,
        Box::new(move |cc| {
            configure_custom_style(&cc.egui_ctx);
            Box::new(TreeLensApp::new(config, source, app_failure))
        }),
    )
    .map_err(|err| anyhow::anyhow!("window failed: {err}"))?;

    if let Some(err) = failure.borrow_mut().take() {
        return Err(err.into());
    }
    Ok(())
}

fn configure_custom_style(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = egui::Color32::from_rgb(BACKGROUND.r, BACKGROUND.g, BACKGROUND.b);
    ctx.set_visuals(visuals);
}

fn window_title(config: &ViewConfig, focused: Option<&str>) -> String {
    match focused {
        Some(name) => format!("treelens - {} - {}", config.root.display(), name),
        None => format!("treelens - {}", config.root.display()),
    }
}

struct TreeLensApp {
    view: TreeView,
    source: Box<dyn FileSystemProvider>,
    failure: Rc<RefCell<Option<TreeError>>>,
    focused_name: Option<String>,
}

impl TreeLensApp {
    fn new(
        config: ViewConfig,
        source: Box<dyn FileSystemProvider>,
        failure: Rc<RefCell<Option<TreeError>>>,
    ) -> Self {
        Self {
            view: TreeView::new(config),
            source,
            failure,
            focused_name: None,
        }
    }
}

impl eframe::App for TreeLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::D)) {
            let debug = &mut self.view.config_mut().debug;
            *debug = !*debug;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                let pointer = response
                    .hover_pos()
                    .map(|pos| ((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64));

                let mut surface = EguiSurface::new(&painter, rect.min);
                let result = self.view.render(
                    self.source.as_ref(),
                    &mut surface,
                    rect.width() as f64,
                    rect.height() as f64,
                    pointer,
                );

                match result {
                    Ok(rendered) => {
                        let focused = rendered.focused_row().map(|row| row.name.clone());
                        if focused != self.focused_name {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Title(window_title(
                                self.view.config(),
                                focused.as_deref(),
                            )));
                            self.focused_name = focused;
                        }
                    }
                    Err(err) => {
                        tracing::error!("render failed: {}", err);
                        self.failure.borrow_mut().get_or_insert(err);
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                }
            });
    }
}
