use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect as UiRect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use std::io::{self, stdout};
use std::time::Duration;
use treelens::config::{Args, LayoutMode};
use treelens::error::TreeError;
use treelens::fs::{self, FileSystemProvider};
use treelens::terminal_surface::{terminal_config, TerminalSurface};
use treelens::view::{RenderedView, TreeView};

struct App {
    view: TreeView,
    source: Box<dyn FileSystemProvider>,
    /// Pointer in cells, relative to the tree area.
    pointer: Option<(f64, f64)>,
    tree_area: Option<UiRect>,
    should_quit: bool,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('d') => {
                let config = self.view.config_mut();
                config.debug = !config.debug;
            }
            KeyCode::Char('m') => {
                let config = self.view.config_mut();
                config.mode = match config.mode {
                    LayoutMode::Fisheye => LayoutMode::Fit,
                    LayoutMode::Fit => LayoutMode::Fisheye,
                };
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) {
        if !matches!(event.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }
        let Some(area) = self.tree_area else {
            return;
        };

        let inside = event.column >= area.x
            && event.column < area.x + area.width
            && event.row >= area.y
            && event.row < area.y + area.height;

        // Cell centres, so the row under the cursor is the one sampled
        self.pointer = inside.then(|| {
            (
                (event.column - area.x) as f64 + 0.5,
                (event.row - area.y) as f64 + 0.5,
            )
        });
    }
}

fn status_line(app: &App, rendered: &RenderedView) -> Line<'static> {
    let config = app.view.config();
    let focused = rendered
        .focused_row()
        .map(|row| row.name.clone())
        .unwrap_or_else(|| "-".to_string());
    let mode = match config.mode {
        LayoutMode::Fisheye => "fisheye",
        LayoutMode::Fit => "fit",
    };

    Line::from(vec![
        Span::styled(" Focus: ", Style::default().fg(Color::Gray)),
        Span::raw(focused),
        Span::styled("  Rows: ", Style::default().fg(Color::Gray)),
        Span::raw(rendered.rows.len().to_string()),
        Span::styled("  Scale: ", Style::default().fg(Color::Gray)),
        Span::raw(format!("{:.2}", rendered.global_scale)),
        Span::styled("  Mode: ", Style::default().fg(Color::Gray)),
        Span::raw(mode),
        Span::styled("  (m: mode, d: debug, q: quit)", Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_ui(frame: &mut Frame, app: &mut App) -> Result<(), TreeError> {
    let [tree_outer, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    let title = format!(" {} ", app.view.config().root.display());
    let block = Block::default().title(title).borders(Borders::ALL);
    let tree_inner = block.inner(tree_outer);
    frame.render_widget(block, tree_outer);
    app.tree_area = Some(tree_inner);

    let rendered = {
        let mut surface = TerminalSurface::new(frame.buffer_mut(), tree_inner);
        app.view.render(
            app.source.as_ref(),
            &mut surface,
            tree_inner.width as f64,
            tree_inner.height as f64,
            app.pointer,
        )?
    };

    frame.render_widget(Paragraph::new(status_line(app, &rendered)), status_area);
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> anyhow::Result<()> {
    loop {
        let mut outcome = Ok(());
        terminal.draw(|frame| {
            outcome = draw_ui(frame, app);
        })?;
        outcome?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                Event::Resize(_, _) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve()?;

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // Logs would tear the alternate screen, so they are opt-in
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    fs::ensure_root(&config)?;
    tracing::info!(root = %config.root.display(), "starting terminal viewer");

    let mut app = App {
        source: fs::provider_for(&config),
        view: TreeView::new(terminal_config(&config)),
        pointer: None,
        tree_area: None,
        should_quit: false,
    };

    enable_raw_mode()?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let app_result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app_result
}
