//! A motion-rich landing page for the terminal.
//!
//! Springs drive a trailing cursor ring and a tilt card, feature cards reveal
//! once as they scroll into view, and stats count up when first seen.  Run
//! with `--reduced-motion` for a calm, fully static page.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    frame, handler,
    state::PageState,
};
use crate::core::policy::{Breakpoint, MotionPrefs};
use crate::core::scheduler::{TickSource, WallClock};
use crate::ui::{
    cursor_overlay::CursorOverlay,
    page_widget::{NavWidget, PageWidget},
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Motion-rich terminal landing page")]
struct Cli {
    /// Disable every animation and show the page in its final state.
    #[arg(long)]
    reduced_motion: bool,

    /// Treat the pointer as unable to hover (disables the custom cursor).
    #[arg(long)]
    no_hover: bool,

    /// Frame rate of the animation scheduler.
    #[arg(long)]
    fps: Option<u32>,

    /// Width in columns below which the narrow layout is used.
    #[arg(long, value_name = "COLS")]
    breakpoint: Option<u16>,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; redirect it (`2>page.log`) to keep them.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // ── settings: file first, flags on top ────────────────────
    let user_config = config::AppConfig::load();
    let prefs = MotionPrefs {
        reduced_motion: cli.reduced_motion || user_config.reduced_motion,
        hover_capable: user_config.hover && !cli.no_hover,
    };
    let fps = cli.fps.unwrap_or(user_config.fps).clamp(15, 144);
    let breakpoint = Breakpoint::new(cli.breakpoint.unwrap_or(user_config.breakpoint_cols));
    tracing::info!(fps, breakpoint = breakpoint.cols, ?prefs, "starting");

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout_handle = stdout();
    execute!(
        stdout_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let size = terminal.size()?;
    let mut clock = WallClock::new();
    let mut state = PageState::boot(
        user_config,
        prefs,
        breakpoint,
        Rect::new(0, 0, size.width, size.height),
        clock.now_ms(),
    );

    // ── async sources ─────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frames = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        if state.view.take_dirty() {
            draw(&mut terminal, &state)?;
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Focus(gained) => handler::handle_focus(&mut state, gained),
                    AppEvent::Resize(w, h) => {
                        handler::handle_resize(&mut state, w, h);
                        terminal.autoresize()?;
                    }
                }
            }

            _ = frames.tick() => {
                frame::on_frame(&mut state, clock.next_frame());
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.teardown();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn draw(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, state: &PageState) -> Result<()> {
    terminal.draw(|frame| {
        let layout = state.layout();

        frame.render_widget(
            PageWidget::new(&state.doc, &state.view)
                .scroll(state.scroll_y)
                .decor_ms(state.decor.elapsed_ms())
                .hovered(state.hovered),
            layout.page_area,
        );
        frame.render_widget(
            NavWidget::new(&state.doc, state.nav_open).hovered(state.hovered),
            layout.chrome_area(),
        );
        frame.render_widget(CursorOverlay::new(&state.view), frame.area());

        let hint = state.config.status_bar_hint();
        let left = state.status_message.as_deref().unwrap_or(&hint);
        let mut flags = Vec::new();
        if state.env.reduced_motion {
            flags.push("reduced motion");
        }
        if state.env.narrow {
            flags.push("narrow");
        }
        if !state.tab.is_visible() {
            flags.push("paused");
        }
        let right = format!(
            " {}loops: {} ",
            flags.iter().map(|f| format!("{f} · ")).collect::<String>(),
            state.registry.live_count()
        );
        let pad = (layout.status_area.width as usize)
            .saturating_sub(left.chars().count() + right.chars().count() + 1);
        let status = Paragraph::new(Line::from(vec![
            Span::raw(format!(" {left}")),
            Span::raw(" ".repeat(pad)),
            Span::raw(right),
        ]))
        .style(Theme::status_bar_style());
        frame.render_widget(status, layout.status_area);
    })?;
    Ok(())
}
