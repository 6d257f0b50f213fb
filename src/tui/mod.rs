//! TUI module - Terminal UI for interactive visualization

use crate::data_source::DataSource;
use crate::graph::{QueryTicket, ThemeVars, ViewState};
use crate::transform::QueryResult;
use crate::{Error, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub mod app;
pub mod ui;

use app::App;

type Response = (QueryTicket, Result<QueryResult>);

fn tui_error(e: impl std::fmt::Display) -> Error {
    Error::Tui(e.to_string())
}

/// Run the TUI application
pub fn run(view: ViewState, theme: ThemeVars, data_source: Arc<dyn DataSource>) -> Result<()> {
    let app = App::new(view, theme)?;

    // Setup terminal
    enable_raw_mode().map_err(tui_error)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(tui_error)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(tui_error)?;

    let res = run_app(&mut terminal, app, data_source);

    // Restore terminal
    disable_raw_mode().map_err(tui_error)?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(tui_error)?;
    terminal.show_cursor().map_err(tui_error)?;

    res
}

/// Fetch transfers in the background and report back on the channel
fn spawn_query(
    data_source: &Arc<dyn DataSource>,
    sender: &mpsc::UnboundedSender<Response>,
    ticket: QueryTicket,
    address: String,
) {
    let data_source = Arc::clone(data_source);
    let sender = sender.clone();
    tokio::spawn(async move {
        tracing::info!("Fetching transfers for {}", address);
        let response = data_source.get_address_transfers(&address).await;
        // Receiver closes when the TUI exits
        let _ = sender.send((ticket, response));
    });
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    data_source: Arc<dyn DataSource>,
) -> Result<()> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<Response>();

    loop {
        while let Ok((ticket, response)) = receiver.try_recv() {
            app.apply_response(ticket, response)?;
        }

        terminal
            .draw(|f| ui::draw(f, &mut app))
            .map_err(tui_error)?;

        if event::poll(Duration::from_millis(100)).map_err(tui_error)?
            && let Event::Key(key) = event::read().map_err(tui_error)?
            && key.kind == KeyEventKind::Press
        {
            if app.is_editing() {
                match key.code {
                    KeyCode::Enter => {
                        if let Some((ticket, address)) = app.submit_input(Instant::now()) {
                            spawn_query(&data_source, &sender, ticket, address);
                        }
                    }
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Backspace => app.pop_char(),
                    KeyCode::Char(c) => app.push_char(c),
                    _ => {}
                }
            } else {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('s') | KeyCode::Tab => app.switch_view()?,
                    KeyCode::Char('/') => app.open_input(),
                    KeyCode::Up => app.select_previous_edge(),
                    KeyCode::Down => app.select_next_edge(),
                    _ => {}
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
