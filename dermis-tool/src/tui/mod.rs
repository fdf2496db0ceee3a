mod app;
mod input;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dermis_oracle::{OpenRouterClient, Oracle, SkinAnalyst};
use dermis_timeline::TimelineBackend;
use ratatui::prelude::*;

pub use app::DermApp;

use crate::error::DermError;
use crate::store::AppContext;

pub async fn run(
    ctx: AppContext,
    analyst: SkinAnalyst<OpenRouterClient>,
    timeout: Option<Duration>,
) -> Result<(), DermError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DermApp::new(ctx.timeline, analyst, timeout);

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    println!("Timeline: {} photos", app.timeline.len());

    result
}

async fn run_loop<O, B>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut DermApp<O, B>,
) -> Result<(), DermError>
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll with a timeout so finished requests are picked up
        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            input::handle_event(app, event);
        }

        app.poll_response();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
