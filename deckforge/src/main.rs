mod app;
mod effects;
mod screens;

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use deckforge_core::{ApiClient, DeckLocation};

use app::App;

/// Terminal deck builder backed by a remote deck server.
#[derive(Debug, Parser)]
#[command(name = "deckforge", version, about)]
struct Args {
    /// Deck to edit: a bare deck id, or a full deck page URL (the server
    /// is then taken from the URL).
    deck: String,

    /// Base URL of the deck server.
    #[arg(long, default_value = "http://localhost:5000")]
    server: String,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    let location = DeckLocation::parse(&args.deck)?;
    let base = location.server_or(&args.server)?;
    let api = ApiClient::new(base.as_str())?;
    let app = App::new(location.id, api);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> color_eyre::Result<()> {
    app.load();

    loop {
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        // Poll with ~30fps tick for animations
        if event::poll(Duration::from_millis(33))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        if app.handle_key(key) {
                            break; // Quit signal
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                }
                Event::Resize(w, h) => {
                    app.handle_resize(w, h);
                }
                _ => {}
            }
        }

        app.tick();
    }

    Ok(())
}
