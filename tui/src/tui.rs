use std::io::Stdout;
use std::io::stdout;

use color_eyre::eyre::Result;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyEvent;
use crossterm::execute;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio_stream::Stream;
use tokio_stream::StreamExt;

#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    Draw,
}

pub struct Tui {
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
}

/// Switch to raw mode on the alternate screen. A panic restores the terminal
/// before the report is printed.
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    set_panic_hook();
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(Tui { terminal })
}

pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        hook(info);
    }));
}

impl Tui {
    /// Terminal input mapped to app-level events. Resizes and focus changes
    /// only request a redraw.
    pub fn event_stream(&self) -> impl Stream<Item = TuiEvent> + use<> {
        EventStream::new().filter_map(|event| match event {
            Ok(Event::Key(key_event)) => Some(TuiEvent::Key(key_event)),
            Ok(Event::Resize(..)) | Ok(Event::FocusGained) => Some(TuiEvent::Draw),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("terminal event error: {err}");
                None
            }
        })
    }
}
