use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use crossterm::ExecutableCommand;
use crossterm::event::{self, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};

use chip8_dasm::{Decoded, OddByte, Program, Syntax};

use ratatui::{Frame, Terminal, TerminalOptions, Viewport};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

#[derive(Parser, Debug)]
#[command(name = "chip8-dasm-tui", version, about = "Browse the disassembly of a Chip8 ROM.")]
struct Args {
    /// Path to the ROM to disassemble
    rom: PathBuf,

    /// Mnemonic syntax shown first (`s` toggles it)
    #[arg(long, value_enum, default_value_t = Syntax::Compat)]
    syntax: Syntax,
}

pub struct TuiApp {
    title: String,
    decoded: Vec<Decoded>,
    lines: Vec<String>,
    syntax: Syntax,
    state: ListState,
    /// Number of lines visible in the listing, updated on each draw.
    page: usize,
}

impl TuiApp {
    pub fn new(title: String, program: &Program, syntax: Syntax) -> Self {
        let decoded: Vec<Decoded> = program.lines().collect();
        let selected = if decoded.is_empty() { None } else { Some(0) };

        let mut app = Self {
            title,
            decoded,
            lines: Vec::new(),
            syntax,
            state: ListState::default().with_selected(selected),
            page: 1,
        };
        app.render_lines();
        app
    }

    fn render_lines(&mut self) {
        self.lines = self.decoded.iter()
            .map(|d| d.display(self.syntax).to_string())
            .collect();
    }

    fn toggle_syntax(&mut self) {
        self.syntax = self.syntax.toggled();
        self.render_lines();
    }

    /// Moves the selection by `delta` lines, clamped to the listing.
    fn scroll(&mut self, delta: isize) {
        if self.lines.is_empty() {
            return;
        }

        let last = self.lines.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.state.select(Some(next));
    }

    fn select_first(&mut self) {
        if !self.lines.is_empty() {
            self.state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.lines.is_empty() {
            self.state.select(Some(self.lines.len() - 1));
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        stdout().execute(EnterAlternateScreen)?;
        enable_raw_mode()?;

        let res = self.event_loop();

        // Restore the terminal even when the loop failed.
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        res
    }

    fn event_loop(&mut self) -> anyhow::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let terminal_options = TerminalOptions {
            viewport: Viewport::Fullscreen,
        };
        let mut terminal = Terminal::with_options(backend, terminal_options)?;
        terminal.clear()?;

        loop {
            terminal.draw(|frame| self.ui(frame))?;

            if self.handle_keyboard()? { // Exit requested
                break;
            }
        }

        Ok(())
    }

    fn ui(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.size());

        // Borders take two rows.
        self.page = (chunks[0].height as usize).saturating_sub(2).max(1);

        let items: Vec<ListItem> = self.decoded.iter()
            .zip(&self.lines)
            .map(|(decoded, line)| {
                let item = ListItem::new(line.as_str());
                if decoded.instruction.is_unknown() {
                    item.style(Style::default().fg(Color::DarkGray))
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::bordered().title(format!("{} | {}", self.title, self.syntax)))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, chunks[0], &mut self.state);

        let position = match self.state.selected() {
            Some(i) => format!("{}/{}", i + 1, self.lines.len()),
            None => String::from("empty"),
        };
        let help = format!(" {position} | q quit | j/k scroll | PgUp/PgDn page | g/G top/bottom | s syntax");
        frame.render_widget(Paragraph::new(help), chunks[1]);
    }

    /// Returns `Ok(true)` when exit is requested.
    fn handle_keyboard(&mut self) -> Result<bool, std::io::Error> {
        if event::poll(Duration::from_millis(16))? {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code));
                }
            }
        }

        Ok(false)
    }

    /// Returns `true` when exit is requested.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let page = self.page as isize;

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => self.scroll(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll(-1),
            KeyCode::PageDown => self.scroll(page),
            KeyCode::PageUp => self.scroll(-page),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),
            KeyCode::Char('s') => self.toggle_syntax(),
            _ => (),
        }

        false
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let program = Program::open(&args.rom, Program::DEFAULT_BASE, OddByte::Ignore)
        .context("Couldn't open file!")?;

    let title = args.rom.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.rom.display().to_string());

    let mut app = TuiApp::new(title, &program, args.syntax);
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(bytes: &[u8]) -> TuiApp {
        let program = Program::from_bytes(bytes, Program::DEFAULT_BASE, OddByte::Ignore).unwrap();
        TuiApp::new(String::from("test"), &program, Syntax::Compat)
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut app = app(&[0x00, 0xE0, 0x12, 0x00, 0x60, 0xAB]);
        assert_eq!(app.state.selected(), Some(0));

        app.handle_key(KeyCode::Up);
        assert_eq!(app.state.selected(), Some(0));

        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.state.selected(), Some(1));

        app.page = 10;
        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.state.selected(), Some(2));

        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.state.selected(), Some(0));

        app.handle_key(KeyCode::End);
        assert_eq!(app.state.selected(), Some(2));
    }

    #[test]
    fn toggling_syntax_rerenders() {
        let mut app = app(&[0xC1, 0x0F]);
        assert_eq!(app.lines, ["0200 c1 0f RAND V1 #$0f"]);

        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.syntax, Syntax::Normalized);
        assert_eq!(app.lines, ["0200 c1 0f RAND V1, #$0f"]);
    }

    #[test]
    fn empty_program_has_no_selection() {
        let mut app = app(&[]);
        assert_eq!(app.state.selected(), None);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::End);
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn syntax_argument() {
        let args = Args::try_parse_from(["chip8-dasm-tui", "--syntax", "normalized", "rom.ch8"]).unwrap();
        assert_eq!(args.syntax, Syntax::Normalized);
        assert!(Args::try_parse_from(["chip8-dasm-tui", "--syntax", "intel", "rom.ch8"]).is_err());
    }

    #[test]
    fn quit_keys() {
        let mut app = app(&[0x00, 0xE0]);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
        assert!(!app.handle_key(KeyCode::Char('x')));
    }
}
