// The editor window: owns the UI state, routes keys and commands, and
// draws the menu bar, text surface, status bar and any modal overlay.

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::document::{self, SharedDocument};
use crate::error::DocumentError;
use crate::menu::{Command, MenuEntry, MenuState, MENUS};
use crate::picker::{FilePicker, PickerKind, PickerOutcome};
use crate::status::StatusSnapshot;
use crate::theme::{Theme, CURSOR_COLOUR_RESET};

const MENU_ROWS: u16 = 1;
const STATUS_ROWS: u16 = 1;

// At most one modal layer is shown above the text surface.
// While one is up, keys go to it instead of the buffer.
#[derive(Debug)]
enum Overlay {
    None,
    Menu(MenuState),
    Picker(FilePicker),
    Error(&'static str),
}

pub struct Editor {
    // Shared with the auto-save ticker; lock briefly, never across a write
    document: SharedDocument,
    theme: Theme,
    title: String,            // Cached so SetTitle is only sent on change
    status: StatusSnapshot,   // Recomputed after every edit
    overlay: Overlay,

    // Viewport scroll offsets, in lines and columns
    offset_y: usize,
    offset_x: usize,
    terminal_height: u16,
    terminal_width: u16,

    dirty: bool,              // Whether screen needs redrawing
    title_dirty: bool,
}

impl Editor {
    pub fn new(document: SharedDocument) -> io::Result<Self> {
        // ? hands a terminal query failure straight back to main
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(document, width, height))
    }

    /// Builds the editor for a known screen size without touching the
    /// terminal.
    pub fn with_size(document: SharedDocument, width: u16, height: u16) -> Self {
        // Scoped block so the guard drops before `document` moves below
        let (title, status) = {
            let doc = document.lock();
            (doc.title(), StatusSnapshot::from_text(&doc.text()))
        };
        Editor {
            document,
            theme: Theme::default(),
            title,
            status,
            overlay: Overlay::None,
            offset_y: 0,
            offset_x: 0,
            terminal_height: height,
            terminal_width: width,
            dirty: true,
            title_dirty: true,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.enter_raw_mode()?;
        // Restore the terminal even when the loop itself failed
        let result = self.event_loop();
        self.leave_raw_mode()?;
        result
    }

    fn event_loop(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        loop {
            self.render(&mut stdout)?;

            // Poll with a 16ms timeout (roughly 60 FPS)
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key_event) => {
                        if self.handle_key_event(key_event) {
                            info!(target: "editor", "exit requested");
                            break;
                        }
                    }
                    Event::Paste(text) => self.paste(&text),
                    Event::Resize(width, height) => self.resize(width, height),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All)
        )?;
        self.dirty = true;
        Ok(())
    }

    fn leave_raw_mode(&mut self) -> io::Result<()> {
        restore_screen(&mut io::stdout())?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
        self.dirty = true;
    }

    /// Returns true when the application should exit.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        // Some platforms report releases too; act once per key.
        if key_event.kind == KeyEventKind::Release {
            return false;
        }
        self.dirty = true;

        // Take the overlay out so its handler can own it; handlers put it
        // back when it should stay open.
        let overlay = std::mem::replace(&mut self.overlay, Overlay::None);
        match overlay {
            Overlay::None => self.handle_surface_key(key_event),
            Overlay::Menu(state) => self.handle_menu_key(state, key_event),
            Overlay::Picker(picker) => self.handle_picker_key(picker, key_event),
            Overlay::Error(message) => {
                if !matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
                    self.overlay = Overlay::Error(message);
                }
                false
            }
        }
    }

    fn handle_surface_key(&mut self, key_event: KeyEvent) -> bool {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key_event.modifiers.contains(KeyModifiers::ALT);

        // Match guards pick off the accelerators before plain typing
        match key_event.code {
            KeyCode::Char('n') if ctrl => return self.dispatch(Command::New),
            KeyCode::Char('o') if ctrl => return self.dispatch(Command::Open),
            KeyCode::Char('s') if ctrl => return self.dispatch(Command::Save),
            KeyCode::Char('q') if ctrl => return self.dispatch(Command::Exit),
            KeyCode::Char('t') if ctrl => return self.dispatch(Command::ToggleTheme),
            KeyCode::F(10) => self.overlay = Overlay::Menu(MenuState::open(0)),
            KeyCode::Char('f') if alt => self.overlay = Overlay::Menu(MenuState::open(0)),
            KeyCode::Char('v') if alt => self.overlay = Overlay::Menu(MenuState::open(1)),
            _ => self.edit(key_event),
        }
        false
    }

    fn edit(&mut self, key_event: KeyEvent) {
        let page = self.visible_height().max(1);
        {
            let mut doc = self.document.lock();
            let buffer = &mut doc.buffer;
            match key_event.code {
                KeyCode::Left => buffer.move_left(),
                KeyCode::Right => buffer.move_right(),
                KeyCode::Up => buffer.move_up(),
                KeyCode::Down => buffer.move_down(),
                KeyCode::Home => buffer.move_home(),
                KeyCode::End => buffer.move_end(),
                KeyCode::PageUp => buffer.page_up(page),
                KeyCode::PageDown => buffer.page_down(page),
                KeyCode::Backspace => {
                    buffer.backspace();
                }
                KeyCode::Delete => {
                    buffer.delete();
                }
                KeyCode::Enter => buffer.insert_newline(),
                KeyCode::Tab => buffer.insert_char('\t'),
                KeyCode::Char(c) => {
                    if !key_event
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                    {
                        buffer.insert_char(c);
                    }
                }
                _ => {}
            }
        }
        // Counts reflect the buffer after the key has been applied
        self.refresh_status();
    }

    fn paste(&mut self, text: &str) {
        // A paste into the file chooser extends its name line
        if let Overlay::Picker(picker) = &mut self.overlay {
            picker.push_str(text);
            self.dirty = true;
            return;
        }
        if !matches!(self.overlay, Overlay::None) {
            return;
        }
        self.document.lock().buffer.insert_str(&text.replace("\r\n", "\n"));
        self.refresh_status();
        self.dirty = true;
    }

    fn handle_menu_key(&mut self, mut state: MenuState, key_event: KeyEvent) -> bool {
        match key_event.code {
            KeyCode::Esc | KeyCode::F(10) => return false,
            KeyCode::Enter => {
                if let Some(command) = state.selected() {
                    return self.dispatch(command);
                }
            }
            KeyCode::Left => state.prev_menu(),
            KeyCode::Right => state.next_menu(),
            KeyCode::Up => state.prev_entry(),
            KeyCode::Down => state.next_entry(),
            _ => {}
        }
        self.overlay = Overlay::Menu(state);
        false
    }

    fn handle_picker_key(&mut self, mut picker: FilePicker, key_event: KeyEvent) -> bool {
        match picker.handle_key(key_event) {
            PickerOutcome::Pending => self.overlay = Overlay::Picker(picker),
            PickerOutcome::Cancelled => {}
            PickerOutcome::Confirmed(path) => match picker.kind {
                PickerKind::Open => self.open_path(path),
                PickerKind::Save => self.save_as(path),
            },
        }
        false
    }

    /// Runs a menu command. Returns true for Exit.
    pub fn dispatch(&mut self, command: Command) -> bool {
        self.dirty = true;
        match command {
            Command::New => self.new_document(),
            Command::Open => self.show_picker(PickerKind::Open),
            Command::Save => self.save(),
            Command::Exit => return true,
            Command::ToggleTheme => self.theme = self.theme.toggled(),
        }
        false
    }

    fn new_document(&mut self) {
        self.document.lock().reset();
        self.offset_x = 0;
        self.offset_y = 0;
        self.refresh_title();
        self.refresh_status();
    }

    fn show_picker(&mut self, kind: PickerKind) {
        // Start next to the current file, else in the working directory
        let dir = self
            .document
            .lock()
            .file
            .as_deref()
            .and_then(|path| path.parent())
            .map(|parent| parent.to_path_buf())
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        self.overlay = Overlay::Picker(FilePicker::new(kind, dir));
    }

    /// Reads `path` into the document. A failed read leaves the document as
    /// it was.
    pub fn open_path(&mut self, path: PathBuf) {
        match document::read_file(&path) {
            Ok(text) => {
                info!(target: "editor", path = %path.display(), "opened");
                self.document.lock().replace(path, &text);
                self.offset_x = 0;
                self.offset_y = 0;
                self.refresh_title();
                self.refresh_status();
            }
            Err(e) => self.show_error(e),
        }
    }

    fn save(&mut self) {
        let has_file = self.document.lock().file.is_some();
        if has_file {
            self.write_current();
        } else {
            self.show_picker(PickerKind::Save);
        }
    }

    /// Associates the document with `path` (adding `.txt` when missing) and
    /// writes it.
    pub fn save_as(&mut self, path: PathBuf) {
        let path = document::with_text_extension(&path);
        self.document.lock().file = Some(path);
        self.refresh_title();
        self.write_current();
    }

    fn write_current(&mut self) {
        // The guard is a temporary, so the lock is released before writing
        let snapshot = self.document.lock().snapshot();
        if let Some((path, text)) = snapshot {
            match document::write_file(&path, &text) {
                Ok(()) => info!(target: "editor", path = %path.display(), "saved"),
                Err(e) => self.show_error(e),
            }
        }
    }

    fn show_error(&mut self, error: DocumentError) {
        warn!(target: "editor", error = %error, "file operation failed");
        self.overlay = Overlay::Error(error.user_message());
        self.dirty = true;
    }

    fn refresh_title(&mut self) {
        self.title = self.document.lock().title();
        self.title_dirty = true;
    }

    fn refresh_status(&mut self) {
        let text = self.document.lock().text();
        self.status = StatusSnapshot::from_text(&text);
    }

    fn visible_height(&self) -> usize {
        self.terminal_height.saturating_sub(MENU_ROWS + STATUS_ROWS) as usize
    }

    fn update_offset(&mut self, cursor_x: usize, cursor_y: usize) {
        let visible_height = self.visible_height().max(1);
        if cursor_y < self.offset_y {
            self.offset_y = cursor_y;
        } else if cursor_y >= self.offset_y + visible_height {
            self.offset_y = cursor_y - visible_height + 1;
        }

        let visible_width = (self.terminal_width as usize).max(1);
        if cursor_x < self.offset_x {
            self.offset_x = cursor_x;
        } else if cursor_x >= self.offset_x + visible_width {
            self.offset_x = cursor_x - visible_width + 1;
        }
    }

    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let width = self.terminal_width as usize;
        let palette = self.theme.palette();

        queue!(out, Hide)?;
        if self.title_dirty {
            queue!(out, SetTitle(&self.title))?;
            self.title_dirty = false;
        }
        self.render_menu_bar(out)?;

        let (cursor_x, cursor_y) = {
            // Lock through a cloned handle so `self` stays free for
            // update_offset
            let document = self.document.clone();
            let doc = document.lock();
            let (cursor_x, cursor_y) = doc.buffer.cursor();
            self.update_offset(cursor_x, cursor_y);

            queue!(
                out,
                SetBackgroundColor(palette.surface_bg),
                SetForegroundColor(palette.surface_fg)
            )?;
            let lines = doc.buffer.lines();
            for y in 0..self.visible_height() {
                let line_y = y + self.offset_y;
                let visible: String = match lines.get(line_y) {
                    Some(line) => line
                        .iter()
                        .skip(self.offset_x)
                        .take(width)
                        // Tabs and other control characters take one blank cell
                        .map(|&c| if c.is_control() { ' ' } else { c })
                        .collect(),
                    None => String::new(),
                };
                queue!(out, MoveTo(0, MENU_ROWS + y as u16), Print(fit(&visible, width)))?;
            }
            (cursor_x, cursor_y)
        };

        let status_y = self.terminal_height.saturating_sub(STATUS_ROWS);
        queue!(
            out,
            MoveTo(0, status_y),
            SetBackgroundColor(palette.status_bg),
            SetForegroundColor(palette.status_fg),
            Print(fit(&self.status.to_string(), width)),
            ResetColor
        )?;

        match &self.overlay {
            Overlay::None => {
                let screen_y = MENU_ROWS as usize + cursor_y - self.offset_y;
                let screen_x = cursor_x - self.offset_x;
                queue!(
                    out,
                    Print(palette.cursor_escape()),
                    MoveTo(screen_x as u16, screen_y as u16),
                    Show
                )?;
            }
            Overlay::Menu(state) => self.render_menu(out, *state)?,
            Overlay::Picker(picker) => self.render_picker(out, picker)?,
            Overlay::Error(message) => self.render_error(out, message)?,
        }

        out.flush()?;
        self.dirty = false;
        Ok(())
    }

    fn render_menu_bar<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let open = match self.overlay {
            Overlay::Menu(state) => Some(state.menu),
            _ => None,
        };
        queue!(
            out,
            MoveTo(0, 0),
            SetBackgroundColor(Color::Grey),
            SetForegroundColor(Color::Black),
            Print(fit("", self.terminal_width as usize))
        )?;
        for (i, menu) in MENUS.iter().enumerate() {
            queue!(out, MoveTo(menu_column(i), 0))?;
            if open == Some(i) {
                queue!(
                    out,
                    SetAttribute(Attribute::Reverse),
                    Print(format!(" {} ", menu.title)),
                    SetAttribute(Attribute::NoReverse)
                )?;
            } else {
                queue!(out, Print(format!(" {} ", menu.title)))?;
            }
        }
        queue!(out, ResetColor)?;
        Ok(())
    }

    fn render_menu<W: Write>(&self, out: &mut W, state: MenuState) -> io::Result<()> {
        let entries = state.entries();
        let inner = entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(label, _) => label.len(),
                MenuEntry::Separator => 0,
            })
            .max()
            .unwrap_or(0)
            + 2;
        let x = menu_column(state.menu);
        let rows: Vec<String> = entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(label, _) => fit(&format!(" {}", label), inner),
                MenuEntry::Separator => "─".repeat(inner),
            })
            .collect();
        draw_box(out, x, MENU_ROWS, &rows, Some(state.entry))
    }

    fn render_picker<W: Write>(&self, out: &mut W, picker: &FilePicker) -> io::Result<()> {
        let width = (self.terminal_width as usize).saturating_sub(4).clamp(10, 60);
        let max_rows = self.visible_height().saturating_sub(6).max(1);

        let entries = picker.entries();
        let selected = picker.selected();
        let first = match selected {
            Some(i) if i >= max_rows => i + 1 - max_rows,
            _ => 0,
        };

        let mut rows = vec![
            fit(&format!(" {}", picker.kind.title()), width),
            fit(&format!(" {}", picker.dir().display()), width),
            "─".repeat(width),
        ];
        for entry in entries.iter().skip(first).take(max_rows) {
            let marker = if entry.is_dir { "/" } else { "" };
            rows.push(fit(&format!("  {}{}", entry.name, marker), width));
        }
        rows.push("─".repeat(width));
        rows.push(fit(&format!(" Name: {}", picker.input()), width));

        let x = ((self.terminal_width as usize).saturating_sub(width + 2) / 2) as u16;
        let y = MENU_ROWS + 1;
        let highlight = selected.map(|i| i - first + 3);
        draw_box(out, x, y, &rows, highlight)?;

        let input_row = y + rows.len() as u16;
        let input_col = x + 1 + (" Name: ".len() + picker.input().chars().count()).min(width - 1) as u16;
        queue!(out, MoveTo(input_col, input_row), Show)?;
        Ok(())
    }

    fn render_error<W: Write>(&self, out: &mut W, message: &str) -> io::Result<()> {
        let width = message.len().max(10) + 4;
        let rows = vec![
            fit(" Error", width),
            "─".repeat(width),
            fit(&format!("  {}", message), width),
            String::new(),
            center("[ OK ]", width),
        ];
        let x = ((self.terminal_width as usize).saturating_sub(width + 2) / 2) as u16;
        let y = (self.terminal_height / 2).saturating_sub(3);
        draw_box(out, x, y, &rows, None)
    }
}

#[cfg(test)]
impl Editor {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self.overlay {
            Overlay::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Puts the terminal back the way the shell expects it: default colours and
/// cursor colour, visible cursor, line wrap on, bracketed paste off, main
/// screen. Raw mode is left to the caller.
pub fn restore_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(
        out,
        ResetColor,
        Print(CURSOR_COLOUR_RESET),
        Show,
        EnableLineWrap,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
}

// Column where menu `index` starts on the bar
fn menu_column(index: usize) -> u16 {
    MENUS
        .iter()
        .take(index)
        .map(|menu| menu.title.len() as u16 + 2)
        .sum::<u16>()
        + 1
}

/// Truncates or pads `s` to exactly `width` characters.
fn fit(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn center(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.chars().count()) / 2;
    fit(&format!("{}{}", " ".repeat(pad), s), width)
}

fn draw_box<W: Write>(
    out: &mut W,
    x: u16,
    y: u16,
    rows: &[String],
    highlight: Option<usize>,
) -> io::Result<()> {
    let inner = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    queue!(out, SetBackgroundColor(Color::Grey), SetForegroundColor(Color::Black))?;
    queue!(out, MoveTo(x, y), Print(format!("┌{}┐", "─".repeat(inner))))?;
    for (i, row) in rows.iter().enumerate() {
        queue!(out, MoveTo(x, y + 1 + i as u16), Print("│"))?;
        if highlight == Some(i) {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(fit(row, inner)),
                SetAttribute(Attribute::NoReverse)
            )?;
        } else {
            queue!(out, Print(fit(row, inner)))?;
        }
        queue!(out, Print("│"))?;
    }
    queue!(
        out,
        MoveTo(x, y + 1 + rows.len() as u16),
        Print(format!("└{}┘", "─".repeat(inner))),
        ResetColor
    )?;
    Ok(())
}
