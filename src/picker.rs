//! Modal file chooser for Open and first-time Save.
//!
//! Lists sub-directories and `.txt` files of one directory and keeps a path
//! input line. Confirming yields a path; nothing touches the document here.

use std::fs;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::document::is_text_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Open,
    Save,
}

impl PickerKind {
    pub fn title(self) -> &'static str {
        match self {
            PickerKind::Open => "Open",
            PickerKind::Save => "Save",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    Confirmed(PathBuf),
    Cancelled,
}

#[derive(Debug)]
pub struct FilePicker {
    pub kind: PickerKind,
    dir: PathBuf,
    entries: Vec<Entry>,
    selected: Option<usize>,
    input: String,
}

impl FilePicker {
    pub fn new(kind: PickerKind, dir: PathBuf) -> Self {
        let mut picker = FilePicker {
            kind,
            dir,
            entries: Vec::new(),
            selected: None,
            input: String::new(),
        };
        picker.refresh();
        picker
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn refresh(&mut self) {
        self.entries = list_dir(&self.dir);
        self.selected = None;
        self.input.clear();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        match key.code {
            KeyCode::Esc => return PickerOutcome::Cancelled,
            KeyCode::Enter => return self.confirm(),
            KeyCode::Up => self.select_prev(),
            KeyCode::Down => self.select_next(),
            KeyCode::Backspace => {
                self.input.pop();
                self.selected = None;
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(c);
                self.selected = None;
            }
            _ => {}
        }
        PickerOutcome::Pending
    }

    /// Appends pasted text to the name line; line breaks and other control
    /// characters are dropped.
    pub fn push_str(&mut self, text: &str) {
        self.input.extend(text.chars().filter(|c| !c.is_control()));
        self.selected = None;
    }

    fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let next = match self.selected {
            Some(i) => (i + 1).min(self.entries.len() - 1),
            None => 0,
        };
        self.select(next);
    }

    fn select_prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let prev = match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select(prev);
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.input = self.entries[index].name.clone();
    }

    fn confirm(&mut self) -> PickerOutcome {
        let name = self.input.trim();
        if name.is_empty() {
            return PickerOutcome::Pending;
        }
        let target = if name == ".." {
            match self.dir.parent() {
                Some(parent) => parent.to_path_buf(),
                None => return PickerOutcome::Pending,
            }
        } else {
            // join keeps absolute input as-is
            self.dir.join(name)
        };
        if target.is_dir() {
            self.dir = target;
            self.refresh();
            return PickerOutcome::Pending;
        }
        PickerOutcome::Confirmed(target)
    }
}

fn list_dir(dir: &Path) -> Vec<Entry> {
    let mut entries = Vec::new();
    match fs::read_dir(dir) {
        Ok(read_dir) => {
            for entry in read_dir.flatten() {
                let path = entry.path();
                let is_dir = path.is_dir();
                if is_dir || is_text_file(&path) {
                    entries.push(Entry {
                        name: entry.file_name().to_string_lossy().to_string(),
                        is_dir,
                    });
                }
            }
        }
        Err(e) => warn!(target: "picker", dir = %dir.display(), error = %e, "cannot list directory"),
    }
    // directories first, then by name
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    if dir.parent().is_some() {
        entries.insert(
            0,
            Entry {
                name: "..".to_string(),
                is_dir: true,
            },
        );
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn type_str(picker: &mut FilePicker, s: &str) {
        for c in s.chars() {
            assert_eq!(picker.handle_key(key(KeyCode::Char(c))), PickerOutcome::Pending);
        }
    }

    fn names(picker: &FilePicker) -> Vec<&str> {
        picker.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn lists_directories_then_text_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.TXT"), "").unwrap();
        fs::write(dir.path().join("image.png"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let picker = FilePicker::new(PickerKind::Open, dir.path().to_path_buf());
        assert_eq!(names(&picker), ["..", "sub", "a.TXT", "b.txt"]);
    }

    #[test]
    fn typed_name_confirms_relative_to_directory() {
        let dir = tempdir().unwrap();
        let mut picker = FilePicker::new(PickerKind::Save, dir.path().to_path_buf());
        type_str(&mut picker, "notes");
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter)),
            PickerOutcome::Confirmed(dir.path().join("notes"))
        );
    }

    #[test]
    fn absolute_input_is_taken_verbatim() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        let target = other.path().join("x.txt");
        let mut picker = FilePicker::new(PickerKind::Save, dir.path().to_path_buf());
        type_str(&mut picker, &target.to_string_lossy());
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerOutcome::Confirmed(target));
    }

    #[test]
    fn enter_on_directory_descends() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/inner.txt"), "").unwrap();

        let mut picker = FilePicker::new(PickerKind::Open, dir.path().to_path_buf());
        picker.handle_key(key(KeyCode::Down));
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(picker.input(), "sub");
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerOutcome::Pending);
        assert_eq!(picker.dir(), dir.path().join("sub"));
        assert_eq!(names(&picker), ["..", "inner.txt"]);

        picker.handle_key(key(KeyCode::Down));
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter)),
            PickerOutcome::Confirmed(dir.path().join("sub/inner.txt"))
        );
    }

    #[test]
    fn escape_cancels_and_empty_enter_waits() {
        let dir = tempdir().unwrap();
        let mut picker = FilePicker::new(PickerKind::Open, dir.path().to_path_buf());
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerOutcome::Pending);
        assert_eq!(picker.handle_key(key(KeyCode::Esc)), PickerOutcome::Cancelled);
    }

    #[test]
    fn editing_input_clears_selection() {
        let dir = tempdir().unwrap();
        let mut picker = FilePicker::new(PickerKind::Open, dir.path().to_path_buf());
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(picker.selected(), Some(0));
        picker.handle_key(key(KeyCode::Backspace));
        assert_eq!(picker.selected(), None);
        assert_eq!(picker.input(), ".");
    }

    #[test]
    fn pasted_text_extends_the_name() {
        let dir = tempdir().unwrap();
        let mut picker = FilePicker::new(PickerKind::Save, dir.path().to_path_buf());
        picker.handle_key(key(KeyCode::Down));
        picker.push_str("notes\r\n");
        assert_eq!(picker.selected(), None);
        assert_eq!(picker.input(), "..notes");
        picker.handle_key(key(KeyCode::Backspace));
        picker.push_str("-2");
        assert_eq!(picker.input(), "..note-2");
    }
}
