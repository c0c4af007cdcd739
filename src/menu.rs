// Menu bar model: which menu is open, which item is highlighted.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    New,
    Open,
    Save,
    Exit,
    ToggleTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(&'static str, Command),
    Separator,
}

#[derive(Debug)]
pub struct Menu {
    pub title: &'static str,
    pub entries: &'static [MenuEntry],
}

pub const MENUS: [Menu; 2] = [
    Menu {
        title: "File",
        entries: &[
            MenuEntry::Item("New", Command::New),
            MenuEntry::Item("Open", Command::Open),
            MenuEntry::Item("Save", Command::Save),
            MenuEntry::Separator,
            MenuEntry::Item("Exit", Command::Exit),
        ],
    },
    Menu {
        title: "View",
        entries: &[MenuEntry::Item("Toggle Dark Mode", Command::ToggleTheme)],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub menu: usize,
    pub entry: usize,
}

impl MenuState {
    pub fn open(menu: usize) -> Self {
        MenuState {
            menu: menu.min(MENUS.len() - 1),
            entry: 0,
        }
    }

    pub fn entries(&self) -> &'static [MenuEntry] {
        MENUS[self.menu].entries
    }

    pub fn next_menu(&mut self) {
        *self = Self::open((self.menu + 1) % MENUS.len());
    }

    pub fn prev_menu(&mut self) {
        *self = Self::open((self.menu + MENUS.len() - 1) % MENUS.len());
    }

    pub fn next_entry(&mut self) {
        let len = self.entries().len();
        let mut entry = self.entry;
        loop {
            entry = (entry + 1) % len;
            if matches!(self.entries()[entry], MenuEntry::Item(..)) {
                break;
            }
        }
        self.entry = entry;
    }

    pub fn prev_entry(&mut self) {
        let len = self.entries().len();
        let mut entry = self.entry;
        loop {
            entry = (entry + len - 1) % len;
            if matches!(self.entries()[entry], MenuEntry::Item(..)) {
                break;
            }
        }
        self.entry = entry;
    }

    pub fn selected(&self) -> Option<Command> {
        match self.entries().get(self.entry) {
            Some(MenuEntry::Item(_, command)) => Some(*command),
            _ => None,
        }
    }
}
