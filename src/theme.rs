use crossterm::style::Color;

/// OSC 112: hand the cursor colour back to the terminal's default.
pub const CURSOR_COLOUR_RESET: &str = "\x1b]112\x07";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colours for the text surface and the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub surface_bg: Color,
    pub surface_fg: Color,
    pub cursor: Color,
    pub status_bg: Color,
    pub status_fg: Color,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                surface_bg: Color::White,
                surface_fg: Color::Black,
                cursor: Color::Black,
                status_bg: Color::Grey,
                status_fg: Color::Black,
            },
            Theme::Dark => Palette {
                surface_bg: Color::DarkGrey,
                surface_fg: Color::White,
                cursor: Color::White,
                status_bg: Color::DarkGrey,
                status_fg: Color::White,
            },
        }
    }
}

impl Palette {
    /// OSC 12 sequence setting the terminal cursor colour.
    pub fn cursor_escape(&self) -> &'static str {
        match self.cursor {
            Color::White => "\x1b]12;white\x07",
            _ => "\x1b]12;black\x07",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_light() {
        let palette = Theme::default().palette();
        assert_eq!(palette.surface_bg, Color::White);
        assert_eq!(palette.status_bg, Color::Grey);
        assert_eq!(palette.cursor_escape(), "\x1b]12;black\x07");
    }

    #[test]
    fn dark_palette() {
        let palette = Theme::Light.toggled().palette();
        assert_eq!(palette.surface_bg, Color::DarkGrey);
        assert_eq!(palette.surface_fg, Color::White);
        assert_eq!(palette.cursor, Color::White);
        assert_eq!(palette.status_bg, Color::DarkGrey);
        assert_eq!(palette.status_fg, Color::White);
    }

    #[test]
    fn toggling_twice_restores_every_colour() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(theme.toggled().toggled().palette(), theme.palette());
        }
    }
}
