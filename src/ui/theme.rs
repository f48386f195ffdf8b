use crate::ui::style::{Color, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub subtitle: Style,
    pub accent: Style,
    pub success: Style,
    pub muted: Style,
    pub hint: Style,
    pub error: Style,
    pub placeholder: Style,
    pub focused: Style,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            title: Style::new().color(Color::Green).bold(),
            subtitle: Style::new().color(Color::DarkGrey),
            accent: Style::new().color(Color::Green).bold(),
            success: Style::new().color(Color::Green),
            muted: Style::new().color(Color::DarkGrey),
            hint: Style::new().color(Color::DarkGrey).dim(),
            error: Style::new().color(Color::Red).bold(),
            placeholder: Style::new().color(Color::DarkGrey),
            focused: Style::new().bold(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
