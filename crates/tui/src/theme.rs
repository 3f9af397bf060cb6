use ratatui::style::Color;

use crate::app::Notice;

pub struct Theme {
    pub border_focus: Color,
    pub border_inactive: Color,
    pub tab_selected_fg: Color,
    pub tab_selected_bg: Color,
    pub success: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
    pub chart_line: Color,
}

pub const THEME: Theme = Theme {
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    tab_selected_fg: Color::Black,
    tab_selected_bg: Color::Cyan,
    success: Color::Green,
    info: Color::Blue,
    warning: Color::Yellow,
    error: Color::Red,
    chart_line: Color::Magenta,
};

impl Theme {
    pub fn notice_color(&self, n: &Notice) -> Color {
        match n {
            Notice::Success(_) => self.success,
            Notice::Info(_) => self.info,
            Notice::Warning(_) => self.warning,
            Notice::Error(_) => self.error,
        }
    }
}
