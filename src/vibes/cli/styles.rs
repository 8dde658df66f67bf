use console::Style;
use once_cell::sync::Lazy;

/// Named styles for panels, tables and the removal preview.
pub struct Theme {
    pub welcome_border: Style,
    pub menu_border: Style,
    pub heading: Style,
    pub table_header: Style,
    pub id: Style,
    pub title: Style,
    pub category: Style,
    pub time: Style,
    pub candidate: Style,
    pub dim: Style,
    pub field: Style,
    pub status: Style,
}

pub static VIBES_THEME: Lazy<Theme> = Lazy::new(|| Theme {
    welcome_border: Style::new().blue(),
    menu_border: Style::new().green(),
    heading: Style::new().bold(),
    table_header: Style::new().magenta().bold(),
    id: Style::new().blue(),
    title: Style::new().green(),
    category: Style::new().yellow(),
    time: Style::new().cyan(),
    candidate: Style::new().cyan(),
    dim: Style::new().dim(),
    field: Style::new().cyan().bold(),
    status: Style::new().blue(),
});
