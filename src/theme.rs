use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors. Dialogs carry a resolved `DialogColors`
// palette; widgets pick a role from it when they draw.

/// Roles a widget can ask its dialog palette for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Normal,
    Focus,
    HotNormal,
    HotFocus,
    Selected,
    Title,
    Frame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogColors {
    pub normal: Style,
    pub focus: Style,
    pub hot_normal: Style,
    pub hot_focus: Style,
    pub selected: Style,
    pub title: Style,
    pub frame: Style,
}

impl DialogColors {
    pub fn get(&self, role: ColorRole) -> Style {
        match role {
            ColorRole::Normal => self.normal,
            ColorRole::Focus => self.focus,
            ColorRole::HotNormal => self.hot_normal,
            ColorRole::HotFocus => self.hot_focus,
            ColorRole::Selected => self.selected,
            ColorRole::Title => self.title,
            ColorRole::Frame => self.frame,
        }
    }

    /// Resolve every role of `group` through `skin`.
    pub fn from_skin(skin: &Skin, group: &str) -> Self {
        Self {
            normal: skin.style(group, "_default_"),
            focus: skin.style(group, "focus"),
            hot_normal: skin.style(group, "hotnormal"),
            hot_focus: skin.style(group, "hotfocus"),
            selected: skin.style(group, "selected"),
            title: skin.style(group, "title"),
            frame: skin.style(group, "frame"),
        }
    }
}

impl Default for DialogColors {
    fn default() -> Self {
        dialog_colors()
    }
}

pub fn dialog_colors() -> DialogColors {
    let normal = Style::default().fg(Color::Black).bg(Color::Gray);
    DialogColors {
        normal,
        focus: Style::default().fg(Color::Black).bg(Color::Cyan),
        hot_normal: Style::default().fg(Color::Blue).bg(Color::Gray),
        hot_focus: Style::default().fg(Color::Blue).bg(Color::Cyan),
        selected: Style::default().fg(Color::White).bg(Color::Blue),
        title: Style::default()
            .fg(Color::Blue)
            .bg(Color::Gray)
            .add_modifier(Modifier::BOLD),
        frame: normal,
    }
}

pub fn alarm_colors() -> DialogColors {
    let normal = Style::default().fg(Color::White).bg(Color::Red);
    DialogColors {
        normal,
        focus: Style::default().fg(Color::Black).bg(Color::Gray),
        hot_normal: Style::default().fg(Color::LightYellow).bg(Color::Red),
        hot_focus: Style::default().fg(Color::Yellow).bg(Color::Gray),
        selected: Style::default().fg(Color::Black).bg(Color::Gray),
        title: Style::default()
            .fg(Color::LightYellow)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        frame: normal,
    }
}

/// Semantic color lookup: `(group, key)` → style.
///
/// Unknown keys fall back to the group's `_default_` entry, unknown groups
/// to the plain terminal style.
#[derive(Debug, Clone)]
pub struct Skin {
    entries: HashMap<(String, String), Style>,
}

impl Skin {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn set(&mut self, group: &str, key: &str, style: Style) {
        self.entries
            .insert((group.to_string(), key.to_string()), style);
    }

    pub fn lookup(&self, group: &str, key: &str) -> Option<Style> {
        self.entries
            .get(&(group.to_string(), key.to_string()))
            .copied()
    }

    pub fn style(&self, group: &str, key: &str) -> Style {
        self.lookup(group, key)
            .or_else(|| self.lookup(group, "_default_"))
            .unwrap_or_default()
    }

    fn insert_palette(&mut self, group: &str, colors: &DialogColors) {
        self.set(group, "_default_", colors.normal);
        self.set(group, "focus", colors.focus);
        self.set(group, "hotnormal", colors.hot_normal);
        self.set(group, "hotfocus", colors.hot_focus);
        self.set(group, "selected", colors.selected);
        self.set(group, "title", colors.title);
        self.set(group, "frame", colors.frame);
    }
}

impl Default for Skin {
    fn default() -> Self {
        let mut skin = Self::empty();
        skin.insert_palette("dialog", &dialog_colors());
        skin.insert_palette("error", &alarm_colors());
        skin
    }
}
