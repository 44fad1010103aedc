/// Colours and widget styles for the picker window
use crate::config::BACKGROUND_RGB;
use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme, Vector};

pub fn background() -> Color {
    let (r, g, b) = BACKGROUND_RGB;
    Color::from_rgb8(r, g, b)
}

pub const ACCENT: Color = Color::from_rgb(0.0, 212.0 / 255.0, 1.0);
pub const TEXT: Color = Color::WHITE;

/// Window body and titlebar
pub struct Surface;

impl container::StyleSheet for Surface {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(TEXT),
            background: Some(Background::Color(background())),
            ..Default::default()
        }
    }
}

/// Description overlay
pub struct InfoPanel;

impl container::StyleSheet for InfoPanel {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(TEXT),
            background: Some(Background::Color(Color {
                a: 0.98,
                ..background()
            })),
            border: Border {
                color: ACCENT,
                width: 1.0,
                radius: 10.0.into(),
            },
            ..Default::default()
        }
    }
}

/// Service entry button
pub struct ServiceButton;

impl button::StyleSheet for ServiceButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(Color { a: 0.2, ..ACCENT })),
            text_color: TEXT,
            border: Border {
                color: ACCENT,
                width: 2.0,
                radius: 10.0.into(),
            },
            shadow: Shadow::default(),
            shadow_offset: Vector::default(),
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(Color { a: 0.3, ..ACCENT })),
            ..self.active(style)
        }
    }
}

/// Titlebar controls and the info toggle
pub struct ChromeButton;

impl button::StyleSheet for ChromeButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: None,
            text_color: TEXT,
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1))),
            ..self.active(style)
        }
    }
}
