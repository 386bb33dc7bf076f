use iced::widget::button;
use iced::{Background, Color, Font};

const fn helvetica(weight: iced::font::Weight) -> Font {
    Font {
        family: iced::font::Family::Name("Helvetica"),
        weight,
        stretch: iced::font::Stretch::Normal,
        style: iced::font::Style::Normal,
    }
}

pub(crate) const TIME_FONT: Font = helvetica(iced::font::Weight::Bold);
pub(crate) const LABEL_FONT: Font = helvetica(iced::font::Weight::Normal);
pub(crate) const CLOSE_FONT: Font = Font {
    family: iced::font::Family::Name("Arial"),
    weight: iced::font::Weight::Normal,
    stretch: iced::font::Stretch::Normal,
    style: iced::font::Style::Normal,
};

/// Colors and font sizes of the overlay. Single dark palette.
pub struct OverlayTheme {
    pub text: Color,
    pub background: Color,
    // Font sizes (logical pixels)
    pub time_size: f32,
    pub date_size: f32,
    pub volume_size: f32,
    pub close_size: f32,
}

impl OverlayTheme {
    /// White text on translucent black.
    pub fn dark(opacity: f32) -> Self {
        Self {
            text: Color::WHITE,
            background: Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: opacity.clamp(0.0, 1.0),
            },
            time_size: 36.0,
            date_size: 14.0,
            volume_size: 12.0,
            close_size: 16.0,
        }
    }

    /// Borderless, backgroundless button for the close glyph.
    pub fn close_button_style(&self) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
        let text_color = self.text;
        move |_theme: &iced::Theme, status: button::Status| {
            let background = match status {
                button::Status::Hovered | button::Status::Pressed => Some(Background::Color(
                    Color {
                        a: 0.15,
                        ..text_color
                    },
                )),
                _ => None,
            };
            button::Style {
                background,
                text_color,
                ..Default::default()
            }
        }
    }
}
