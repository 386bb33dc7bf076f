use iced::widget::{button, canvas, column, container, row, space, stack, text};
use iced::{Alignment, Element, Length, Padding};

use crate::app::{Message, Overlay};
use crate::theme::{CLOSE_FONT, LABEL_FONT, TIME_FONT};

impl Overlay {
    pub(crate) fn view_overlay(&self) -> Element<'_, Message> {
        let theme = &self.theme;
        let face = self.clock.face();

        // Bottom layer: the animated ring
        let border = canvas(
            self.border
                .canvas(self.config.border_offset, self.config.border_stroke),
        )
        .width(Length::Fill)
        .height(Length::Fill);

        // Middle layer: time, date, volume
        let labels = column![
            text(face.time.as_str())
                .size(theme.time_size)
                .font(TIME_FONT)
                .color(theme.text),
            text(face.date.as_str())
                .size(theme.date_size)
                .font(LABEL_FONT)
                .color(theme.text),
            text(self.volume_label.as_str())
                .size(theme.volume_size)
                .font(LABEL_FONT)
                .color(theme.text),
        ]
        .spacing(4)
        .align_x(Alignment::Center);
        let content = container(labels)
            .padding(Padding {
                top: 10.0,
                right: 0.0,
                bottom: 0.0,
                left: 0.0,
            })
            .center(Length::Fill);

        // Top layer: close glyph pinned to the top-right corner
        let close = button(text("×").size(theme.close_size).font(CLOSE_FONT))
            .padding([0, 6])
            .style(theme.close_button_style())
            .on_press(Message::Close);
        let close_row = container(row![space::horizontal(), close])
            .padding(Padding {
                top: 5.0,
                right: 8.0,
                bottom: 0.0,
                left: 0.0,
            })
            .width(Length::Fill);

        stack![border, content, close_row]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
