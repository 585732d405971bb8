// SPDX-License-Identifier: GPL-3.0-only

use iced::widget::{Row, button, text};
use iced::{Alignment, Element};
use posada_utils::pagination::{PaginationAction, PaginationConfig};
use posada_utils::styling::{GLOBAL_SPACING, TEXT_SIZE};

use crate::fl;

/// Previous/next buttons around one link per page, the current page is highlighted
pub fn page_controls<'a, Message>(
    config: &PaginationConfig,
    on_action: impl Fn(PaginationAction) -> Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let mut controls = Row::new()
        .push(
            button(text(fl!("previous")).size(TEXT_SIZE).center())
                .on_press_maybe((!config.is_first()).then(|| on_action(PaginationAction::Back))),
        )
        .spacing(GLOBAL_SPACING)
        .align_y(Alignment::Center);

    for page in config.pages() {
        let active = page == config.current_page;
        controls = controls.push(
            button(text(page.to_string()).size(TEXT_SIZE).center())
                .style(if active {
                    button::primary
                } else {
                    button::secondary
                })
                .on_press_maybe((!active).then(|| on_action(PaginationAction::GoTo(page)))),
        );
    }

    controls
        .push(
            button(text(fl!("next")).size(TEXT_SIZE).center())
                .on_press_maybe((!config.is_last()).then(|| on_action(PaginationAction::Forward))),
        )
        .into()
}
