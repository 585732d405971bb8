// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use iced::widget::{Space, button, column, container, row, text, text_input};
use iced::{Alignment, Length, Subscription, Task};
use posada_core::client::ApiClient;
use posada_utils::styling::{GLOBAL_BUTTON_HEIGHT, GLOBAL_SPACING, TEXT_SIZE, TITLE_TEXT_SIZE};

use crate::fl;
use crate::posada::widgets::toast::Toast;

mod room_details;

pub struct Hotel {
    sub_screen: SubScreen,
}

pub enum SubScreen {
    Home { room_id: String },
    RoomDetails(room_details::RoomDetailsScreen),
}

#[derive(Debug, Clone)]
pub enum Message {
    Back,

    /// Callback when typing on the room number input
    RoomIdInputUpdate(String),
    /// Opens the details of the typed room
    OpenRoomDetails,
    RoomDetails(room_details::Message),
}

pub enum Action {
    None,
    Back,
    Run(Task<Message>),
    AddToast(Toast),
}

impl Default for Hotel {
    fn default() -> Self {
        Self::new()
    }
}

impl Hotel {
    pub fn new() -> Self {
        Self {
            sub_screen: SubScreen::Home {
                room_id: String::new(),
            },
        }
    }

    pub fn update(&mut self, message: Message, client: &Arc<ApiClient>) -> Action {
        match message {
            Message::Back => Action::Back,

            Message::RoomIdInputUpdate(value) => {
                if let SubScreen::Home { room_id } = &mut self.sub_screen {
                    // only digits are valid room identifiers
                    if value.chars().all(|c| c.is_ascii_digit()) {
                        *room_id = value;
                    }
                }
                Action::None
            }
            Message::OpenRoomDetails => {
                let SubScreen::Home { room_id } = &self.sub_screen else {
                    return Action::None;
                };

                let Ok(room_id) = room_id.parse::<i32>() else {
                    return Action::AddToast(Toast::error_toast(fl!("invalid-room-id")));
                };

                let (room_details, task) = room_details::RoomDetailsScreen::new(client, room_id);
                self.sub_screen = SubScreen::RoomDetails(room_details);
                Action::Run(task.map(Message::RoomDetails))
            }

            Message::RoomDetails(message) => {
                let SubScreen::RoomDetails(room_details) = &mut self.sub_screen else {
                    return Action::None;
                };

                match room_details.update(message, client) {
                    room_details::Action::None => Action::None,
                    room_details::Action::Run(task) => Action::Run(task.map(Message::RoomDetails)),
                    room_details::Action::Back => {
                        let room_id = room_details
                            .room_id()
                            .map(|id| id.to_string())
                            .unwrap_or_default();
                        self.sub_screen = SubScreen::Home { room_id };
                        Action::None
                    }
                    room_details::Action::AddToast(toast) => Action::AddToast(toast),
                }
            }
        }
    }

    pub fn view(&self) -> iced::Element<'_, Message> {
        match &self.sub_screen {
            SubScreen::Home { room_id } => home_screen(room_id),
            SubScreen::RoomDetails(room_details) => room_details.view().map(Message::RoomDetails),
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        match &self.sub_screen {
            SubScreen::Home { .. } => Subscription::none(),
            SubScreen::RoomDetails(room_details) => {
                room_details.subscription().map(Message::RoomDetails)
            }
        }
    }
}

//
// VIEW COMPOSING
//

fn home_screen(room_id: &str) -> iced::Element<'_, Message> {
    let back_button = button(text(fl!("back")).center())
        .on_press(Message::Back)
        .height(GLOBAL_BUTTON_HEIGHT);

    let header = row![
        back_button,
        text(fl!("hotel")).size(TITLE_TEXT_SIZE),
        Space::new(Length::Fill, Length::Shrink),
    ]
    .align_y(Alignment::Center)
    .spacing(GLOBAL_SPACING)
    .padding(3.);

    let room_input = text_input(fl!("room-number").as_str(), room_id)
        .on_input(Message::RoomIdInputUpdate)
        .on_submit(Message::OpenRoomDetails)
        .size(TEXT_SIZE)
        .width(Length::Fill);

    let open_button = button(text(fl!("room-details")).center().size(TEXT_SIZE))
        .on_press_maybe((!room_id.is_empty()).then_some(Message::OpenRoomDetails))
        .width(Length::Fill);

    let form = column![
        column![text(fl!("room-number")), room_input].spacing(1.),
        open_button
    ]
    .spacing(GLOBAL_SPACING)
    .width(400.);

    column![
        header,
        container(form)
            .align_x(Alignment::Center)
            .width(Length::Fill)
            .padding(50.)
    ]
    .into()
}
