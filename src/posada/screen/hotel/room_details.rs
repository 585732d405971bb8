// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::sync::Arc;

use iced::keyboard::key::Named;
use iced::keyboard::{self, Key, Modifiers};
use iced::widget::{
    Column, Row, Rule, Space, Text, button, checkbox, column, container, focus_next, focus_previous,
    pick_list, row, scrollable, text, text_input,
};
use iced::{Alignment, Element, Length, Subscription, Task, event};
use posada_core::client::ApiClient;
use posada_core::error::{ApiError, Invalid};
use posada_core::models::booking::Booking;
use posada_core::models::room::Room;
use posada_core::views::room_details::{
    BookingAction, DetailRequest, PendingBookingUpdate, RoomDetails,
};
use posada_core::views::sequence::Ticket;
use posada_utils::date::{now, parse_input_datetime};
use posada_utils::format::{format_currency, format_date_time, format_for_input};
use posada_utils::styling::{
    GLOBAL_BUTTON_HEIGHT, GLOBAL_SPACING, MODAL_WIDTH, TABLE_WIDTH, TEXT_SIZE, TITLE_TEXT_SIZE,
    booking_color,
};
use tracing::warn;

use crate::fl;
use crate::posada::widgets::modal::modal;
use crate::posada::widgets::toast::Toast;

pub struct RoomDetailsScreen {
    details: RoomDetails,
    modal: Option<BookingModal>,
}

/// Modal currently shown above the room details
#[derive(Debug, Clone)]
pub enum BookingModal {
    /// Change the dates of a booking, or check it in when `action` is `CheckIn`
    Dates {
        action: BookingAction,
        booking_id: i32,
        check_in: String,
        check_out: String,
    },
    CheckOutAndPay {
        payment_method: PaymentMethod,
        currency: Currency,
        send_email: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "{}", fl!("cash")),
            PaymentMethod::Transfer => write!(f, "{}", fl!("bank-transfer")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Vnd,
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Vnd => write!(f, "VND"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum RoomTextInputFields {
    Name,
    Price,
    Notes,
}

#[derive(Debug, Clone, Copy)]
pub enum DateField {
    CheckIn,
    CheckOut,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Asks the parent to go back
    Back,
    /// Asks the parent to add a toast
    AddToast(Toast),
    /// Hotkey (Subscription) pressed
    Hotkey(Hotkey),

    /// Asks for the room aggregate again
    Reload,
    /// Callback after a room request, tagged with the ticket it was issued with
    RoomLoaded(Ticket, Result<Room, ApiError>),
    /// Callback when using the text inputs of the room form
    TextInputUpdate(String, RoomTextInputFields),

    /// Opens the change dates modal for the given booking
    OpenChangeDates(i32),
    /// Opens the check-in modal for the given booking
    OpenCheckIn(i32),
    /// Opens the check-out and pay modal
    OpenCheckOutAndPay,
    /// Closes whatever modal is open
    CloseModal,

    /// Callback when using the date inputs of the booking modals
    ModalDateUpdate(String, DateField),
    PaymentMethodSelected(PaymentMethod),
    CurrencySelected(Currency),
    SendEmailToggled(bool),

    /// Validates the open booking modal and sends it to the backend
    SubmitBookingModal,
    /// Callback after a booking update
    BookingUpdated(PendingBookingUpdate, Result<(), ApiError>),
}

pub enum Action {
    None,
    Back,
    Run(Task<Message>),
    AddToast(Toast),
}

impl RoomDetailsScreen {
    pub fn new(client: &Arc<ApiClient>, room_id: i32) -> (Self, Task<Message>) {
        let mut details = RoomDetails::default();
        let task = details
            .open(room_id)
            .map(|request| fetch_room(client, request))
            .unwrap_or_else(Task::none);

        (
            Self {
                details,
                modal: None,
            },
            task,
        )
    }

    pub fn room_id(&self) -> Option<i32> {
        self.details.room_id()
    }

    pub fn update(&mut self, message: Message, client: &Arc<ApiClient>) -> Action {
        match message {
            Message::Back => {
                if self.modal.is_some() {
                    self.modal = None;
                    return Action::None;
                }
                Action::Back
            }
            Message::AddToast(toast) => Action::AddToast(toast),
            Message::Hotkey(hotkey) => match hotkey {
                Hotkey::Tab(modifiers) => {
                    if modifiers.shift() {
                        Action::Run(focus_previous())
                    } else {
                        Action::Run(focus_next())
                    }
                }
                Hotkey::Escape => self.update(Message::CloseModal, client),
            },

            Message::Reload => match self.details.reload() {
                Some(request) => Action::Run(fetch_room(client, request)),
                None => Action::None,
            },
            Message::RoomLoaded(ticket, result) => match self.details.apply(ticket, result) {
                Ok(_) => Action::None,
                Err(err) => {
                    warn!("could not load the room: {err}");
                    Action::AddToast(Toast::api_error(&err))
                }
            },
            Message::TextInputUpdate(value, field) => {
                match field {
                    RoomTextInputFields::Name => self.details.name = value,
                    RoomTextInputFields::Price => {
                        if value.is_empty() || value.parse::<f64>().is_ok() {
                            self.details.price = value;
                        }
                    }
                    RoomTextInputFields::Notes => self.details.notes = value,
                }
                Action::None
            }

            Message::OpenChangeDates(booking_id) => {
                let Some(booking) = self.details.booking(booking_id) else {
                    return Action::AddToast(Toast::api_error(&ApiError::Validation(
                        Invalid::UnknownBooking(booking_id),
                    )));
                };
                if !booking.is_checked_in() {
                    return Action::AddToast(Toast::api_error(&ApiError::Validation(
                        Invalid::NotCheckedIn(booking_id),
                    )));
                }

                self.modal = Some(BookingModal::Dates {
                    action: BookingAction::SaveDates,
                    booking_id,
                    check_in: input_value(booking.arrival()),
                    check_out: input_value(booking.check_out_at),
                });
                Action::None
            }
            Message::OpenCheckIn(booking_id) => {
                let Some(booking) = self.details.booking(booking_id) else {
                    return Action::AddToast(Toast::api_error(&ApiError::Validation(
                        Invalid::UnknownBooking(booking_id),
                    )));
                };

                self.modal = Some(BookingModal::Dates {
                    action: BookingAction::CheckIn,
                    booking_id,
                    check_in: format_for_input(&now()),
                    check_out: input_value(booking.check_out_at),
                });
                Action::None
            }
            Message::OpenCheckOutAndPay => {
                if !has_guest_in_house(&self.details) {
                    return Action::None;
                }
                self.modal = Some(BookingModal::CheckOutAndPay {
                    payment_method: PaymentMethod::default(),
                    currency: Currency::default(),
                    send_email: false,
                });
                Action::None
            }
            Message::CloseModal => {
                // a modal being saved stays open until the backend answers
                if self.details.saving().is_none() {
                    self.modal = None;
                }
                Action::None
            }

            Message::ModalDateUpdate(value, field) => {
                if let Some(BookingModal::Dates {
                    check_in,
                    check_out,
                    ..
                }) = &mut self.modal
                {
                    match field {
                        DateField::CheckIn => *check_in = value,
                        DateField::CheckOut => *check_out = value,
                    }
                }
                Action::None
            }
            Message::PaymentMethodSelected(selected) => {
                if let Some(BookingModal::CheckOutAndPay { payment_method, .. }) = &mut self.modal
                {
                    *payment_method = selected;
                }
                Action::None
            }
            Message::CurrencySelected(selected) => {
                if let Some(BookingModal::CheckOutAndPay { currency, .. }) = &mut self.modal {
                    *currency = selected;
                }
                Action::None
            }
            Message::SendEmailToggled(value) => {
                if let Some(BookingModal::CheckOutAndPay { send_email, .. }) = &mut self.modal {
                    *send_email = value;
                }
                Action::None
            }

            Message::SubmitBookingModal => {
                let Some(BookingModal::Dates {
                    action,
                    booking_id,
                    check_in,
                    check_out,
                }) = &self.modal
                else {
                    return Action::None;
                };

                let (Some(check_in), Some(check_out)) = (
                    parse_input_datetime(check_in),
                    parse_input_datetime(check_out),
                ) else {
                    return Action::AddToast(Toast::api_error(&ApiError::Validation(
                        Invalid::InvalidDate,
                    )));
                };

                match self
                    .details
                    .begin_booking_update(*action, *booking_id, check_in, check_out)
                {
                    Ok(pending) => Action::Run(Task::perform(
                        pending.update.clone().send(client.clone()),
                        move |res| Message::BookingUpdated(pending.clone(), res.map(|_| ())),
                    )),
                    Err(err) => Action::AddToast(Toast::api_error(&err)),
                }
            }
            Message::BookingUpdated(pending, result) => {
                match self.details.finish_booking_update(&pending, result) {
                    Ok(reload) => {
                        self.modal = None;
                        let message = match pending.action {
                            BookingAction::SaveDates => fl!("dates-saved"),
                            BookingAction::CheckIn => fl!("checked-in"),
                        };
                        let toast = Task::done(Message::AddToast(Toast::success_toast(message)));

                        match reload {
                            Some(request) => {
                                Action::Run(Task::batch([fetch_room(client, request), toast]))
                            }
                            None => Action::Run(toast),
                        }
                    }
                    Err(err) => {
                        warn!(
                            booking_id = pending.update.booking_id(),
                            "could not update the booking: {err}"
                        );
                        Action::AddToast(Toast::api_error(&err))
                    }
                }
            }
        }
    }

    pub fn view(&self) -> iced::Element<'_, Message> {
        let content: Element<'_, Message> = match self.details.room() {
            None => container(text(fl!("loading")).size(TITLE_TEXT_SIZE))
                .center(Length::Fill)
                .into(),
            Some(room) => column![
                header(
                    room,
                    self.details.is_loading(),
                    has_guest_in_house(&self.details),
                ),
                container(
                    column![room_form(&self.details, room), bookings_table(room)]
                        .spacing(GLOBAL_SPACING * 3.)
                        .width(TABLE_WIDTH)
                )
                .width(Length::Fill)
                .align_x(Alignment::Center)
                .padding(30.)
            ]
            .spacing(GLOBAL_SPACING)
            .height(Length::Fill)
            .width(Length::Fill)
            .into(),
        };

        let Some(open_modal) = &self.modal else {
            return content;
        };

        let modal_content = match open_modal {
            BookingModal::Dates {
                action,
                check_in,
                check_out,
                ..
            } => dates_modal(*action, check_in, check_out, self.details.saving().is_some()),
            BookingModal::CheckOutAndPay {
                payment_method,
                currency,
                send_email,
            } => checkout_modal(self.details.room(), *payment_method, *currency, *send_email),
        };

        modal(
            content,
            container(modal_content)
                .width(MODAL_WIDTH)
                .padding(30.)
                .style(container::rounded_box),
            Message::CloseModal,
        )
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(handle_event)
    }
}

fn fetch_room(client: &Arc<ApiClient>, request: DetailRequest) -> Task<Message> {
    let ticket = request.ticket;
    Task::perform(
        Room::get_details(client.clone(), request.room_id),
        move |res| Message::RoomLoaded(ticket, res),
    )
}

fn input_value(date: Option<chrono::NaiveDateTime>) -> String {
    date.map(|date| format_for_input(&date)).unwrap_or_default()
}

fn display_date(date: Option<chrono::NaiveDateTime>) -> String {
    date.map(|date| format_date_time(&date))
        .unwrap_or_else(|| "-".to_string())
}

//
// SUBSCRIPTION HANDLING
//

#[derive(Debug, Clone)]
pub enum Hotkey {
    Tab(Modifiers),
    Escape,
}

fn handle_event(event: event::Event, _: event::Status, _: iced::window::Id) -> Option<Message> {
    match event {
        #[allow(clippy::collapsible_match)]
        event::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => match key {
            Key::Named(Named::Tab) => Some(Message::Hotkey(Hotkey::Tab(modifiers))),
            Key::Named(Named::Escape) => Some(Message::Hotkey(Hotkey::Escape)),
            _ => None,
        },
        _ => None,
    }
}

//
// VIEW COMPOSING
//

/// Check-out is only offered once a guest of the room is checked in
fn has_guest_in_house(details: &RoomDetails) -> bool {
    details.bookings().iter().any(Booking::is_checked_in)
}

fn header(room: &Room, loading: bool, checked_in: bool) -> iced::Element<'_, Message> {
    let back_button = button(text(fl!("back")).center())
        .on_press(Message::Back)
        .height(GLOBAL_BUTTON_HEIGHT);

    let reload_button = button(text(fl!("refresh")).center())
        .on_press_maybe((!loading).then_some(Message::Reload))
        .height(GLOBAL_BUTTON_HEIGHT);

    let checkout_button = button(text(fl!("check-out-and-pay")).center())
        .on_press_maybe(checked_in.then_some(Message::OpenCheckOutAndPay))
        .height(GLOBAL_BUTTON_HEIGHT);

    row![
        back_button,
        text(format!("{} {}", fl!("room"), room.name)).size(TITLE_TEXT_SIZE),
        Space::new(Length::Fill, Length::Shrink),
        reload_button,
        checkout_button
    ]
    .align_y(Alignment::Center)
    .spacing(GLOBAL_SPACING)
    .padding(3.)
    .into()
}

fn room_form<'a>(details: &'a RoomDetails, room: &'a Room) -> iced::Element<'a, Message> {
    let name_input = text_input(fl!("name").as_str(), &details.name)
        .on_input(|c| Message::TextInputUpdate(c, RoomTextInputFields::Name))
        .size(TEXT_SIZE)
        .width(Length::Fill);

    let price_input = text_input(fl!("price").as_str(), &details.price)
        .on_input(|c| Message::TextInputUpdate(c, RoomTextInputFields::Price))
        .size(TEXT_SIZE)
        .width(Length::Fill);

    let notes_input = text_input(fl!("notes").as_str(), &details.notes)
        .on_input(|c| Message::TextInputUpdate(c, RoomTextInputFields::Notes))
        .size(TEXT_SIZE)
        .width(Length::Fill);

    let clean_status = if room.clean_status {
        fl!("clean")
    } else {
        fl!("dirty")
    };

    let info = column![
        text(format!("{}: {}", fl!("room-type"), room.room_type)).size(TEXT_SIZE),
        text(format!("{}: {}", fl!("floor"), room.floor)).size(TEXT_SIZE),
        text(format!("{}: {}", fl!("status"), room.status)).size(TEXT_SIZE),
        text(format!("{}: {clean_status}", fl!("clean-status"))).size(TEXT_SIZE),
        text(format!(
            "{}: {}",
            fl!("hotel"),
            room.hotel
                .as_ref()
                .map(|hotel| hotel.name.as_str())
                .unwrap_or("-")
        ))
        .size(TEXT_SIZE),
    ]
    .spacing(GLOBAL_SPACING)
    .width(300.);

    let form = column![
        column![text(fl!("name")), name_input].spacing(1.),
        column![text(fl!("price")), price_input].spacing(1.),
        column![text(fl!("notes")), notes_input].spacing(1.),
    ]
    .spacing(GLOBAL_SPACING)
    .width(Length::Fill);

    row![form, info].spacing(GLOBAL_SPACING * 5.).into()
}

fn bookings_table<'a>(room: &'a Room) -> iced::Element<'a, Message> {
    if room.bookings.is_empty() {
        return container(text(fl!("no-bookings")).size(TITLE_TEXT_SIZE))
            .width(Length::Fill)
            .align_x(Alignment::Center)
            .padding(30.)
            .into();
    }

    let title =
        |label: String, width: f32| -> Text<'a> { text(label).size(TEXT_SIZE).width(width) };

    let title_row = Row::new()
        .push(title(fl!("customer"), 200.))
        .push(title(fl!("arrival"), 180.))
        .push(title(fl!("check-out"), 180.))
        .push(title(fl!("guests"), 120.))
        .push(title(fl!("status"), 120.))
        .align_y(Alignment::Center);

    let mut grid = Column::new()
        .push(title_row)
        .spacing(GLOBAL_SPACING)
        .width(Length::Shrink);

    for booking in &room.bookings {
        grid = grid.push(row![Rule::horizontal(1.)].width(TABLE_WIDTH));
        grid = grid.push(booking_row(booking));
    }

    scrollable(grid).spacing(GLOBAL_SPACING).into()
}

fn booking_row(booking: &Booking) -> iced::Element<'_, Message> {
    let checked_in = booking.is_checked_in();

    let state = if checked_in {
        fl!("checked-in-badge")
    } else {
        fl!("not-arrived")
    };

    let actions = row![
        Space::new(Length::Fill, Length::Shrink),
        button(text(fl!("change-dates")).size(TEXT_SIZE).center())
            .on_press_maybe(checked_in.then_some(Message::OpenChangeDates(booking.id))),
        button(text(fl!("check-in")).size(TEXT_SIZE).center())
            .style(button::success)
            .on_press_maybe((!checked_in).then_some(Message::OpenCheckIn(booking.id))),
    ]
    .spacing(GLOBAL_SPACING)
    .width(Length::Fill);

    Row::new()
        .push(text(booking.customer_name()).size(TEXT_SIZE).width(200.))
        .push(
            text(display_date(booking.arrival()))
                .size(TEXT_SIZE)
                .width(180.),
        )
        .push(
            text(display_date(booking.check_out_at))
                .size(TEXT_SIZE)
                .width(180.),
        )
        .push(
            text(fl!(
                "guest-count",
                adults = booking.adults,
                children = booking.children
            ))
            .size(TEXT_SIZE)
            .width(120.),
        )
        .push(
            text(state)
                .size(TEXT_SIZE)
                .width(120.)
                .color(booking_color(checked_in)),
        )
        .push(actions)
        .align_y(Alignment::Center)
        .into()
}

// MODALS

fn dates_modal<'a>(
    action: BookingAction,
    check_in: &'a str,
    check_out: &'a str,
    saving: bool,
) -> iced::Element<'a, Message> {
    let (title, submit) = match action {
        BookingAction::SaveDates => (fl!("change-dates"), fl!("save")),
        BookingAction::CheckIn => (fl!("check-in"), fl!("check-in")),
    };

    let check_in_input = text_input("YYYY-MM-DDTHH:MM", check_in)
        .on_input(|c| Message::ModalDateUpdate(c, DateField::CheckIn))
        .size(TEXT_SIZE)
        .width(Length::Fill);

    let check_out_input = text_input("YYYY-MM-DDTHH:MM", check_out)
        .on_input(|c| Message::ModalDateUpdate(c, DateField::CheckOut))
        .on_submit(Message::SubmitBookingModal)
        .size(TEXT_SIZE)
        .width(Length::Fill);

    let buttons = row![
        button(text(fl!("close")).center().width(Length::Fill))
            .style(button::secondary)
            .on_press_maybe((!saving).then_some(Message::CloseModal))
            .width(Length::Fill),
        button(
            text(if saving { fl!("saving") } else { submit })
                .center()
                .width(Length::Fill)
        )
        .on_press_maybe((!saving).then_some(Message::SubmitBookingModal))
        .width(Length::Fill),
    ]
    .spacing(GLOBAL_SPACING);

    column![
        text(title).size(TITLE_TEXT_SIZE),
        column![text(fl!("check-in-time")), check_in_input].spacing(1.),
        column![text(fl!("check-out-time")), check_out_input].spacing(1.),
        buttons
    ]
    .spacing(GLOBAL_SPACING * 2.)
    .width(Length::Fill)
    .into()
}

fn checkout_modal<'a>(
    room: Option<&'a Room>,
    payment_method: PaymentMethod,
    currency: Currency,
    send_email: bool,
) -> iced::Element<'a, Message> {
    let (room_name, price) = room
        .map(|room| (room.name.as_str(), format_currency(room.price)))
        .unwrap_or(("-", String::new()));

    let payment_selector = pick_list(
        [PaymentMethod::Cash, PaymentMethod::Transfer],
        Some(payment_method),
        Message::PaymentMethodSelected,
    )
    .width(Length::Fill);

    let currency_selector = pick_list(
        [Currency::Vnd, Currency::Usd],
        Some(currency),
        Message::CurrencySelected,
    )
    .width(Length::Fill);

    let buttons = row![
        button(text(fl!("close")).center().width(Length::Fill))
            .style(button::secondary)
            .on_press(Message::CloseModal)
            .width(Length::Fill),
        button(text(fl!("check-out-and-pay")).center().width(Length::Fill))
            .on_press(Message::CloseModal)
            .width(Length::Fill),
    ]
    .spacing(GLOBAL_SPACING);

    column![
        text(fl!("check-out-and-pay")).size(TITLE_TEXT_SIZE),
        text(format!("{} {room_name}", fl!("room"))).size(TEXT_SIZE),
        text(format!("{}: {price} VND", fl!("price"))).size(TEXT_SIZE),
        column![text(fl!("payment-method")), payment_selector].spacing(1.),
        column![text(fl!("currency")), currency_selector].spacing(1.),
        checkbox(fl!("send-email"), send_email).on_toggle(Message::SendEmailToggled),
        buttons
    ]
    .spacing(GLOBAL_SPACING * 2.)
    .width(Length::Fill)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use posada_core::config::Config;

    fn client() -> Arc<ApiClient> {
        let config = Config::from_lookup(|key| {
            (key == posada_core::config::BACKEND_URL).then(|| "http://127.0.0.1:9".to_string())
        })
        .unwrap();
        Arc::new(ApiClient::new(&config).unwrap())
    }

    fn room_screen(checked_in: bool) -> RoomDetailsScreen {
        let at = |day| {
            NaiveDate::from_ymd_opt(2024, 4, day)
                .and_then(|d| d.and_hms_opt(14, 0, 0))
                .unwrap()
        };
        let room = Room {
            id: 12,
            name: "P.201".to_string(),
            bookings: vec![Booking {
                id: 2,
                booking_at: Some(at(3)),
                check_in_at: checked_in.then(|| at(3)),
                check_out_at: Some(at(6)),
                ..Default::default()
            }],
            ..Default::default()
        };

        let mut details = RoomDetails::default();
        let request = details.open(12).unwrap();
        details.apply(request.ticket, Ok(room)).unwrap();
        RoomDetailsScreen {
            details,
            modal: None,
        }
    }

    #[test]
    fn check_out_needs_a_guest_in_house() {
        let client = client();

        let mut screen = room_screen(false);
        assert!(!has_guest_in_house(&screen.details));
        screen.update(Message::OpenCheckOutAndPay, &client);
        assert!(screen.modal.is_none());

        let mut screen = room_screen(true);
        assert!(has_guest_in_house(&screen.details));
        screen.update(Message::OpenCheckOutAndPay, &client);
        assert!(matches!(
            screen.modal,
            Some(BookingModal::CheckOutAndPay { .. })
        ));
    }

    #[test]
    fn change_dates_waits_for_the_check_in() {
        let client = client();

        let mut screen = room_screen(false);
        let action = screen.update(Message::OpenChangeDates(2), &client);
        assert!(matches!(action, Action::AddToast(_)));
        assert!(screen.modal.is_none());

        let mut screen = room_screen(true);
        screen.update(Message::OpenChangeDates(2), &client);
        assert!(matches!(
            screen.modal,
            Some(BookingModal::Dates {
                action: BookingAction::SaveDates,
                booking_id: 2,
                ..
            })
        ));
    }
}
