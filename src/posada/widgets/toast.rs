// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::time::Duration;

use iced::time::Instant;
use iced::widget::{Column, column, container, mouse_area, stack, text};
use iced::{Alignment, Border, Element, Length, Theme};
use posada_core::error::{ApiError, FailureKind, Invalid};
use posada_utils::styling::{GLOBAL_SPACING, TEXT_SIZE};

use crate::fl;

/// How long a toast stays on screen
pub const TOAST_TIMEOUT: Duration = Duration::from_secs(5);

const TOAST_WIDTH: f32 = 320.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub status: Status,
    created: Instant,
}

impl Toast {
    pub fn error_toast(body: impl fmt::Display) -> Self {
        Self {
            title: fl!("error"),
            body: body.to_string(),
            status: Status::Danger,
            created: Instant::now(),
        }
    }

    pub fn success_toast(body: impl fmt::Display) -> Self {
        Self {
            title: fl!("success"),
            body: body.to_string(),
            status: Status::Success,
            created: Instant::now(),
        }
    }

    /// Error toast telling apart what went wrong with a backend call
    pub fn api_error(err: &ApiError) -> Self {
        let body = match err.kind() {
            FailureKind::Invalid => match err {
                ApiError::Validation(invalid) => invalid_message(*invalid),
                _ => fl!("error-missing-session"),
            },
            FailureKind::ServerResponded => match err.server_message() {
                Some(message) => fl!("error-server-message", message = message),
                None => fl!("error-server"),
            },
            FailureKind::NoResponse => fl!("error-no-response"),
            FailureKind::RequestFailed => fl!("error-request-failed"),
        };

        Self::error_toast(body)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= TOAST_TIMEOUT
    }
}

fn invalid_message(invalid: Invalid) -> String {
    match invalid {
        Invalid::UnknownTransaction(id) => fl!("invalid-unknown-transaction", id = id),
        Invalid::AlreadyCancelled(id) => fl!("invalid-already-cancelled", id = id),
        Invalid::UnknownBooking(id) => fl!("invalid-unknown-booking", id = id),
        Invalid::AlreadyCheckedIn(id) => fl!("invalid-already-checked-in", id = id),
        Invalid::NotCheckedIn(id) => fl!("invalid-not-checked-in", id = id),
        Invalid::CheckOutBeforeCheckIn => fl!("invalid-check-out-before-check-in"),
        Invalid::InvalidDate => fl!("invalid-date"),
        Invalid::MutationInProgress => fl!("invalid-mutation-in-progress"),
    }
}

/// Stacks the toasts in the bottom right corner of `content`, a click on a toast closes it
pub fn view<'a, Message>(
    content: impl Into<Element<'a, Message>>,
    toasts: &'a [Toast],
    on_close: fn(usize) -> Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    if toasts.is_empty() {
        return content.into();
    }

    let stacked = toasts
        .iter()
        .enumerate()
        .fold(Column::new(), |column, (index, toast)| {
            column.push(mouse_area(toast_card(toast)).on_press(on_close(index)))
        })
        .spacing(GLOBAL_SPACING)
        .width(TOAST_WIDTH);

    stack![
        content.into(),
        container(stacked)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::End)
            .align_y(Alignment::End)
            .padding(10.)
    ]
    .into()
}

fn toast_card<'a, Message: 'a>(toast: &'a Toast) -> Element<'a, Message> {
    let status = toast.status;

    container(column![
        text(toast.title.as_str()).size(TEXT_SIZE + 2.),
        text(toast.body.as_str()).size(TEXT_SIZE)
    ])
    .width(Length::Fill)
    .padding(10.)
    .style(move |theme: &Theme| {
        let palette = theme.extended_palette();
        let pair = match status {
            Status::Success => palette.success.weak,
            Status::Danger => palette.danger.weak,
        };

        container::Style {
            background: Some(pair.color.into()),
            text_color: Some(pair.text),
            border: Border {
                radius: 4.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        }
    })
    .into()
}
