// SPDX-License-Identifier: GPL-3.0-only

use iced::Color;

pub const GLOBAL_SPACING: f32 = 6.;
pub const GLOBAL_BUTTON_HEIGHT: f32 = 45.;
pub const TEXT_SIZE: f32 = 16.;
pub const TITLE_TEXT_SIZE: f32 = 22.;
pub const TABLE_WIDTH: f32 = 1100.;
pub const MODAL_WIDTH: f32 = 600.;

pub const INCOME_COLOR: Color = Color {
    r: 0.15,
    g: 0.59,
    b: 0.34,
    a: 1.0,
};
pub const EXPENSE_COLOR: Color = Color {
    r: 0.82,
    g: 0.28,
    b: 0.64,
    a: 1.0,
};
pub const CANCELLED_COLOR: Color = Color {
    r: 0.55,
    g: 0.55,
    b: 0.55,
    a: 1.0,
};

/// Color of the check-in/check-out badge of a booking
pub fn booking_color(checked_in: bool) -> Color {
    if checked_in {
        EXPENSE_COLOR
    } else {
        INCOME_COLOR
    }
}
