// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::sync::Arc;

use iced::keyboard::key::Named;
use iced::keyboard::{self, Key, Modifiers};
use iced::widget::{
    Column, Row, Rule, Space, Text, button, column, container, focus_next, focus_previous,
    pick_list, row, scrollable, text, text_input,
};
use iced::{Alignment, Element, Length, Renderer, Subscription, Task, Theme, event};
use posada_core::client::ApiClient;
use posada_core::error::ApiError;
use posada_core::models::transaction::{
    AppStatus, Transaction, TransactionPage, TransactionStatus, TransactionType,
};
use posada_core::views::sequence::Ticket;
use posada_core::views::transaction_list::{ListRequest, TransactionList};
use posada_utils::date::{check_date_format, parse_date, today};
use posada_utils::format::{format_currency, format_date_time};
use posada_utils::pagination::PaginationAction;
use posada_utils::styling::{
    CANCELLED_COLOR, EXPENSE_COLOR, GLOBAL_BUTTON_HEIGHT, GLOBAL_SPACING, INCOME_COLOR,
    TABLE_WIDTH, TEXT_SIZE, TITLE_TEXT_SIZE,
};
use tracing::warn;

use crate::fl;
use crate::posada::widgets::pagination::page_controls;
use crate::posada::widgets::toast::Toast;

/// Receipts and payment slips of the cash fund
pub struct CashFund {
    list: TransactionList,
    from_date: String,
    to_date: String,
}

#[derive(Debug, Clone, Copy)]
pub enum DateField {
    From,
    To,
}

/// Entry of the type selector, `None` lists both types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeFilter(Option<TransactionType>);

impl TypeFilter {
    const ALL: [TypeFilter; 3] = [
        TypeFilter(None),
        TypeFilter(Some(TransactionType::Income)),
        TypeFilter(Some(TransactionType::Expense)),
    ];
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "{}", fl!("all-types")),
            Some(transaction_type) => write!(f, "{}", type_label(transaction_type)),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Asks the parent to go back
    Back,
    /// Asks the parent to add a toast
    AddToast(Toast),
    /// Hotkey (Subscription) pressed
    Hotkey(Hotkey),

    /// Asks for the current page again
    Refresh,
    /// Callback after a page request, tagged with the ticket it was issued with
    PageLoaded(Ticket, Result<TransactionPage, ApiError>),

    /// Callback when typing on one of the date filters
    DateInputUpdate(String, DateField),
    /// Callback after selecting a transaction type on the selector
    TypeSelected(TypeFilter),
    /// Try to go to the previous, next or a specific page
    PaginationAction(PaginationAction),

    /// Asks the backend to cancel the given transaction
    CancelTransaction(i32),
    /// Callback after the cancellation request
    TransactionCancelled(i32, Result<AppStatus, ApiError>),
}

pub enum Action {
    None,
    Back,
    Run(Task<Message>),
    AddToast(Toast),
}

impl CashFund {
    pub fn new(client: &Arc<ApiClient>, page_size: Option<usize>) -> (Self, Task<Message>) {
        let mut list = TransactionList::new(page_size);
        let request = list.refresh(today());

        (
            Self {
                list,
                from_date: String::new(),
                to_date: String::new(),
            },
            fetch_page(client, request),
        )
    }

    pub fn update(&mut self, message: Message, client: &Arc<ApiClient>) -> Action {
        match message {
            Message::Back => Action::Back,
            Message::AddToast(toast) => Action::AddToast(toast),
            Message::Hotkey(hotkey) => match hotkey {
                Hotkey::Tab(modifiers) => {
                    if modifiers.shift() {
                        Action::Run(focus_previous())
                    } else {
                        Action::Run(focus_next())
                    }
                }
            },

            Message::Refresh => Action::Run(fetch_page(client, self.list.refresh(today()))),
            Message::PageLoaded(ticket, result) => match self.list.apply(ticket, result) {
                Ok(_) => Action::None,
                Err(err) => {
                    warn!("could not load the transactions: {err}");
                    Action::AddToast(Toast::api_error(&err))
                }
            },

            Message::DateInputUpdate(value, field) => {
                // only complete dates (or an emptied input) change the filter
                let date = if value.trim().is_empty() {
                    Some(None)
                } else {
                    parse_date(&value).map(Some)
                };

                let request = match field {
                    DateField::From => {
                        self.from_date = value;
                        date.and_then(|date| self.list.set_from_date(date, today()))
                    }
                    DateField::To => {
                        self.to_date = value;
                        date.and_then(|date| self.list.set_to_date(date, today()))
                    }
                };

                run_request(client, request)
            }
            Message::TypeSelected(filter) => {
                let request = self.list.set_transaction_type(filter.0, today());
                run_request(client, request)
            }
            Message::PaginationAction(action) => {
                let request = self.list.paginate(action, today());
                run_request(client, request)
            }

            Message::CancelTransaction(transaction_id) => {
                match self.list.begin_cancel(transaction_id) {
                    Ok(transaction_id) => Action::Run(Task::perform(
                        Transaction::cancel(client.clone(), transaction_id),
                        move |res| Message::TransactionCancelled(transaction_id, res),
                    )),
                    Err(err) => Action::AddToast(Toast::api_error(&err)),
                }
            }
            Message::TransactionCancelled(transaction_id, result) => {
                match self.list.finish_cancel(transaction_id, result, today()) {
                    Ok(request) => {
                        let toast = Task::done(Message::AddToast(Toast::success_toast(fl!(
                            "transaction-cancelled"
                        ))));
                        match request {
                            Some(request) => {
                                Action::Run(Task::batch([fetch_page(client, request), toast]))
                            }
                            None => Action::Run(toast),
                        }
                    }
                    Err(err) => {
                        warn!(transaction_id, "could not cancel the transaction: {err}");
                        Action::AddToast(Toast::api_error(&err))
                    }
                }
            }
        }
    }

    pub fn view(&self) -> iced::Element<'_, Message> {
        let header = header(self.list.is_loading());
        let filters = filters_row(
            &self.from_date,
            &self.to_date,
            self.list.filters().transaction_type,
        );

        let grid: Element<'_, Message, Theme, Renderer> =
            if self.list.is_loading() && self.list.transactions().is_empty() {
                container(text(fl!("loading")).size(TITLE_TEXT_SIZE))
                    .width(Length::Fill)
                    .align_x(Alignment::Center)
                    .padding(50.)
                    .into()
            } else if self.list.transactions().is_empty() {
                container(text(fl!("no-transactions")).size(TITLE_TEXT_SIZE))
                    .width(Length::Fill)
                    .align_x(Alignment::Center)
                    .padding(50.)
                    .into()
            } else {
                transactions_table(self.list.transactions(), self.list.cancelling())
            };

        let pagination = column![
            row![Rule::horizontal(1.)].width(TABLE_WIDTH),
            page_controls(self.list.pagination(), Message::PaginationAction)
        ]
        .spacing(GLOBAL_SPACING)
        .align_x(Alignment::Center);

        let content = container(
            column![filters, grid, pagination]
                .spacing(GLOBAL_SPACING)
                .width(TABLE_WIDTH),
        )
        .width(Length::Fill)
        .align_x(Alignment::Center)
        .padding(30.);

        column![header, content]
            .spacing(GLOBAL_SPACING)
            .height(Length::Fill)
            .width(Length::Fill)
            .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(handle_event)
    }
}

fn fetch_page(client: &Arc<ApiClient>, request: ListRequest) -> Task<Message> {
    let ticket = request.ticket;
    Task::perform(
        Transaction::get_page(client.clone(), request.query),
        move |res| Message::PageLoaded(ticket, res),
    )
}

fn run_request(client: &Arc<ApiClient>, request: Option<ListRequest>) -> Action {
    match request {
        Some(request) => Action::Run(fetch_page(client, request)),
        None => Action::None,
    }
}

fn type_label(transaction_type: TransactionType) -> String {
    match transaction_type {
        TransactionType::Income => fl!("receipt"),
        TransactionType::Expense => fl!("payment-slip"),
    }
}

fn status_label(status: TransactionStatus) -> String {
    match status {
        TransactionStatus::Pending => fl!("status-pending"),
        TransactionStatus::Completed => fl!("status-completed"),
        TransactionStatus::Cancelled => fl!("status-cancelled"),
    }
}

//
// SUBSCRIPTION HANDLING
//

#[derive(Debug, Clone)]
pub enum Hotkey {
    Tab(Modifiers),
}

fn handle_event(event: event::Event, _: event::Status, _: iced::window::Id) -> Option<Message> {
    match event {
        #[allow(clippy::collapsible_match)]
        event::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => match key {
            Key::Named(Named::Tab) => Some(Message::Hotkey(Hotkey::Tab(modifiers))),
            _ => None,
        },
        _ => None,
    }
}

//
// VIEW COMPOSING
//

fn header<'a>(loading: bool) -> iced::Element<'a, Message> {
    let back_button = button(text(fl!("back")).center())
        .on_press(Message::Back)
        .height(GLOBAL_BUTTON_HEIGHT);

    let refresh_button = button(text(fl!("refresh")).center())
        .on_press_maybe((!loading).then_some(Message::Refresh))
        .height(GLOBAL_BUTTON_HEIGHT);

    row![
        back_button,
        text(fl!("cash-fund")).size(TITLE_TEXT_SIZE),
        Space::new(Length::Fill, Length::Shrink),
        refresh_button
    ]
    .align_y(Alignment::Center)
    .spacing(GLOBAL_SPACING)
    .padding(3.)
    .into()
}

fn filters_row<'a>(
    from_date: &'a str,
    to_date: &'a str,
    transaction_type: Option<TransactionType>,
) -> iced::Element<'a, Message> {
    let date_input = |label: String, value: &'a str, field: DateField| -> Column<'a, Message> {
        let label = if value.is_empty() || check_date_format(value) {
            text(label)
        } else {
            text(format!("{label} ({})", fl!("invalid-date-format"))).color(EXPENSE_COLOR)
        };

        column![
            label.size(TEXT_SIZE),
            text_input("YYYY-MM-DD", value)
                .on_input(move |c| Message::DateInputUpdate(c, field))
                .size(TEXT_SIZE)
                .width(200.)
        ]
        .spacing(1.)
    };

    let type_selector = column![
        text(fl!("transaction-type")).size(TEXT_SIZE),
        pick_list(
            TypeFilter::ALL,
            Some(TypeFilter(transaction_type)),
            Message::TypeSelected
        )
        .width(200.)
    ]
    .spacing(1.);

    row![
        date_input(fl!("from-date"), from_date, DateField::From),
        date_input(fl!("to-date"), to_date, DateField::To),
        type_selector
    ]
    .spacing(GLOBAL_SPACING * 3.)
    .align_y(Alignment::End)
    .into()
}

fn transactions_table<'a>(
    transactions: &'a [Transaction],
    cancelling: Option<i32>,
) -> iced::Element<'a, Message> {
    let title = |label: String, width: f32| -> Text<'a> {
        text(label)
            .size(TEXT_SIZE)
            .width(width)
            .align_y(Alignment::Center)
    };

    let title_row = Row::new()
        .push(title(fl!("code"), 110.))
        .push(title(fl!("date"), 170.))
        .push(title(fl!("content"), 250.))
        .push(title(fl!("receiver-account"), 150.))
        .push(title(fl!("amount"), 150.))
        .push(title(fl!("transaction-type"), 110.))
        .push(title(fl!("status"), 100.))
        .align_y(Alignment::Center);

    let mut grid = Column::new()
        .push(title_row)
        .spacing(GLOBAL_SPACING)
        .width(Length::Shrink);

    for transaction in transactions {
        let cancelled = !transaction.is_cancellable();
        let cell = |value: String, width: f32| -> Text<'a> {
            let cell = text(value)
                .size(TEXT_SIZE)
                .width(width)
                .align_y(Alignment::Center);
            if cancelled {
                cell.color(CANCELLED_COLOR)
            } else {
                cell
            }
        };

        let amount_color = match transaction.transaction_type {
            TransactionType::Income => INCOME_COLOR,
            TransactionType::Expense => EXPENSE_COLOR,
        };

        let cancel_button = button(text(fl!("cancel")).size(TEXT_SIZE).center())
            .style(button::danger)
            .on_press_maybe(
                (!cancelled && cancelling.is_none())
                    .then_some(Message::CancelTransaction(transaction.id)),
            );

        let row = Row::new()
            .push(cell(transaction.code.clone(), 110.))
            .push(cell(format_date_time(&transaction.date), 170.))
            .push(cell(transaction.content.clone(), 250.))
            .push(cell(transaction.receiver_account.clone(), 150.))
            .push(
                text(format!("{} VND", format_currency(transaction.amount)))
                    .size(TEXT_SIZE)
                    .width(150.)
                    .color(if cancelled {
                        CANCELLED_COLOR
                    } else {
                        amount_color
                    }),
            )
            .push(cell(type_label(transaction.transaction_type), 110.))
            .push(cell(status_label(transaction.status), 100.))
            .push(
                row![Space::new(Length::Fill, Length::Shrink), cancel_button].width(Length::Fill),
            )
            .align_y(Alignment::Center);

        // Limit Rule size to the table width
        grid = grid.push(row![Rule::horizontal(1.)].width(TABLE_WIDTH));
        grid = grid.push(row);
    }

    scrollable(grid).spacing(GLOBAL_SPACING).height(Length::Fill).into()
}
