// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;
use std::time::Duration;

use iced::time::{self, Instant};
use iced::widget::{button, center, column, container, row, text};
use iced::{Alignment, Length, Subscription, Task};
use posada_core::client::ApiClient;
use posada_core::config::Config;
use tracing::{error, info};

use crate::fl;
use crate::posada::screen::{self, Screen, cash_fund, hotel};
use crate::posada::widgets::toast::{self, Toast};

pub struct Posada {
    toasts: Vec<Toast>,
    state: State,
}

enum State {
    Loading,
    Ready {
        client: Arc<ApiClient>,
        page_size: Option<usize>,
        screen: Screen,
    },
}

/// What the backend connection step hands back to the application
#[derive(Debug, Clone)]
pub struct Backend {
    client: Arc<ApiClient>,
    page_size: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum Message {
    BackendLoaded(Result<Backend, String>),

    CashFund(cash_fund::Message),
    Hotel(hotel::Message),

    OpenCashFund,
    OpenHotel,

    AddToast(Toast),
    CloseToast(usize),
    /// Periodic tick used to expire toasts
    Tick(Instant),
}

impl Posada {
    pub fn new() -> (Self, Task<Message>) {
        (
            Self {
                toasts: Vec::new(),
                state: State::Loading,
            },
            Task::perform(connect(), Message::BackendLoaded),
        )
    }

    pub fn title(&self) -> String {
        fl!("app-title")
    }

    pub fn view(&self) -> iced::Element<'_, Message> {
        let content = match &self.state {
            State::Loading => center(text(fl!("loading"))).into(),
            State::Ready { screen, .. } => match screen {
                Screen::Welcome => self.welcome_view(),
                Screen::CashFund(cash_fund) => cash_fund.view().map(Message::CashFund),
                Screen::Hotel(hotel) => hotel.view().map(Message::Hotel),
            },
        };

        toast::view(content, &self.toasts, Message::CloseToast)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BackendLoaded(result) => match result {
                Ok(backend) => {
                    info!(backend = backend.client.base_url(), "backend client ready");
                    self.state = State::Ready {
                        client: backend.client,
                        page_size: backend.page_size,
                        screen: Screen::Welcome,
                    }
                }
                Err(err) => {
                    error!("startup failed: {err}");
                    std::process::exit(1);
                }
            },

            Message::CashFund(message) => {
                let State::Ready { screen, client, .. } = &mut self.state else {
                    return Task::none();
                };

                let Screen::CashFund(cash_fund) = screen else {
                    return Task::none();
                };

                return match cash_fund.update(message, client) {
                    cash_fund::Action::None => Task::none(),
                    cash_fund::Action::Run(task) => task.map(Message::CashFund),
                    cash_fund::Action::Back => {
                        *screen = Screen::Welcome;
                        Task::none()
                    }
                    cash_fund::Action::AddToast(toast) => self.update(Message::AddToast(toast)),
                };
            }
            Message::OpenCashFund => {
                let State::Ready {
                    screen,
                    client,
                    page_size,
                } = &mut self.state
                else {
                    return Task::none();
                };

                let (cash_fund, task) = screen::CashFund::new(client, *page_size);
                *screen = Screen::CashFund(cash_fund);
                return task.map(Message::CashFund);
            }

            Message::Hotel(message) => {
                let State::Ready { screen, client, .. } = &mut self.state else {
                    return Task::none();
                };

                let Screen::Hotel(hotel) = screen else {
                    return Task::none();
                };

                return match hotel.update(message, client) {
                    hotel::Action::None => Task::none(),
                    hotel::Action::Run(task) => task.map(Message::Hotel),
                    hotel::Action::Back => {
                        *screen = Screen::Welcome;
                        Task::none()
                    }
                    hotel::Action::AddToast(toast) => self.update(Message::AddToast(toast)),
                };
            }
            Message::OpenHotel => {
                let State::Ready { screen, .. } = &mut self.state else {
                    return Task::none();
                };

                *screen = Screen::Hotel(screen::Hotel::new());
            }

            Message::AddToast(toast) => {
                self.toasts.push(toast);
            }
            Message::CloseToast(index) => {
                if index < self.toasts.len() {
                    self.toasts.remove(index);
                }
            }
            Message::Tick(now) => {
                self.toasts.retain(|toast| !toast.is_expired(now));
            }
        }

        Task::none()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let toasts = if self.toasts.is_empty() {
            Subscription::none()
        } else {
            time::every(Duration::from_secs(1)).map(Message::Tick)
        };

        let State::Ready { screen, .. } = &self.state else {
            return toasts;
        };

        let screen = match screen {
            Screen::Welcome => Subscription::none(),
            Screen::CashFund(cash_fund) => cash_fund.subscription().map(Message::CashFund),
            Screen::Hotel(hotel) => hotel.subscription().map(Message::Hotel),
        };

        Subscription::batch([toasts, screen])
    }

    pub fn theme(&self) -> iced::Theme {
        iced::Theme::GruvboxLight
    }

    fn welcome_view(&self) -> iced::Element<'_, Message> {
        let buttons_row = row![
            button(text(fl!("cash-fund")).center())
                .width(150.)
                .height(100.)
                .on_press(Message::OpenCashFund),
            button(text(fl!("hotel")).center())
                .width(150.)
                .height(100.)
                .on_press(Message::OpenHotel),
        ]
        .spacing(5.)
        .height(Length::Shrink);

        let centered_buttons = container(buttons_row).center(Length::Fill);

        let app_text = text(format!("Posada {}", env!("CARGO_PKG_VERSION")))
            .align_x(Alignment::End)
            .width(Length::Fill);

        let content = column![centered_buttons, app_text]
            .width(Length::Fill)
            .height(Length::Fill);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Reads the configuration and builds the shared backend client
async fn connect() -> Result<Backend, String> {
    let config = Config::from_env().map_err(|err| err.to_string())?;
    if !config.session.is_authenticated() {
        tracing::warn!("no access token configured, every backend call will be rejected");
    }

    let client = ApiClient::new(&config).map_err(|err| err.to_string())?;

    Ok(Backend {
        client: Arc::new(client),
        page_size: config.page_size,
    })
}
