// SPDX-License-Identifier: GPL-3.0-only

use app::Posada;
use iced::window::Settings;
use tracing_subscriber::EnvFilter;

mod app;
mod i18n;
mod posada;

fn main() -> iced::Result {
    init_tracing();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    iced::application(Posada::title, Posada::update, Posada::view)
        .subscription(Posada::subscription)
        .theme(Posada::theme)
        .window(Settings {
            position: iced::window::Position::Centered,
            resizable: true,
            ..Default::default()
        })
        .run_with(Posada::new)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
