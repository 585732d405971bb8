// SPDX-License-Identifier: GPL-3.0-only

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod views;
