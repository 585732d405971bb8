// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Snapshot of the guest embedded in a booking, never edited from here
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub hotel_id: Option<i32>,
}
