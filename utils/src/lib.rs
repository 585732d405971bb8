// SPDX-License-Identifier: GPL-3.0-only

pub mod date;
pub mod format;
pub mod pagination;
pub mod styling;
