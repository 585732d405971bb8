// SPDX-License-Identifier: GPL-3.0-only

pub mod modal;
pub mod pagination;
pub mod toast;
