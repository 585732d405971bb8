// SPDX-License-Identifier: GPL-3.0-only

pub mod cash_fund;
pub mod hotel;

pub use cash_fund::CashFund;
pub use hotel::Hotel;

pub enum Screen {
    Welcome,
    CashFund(CashFund),
    Hotel(Hotel),
}
