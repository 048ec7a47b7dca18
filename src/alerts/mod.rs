//! Alert Bus (C8): a thin notification layer over the Store's event log
//! and the Telegram Bot API.

pub mod bus;
pub mod telegram;
