//! Finance client module
//!
//! Client-side counterpart of the `/farm-finance` endpoint: a transport,
//! an immutable state value, and the hook that drives one from the other
//! for a UI.

mod api;
mod hook;
mod notification;
mod session;
mod state;

pub use api::{ClientError, FinanceApi, HttpFinanceApi};
pub use hook::FinanceHook;
pub use notification::{Notification, NotificationLevel};
pub use session::Session;
pub use state::FinanceState;
