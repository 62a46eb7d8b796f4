pub mod notification_service;
pub mod poll_service;

pub use notification_service::{AppriseDispatcher, Dispatcher, DryRunDispatcher};
pub use poll_service::{PollReport, PollService};
