pub mod api;
pub mod store;

pub use api::TimelineClient;
pub use store::{TimelineState, TimelineStore};
