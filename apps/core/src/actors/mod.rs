pub mod messages;
pub mod sentiment;
pub mod traits;
