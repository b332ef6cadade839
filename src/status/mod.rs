pub mod client;
pub mod error;
pub mod job;
pub mod page;
pub mod poller;
pub mod render;
pub mod response;

// Re-export common types
pub use client::HttpStatusClient;
pub use poller::StatusPoller;
pub use render::OutputFormat;
pub use response::JobState;
