pub mod console;
pub mod executor;
pub mod poller;
pub mod retry;
pub mod stats;
