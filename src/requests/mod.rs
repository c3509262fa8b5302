pub mod donation;
pub mod notification;
