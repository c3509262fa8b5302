pub mod catalog;
pub mod donations;
pub mod notifications;
