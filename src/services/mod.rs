pub mod donations;
pub mod email;
pub mod invoice;
pub mod notifications;
pub mod queue;
pub mod storage;
