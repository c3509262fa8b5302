pub mod company;
pub mod donation;
pub mod envelope;
pub mod product;
