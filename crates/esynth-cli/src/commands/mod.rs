pub mod enumerate;
pub mod library;
