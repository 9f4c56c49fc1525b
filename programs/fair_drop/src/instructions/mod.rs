pub mod admin;
pub mod claim;
pub mod draw;
pub mod reveal;
pub mod sale;
