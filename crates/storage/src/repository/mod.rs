pub mod content;
pub mod rating;
