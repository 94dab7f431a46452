pub mod catalog;
pub mod estimate;
pub mod parse;
