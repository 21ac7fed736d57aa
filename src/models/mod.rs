pub mod catalog;
pub mod line_items;
pub mod offer;
pub mod quote;
