pub mod browse;
pub mod ls;
pub mod shelves;
