pub mod generator;
pub mod tracker;
