pub mod aggregate;
pub mod occupant;
