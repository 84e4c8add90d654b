pub mod a001_company;
pub mod a002_booking;
pub mod a003_insight;
pub mod common;
