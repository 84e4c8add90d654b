//! Типы, общие для сервера бронирования и его клиентов.

pub mod domain;
pub mod shared;
pub mod system;
