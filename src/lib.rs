pub mod advisor;
pub mod availability;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod error;
pub mod history;
pub mod mask;
pub mod slots;
pub mod ticket;
pub mod wizard;
