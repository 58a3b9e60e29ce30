// src/handlers.rs

pub mod auth;
pub mod catalog;
pub mod closings;
pub mod customers;
pub mod events;
pub mod orders;
pub mod print_station;
pub mod reservations;
pub mod stations;
pub mod tables;
pub mod users;
