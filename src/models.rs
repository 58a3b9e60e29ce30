// src/models.rs

pub mod auth;
pub mod catalog;
pub mod closing;
pub mod customers;
pub mod events;
pub mod orders;
pub mod reservations;
pub mod tables;
