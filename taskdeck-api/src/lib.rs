//! Shared wire definitions for the `TaskDeck` backend API.

pub mod auth;
pub mod push;
pub mod rest;
pub mod task;
