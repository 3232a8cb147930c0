//! `TaskDeck` — terminal client for a shared task-management service.

pub mod api;
pub mod app;
pub mod appearance;
pub mod config;
pub mod modal;
pub mod net;
pub mod notify;
pub mod session;
pub mod storage;
pub mod tasks;
pub mod ui;
