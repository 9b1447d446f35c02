//! FaithStream library
//!
//! This library exposes the media library, notice board, staff dashboard and
//! title suggestion core of FaithStream for the CLI and for testing.

pub mod app;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod services;
pub mod storage;
