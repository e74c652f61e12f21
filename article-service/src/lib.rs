//! Read-only HTTP API over a MongoDB collection of news articles.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
