//! BuyBuy: a multi-vendor e-commerce backend.
//!
//! Exposes a JSON REST API (actix-web) over PostgreSQL (sqlx) covering user
//! authentication, a hierarchical product catalog, per-user shopping carts,
//! and a transactional checkout/order workflow.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

pub use errors::{AppError, Result};
