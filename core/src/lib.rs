//! Filter, aggregation and state core for the relief spending dashboard.
//!
//! Records flow one way: loader → reducer → filter engine → aggregation
//! engine → view models. User intent flows back in as `DashboardAction`s.

pub mod action;
pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod fixture;
pub mod geography;
pub mod listener;
pub mod loader;
pub mod record;
pub mod reducer;
pub mod rng;
pub mod snapshot;
pub mod types;
pub mod view;
