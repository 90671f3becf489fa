//! Route handlers

pub mod reports;
