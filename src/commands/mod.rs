//! Command handlers

pub mod resolve;
