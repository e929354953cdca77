//! HTTP handlers

pub mod dashboard;
pub mod health;
pub mod latest;
pub mod predict;
