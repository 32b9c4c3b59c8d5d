//! # Equipment interfaces

pub mod agent;
