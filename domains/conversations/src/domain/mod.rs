//! Domain types for the Conversations domain

pub mod context;
pub mod entities;
pub mod state;
