//! # parley-channels
//!
//! Messaging platform integrations for Parley.

pub mod telegram;
