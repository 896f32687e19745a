//! Typed records used across layers.

pub mod issue;
pub mod mail;
pub mod response;
