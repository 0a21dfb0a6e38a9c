//! HTTP middleware

pub mod panic;
pub mod timing;
