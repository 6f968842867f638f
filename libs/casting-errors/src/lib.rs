//! Error envelope shared by every HTTP-facing crate of the Casting Agency API.
//!
//! All failures leave the service in the same shape:
//! `{"success": false, "error": <status>, "message": <description>}`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod response;

pub use response::{ApiResult, ErrorResponse};
