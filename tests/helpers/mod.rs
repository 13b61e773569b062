// Shared helpers for HTTP-level tests.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//
//   let app = test::init_service(helpers::test_app(LimitsConfig::default())).await;

#![allow(dead_code)]

pub mod test_data;

pub use test_app::*;
pub use test_data::*;
