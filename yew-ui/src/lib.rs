/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! watchparty-ui library root.
//!
//! Re-exports public modules so that integration tests (under `tests/`) can
//! import components. The binary entry-point lives in `main.rs`.

pub mod account_service;
pub mod auth;
pub mod bridge;
pub mod components;
pub mod constants;
pub mod context;
pub mod pages;
pub mod routing;
pub mod transport;
pub mod types;
pub mod viewport;
