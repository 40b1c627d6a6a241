// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod backend;
pub mod consts;

pub use backend::{load_backend_config, BackendConfig};
