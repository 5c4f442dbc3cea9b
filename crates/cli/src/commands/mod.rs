// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod list;
pub mod locks;
pub mod start;
pub mod validate;
