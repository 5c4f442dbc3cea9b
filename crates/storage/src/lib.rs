// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sj-storage: Job and task repositories

mod file;
mod memory;
mod repository;

pub use file::FileRepository;
pub use memory::MemoryRepository;
pub use repository::{Repository, RepositoryError, StoreData};
