// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of `KEY=VALUE` environment assignment strings.

/// Parse whitespace-separated `KEY=VALUE` assignments.
///
/// Tokens without `=` or with an empty key are skipped. Values may be empty
/// and may themselves contain `=`. Later assignments to the same key win when
/// applied to a process, so duplicates are kept in order.
pub fn parse_env_assignments(input: &str) -> Vec<(String, String)> {
    input
        .split_whitespace()
        .filter_map(|token| match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => Some((key.to_string(), value.to_string())),
            _ => {
                tracing::warn!(token, "ignoring malformed environment assignment");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
