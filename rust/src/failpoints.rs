//! Wrappers and utilities on top of the `fail` crate.
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Return an error from the enclosing function if the named failpoint
/// is configured, e.g. via `FAILPOINTS=stage2::write-raw=return(msg)`.
#[macro_export]
macro_rules! try_fail_point {
    ($name:expr) => {{
        if let Some(e) = fail::eval($name, |msg| {
            let msg = msg.unwrap_or_else(|| "synthetic failpoint".to_string());
            anyhow::Error::msg(msg)
        }) {
            return Err(From::from(e));
        }
    }};
}
