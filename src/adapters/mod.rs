// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing settings source implementations.
//!
//! Concrete implementations of the traits defined in the ports layer, each
//! behind its own cargo feature.

#[cfg(feature = "env")]
pub mod env_var;
#[cfg(feature = "make-conf")]
pub mod make_conf;

// Re-export adapters based on feature flags
#[cfg(feature = "env")]
pub use env_var::{EnvVarAdapter, PORTAGE_ENV_VARIABLES};
#[cfg(feature = "make-conf")]
pub use make_conf::{MakeConfFileAdapter, MakeConfParser};
