// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single variable assignment read from a settings source.

use crate::domain::variable::VariableName;
use serde::{Deserialize, Serialize};

/// One `NAME=value` (or `NAME+=value`) assignment, with its raw right-hand side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// The assigned variable
    pub name: VariableName,
    /// The unmodified right-hand side, quotes removed
    pub value: String,
    /// `true` for `NAME+=value`
    pub append: bool,
}

impl Declaration {
    /// Creates a plain `NAME=value` assignment.
    pub fn assign(name: impl Into<VariableName>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            append: false,
        }
    }

    /// Creates a `NAME+=value` assignment.
    pub fn append(name: impl Into<VariableName>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            append: true,
        }
    }
}
