// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::enums::SketchKind;
use thiserror::Error;

/// Error type for sketch operations
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<bincode::Error> for SketchError {
    fn from(err: bincode::Error) -> Self {
        SketchError::Serialization(err.to_string())
    }
}

/// Core sketch trait - the surface shared by every probabilistic structure in this crate.
///
/// Sketches are owned, single-writer values. Mutation goes through `&mut self`; queries
/// through `&self` never change state, so shared read-only access is always safe.
///
/// # Requirements
///
/// Implementations must uphold:
/// - **Monotonicity**: no insertion ever lowers the answer to a query.
/// - **Fixed footprint**: storage is allocated once at construction and never resized.
pub trait Sketch {
    /// The kind of sketch, used for log fields and error messages.
    fn kind(&self) -> SketchKind;

    /// Validates the internal consistency of the sketch state.
    ///
    /// Cheap enough to call after a merge or in debug assertions.
    fn validate(&self) -> Result<(), SketchError>;

    /// Returns true if nothing has been recorded yet.
    fn is_empty(&self) -> bool;
}
