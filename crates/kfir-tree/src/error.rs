//! Errors raised while loading or validating a resolved graph.

use crate::ids::{ClassId, DeclId, ExprId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{owner:?} refers to missing declaration {missing:?}")]
    DanglingDeclaration { owner: String, missing: DeclId },

    #[error("{owner:?} refers to missing expression {missing:?}")]
    DanglingExpression { owner: String, missing: ExprId },

    #[error("file list entry {0:?} is not a file declaration")]
    NotAFile(DeclId),

    #[error("class id {0} is declared twice")]
    DuplicateClassId(ClassId),

    #[error("malformed graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}
