//! 編集中ドラフトの検証エラー

use thiserror::Error;

use crate::models::LimitField;

/// ドラフトを Contract として確定できない理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Name is required")]
    MissingName,
    #[error("Name must not be empty")]
    EmptyName,
    #[error("{0} is not set")]
    MissingLimit(LimitField),
}
