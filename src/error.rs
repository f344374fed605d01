// ============================================
// src/error.rs
// クイズ全体で使うエラー型
// ============================================

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    /// カテゴリのディレクトリが読めなかった (そのカテゴリだけスキップする)
    #[error("failed to read sign type '{category}': {source}")]
    CatalogRead {
        category: String,
        #[source]
        source: io::Error,
    },

    #[error("not enough signs: {required} needed, only {available} available")]
    InsufficientCandidates { required: usize, available: usize },

    /// 出題キューが空なのに次の問題を要求された
    #[error("no questions left in this quiz")]
    NoPendingQuestions,

    #[error("invalid number of choices: {0} (expected 3, 6 or 9)")]
    InvalidChoiceCount(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("settings error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;

