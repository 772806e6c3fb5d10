//! Pull operation errors.

use crate::infrastructure::ports::RepoError;
use crate::use_cases::collection::CollectionError;
use crate::use_cases::quests::QuestError;
use gacha_domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum PullError {
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),
    #[error("Quest error: {0}")]
    Quest(#[from] QuestError),
}
