//! Quest operation errors.

use crate::infrastructure::ports::RepoError;
use gacha_domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
