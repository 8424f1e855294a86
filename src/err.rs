use thiserror::Error;

/// Everything the core can fail with. All variants are recoverable: the
/// caller surfaces them as a message and the operation can be retried
/// with better input.
#[derive(Debug, Error)]
pub enum Error {
    /// Login rejected the supplied email/password pair.
    #[error("credenciais inválidas")]
    InvalidCredentials,

    /// A required field was empty (after trimming) on create or update.
    #[error("campo obrigatório vazio: `{field}`")]
    Validation { field: &'static str },

    /// Update referenced a student id that is not in the collection.
    #[error("aluno com id {id} não existe")]
    NotFound { id: i64 },

    /// The durable store could not be written.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}
