use serde::{Deserialize, Serialize};

use crate::err::Error;

/// Profile of an authenticated user, persisted as `"ADMIN"` / `"USER"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
}

/// The authenticated identity held by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub perfil: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub matricula: String,
    pub nome_completo: String,
    pub curso: String,
    pub data_nascimento: String,
}

/// The four caller-supplied fields of a create or update call. The id is
/// never part of the input, the repository assigns and preserves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    pub matricula: String,
    pub nome_completo: String,
    pub curso: String,
    pub data_nascimento: String,
}

impl StudentInput {
    /// All four fields are required. Trimming applies to the check only,
    /// stored values keep the caller's whitespace.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("matricula", &self.matricula),
            ("nome_completo", &self.nome_completo),
            ("curso", &self.curso),
            ("data_nascimento", &self.data_nascimento),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation { field });
            }
        }
        Ok(())
    }

    pub(crate) fn into_student(self, id: i64) -> Student {
        Student {
            id,
            matricula: self.matricula,
            nome_completo: self.nome_completo,
            curso: self.curso,
            data_nascimento: self.data_nascimento,
        }
    }
}
