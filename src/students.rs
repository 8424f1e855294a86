use std::collections::HashSet;

use anyhow::Context;
use chrono::Utc;

use crate::err::Error;
use crate::models::{Student, StudentInput};
use crate::storage::Storage;

/// Storage key holding the JSON-encoded student array.
pub const STUDENTS_KEY: &str = "students";

/// Owns the canonical in-memory student collection and rewrites the whole
/// persisted array after every mutation. Insertion order is list order.
pub struct StudentRepository<S> {
    storage: S,
    students: Vec<Student>,
    last_id: i64,
}

impl<S: Storage> StudentRepository<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            students: Vec::new(),
            last_id: 0,
        }
    }

    /// Reads the persisted collection, called once at dashboard startup.
    /// An absent or corrupt blob degrades to an empty collection. The key
    /// is written back immediately so it exists from the first open on.
    pub fn load_all(&mut self) -> Result<(), Error> {
        self.students = match self.storage.get_item(STUDENTS_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::warn!("lista de alunos persistida ilegível, começando vazia: {err}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        // ids handed out later must stay above everything already stored
        self.last_id = self.students.iter().map(|s| s.id).max().unwrap_or(0);
        self.persist()
    }

    /// Validates, assigns a fresh id, appends and persists.
    pub fn create(&mut self, input: StudentInput) -> Result<Student, Error> {
        input.validate()?;
        let id = self.next_id();
        let student = input.into_student(id);
        self.students.push(student.clone());
        self.persist()?;
        log::debug!("aluno {id} criado");
        Ok(student)
    }

    /// Replaces every field except the id, keeping the record's position.
    pub fn update(&mut self, id: i64, input: StudentInput) -> Result<Student, Error> {
        let slot = self
            .students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::NotFound { id })?;
        input.validate()?;
        *slot = input.into_student(id);
        let updated = slot.clone();
        self.persist()?;
        log::debug!("aluno {id} atualizado");
        Ok(updated)
    }

    /// Removes the record if present. Deleting an unknown id is a
    /// deliberate no-op, not an error.
    pub fn delete(&mut self, id: i64) -> Result<(), Error> {
        self.students.retain(|s| s.id != id);
        self.persist()
    }

    /// Case-insensitive substring filter over name, registration number and
    /// course. Pure: fresh vector, collection order, nothing persisted. An
    /// empty filter returns the whole collection.
    pub fn list(&self, filter: &str) -> Vec<Student> {
        if filter.is_empty() {
            return self.students.clone();
        }
        let needle = filter.to_lowercase();
        self.students
            .iter()
            .filter(|s| {
                s.nome_completo.to_lowercase().contains(&needle)
                    || s.matricula.to_lowercase().contains(&needle)
                    || s.curso.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Number of distinct courses among the current records.
    pub fn course_count(&self) -> usize {
        self.students
            .iter()
            .map(|s| s.curso.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // Wall clock like the original panel, bumped past the last issued id so
    // back-to-back creates in the same millisecond stay unique.
    fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    fn persist(&mut self) -> Result<(), Error> {
        let raw = serde_json::to_string(&self.students).context("serializando alunos")?;
        self.storage.set_item(STUDENTS_KEY, &raw)
    }
}
