use crate::model::{BankEntry, BankKind, Character, DataBank, Scene, Session};
use campaign_common::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors from project operations.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("character {0} not found")]
    CharacterNotFound(RecordId),
    #[error("scene {0} not found")]
    SceneNotFound(RecordId),
    #[error("session {0} not found")]
    SessionNotFound(RecordId),
}

/// One campaign: its records plus identifying metadata.
///
/// The kernel owns the truth; persistence captures it whole as a snapshot and
/// never reaches into individual records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    characters: BTreeMap<RecordId, Character>,
    #[serde(default)]
    scenes: BTreeMap<RecordId, Scene>,
    #[serde(default)]
    sessions: BTreeMap<RecordId, Session>,
    /// Kept sorted by kind.
    #[serde(default)]
    banks: Vec<DataBank>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            metadata: BTreeMap::new(),
            characters: BTreeMap::new(),
            scenes: BTreeMap::new(),
            sessions: BTreeMap::new(),
            banks: Vec::new(),
        }
    }

    /// Time of the last mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Give the project a fresh identity, as when it is imported as a new
    /// campaign. Records and their ids are kept.
    pub fn reidentify(&mut self) {
        let now = Utc::now();
        self.id = RecordId::new();
        self.created_at = now;
        self.updated_at = now;
    }

    pub fn characters(&self) -> &BTreeMap<RecordId, Character> {
        &self.characters
    }

    pub fn scenes(&self) -> &BTreeMap<RecordId, Scene> {
        &self.scenes
    }

    pub fn sessions(&self) -> &BTreeMap<RecordId, Session> {
        &self.sessions
    }

    pub fn banks(&self) -> &[DataBank] {
        &self.banks
    }

    pub fn character(&self, id: RecordId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn scene(&self, id: RecordId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    pub fn session(&self, id: RecordId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn bank(&self, kind: BankKind) -> Option<&DataBank> {
        self.banks.iter().find(|b| b.kind == kind)
    }

    /// Insert or replace a character. Returns its id.
    pub fn upsert_character(&mut self, character: Character) -> RecordId {
        let id = character.id;
        self.characters.insert(id, character);
        self.touch();
        id
    }

    /// Remove a character and unlink it from every scene.
    pub fn remove_character(&mut self, id: RecordId) -> Result<Character, KernelError> {
        let removed = self
            .characters
            .remove(&id)
            .ok_or(KernelError::CharacterNotFound(id))?;
        for scene in self.scenes.values_mut() {
            scene.characters.retain(|c| *c != id);
        }
        self.touch();
        Ok(removed)
    }

    pub fn upsert_scene(&mut self, scene: Scene) -> RecordId {
        let id = scene.id;
        self.scenes.insert(id, scene);
        self.touch();
        id
    }

    /// Remove a scene and drop it from every session's running order.
    pub fn remove_scene(&mut self, id: RecordId) -> Result<Scene, KernelError> {
        let removed = self.scenes.remove(&id).ok_or(KernelError::SceneNotFound(id))?;
        for session in self.sessions.values_mut() {
            session.scenes.retain(|s| *s != id);
        }
        self.touch();
        Ok(removed)
    }

    pub fn upsert_session(&mut self, session: Session) -> RecordId {
        let id = session.id;
        self.sessions.insert(id, session);
        self.touch();
        id
    }

    pub fn remove_session(&mut self, id: RecordId) -> Result<Session, KernelError> {
        let removed = self
            .sessions
            .remove(&id)
            .ok_or(KernelError::SessionNotFound(id))?;
        self.touch();
        Ok(removed)
    }

    /// Add a character to a scene's cast. Linking twice is a no-op.
    pub fn link_character_to_scene(
        &mut self,
        character: RecordId,
        scene: RecordId,
    ) -> Result<(), KernelError> {
        if !self.characters.contains_key(&character) {
            return Err(KernelError::CharacterNotFound(character));
        }
        let scene = self
            .scenes
            .get_mut(&scene)
            .ok_or(KernelError::SceneNotFound(scene))?;
        if !scene.characters.contains(&character) {
            scene.characters.push(character);
            self.touch();
        }
        Ok(())
    }

    /// Append a scene to a session's running order.
    pub fn schedule_scene(&mut self, scene: RecordId, session: RecordId) -> Result<(), KernelError> {
        if !self.scenes.contains_key(&scene) {
            return Err(KernelError::SceneNotFound(scene));
        }
        let session = self
            .sessions
            .get_mut(&session)
            .ok_or(KernelError::SessionNotFound(session))?;
        session.scenes.push(scene);
        self.touch();
        Ok(())
    }

    /// Add a value to the bank of the given kind, creating the bank if needed.
    pub fn add_bank_entry(&mut self, kind: BankKind, value: impl Into<String>) -> RecordId {
        let idx = match self.banks.binary_search_by_key(&kind, |b| b.kind) {
            Ok(idx) => idx,
            Err(idx) => {
                self.banks.insert(idx, DataBank::new(kind));
                idx
            }
        };
        let id = RecordId::new();
        self.banks[idx].entries.push(BankEntry {
            id,
            value: value.into(),
        });
        self.touch();
        id
    }
}
