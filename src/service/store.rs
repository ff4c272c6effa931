//! Persistence collaborator contract and an in-memory JSON snapshot store.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Keyed snapshot storage. Implementations must return what was last saved.
pub trait TournamentStore: Send + Sync {
    fn load(&self, id: &str) -> Result<Tournament, TournamentError>;
    fn save(&self, id: &str, tournament: &Tournament) -> Result<(), TournamentError>;
    fn delete(&self, id: &str) -> Result<(), TournamentError>;
    fn list(&self) -> Result<Vec<Tournament>, TournamentError>;
}

/// Stores serialized JSON per tournament, so loads go through the same normalization
/// (legacy bare-name players, empty winners) as any persisted record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: RwLock<HashMap<TournamentId, String>>,
}

fn lock_error() -> TournamentError {
    TournamentError::Storage("lock error".to_string())
}

fn decode(json: &str) -> Result<Tournament, TournamentError> {
    serde_json::from_str(json).map_err(|e| TournamentError::Storage(e.to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored JSON for `id`, exactly as written.
    pub fn raw(&self, id: &str) -> Option<String> {
        self.snapshots.read().ok()?.get(id).cloned()
    }

    /// Seed the store with an already serialized record (e.g. imported from an older system).
    pub fn insert_raw(&self, id: impl Into<TournamentId>, json: impl Into<String>) -> Result<(), TournamentError> {
        let mut g = self.snapshots.write().map_err(|_| lock_error())?;
        g.insert(id.into(), json.into());
        Ok(())
    }
}

impl TournamentStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Tournament, TournamentError> {
        let g = self.snapshots.read().map_err(|_| lock_error())?;
        let json = g
            .get(id)
            .ok_or_else(|| TournamentError::TournamentNotFound(id.to_string()))?;
        decode(json)
    }

    fn save(&self, id: &str, tournament: &Tournament) -> Result<(), TournamentError> {
        let json =
            serde_json::to_string(tournament).map_err(|e| TournamentError::Storage(e.to_string()))?;
        let mut g = self.snapshots.write().map_err(|_| lock_error())?;
        g.insert(id.to_string(), json);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), TournamentError> {
        let mut g = self.snapshots.write().map_err(|_| lock_error())?;
        g.remove(id)
            .map(|_| ())
            .ok_or_else(|| TournamentError::TournamentNotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<Tournament>, TournamentError> {
        let g = self.snapshots.read().map_err(|_| lock_error())?;
        g.values().map(|json| decode(json)).collect()
    }
}
