//! Command service: the serialization point around the pure tournament logic.
//!
//! Every mutation runs as load → ownership check → mutate a copy → save → notify while
//! holding that tournament's async mutex, so at most one mutation per id is in flight.
//! A rejected command never reaches `save`, leaving the stored snapshot untouched.

mod command;
mod identity;
mod notify;
mod store;

pub use command::Command;
pub use identity::{IdentityProvider, StaticIdentity};
pub use notify::{SubscriberRegistry, Subscription, TournamentChanged};
pub use store::{MemoryStore, TournamentStore};

use crate::models::{Tournament, TournamentError, TournamentId, UserId};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

type IdLock = Arc<tokio::sync::Mutex<()>>;
type IdLocks = Mutex<HashMap<TournamentId, IdLock>>;

/// Holds one tournament's mutex; on drop, forgets the id if nobody else is using it.
struct IdGuard<'a> {
    id: TournamentId,
    lock: IdLock,
    locks: &'a IdLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map and this guard still reference the mutex.
        let idle = locks
            .get(&self.id)
            .map_or(false, |l| Arc::ptr_eq(l, &self.lock) && Arc::strong_count(l) == 2);
        if idle {
            locks.remove(&self.id);
        }
    }
}

pub struct TournamentService<S> {
    store: S,
    identity: Box<dyn IdentityProvider>,
    registry: SubscriberRegistry,
    locks: IdLocks,
}

impl<S: TournamentStore> TournamentService<S> {
    pub fn new(
        store: S,
        identity: impl IdentityProvider + 'static,
        registry: SubscriberRegistry,
    ) -> Self {
        Self {
            store,
            identity: Box::new(identity),
            registry,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    fn caller(&self, credential: &str) -> Result<UserId, TournamentError> {
        self.identity
            .user_id(credential)
            .ok_or(TournamentError::NotAuthorized)
    }

    async fn lock_id(&self, id: &str) -> IdGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(id.to_string()).or_default().clone()
        };
        let guard = Arc::clone(&lock).lock_owned().await;
        IdGuard {
            id: id.to_string(),
            lock,
            locks: &self.locks,
            guard: Some(guard),
        }
    }

    /// Number of tournament ids with a mutation in flight or waiting.
    pub fn locked_ids(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn load_owned(&self, id: &str, caller: &str) -> Result<Tournament, TournamentError> {
        let tournament = self.store.load(id)?;
        if tournament.owner != caller {
            log::warn!("user {} denied access to tournament {}", caller, id);
            return Err(TournamentError::NotAuthorized);
        }
        Ok(tournament)
    }

    /// Create an empty tournament owned by the caller, shown under `username`.
    pub async fn create(
        &self,
        credential: &str,
        username: &str,
        title: &str,
        date: NaiveDate,
    ) -> Result<Tournament, TournamentError> {
        if title.trim().is_empty() {
            return Err(TournamentError::MissingField("title"));
        }
        let owner = self.caller(credential)?;
        let mut tournament = Tournament::new(owner, title.trim(), date);
        tournament.username = username.trim().to_string();
        let _guard = self.lock_id(&tournament.id).await;
        self.store.save(&tournament.id, &tournament)?;
        log::info!("tournament {} created by {}", tournament.id, tournament.owner);
        Ok(tournament)
    }

    /// Read-only fetch; takes no per-id lock.
    pub fn get(&self, id: &str) -> Result<Tournament, TournamentError> {
        self.store.load(id)
    }

    /// Tournaments owned by the caller.
    pub fn list_owned(&self, credential: &str) -> Result<Vec<Tournament>, TournamentError> {
        let owner = self.caller(credential)?;
        let mut owned: Vec<Tournament> = self
            .store
            .list()?
            .into_iter()
            .filter(|t| t.owner == owner)
            .collect();
        owned.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)));
        Ok(owned)
    }

    pub async fn delete(&self, credential: &str, id: &str) -> Result<(), TournamentError> {
        let caller = self.caller(credential)?;
        let _guard = self.lock_id(id).await;
        self.load_owned(id, &caller)?;
        self.store.delete(id)?;
        self.registry.notify(id);
        log::info!("tournament {} deleted", id);
        Ok(())
    }

    /// Validate, authorize and apply one command; returns the saved snapshot.
    pub async fn execute(
        &self,
        credential: &str,
        id: &str,
        command: Command,
    ) -> Result<Tournament, TournamentError> {
        command.validate()?;
        let caller = self.caller(credential)?;
        let _guard = self.lock_id(id).await;

        let mut tournament = self.load_owned(id, &caller)?;
        if let Err(e) = command.apply(&mut tournament) {
            log::info!("tournament {}: {:?} rejected: {}", id, command, e);
            return Err(e);
        }
        self.store.save(id, &tournament)?;
        self.registry.notify(id);
        Ok(tournament)
    }

    pub fn subscribe(&self, id: &str) -> Subscription {
        self.registry.subscribe(id)
    }
}
