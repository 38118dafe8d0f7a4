#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use syncbus::{
    BoxError, Bucket, BucketRegistry, ConnectionListener, Middleware, Payload, Request,
    Responder, SyncDispatcher,
    testing::{MemoryTransport, TestClient},
};

// ============================================================================
// Test payloads
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub id: Option<u64>,
    pub text: String,
}

impl Payload for Note {}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }
}

// ============================================================================
// Dispatcher fixtures
// ============================================================================

pub type StringDispatcher = SyncDispatcher<String, MemoryTransport<String>>;
pub type NoteDispatcher = SyncDispatcher<Note, MemoryTransport<Note>>;

pub fn string_setup() -> (
    Arc<BucketRegistry<String, TestClient>>,
    Arc<MemoryTransport<String>>,
    StringDispatcher,
) {
    let registry = Arc::new(BucketRegistry::new());
    let transport = MemoryTransport::new();
    let dispatcher = SyncDispatcher::new(Arc::clone(&registry), Arc::clone(&transport));
    (registry, transport, dispatcher)
}

pub fn note_setup() -> (
    Arc<BucketRegistry<Note, TestClient>>,
    Arc<MemoryTransport<Note>>,
    NoteDispatcher,
) {
    let registry = Arc::new(BucketRegistry::new());
    let transport = MemoryTransport::new();
    let dispatcher = SyncDispatcher::new(Arc::clone(&registry), Arc::clone(&transport));
    (registry, transport, dispatcher)
}

// ============================================================================
// Scenario middleware: an in-memory note store
// ============================================================================

/// Assigns ids on create/update and stores the note.
#[derive(Clone, Default)]
pub struct NoteStore {
    notes: Arc<Mutex<HashMap<u64, Note>>>,
    next_id: Arc<AtomicU64>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self {
            notes: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn get(&self, id: u64) -> Option<Note> {
        self.notes.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.notes.lock().unwrap().len()
    }
}

impl Middleware<Note, TestClient> for NoteStore {
    async fn handle(
        &self,
        request: &Request<Note, TestClient>,
        response: &Responder<Note>,
    ) -> Result<(), BoxError> {
        let mut note = request.data().cloned().ok_or("missing note payload")?;
        let id = match note.id {
            Some(id) => id,
            None => self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        note.id = Some(id);
        self.notes.lock().unwrap().insert(id, note.clone());
        response.send(note)?;
        Ok(())
    }
}

/// Removes a note by id and answers with the removed note.
#[derive(Clone)]
pub struct NoteDelete {
    store: NoteStore,
}

impl NoteDelete {
    pub fn new(store: NoteStore) -> Self {
        Self { store }
    }
}

impl Middleware<Note, TestClient> for NoteDelete {
    async fn handle(
        &self,
        request: &Request<Note, TestClient>,
        response: &Responder<Note>,
    ) -> Result<(), BoxError> {
        let id = request
            .data()
            .and_then(|note| note.id)
            .ok_or("delete requires a note id")?;
        let removed = self
            .store
            .notes
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or("no such note")?;
        response.send(removed)?;
        Ok(())
    }
}

/// Rejects requests without a `token` option.
pub struct RequireToken;

impl Middleware<Note, TestClient> for RequireToken {
    async fn handle(
        &self,
        request: &Request<Note, TestClient>,
        _response: &Responder<Note>,
    ) -> Result<(), BoxError> {
        if request.option("token").is_some() {
            Ok(())
        } else {
            Err("Unauthorized".into())
        }
    }
}

// ============================================================================
// Side-channel middleware
// ============================================================================

/// Stashes an identity in the request locals and proceeds.
pub struct Authenticate {
    pub identity: String,
}

impl Middleware<String, TestClient> for Authenticate {
    async fn handle(
        &self,
        request: &Request<String, TestClient>,
        _response: &Responder<String>,
    ) -> Result<(), BoxError> {
        request.locals().insert("identity", self.identity.clone());
        Ok(())
    }
}

/// Answers with the identity a previous layer stashed.
pub struct WhoAmI;

impl Middleware<String, TestClient> for WhoAmI {
    async fn handle(
        &self,
        request: &Request<String, TestClient>,
        response: &Responder<String>,
    ) -> Result<(), BoxError> {
        let identity = request
            .locals()
            .get::<String>("identity")
            .ok_or("no identity established")?;
        response.send((*identity).clone())?;
        Ok(())
    }
}

// ============================================================================
// Timing and fault-injection middleware
// ============================================================================

/// Echoes the request data, sleeping first when a `slow` option is present.
pub struct SlowEcho;

impl Middleware<String, TestClient> for SlowEcho {
    async fn handle(
        &self,
        request: &Request<String, TestClient>,
        response: &Responder<String>,
    ) -> Result<(), BoxError> {
        if request.option("slow").is_some() {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        response.send(request.data().cloned().unwrap_or_default())?;
        Ok(())
    }
}

/// Calls `send` twice; the second call is a programming fault.
pub struct DoubleSender;

impl Middleware<String, TestClient> for DoubleSender {
    async fn handle(
        &self,
        _request: &Request<String, TestClient>,
        response: &Responder<String>,
    ) -> Result<(), BoxError> {
        response.send("first".to_string())?;
        response.send("second".to_string())?;
        Ok(())
    }
}

/// A connection listener that always fails, for isolation tests.
pub struct FailingConnectionListener;

impl<P: Payload> ConnectionListener<P, TestClient> for FailingConnectionListener {
    async fn on_connection(
        &self,
        _bucket: &Bucket<P, TestClient>,
        _client: &TestClient,
    ) -> Result<(), BoxError> {
        Err("setup exploded".into())
    }
}
