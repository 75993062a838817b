use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dispatcher::{Controller, ControllerBase};
use serde::Serialize;
use shared::error::{ActionResult, HttpError, Redirect};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const CONTROLLER_NAME: &str = "notes";
const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Note {
    pub key: String,
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

/// In-memory note storage shared by every request.
#[derive(Debug, Clone, Default)]
pub struct NoteBook {
    notes: Arc<RwLock<BTreeMap<String, Note>>>,
}

impl NoteBook {
    pub async fn list(&self) -> Vec<Note> {
        self.notes.read().await.values().cloned().collect()
    }

    pub async fn get(&self, key: &str) -> Option<Note> {
        self.notes.read().await.get(key).cloned()
    }

    pub async fn insert(&self, title: String, body: String) -> Note {
        let note = Note {
            key: Uuid::new_v4().simple().to_string(),
            title,
            body,
            updated_at: Utc::now(),
        };
        self.notes
            .write()
            .await
            .insert(note.key.clone(), note.clone());
        note
    }

    pub async fn update(&self, key: &str, title: String, body: String) -> Option<Note> {
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(key)?;
        note.title = title;
        note.body = body;
        note.updated_at = Utc::now();
        Some(note.clone())
    }

    pub async fn remove(&self, key: &str) -> Option<Note> {
        self.notes.write().await.remove(key)
    }
}

#[derive(Debug, Serialize)]
struct NoteForm<'a> {
    key: &'a str,
    title: &'a str,
    body: &'a str,
}

pub struct NotesController {
    base: ControllerBase,
    book: NoteBook,
    editors: Arc<[String]>,
}

impl NotesController {
    pub fn bind(base: ControllerBase, book: NoteBook, editors: Arc<[String]>) -> Self {
        Self {
            base,
            book,
            editors,
        }
    }

    fn submitted(&self) -> (String, String) {
        let request = self.base.request();
        let title = request.param("title").unwrap_or_default().trim().to_string();
        let body = request.param("body").unwrap_or_default().to_string();
        (title, body)
    }

    fn validate(title: &str) -> Result<(), &'static str> {
        if title.is_empty() {
            return Err("title is required");
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err("title is too long");
        }
        Ok(())
    }

    /// Fills the shared edit form; `tunnel` is the `action` field for member posts.
    fn fill_form(&mut self, form: NoteForm<'_>, target: &str, tunnel: &str) -> ActionResult {
        let context = self.base.context_mut();
        context.insert_serialized("note", &form)?;
        context.insert("form_action", target);
        context.insert("form_tunnel", tunnel);
        Ok(())
    }

    fn require_editor(&mut self) -> ActionResult {
        let editors = Arc::clone(&self.editors);
        self.base.authorize(&editors[..])?;
        Ok(())
    }

    async fn find(&self, key: &str) -> Result<Note, HttpError> {
        self.book.get(key).await.ok_or_else(HttpError::not_found)
    }
}

fn member_url(key: &str) -> String {
    format!("/{CONTROLLER_NAME}/{key}")
}

#[async_trait]
impl Controller for NotesController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControllerBase {
        &mut self.base
    }

    async fn index(&mut self) -> ActionResult {
        let notes = self.book.list().await;
        let listing = notes
            .iter()
            .map(|note| format!("{}  {}", note.key, note.title))
            .collect::<Vec<_>>()
            .join("\n");
        let context = self.base.context_mut();
        context.insert("count", notes.len());
        context.insert("listing", listing);
        context.insert_serialized("notes", &notes)?;
        Ok(())
    }

    async fn show(&mut self, key: &str) -> ActionResult {
        let note = self.find(key).await?;
        self.base.context_mut().insert_serialized("note", &note)?;
        Ok(())
    }

    async fn new(&mut self) -> ActionResult {
        let form = NoteForm {
            key: "",
            title: "",
            body: "",
        };
        self.fill_form(form, &format!("/{CONTROLLER_NAME}"), "")
    }

    async fn create(&mut self) -> ActionResult {
        self.require_editor()?;
        let (title, body) = self.submitted();
        if let Err(problem) = Self::validate(&title) {
            self.base.context_mut().insert("error", problem);
            let form = NoteForm {
                key: "",
                title: &title,
                body: &body,
            };
            return self.fill_form(form, &format!("/{CONTROLLER_NAME}"), "");
        }
        let note = self.book.insert(title, body).await;
        tracing::info!(key = %note.key, "note created");
        Err(Redirect::to(member_url(&note.key)).into())
    }

    async fn update(&mut self, key: &str) -> ActionResult {
        self.require_editor()?;
        self.find(key).await?;
        let (title, body) = self.submitted();
        if let Err(problem) = Self::validate(&title) {
            self.base.context_mut().insert("error", problem);
            let form = NoteForm {
                key,
                title: &title,
                body: &body,
            };
            return self.fill_form(form, &member_url(key), "update");
        }
        self.book
            .update(key, title, body)
            .await
            .ok_or_else(HttpError::not_found)?;
        tracing::info!(%key, "note updated");
        Err(Redirect::to(member_url(key)).into())
    }

    async fn destroy(&mut self, key: &str) -> ActionResult {
        self.require_editor()?;
        self.book
            .remove(key)
            .await
            .ok_or_else(HttpError::not_found)?;
        tracing::info!(%key, "note removed");
        Err(Redirect::to(format!("/{CONTROLLER_NAME}")).into())
    }
}
