//! Editor form for the notepad list: create a new note or edit an existing one.

use crate::error::{StoreError, ValidationError};
use crate::models::{NewNote, Note, NoteId, NotePatch};
use crate::notes::NoteStore;
use crate::remote::RemoteClient;

/// What a valid draft turns into.
#[derive(Clone, Debug, PartialEq)]
pub enum DraftSubmission {
    Create(NewNote),
    Update(NoteId, NotePatch),
}

/// Title and content being typed, plus the note being edited if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub editing: Option<NoteId>,
}

impl NoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `note` into the form for editing.
    pub fn edit(&mut self, note: &Note) {
        self.title = note.title.clone();
        self.content = note.content.clone();
        self.editing = Some(note.id.clone());
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Back to an empty create form.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Check both fields and reset the form.
    ///
    /// On failure the draft is kept so the user can fix it.
    pub fn submit(&mut self) -> Result<DraftSubmission, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        let draft = std::mem::take(self);
        Ok(match draft.editing {
            Some(id) => DraftSubmission::Update(id, NotePatch::full(draft.title, draft.content)),
            None => DraftSubmission::Create(NewNote::new(draft.title, draft.content)),
        })
    }

    /// Validate and send the draft to `store`.
    ///
    /// Validation failures never reach the store.
    pub async fn submit_to<C: RemoteClient>(
        &mut self,
        store: &NoteStore<C>,
    ) -> Result<Note, StoreError> {
        match self.submit()? {
            DraftSubmission::Create(note) => store.create(note).await,
            DraftSubmission::Update(id, patch) => store.update(&id, patch).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Call, MemoryBackend};

    #[test]
    fn test_empty_title_is_rejected() {
        let mut draft = NoteDraft {
            title: "   ".into(),
            content: "body".into(),
            editing: None,
        };
        assert_eq!(draft.submit(), Err(ValidationError::EmptyTitle));
        assert_eq!(draft.content, "body");
    }

    #[test]
    fn test_edit_yields_full_patch() {
        let now = chrono::Utc::now();
        let note = Note {
            id: "7".into(),
            user_id: "u".into(),
            title: "A".into(),
            content: "x".into(),
            created_at: now,
            updated_at: now,
        };
        let mut draft = NoteDraft::new();
        draft.edit(&note);
        draft.title = "B".into();

        assert_eq!(
            draft.submit(),
            Ok(DraftSubmission::Update("7".into(), NotePatch::full("B", "x")))
        );
        assert_eq!(draft, NoteDraft::default());
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let backend = MemoryBackend::new();
        backend.sign_up("me@example.com", "secret1").await.unwrap();
        let store = NoteStore::new(backend);
        let calls_before = store.client().calls().len();

        let mut draft = NoteDraft {
            title: String::new(),
            content: "body".into(),
            editing: None,
        };
        let err = draft.submit_to(&store).await.unwrap_err();

        assert_eq!(err, StoreError::Validation(ValidationError::EmptyTitle));
        assert_eq!(store.client().calls().len(), calls_before);
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_create_then_edit_through_store() {
        let backend = MemoryBackend::new();
        backend.sign_up("me@example.com", "secret1").await.unwrap();
        let store = NoteStore::new(backend);

        let mut draft = NoteDraft {
            title: "A".into(),
            content: "x".into(),
            editing: None,
        };
        let created = draft.submit_to(&store).await.unwrap();

        draft.edit(&created);
        draft.content = "y".into();
        draft.submit_to(&store).await.unwrap();

        let notes = store.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "y");
        assert!(store.client().calls().contains(&Call::Update));
    }
}
