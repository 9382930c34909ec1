use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::document::{DocumentKind, UploadedDocument};
use crate::models::question::QuizVariant;
use crate::models::session::Session;

pub const PREVIEW_CHARS: usize = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub expires_in_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUploadResponse {
    pub file_name: String,
    pub kind: DocumentKind,
    pub characters: usize,
    pub preview: String,
}

impl DocumentUploadResponse {
    pub fn new(file_name: String, kind: DocumentKind, text: &str) -> Self {
        Self {
            file_name,
            kind,
            characters: text.chars().count(),
            preview: text.chars().take(PREVIEW_CHARS).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub kind: DocumentKind,
    pub characters: usize,
}

impl From<&UploadedDocument> for DocumentSummary {
    fn from(document: &UploadedDocument) -> Self {
        Self {
            file_name: document.file_name.clone(),
            kind: document.kind,
            characters: document.text.chars().count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub variant: QuizVariant,
    pub total: usize,
    pub answered: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub document: Option<DocumentSummary>,
    pub quizzes: Vec<QuizSummary>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let quizzes = [QuizVariant::Mcq, QuizVariant::TrueFalse]
            .into_iter()
            .filter_map(|variant| session.run(variant).ok())
            .map(|run| QuizSummary {
                variant: run.quiz.variant(),
                total: run.quiz.len(),
                answered: run.answers.answered(),
            })
            .collect();

        Self {
            session_id: session.id(),
            created_at: session.created_at(),
            document: session.document().map(DocumentSummary::from),
            quizzes,
        }
    }
}
