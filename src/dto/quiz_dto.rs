use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::QuizVariant;
use crate::models::session::{QuizRun, RevealedAnswer};

pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 10;
pub const DEFAULT_QUESTIONS: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GenerateQuizRequest {
    #[validate(range(min = MIN_QUESTIONS, max = MAX_QUESTIONS))]
    pub count: Option<usize>,
}

impl GenerateQuizRequest {
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_QUESTIONS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub index: usize,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub selected: Option<String>,
}

/// Quiz as shown while answering. Correct answers are withheld until
/// submission or an explicit reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizView {
    pub variant: QuizVariant,
    pub total: usize,
    pub answered: usize,
    pub generated_at: DateTime<Utc>,
    pub questions: Vec<QuestionView>,
}

impl From<&QuizRun> for QuizView {
    fn from(run: &QuizRun) -> Self {
        let questions = run
            .quiz
            .iter()
            .enumerate()
            .map(|(pos, record)| QuestionView {
                index: pos + 1,
                question: record.question().to_string(),
                options: record.options().map(<[String]>::to_vec),
                selected: run.answers.get(pos + 1).map(str::to_string),
            })
            .collect();

        QuizView {
            variant: run.quiz.variant(),
            total: run.quiz.len(),
            answered: run.answers.answered(),
            generated_at: run.generated_at,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordAnswerRequest {
    #[validate(length(min = 1, max = 1000))]
    pub selected: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAnswerResponse {
    pub saved: bool,
    pub index: usize,
    pub selected: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealResponse {
    pub index: usize,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

impl From<RevealedAnswer<'_>> for RevealResponse {
    fn from(revealed: RevealedAnswer<'_>) -> Self {
        RevealResponse {
            index: revealed.index,
            question: revealed.question.to_string(),
            answer: revealed.answer.to_string(),
            justification: revealed.justification.map(str::to_string),
        }
    }
}
