use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::document::UploadedDocument;
use crate::models::question::{QuestionRecord, QuizSet, QuizVariant};
use crate::services::grading_service::{GradingService, ScoreReport};

/// Selected option per 1-based question index. Absent means unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAnswers {
    selections: BTreeMap<usize, String>,
}

impl SessionAnswers {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.selections.get(&index).map(String::as_str)
    }

    fn set(&mut self, index: usize, selected: String) {
        self.selections.insert(index, selected);
    }

    pub fn answered(&self) -> usize {
        self.selections.len()
    }
}

#[derive(Debug, Clone)]
pub struct QuizRun {
    pub quiz: QuizSet,
    pub answers: SessionAnswers,
    pub generated_at: DateTime<Utc>,
}

impl QuizRun {
    fn question(&self, index: usize) -> Result<QuestionRecord<'_>> {
        self.quiz.get(index).ok_or(Error::InvalidIndex {
            index,
            total: self.quiz.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedAnswer<'a> {
    pub index: usize,
    pub question: &'a str,
    pub answer: &'a str,
    pub justification: Option<&'a str>,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    document: Option<UploadedDocument>,
    mcq: Option<QuizRun>,
    true_false: Option<QuizRun>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            document: None,
            mcq: None,
            true_false: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the stored text. Existing quizzes stay in place.
    pub fn attach_document(&mut self, document: UploadedDocument) {
        self.document = Some(document);
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    /// Installs a fresh quiz for its variant and clears that variant's answers.
    pub fn start(&mut self, quiz: QuizSet) -> &QuizRun {
        let slot = self.slot_mut(quiz.variant());
        slot.insert(QuizRun {
            quiz,
            answers: SessionAnswers::default(),
            generated_at: Utc::now(),
        })
    }

    pub fn run(&self, variant: QuizVariant) -> Result<&QuizRun> {
        let slot = match variant {
            QuizVariant::Mcq => &self.mcq,
            QuizVariant::TrueFalse => &self.true_false,
        };
        slot.as_ref().ok_or_else(|| {
            Error::NotFound(format!("No {} quiz has been generated yet", variant))
        })
    }

    pub fn record_answer(
        &mut self,
        variant: QuizVariant,
        index: usize,
        selected: impl Into<String>,
    ) -> Result<()> {
        let run = self.slot_mut(variant).as_mut().ok_or_else(|| {
            Error::NotFound(format!("No {} quiz has been generated yet", variant))
        })?;
        run.question(index)?;
        run.answers.set(index, selected.into());
        Ok(())
    }

    pub fn score(&self, variant: QuizVariant) -> Result<ScoreReport> {
        let run = self.run(variant)?;
        Ok(GradingService::score(&run.quiz, &run.answers))
    }

    pub fn reveal(&self, variant: QuizVariant, index: usize) -> Result<RevealedAnswer<'_>> {
        let record = self.run(variant)?.question(index)?;
        Ok(RevealedAnswer {
            index,
            question: record.question(),
            answer: record.answer(),
            justification: record.justification(),
        })
    }

    fn slot_mut(&mut self, variant: QuizVariant) -> &mut Option<QuizRun> {
        match variant {
            QuizVariant::Mcq => &mut self.mcq,
            QuizVariant::TrueFalse => &mut self.true_false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentKind;
    use crate::models::question::{McqRecord, TrueFalseRecord};
    use crate::services::grading_service::QuestionOutcome;

    fn sky_quiz() -> QuizSet {
        QuizSet::Mcq(vec![McqRecord {
            question: "Sky is blue?".into(),
            options: vec![
                "A. Yes".into(),
                "B. No".into(),
                "C. Maybe".into(),
                "D. Unknown".into(),
            ],
            answer: "A".into(),
        }])
    }

    fn flashcards() -> QuizSet {
        QuizSet::TrueFalse(vec![
            TrueFalseRecord {
                question: "Rust has a garbage collector.".into(),
                answer: "False".into(),
                justification: "Ownership frees memory deterministically.".into(),
            },
            TrueFalseRecord {
                question: "Cargo is Rust's package manager.".into(),
                answer: "True".into(),
                justification: "not available".into(),
            },
        ])
    }

    #[test]
    fn selecting_the_right_option_scores_one_of_one() {
        let mut session = Session::new(Uuid::new_v4());
        session.start(sky_quiz());
        session.record_answer(QuizVariant::Mcq, 1, "A. Yes").unwrap();

        let report = session.score(QuizVariant::Mcq).unwrap();
        assert_eq!((report.correct, report.total), (1, 1));
        assert_eq!(report.outcomes(), vec![QuestionOutcome::Correct]);
    }

    #[test]
    fn selecting_the_wrong_option_scores_zero() {
        let mut session = Session::new(Uuid::new_v4());
        session.start(sky_quiz());
        session.record_answer(QuizVariant::Mcq, 1, "B. No").unwrap();

        let report = session.score(QuizVariant::Mcq).unwrap();
        assert_eq!((report.correct, report.total), (0, 1));
        assert_eq!(report.outcomes(), vec![QuestionOutcome::Wrong]);
    }

    #[test]
    fn no_selection_is_unanswered() {
        let mut session = Session::new(Uuid::new_v4());
        session.start(sky_quiz());

        let report = session.score(QuizVariant::Mcq).unwrap();
        assert_eq!((report.correct, report.total), (0, 1));
        assert_eq!(report.outcomes(), vec![QuestionOutcome::Unanswered]);
    }

    #[test]
    fn last_write_wins_for_an_index() {
        let mut session = Session::new(Uuid::new_v4());
        session.start(sky_quiz());
        session.record_answer(QuizVariant::Mcq, 1, "A. Yes").unwrap();
        session.record_answer(QuizVariant::Mcq, 1, "C. Maybe").unwrap();

        let run = session.run(QuizVariant::Mcq).unwrap();
        assert_eq!(run.answers.get(1), Some("C. Maybe"));
        assert_eq!(run.answers.answered(), 1);
        assert_eq!(
            session.score(QuizVariant::Mcq).unwrap().outcomes(),
            vec![QuestionOutcome::Wrong]
        );
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut session = Session::new(Uuid::new_v4());
        session.start(sky_quiz());

        for index in [0, 2] {
            let err = session
                .record_answer(QuizVariant::Mcq, index, "A. Yes")
                .unwrap_err();
            assert!(matches!(err, Error::InvalidIndex { total: 1, .. }));
        }
        assert_eq!(session.run(QuizVariant::Mcq).unwrap().answers.answered(), 0);
    }

    #[test]
    fn answering_before_generation_is_not_found() {
        let mut session = Session::new(Uuid::new_v4());
        let err = session
            .record_answer(QuizVariant::TrueFalse, 1, "True")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn regenerating_clears_only_that_variants_answers() {
        let mut session = Session::new(Uuid::new_v4());
        session.start(sky_quiz());
        session.start(flashcards());
        session.record_answer(QuizVariant::Mcq, 1, "A. Yes").unwrap();
        session.record_answer(QuizVariant::TrueFalse, 2, "True").unwrap();

        session.start(sky_quiz());

        assert_eq!(session.run(QuizVariant::Mcq).unwrap().answers.answered(), 0);
        assert_eq!(
            session.run(QuizVariant::TrueFalse).unwrap().answers.get(2),
            Some("True")
        );
    }

    #[test]
    fn reveal_returns_answer_and_justification() {
        let mut session = Session::new(Uuid::new_v4());
        session.start(flashcards());

        let card = session.reveal(QuizVariant::TrueFalse, 1).unwrap();
        assert_eq!(card.answer, "False");
        assert_eq!(
            card.justification,
            Some("Ownership frees memory deterministically.")
        );
        assert!(matches!(
            session.reveal(QuizVariant::TrueFalse, 3),
            Err(Error::InvalidIndex { index: 3, total: 2 })
        ));
    }

    #[test]
    fn uploading_a_document_keeps_existing_quizzes() {
        let mut session = Session::new(Uuid::new_v4());
        session.start(sky_quiz());
        session.attach_document(UploadedDocument {
            file_name: "notes.txt".into(),
            kind: DocumentKind::PlainText,
            text: "The sky is blue.".into(),
        });

        assert!(session.run(QuizVariant::Mcq).is_ok());
        assert_eq!(session.document().map(|d| d.text.as_str()), Some("The sky is blue."));
    }
}
