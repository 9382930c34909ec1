use serde::Serialize;

use crate::models::question::{QuizSet, QuizVariant};
use crate::models::session::SessionAnswers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionOutcome {
    Correct,
    Wrong,
    Unanswered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub index: usize,
    pub outcome: QuestionOutcome,
    pub selected: Option<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub variant: QuizVariant,
    pub correct: usize,
    pub total: usize,
    pub high_score: bool,
    pub results: Vec<QuestionResult>,
}

impl ScoreReport {
    pub fn outcomes(&self) -> Vec<QuestionOutcome> {
        self.results.iter().map(|r| r.outcome).collect()
    }
}

pub struct GradingService;

impl GradingService {
    pub fn score(quiz: &QuizSet, answers: &SessionAnswers) -> ScoreReport {
        let mut correct = 0;
        let mut results = Vec::with_capacity(quiz.len());

        for (pos, record) in quiz.iter().enumerate() {
            let index = pos + 1;
            let selected = answers.get(index);

            let outcome = match selected {
                Some(choice) if record.is_correct(choice) => QuestionOutcome::Correct,
                Some(_) => QuestionOutcome::Wrong,
                None => QuestionOutcome::Unanswered,
            };
            if outcome == QuestionOutcome::Correct {
                correct += 1;
            }

            results.push(QuestionResult {
                index,
                outcome,
                selected: selected.map(str::to_string),
                correct_answer: record.answer().to_string(),
            });
        }

        let total = quiz.len();
        ScoreReport {
            variant: quiz.variant(),
            correct,
            total,
            high_score: correct >= total.saturating_sub(1),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{McqRecord, TrueFalseRecord};
    use crate::models::session::Session;
    use uuid::Uuid;

    fn mcq(answer: &str) -> McqRecord {
        McqRecord {
            question: format!("Which letter is {}?", answer),
            options: vec!["A. a".into(), "B. b".into(), "C. c".into(), "D. d".into()],
            answer: answer.into(),
        }
    }

    fn graded_session(selections: &[(usize, &str)]) -> Session {
        let mut session = Session::new(Uuid::new_v4());
        session.start(QuizSet::Mcq(vec![mcq("A"), mcq("B"), mcq("C"), mcq("D")]));
        for (index, choice) in selections {
            session
                .record_answer(QuizVariant::Mcq, *index, *choice)
                .unwrap();
        }
        session
    }

    #[test]
    fn every_index_gets_exactly_one_outcome() {
        let session = graded_session(&[(1, "A. a"), (2, "C. c"), (4, "D. d")]);
        let report = session.score(QuizVariant::Mcq).unwrap();

        let indexes: Vec<usize> = report.results.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4]);
        assert_eq!(
            report.outcomes(),
            vec![
                QuestionOutcome::Correct,
                QuestionOutcome::Wrong,
                QuestionOutcome::Unanswered,
                QuestionOutcome::Correct,
            ]
        );
        let correct = report
            .outcomes()
            .into_iter()
            .filter(|o| *o == QuestionOutcome::Correct)
            .count();
        assert_eq!(report.correct, correct);
        assert_eq!(report.total, 4);
    }

    #[test]
    fn scoring_twice_gives_the_same_report() {
        let session = graded_session(&[(1, "B. b"), (3, "C. c")]);
        let first = session.score(QuizVariant::Mcq).unwrap();
        let second = session.score(QuizVariant::Mcq).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn wrong_result_reports_the_correct_letter() {
        let session = graded_session(&[(2, "A. a")]);
        let report = session.score(QuizVariant::Mcq).unwrap();
        let second = &report.results[1];
        assert_eq!(second.selected.as_deref(), Some("A. a"));
        assert_eq!(second.correct_answer, "B");
    }

    #[test]
    fn high_score_allows_one_miss() {
        let three_of_four = graded_session(&[(1, "A. a"), (2, "B. b"), (3, "C. c")]);
        assert!(three_of_four.score(QuizVariant::Mcq).unwrap().high_score);

        let two_of_four = graded_session(&[(1, "A. a"), (2, "B. b")]);
        assert!(!two_of_four.score(QuizVariant::Mcq).unwrap().high_score);
    }

    #[test]
    fn true_false_is_scored_like_mcq() {
        let quiz = QuizSet::TrueFalse(vec![
            TrueFalseRecord {
                question: "Ice floats.".into(),
                answer: "True ".into(),
                justification: "Less dense than water.".into(),
            },
            TrueFalseRecord {
                question: "The moon is a planet.".into(),
                answer: "False".into(),
                justification: "It is a satellite.".into(),
            },
        ]);
        let mut session = Session::new(Uuid::new_v4());
        session.start(quiz);
        session.record_answer(QuizVariant::TrueFalse, 1, "True").unwrap();
        session.record_answer(QuizVariant::TrueFalse, 2, "True").unwrap();

        let report = session.score(QuizVariant::TrueFalse).unwrap();
        assert_eq!(report.variant, QuizVariant::TrueFalse);
        assert_eq!(report.correct, 1);
        assert_eq!(
            report.outcomes(),
            vec![QuestionOutcome::Correct, QuestionOutcome::Wrong]
        );
    }

    #[test]
    fn empty_quiz_scores_zero_of_zero() {
        let report = GradingService::score(&QuizSet::Mcq(vec![]), &SessionAnswers::default());
        assert_eq!((report.correct, report.total), (0, 0));
        assert!(report.results.is_empty());
    }
}
