use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use validator::Validate;

pub const MCQ_OPTION_COUNT: usize = 4;
pub const MCQ_LABELS: [&str; MCQ_OPTION_COUNT] = ["A", "B", "C", "D"];
pub const MISSING_JUSTIFICATION: &str = "not available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizVariant {
    Mcq,
    TrueFalse,
}

impl QuizVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizVariant::Mcq => "mcq",
            QuizVariant::TrueFalse => "true-false",
        }
    }
}

impl fmt::Display for QuizVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct McqRecord {
    pub question: String,
    #[validate(length(equal = 4))]
    pub options: Vec<String>,
    pub answer: String,
}

impl McqRecord {
    /// Options read "A. ..", "B. ..", "C. ..", "D. .." in that order.
    pub fn labels_in_order(&self) -> bool {
        self.options.len() == MCQ_OPTION_COUNT
            && self
                .options
                .iter()
                .zip(MCQ_LABELS)
                .all(|(option, label)| option.contains('.') && option_label(option) == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrueFalseRecord {
    pub question: String,
    pub answer: String,
    #[serde(
        default = "default_justification",
        deserialize_with = "justification_or_default"
    )]
    pub justification: String,
}

fn default_justification() -> String {
    MISSING_JUSTIFICATION.to_string()
}

fn justification_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_else(default_justification))
}

/// Leading label of an option string: "B. Paris" -> "B".
pub fn option_label(option: &str) -> &str {
    option
        .split_once('.')
        .map_or(option, |(label, _)| label)
        .trim()
}

/// A borrowed view of one record, whichever variant its quiz holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionRecord<'a> {
    Mcq(&'a McqRecord),
    TrueFalse(&'a TrueFalseRecord),
}

impl<'a> QuestionRecord<'a> {
    pub fn question(&self) -> &'a str {
        match self {
            QuestionRecord::Mcq(r) => &r.question,
            QuestionRecord::TrueFalse(r) => &r.question,
        }
    }

    pub fn answer(&self) -> &'a str {
        match self {
            QuestionRecord::Mcq(r) => r.answer.trim(),
            QuestionRecord::TrueFalse(r) => r.answer.trim(),
        }
    }

    pub fn options(&self) -> Option<&'a [String]> {
        match self {
            QuestionRecord::Mcq(r) => Some(&r.options),
            QuestionRecord::TrueFalse(_) => None,
        }
    }

    pub fn justification(&self) -> Option<&'a str> {
        match self {
            QuestionRecord::Mcq(_) => None,
            QuestionRecord::TrueFalse(r) => Some(&r.justification),
        }
    }

    /// Case-sensitive comparison after trimming. MCQ selections are reduced
    /// to their option label first.
    pub fn is_correct(&self, selected: &str) -> bool {
        match self {
            QuestionRecord::Mcq(r) => option_label(selected) == r.answer.trim(),
            QuestionRecord::TrueFalse(r) => selected.trim() == r.answer.trim(),
        }
    }
}

/// Questions produced by one generation call. Every record shares the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", content = "questions", rename_all = "kebab-case")]
pub enum QuizSet {
    Mcq(Vec<McqRecord>),
    TrueFalse(Vec<TrueFalseRecord>),
}

impl QuizSet {
    pub fn variant(&self) -> QuizVariant {
        match self {
            QuizSet::Mcq(_) => QuizVariant::Mcq,
            QuizSet::TrueFalse(_) => QuizVariant::TrueFalse,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            QuizSet::Mcq(records) => records.len(),
            QuizSet::TrueFalse(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record at a 1-based index.
    pub fn get(&self, index: usize) -> Option<QuestionRecord<'_>> {
        let pos = index.checked_sub(1)?;
        match self {
            QuizSet::Mcq(records) => records.get(pos).map(QuestionRecord::Mcq),
            QuizSet::TrueFalse(records) => records.get(pos).map(QuestionRecord::TrueFalse),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = QuestionRecord<'_>> + '_ {
        let (mcq, tf): (&[McqRecord], &[TrueFalseRecord]) = match self {
            QuizSet::Mcq(records) => (records, &[]),
            QuizSet::TrueFalse(records) => (&[], records),
        };
        mcq.iter()
            .map(QuestionRecord::Mcq)
            .chain(tf.iter().map(QuestionRecord::TrueFalse))
    }
}
