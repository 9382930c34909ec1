use crate::models::question::QuizVariant;

const MCQ_SHAPE: &str = r#"[
    {
        "question": "What is ...?",
        "options": ["A. ...", "B. ...", "C. ...", "D. ..."],
        "answer": "A"
    },
    {
        "question": "What is ...?",
        "options": ["A. ...", "B. ...", "C. ...", "D. ..."],
        "answer": "B"
    }
]"#;

const TRUE_FALSE_SHAPE: &str = r#"[
    {
        "question": "Statement to judge ...",
        "answer": "True",
        "justification": "Explanation for the answer"
    },
    {
        "question": "Statement to judge ...",
        "answer": "False",
        "justification": "Explanation for the answer"
    }
]"#;

const JSON_ONLY: &str = "Return ONLY the JSON array. Do not wrap it in markdown code fences and do not include any explanations or additional text before or after it.";

pub fn build_prompt(text: &str, count: usize, variant: QuizVariant) -> String {
    debug_assert!(count >= 1, "question count must be at least 1");

    let (task, shape) = match variant {
        QuizVariant::Mcq => (
            format!(
                "Generate exactly {count} multiple-choice quiz questions based on the following text. \
                 Each question must have exactly 4 options labeled \"A.\", \"B.\", \"C.\" and \"D.\", \
                 and exactly one correct answer given as the single letter of that option."
            ),
            MCQ_SHAPE,
        ),
        QuizVariant::TrueFalse => (
            format!(
                "Generate exactly {count} true/false quiz questions based on the following text. \
                 Each question must be a statement whose answer is either \"True\" or \"False\", \
                 together with a short justification of that answer."
            ),
            TRUE_FALSE_SHAPE,
        ),
    };

    format!(
        "You are an expert academician. {task}\n\n\
         Text:\n{text}\n\n\
         Return the response as a JSON array in exactly this format:\n\n\
         {shape}\n\n\
         {JSON_ONLY}\n"
    )
}
