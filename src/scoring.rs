use crate::models::Question;

/// Shown in place of the chosen option when a question was skipped.
pub const NOT_ANSWERED: &str = "Not Answered";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuizResults {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Rounded to two decimal places.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    NotAnswered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub number: usize,
    pub question: String,
    pub options: Vec<String>,
    pub chosen: Option<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub verdict: Verdict,
}

impl ReviewItem {
    pub fn chosen_label(&self) -> &str {
        self.chosen.as_deref().unwrap_or(NOT_ANSWERED)
    }
}

fn chosen_at(answers: &[Option<String>], index: usize) -> Option<&str> {
    answers.get(index).and_then(|a| a.as_deref())
}

pub fn count_correct(questions: &[Question], answers: &[Option<String>]) -> usize {
    questions
        .iter()
        .enumerate()
        .filter(|(i, q)| chosen_at(answers, *i).is_some_and(|c| q.is_correct(c)))
        .count()
}

pub fn compute_results(questions: &[Question], answers: &[Option<String>]) -> QuizResults {
    let total = questions.len();
    let correct = count_correct(questions, answers);
    let percentage = if total == 0 {
        0.0
    } else {
        (correct as f64 / total as f64 * 10_000.0).round() / 100.0
    };

    QuizResults {
        total,
        correct,
        incorrect: total - correct,
        percentage,
    }
}

pub fn build_review(questions: &[Question], answers: &[Option<String>]) -> Vec<ReviewItem> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let chosen = chosen_at(answers, i).map(str::to_string);
            let verdict = match chosen.as_deref() {
                None => Verdict::NotAnswered,
                Some(c) if q.is_correct(c) => Verdict::Correct,
                Some(_) => Verdict::Incorrect,
            };
            ReviewItem {
                number: i + 1,
                question: q.question.clone(),
                options: q.options.clone(),
                chosen,
                correct_answer: q.answer.clone(),
                explanation: q.explanation_text().to_string(),
                verdict,
            }
        })
        .collect()
}

/// `MM:SS`, minutes keep counting past an hour.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str], answer: &str) -> Question {
        Question {
            question: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
            explanation: Some(format!("Because {}", answer)),
        }
    }

    fn three_questions() -> Vec<Question> {
        vec![
            question("Q1", &["a", "b"], "a"),
            question("Q2", &["a", "b"], "b"),
            question("Q3", &["a", "b"], "a"),
        ]
    }

    #[test]
    fn test_single_wrong_answer_scenario() {
        let questions = vec![Question {
            question: "2+2?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            answer: "4".to_string(),
            explanation: None,
        }];
        let answers = vec![Some("3".to_string())];

        let results = compute_results(&questions, &answers);
        assert_eq!(
            results,
            QuizResults {
                total: 1,
                correct: 0,
                incorrect: 1,
                percentage: 0.0,
            }
        );

        let review = build_review(&questions, &answers);
        assert_eq!(review.len(), 1);
        assert_eq!(review[0].verdict, Verdict::Incorrect);
        assert_eq!(review[0].chosen_label(), "3");
        assert_eq!(review[0].correct_answer, "4");
        assert_eq!(review[0].explanation, "");
    }

    #[test]
    fn test_correct_plus_incorrect_is_total() {
        let questions = three_questions();
        let records: Vec<Vec<Option<String>>> = vec![
            vec![None, None, None],
            vec![Some("a".into()), None, None],
            vec![Some("b".into()), Some("b".into()), Some("b".into())],
            vec![Some("a".into()), Some("b".into()), Some("a".into())],
            vec![Some("a".into())],
        ];

        for answers in &records {
            let results = compute_results(&questions, answers);
            assert_eq!(results.correct + results.incorrect, questions.len());
        }
    }

    #[test]
    fn test_percentage_extremes() {
        let questions = three_questions();

        let none = compute_results(&questions, &[None, None, None]);
        assert_eq!(none.correct, 0);
        assert_eq!(none.percentage, 0.0);

        let all = compute_results(
            &questions,
            &[Some("a".into()), Some("b".into()), Some("a".into())],
        );
        assert_eq!(all.correct, 3);
        assert_eq!(all.percentage, 100.0);
    }

    #[test]
    fn test_percentage_rounds_to_two_places() {
        let questions = three_questions();
        let results = compute_results(&questions, &[Some("a".into()), None, None]);
        assert_eq!(results.percentage, 33.33);

        let results = compute_results(&questions, &[Some("a".into()), Some("b".into()), None]);
        assert_eq!(results.percentage, 66.67);
    }

    #[test]
    fn test_empty_quiz_has_zero_percentage() {
        let results = compute_results(&[], &[]);
        assert_eq!(results.total, 0);
        assert_eq!(results.percentage, 0.0);
    }

    #[test]
    fn test_review_preserves_order_and_marks_skipped() {
        let questions = three_questions();
        let answers = vec![Some("a".into()), None, Some("b".into())];
        let review = build_review(&questions, &answers);

        let numbers: Vec<usize> = review.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(review[0].verdict, Verdict::Correct);
        assert_eq!(review[1].verdict, Verdict::NotAnswered);
        assert_eq!(review[1].chosen_label(), NOT_ANSWERED);
        assert_eq!(review[2].verdict, Verdict::Incorrect);
        assert_eq!(review[2].explanation, "Because a");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(3600), "60:00");
    }
}
