use std::collections::HashMap;

use crate::api::models::QuizQuestion;
use crate::config::QUIZ_PASS_PERCENT;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
    /// Question id -> answered correctly
    pub per_question: HashMap<i64, bool>,
}

impl QuizResult {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.correct * 100) / self.total) as u32
    }

    pub fn passed(&self) -> bool {
        self.percent() >= QUIZ_PASS_PERCENT
    }
}

/// Answers for the inline quiz of one lesson. Graded client side.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct QuizState {
    answers: HashMap<i64, usize>,
    submitted: bool,
}

impl QuizState {
    pub fn select(&mut self, question: &QuizQuestion, choice: usize) {
        if self.submitted || choice >= question.choices.len() {
            return;
        }
        self.answers.insert(question.id, choice);
    }

    pub fn selected(&self, question_id: i64) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn all_answered(&self, questions: &[QuizQuestion]) -> bool {
        questions.iter().all(|q| self.answers.contains_key(&q.id))
    }

    pub fn submit(&mut self, questions: &[QuizQuestion]) -> Option<QuizResult> {
        if !self.all_answered(questions) {
            return None;
        }
        self.submitted = true;
        Some(self.grade(questions))
    }

    pub fn grade(&self, questions: &[QuizQuestion]) -> QuizResult {
        let per_question: HashMap<i64, bool> = questions
            .iter()
            .map(|q| (q.id, self.selected(q.id) == Some(q.correct_index)))
            .collect();
        QuizResult {
            correct: per_question.values().filter(|ok| **ok).count(),
            total: questions.len(),
            per_question,
        }
    }

    pub fn reset(&mut self) {
        self.answers.clear();
        self.submitted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, correct_index: usize) -> QuizQuestion {
        QuizQuestion {
            id,
            prompt: format!("Question {}", id),
            choices: vec!["A".into(), "B".into(), "C".into()],
            correct_index,
        }
    }

    #[test]
    fn submit_requires_every_answer() {
        let questions = vec![question(1, 0), question(2, 1)];
        let mut quiz = QuizState::default();
        quiz.select(&questions[0], 0);
        assert_eq!(quiz.submit(&questions), None);
        assert!(!quiz.is_submitted());
    }

    #[test]
    fn grades_and_locks_answers() {
        let questions = vec![question(1, 0), question(2, 1), question(3, 2)];
        let mut quiz = QuizState::default();
        quiz.select(&questions[0], 0);
        quiz.select(&questions[1], 1);
        quiz.select(&questions[2], 0);

        let result = quiz.submit(&questions).unwrap();
        assert_eq!(result.correct, 2);
        assert_eq!(result.percent(), 66);
        assert!(!result.passed());
        assert_eq!(result.per_question[&3], false);

        quiz.select(&questions[2], 2);
        assert_eq!(quiz.selected(3), Some(0));

        quiz.reset();
        quiz.select(&questions[2], 2);
        assert_eq!(quiz.selected(3), Some(2));
    }

    #[test]
    fn out_of_range_choices_are_ignored() {
        let q = question(1, 0);
        let mut quiz = QuizState::default();
        quiz.select(&q, 3);
        assert_eq!(quiz.selected(1), None);
    }

    #[test]
    fn empty_quiz_passes() {
        let result = QuizState::default().grade(&[]);
        assert!(result.passed());
    }
}
