use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rng};

use exam_core::model::{ExamDefinition, ExamDefinitionError};

/// Which parts of an exam get randomized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleOptions {
    pub questions: bool,
    pub options: bool,
}

impl ShuffleOptions {
    /// Keep the authored order everywhere.
    #[must_use]
    pub fn none() -> Self {
        Self {
            questions: false,
            options: false,
        }
    }
}

impl Default for ShuffleOptions {
    fn default() -> Self {
        Self {
            questions: true,
            options: true,
        }
    }
}

/// Randomizes question order and, per question, option order.
///
/// Permutations are drawn with an unbiased Fisher-Yates shuffle and applied by
/// position, so each question's correct index keeps pointing at the option
/// that was correct before, even when option texts repeat.
#[derive(Debug, Clone, Default)]
pub struct Shuffler {
    options: ShuffleOptions,
    seed: Option<u64>,
}

impl Shuffler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(mut self, options: ShuffleOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> ShuffleOptions {
        self.options
    }

    /// Use a seeded generator instead of the thread-local one.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Shuffle `exam`, taking ownership of it.
    ///
    /// # Errors
    ///
    /// Returns `ExamDefinitionError` only if a generated order is rejected,
    /// which would indicate a bug in permutation generation.
    pub fn shuffle(&self, exam: ExamDefinition) -> Result<ExamDefinition, ExamDefinitionError> {
        match self.seed {
            Some(seed) => self.shuffle_with(exam, &mut StdRng::seed_from_u64(seed)),
            None => self.shuffle_with(exam, &mut rng()),
        }
    }

    /// Shuffle `exam` with the given generator.
    ///
    /// # Errors
    ///
    /// See [`Shuffler::shuffle`].
    pub fn shuffle_with<R: Rng + ?Sized>(
        &self,
        mut exam: ExamDefinition,
        rng: &mut R,
    ) -> Result<ExamDefinition, ExamDefinitionError> {
        if self.options.questions {
            let order = permutation(exam.question_count(), rng);
            exam.reorder_questions(&order)?;
        }

        if self.options.options {
            for position in 0..exam.question_count() {
                let len = exam.questions()[position].option_count();
                let order = permutation(len, rng);
                exam.reorder_options(position, &order)?;
            }
        }

        Ok(exam)
    }
}

fn permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.as_mut_slice().shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Question, QuestionId};
    use std::collections::HashMap;

    fn build_exam() -> ExamDefinition {
        let questions = (1..=5)
            .map(|id| {
                let options = (0..4).map(|o| format!("q{id}-opt{o}")).collect();
                Question::new(QuestionId::from(id), format!("Question {id}"), options, 2, 1.0)
                    .unwrap()
            })
            .collect();
        ExamDefinition::new("Shuffle", 10, questions).unwrap()
    }

    fn correct_texts(exam: &ExamDefinition) -> HashMap<QuestionId, String> {
        exam.questions()
            .iter()
            .map(|q| (q.id().clone(), q.correct_option().to_owned()))
            .collect()
    }

    #[test]
    fn correct_option_survives_shuffling() {
        let original = build_exam();
        let expected = correct_texts(&original);

        for seed in 0..50 {
            let shuffled = Shuffler::new()
                .with_seed(Some(seed))
                .shuffle(original.clone())
                .unwrap();
            assert_eq!(correct_texts(&shuffled), expected, "seed {seed}");
        }
    }

    #[test]
    fn shuffling_only_reorders() {
        let original = build_exam();

        for seed in 0..50 {
            let shuffled = Shuffler::new()
                .with_seed(Some(seed))
                .shuffle(original.clone())
                .unwrap();

            let mut before: Vec<_> = original.questions().iter().map(Question::id).collect();
            let mut after: Vec<_> = shuffled.questions().iter().map(Question::id).collect();
            before.sort();
            after.sort();
            assert_eq!(before, after);

            for question in shuffled.questions() {
                let source = original
                    .questions()
                    .iter()
                    .find(|q| q.id() == question.id())
                    .unwrap();
                let mut a = source.options().to_vec();
                let mut b = question.options().to_vec();
                a.sort();
                b.sort();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn same_seed_gives_same_order() {
        let a = Shuffler::new().with_seed(Some(7)).shuffle(build_exam()).unwrap();
        let b = Shuffler::new().with_seed(Some(7)).shuffle(build_exam()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn disabled_shuffle_keeps_authored_order() {
        let original = build_exam();
        let shuffled = Shuffler::new()
            .with_options(ShuffleOptions::none())
            .with_seed(Some(3))
            .shuffle(original.clone())
            .unwrap();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn duplicate_texts_keep_the_correct_position() {
        // Two identical "Yes" options, the second is correct.
        let question = Question::new(
            QuestionId::from(1),
            "Pick",
            vec!["Yes".into(), "No".into(), "Yes".into()],
            2,
            1.0,
        )
        .unwrap();
        let exam = ExamDefinition::new("Dup", 1, vec![question]).unwrap();

        let mut landed = [0usize; 3];
        for seed in 0..300 {
            let shuffled = Shuffler::new().with_seed(Some(seed)).shuffle(exam.clone()).unwrap();
            let q = &shuffled.questions()[0];
            assert_eq!(q.correct_option(), "Yes");
            landed[q.correct_index()] += 1;
        }
        // Identity tracking lets the correct option land anywhere, not only
        // at the first "Yes".
        assert!(landed.iter().all(|&n| n > 0), "{landed:?}");
    }

    #[test]
    fn question_orders_are_roughly_uniform() {
        let questions = (1..=3)
            .map(|id| {
                Question::new(
                    QuestionId::from(id),
                    format!("Q{id}"),
                    vec!["a".into(), "b".into()],
                    0,
                    1.0,
                )
                .unwrap()
            })
            .collect();
        let exam = ExamDefinition::new("Uniform", 1, questions).unwrap();
        let shuffler = Shuffler::new().with_options(ShuffleOptions {
            questions: true,
            options: false,
        });
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        for _ in 0..6_000 {
            let shuffled = shuffler.shuffle_with(exam.clone(), &mut rng).unwrap();
            let key = shuffled.questions().iter().map(|q| q.id().to_string()).collect();
            *counts.entry(key).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for (order, n) in &counts {
            assert!((800..=1_200).contains(n), "{order:?} seen {n} times");
        }
    }
}
