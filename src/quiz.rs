use rand::Rng;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_option_number_from_string;

/// Category id the client sends to ask for questions from every category.
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Option<Vec<i64>>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub id: Option<i64>,
}

impl QuizRequest {
    /// `None` when the quiz category or its id is missing.
    /// `Some(None)` selects from all categories.
    pub fn category_filter(&self) -> Option<Option<i64>> {
        let id = self.quiz_category.as_ref()?.id?;
        Some((id != ALL_CATEGORIES).then_some(id))
    }

    pub fn previous_questions(&self) -> &[i64] {
        self.previous_questions.as_deref().unwrap_or_default()
    }
}

/// Picks one candidate uniformly at random, `None` when there is nothing left to ask.
pub fn pick_question<T, R: Rng + ?Sized>(mut candidates: Vec<T>, rng: &mut R) -> Option<T> {
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}
