mod categories;
mod questions;
mod quizzes;

use serde::Serialize;

use super::error::ApiError;
use crate::db::{Category, Question};

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<Category>,
}

#[derive(Serialize)]
pub struct QuestionsPage {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub categories: Vec<Category>,
}

#[derive(Serialize)]
pub struct CategoryQuestions {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub current_category: Category,
}

#[derive(Serialize)]
pub struct SearchResults {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: i64,
}

#[derive(Serialize)]
pub struct Deleted {
    pub success: bool,
    pub deleted: i64,
    pub total_questions: i64,
}

#[derive(Serialize)]
pub struct Created {
    pub success: bool,
    pub created: i64,
    pub questions: Vec<Question>,
    pub total_questions: i64,
}

#[derive(Serialize)]
pub struct QuizQuestion {
    pub success: bool,
    pub question: Option<Question>,
}

fn count<T>(items: &[T]) -> i64 {
    i64::try_from(items.len()).unwrap_or(i64::MAX)
}
