use axum::{extract::State, routing::post, Router};
use sqlx::SqlitePool;

use crate::{
    db::queries::questions,
    quiz::{pick_question, QuizRequest},
    server::{app::AppState, error::ApiError, extract::Json},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiResponse, QuizQuestion};

async fn next_question(
    State(pool): State<SqlitePool>,
    Json(body): Json<QuizRequest>,
) -> ApiResponse<Json<QuizQuestion>> {
    let category = body
        .category_filter()
        .ok_or_else(|| ApiError::Unprocessable("quiz_category.id is required".to_owned()))?;

    let candidates =
        questions::get_quiz_candidates(&pool, category, body.previous_questions()).await?;
    let question = pick_question(candidates, &mut rand::thread_rng());

    if let Some(q) = &question {
        QUIZ_QUESTIONS_SERVED
            .with_label_values(&[q.category.to_string().as_str()])
            .inc();
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
