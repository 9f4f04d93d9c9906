use axum::{extract::State, routing::get, Router};
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories, questions},
    server::{
        app::AppState,
        error::ApiError,
        extract::{Json, Path},
    },
};

use super::{count, ApiResponse, CategoriesResponse, CategoryQuestions};

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = categories::get_all_categories(&pool)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

async fn get_category_questions(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let current_category = categories::get_category(&pool, id)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound)?;
    let questions = questions::get_questions_for_category(&pool, id)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(CategoryQuestions {
        success: true,
        total_questions: count(&questions),
        questions,
        current_category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
