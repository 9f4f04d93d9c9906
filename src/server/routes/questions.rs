use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories, questions},
    pagination::{paginate, PageQuery},
    server::{
        app::AppState,
        error::ApiError,
        extract::{Json, Path},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{count, ApiResponse, Created, Deleted, QuestionsPage, SearchResults};

#[derive(Deserialize)]
struct NewQuestion {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<SearchTerm>,
}

// Clients may send a bare number; it is matched by its decimal text.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchTerm {
    Text(String),
    Number(serde_json::Number),
}

impl SearchTerm {
    fn into_text(self) -> String {
        match self {
            SearchTerm::Text(text) => text,
            SearchTerm::Number(n) => n.to_string(),
        }
    }
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let all = questions::get_all_questions(&pool)
        .await
        .map_err(ApiError::internal)?;
    let total_questions = count(&all);
    let page = paginate(query.page(), all);
    if page.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = categories::get_all_categories(&pool)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: page,
        total_questions,
        categories,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResponse<Json<Deleted>> {
    if questions::get_question(&pool, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    if questions::delete_question(&pool, id).await? == 0 {
        // removed by a concurrent request between lookup and delete
        return Err(ApiError::NotFound);
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "question deleted");

    Ok(Json(Deleted {
        success: true,
        deleted: id,
        total_questions: questions::count_questions(&pool).await?,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
    Json(body): Json<NewQuestion>,
) -> ApiResponse<(StatusCode, Json<Created>)> {
    let (Some(question), Some(answer), Some(category), Some(difficulty)) =
        (body.question, body.answer, body.category, body.difficulty)
    else {
        return Err(ApiError::BadRequest(
            "question, answer, category and difficulty are required".to_owned(),
        ));
    };

    let created = questions::create_question(&pool, &question, &answer, category, difficulty).await?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id = created, category, "question created");

    let all = questions::get_all_questions(&pool).await?;
    let total_questions = count(&all);

    Ok((
        StatusCode::CREATED,
        Json(Created {
            success: true,
            created,
            questions: paginate(query.page(), all),
            total_questions,
        }),
    ))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    Json(body): Json<SearchBody>,
) -> ApiResponse<Json<SearchResults>> {
    let term = body
        .search_term
        .map(SearchTerm::into_text)
        .ok_or_else(|| ApiError::BadRequest("searchTerm is required".to_owned()))?;

    let questions = questions::search_questions(&pool, &term).await?;
    tracing::debug!(term = %term, matches = questions.len(), "search");

    Ok(Json(SearchResults {
        success: true,
        total_questions: count(&questions),
        questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/search", post(search_questions))
        .with_state(state)
}
