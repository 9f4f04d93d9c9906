use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE category = ?1
ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match on the question text. The term is matched
/// literally and folded with Unicode rules, SQLite's `lower` only covers ASCII.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let needle = term.to_lowercase();
    let questions = get_all_questions(pool).await?;
    Ok(questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect())
}

/// Questions eligible for the next quiz round: everything in `category` (or every
/// category when `None`) whose id is not in `excluded`.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    category: Option<i64>,
    excluded: &[i64],
) -> sqlx::Result<Vec<Question>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, question, answer, category, difficulty FROM questions WHERE 1 = 1",
    );
    if let Some(category) = category {
        query.push(" AND category = ").push_bind(category);
    }
    if !excluded.is_empty() {
        query.push(" AND id NOT IN (");
        let mut separated = query.separated(", ");
        for id in excluded {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Question>().fetch_all(pool).await
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: i64,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of removed rows, zero when `id` did not exist.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let affected = sqlx::query("DELETE FROM questions WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(affected)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for q in questions {
        sqlx::query(
            r#"
INSERT OR REPLACE INTO questions (id, question, answer, category, difficulty)
VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(q.id)
        .bind(q.question)
        .bind(q.answer)
        .bind(q.category)
        .bind(q.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection, run_migrations};

    async fn setup() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trivia.db");
        let pool = establish_connection(path.to_str().unwrap()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_literal() {
        let (_dir, pool) = setup().await;
        create_question(&pool, "Who discovered penicillin?", "Fleming", 1, 3)
            .await
            .unwrap();
        create_question(&pool, "Name somebody WHO painted", "Escher", 2, 1)
            .await
            .unwrap();
        create_question(&pool, "100% of what?", "Nothing", 1, 1)
            .await
            .unwrap();

        let found = search_questions(&pool, "who").await.unwrap();
        assert_eq!(found.len(), 2);

        let found = search_questions(&pool, "0%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].answer, "Nothing");

        let found = search_questions(&pool, "_").await.unwrap();
        assert!(found.is_empty());

        create_question(&pool, "Which ÉCOLE trained Monet?", "None", 2, 2)
            .await
            .unwrap();
        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Which ÉCOLE trained Monet?");
    }

    #[tokio::test]
    async fn quiz_candidates_skip_excluded_ids() {
        let (_dir, pool) = setup().await;
        let a = create_question(&pool, "a", "a", 1, 1).await.unwrap();
        let b = create_question(&pool, "b", "b", 1, 1).await.unwrap();
        let c = create_question(&pool, "c", "c", 2, 1).await.unwrap();

        let ids = |qs: Vec<Question>| qs.into_iter().map(|q| q.id).collect::<Vec<_>>();

        assert_eq!(
            ids(get_quiz_candidates(&pool, Some(1), &[a]).await.unwrap()),
            vec![b]
        );
        assert_eq!(
            ids(get_quiz_candidates(&pool, None, &[b]).await.unwrap()),
            vec![a, c]
        );
        assert_eq!(
            ids(get_quiz_candidates(&pool, None, &[]).await.unwrap()),
            vec![a, b, c]
        );
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let (_dir, pool) = setup().await;
        let first = create_question(&pool, "q", "a", 1, 1).await.unwrap();
        assert_eq!(delete_question(&pool, first).await.unwrap(), 1);
        assert_eq!(delete_question(&pool, first).await.unwrap(), 0);

        let second = create_question(&pool, "q", "a", 1, 1).await.unwrap();
        assert!(second > first);
        assert_eq!(count_questions(&pool).await.unwrap(), 1);
    }
}
