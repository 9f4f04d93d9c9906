use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use super::queries::categories::{get_all_categories, import_categories};
use super::queries::questions::{get_all_questions, import_questions};
use super::{Category, Question};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}

/// Writes both tables as CSV into `dir`, creating it when missing.
pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Exporting to {}",
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Loads both CSV files from `dir`. Rows keep their ids and replace existing rows with the same id.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing from {}",
        dir.display()
    );
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::questions::create_question;
    use crate::db::{establish_connection, run_migrations};

    async fn fresh_db(dir: &Path) -> SqlitePool {
        let pool = establish_connection(dir.join("trivia.db").to_str().unwrap())
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn export_then_import_keeps_both_tables() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let csv_dir = tempfile::tempdir().unwrap();

        let source = fresh_db(source_dir.path()).await;
        create_question(&source, "Who discovered penicillin?", "Alexander Fleming", 1, 3)
            .await
            .unwrap();
        let gap = create_question(&source, "removed", "removed", 2, 1).await.unwrap();
        create_question(&source, "What is, in a word, \"Agra\" known for?", "Taj Mahal", 3, 2)
            .await
            .unwrap();
        crate::db::queries::questions::delete_question(&source, gap)
            .await
            .unwrap();

        export_data(&source, csv_dir.path()).await.unwrap();
        let header = std::fs::read_to_string(csv_dir.path().join(CATEGORIES_FILE)).unwrap();
        assert!(header.starts_with("id,type\n"));

        let target = fresh_db(target_dir.path()).await;
        import_data(&target, csv_dir.path()).await.unwrap();

        assert_eq!(
            get_all_categories(&target).await.unwrap(),
            get_all_categories(&source).await.unwrap()
        );
        let imported = get_all_questions(&target).await.unwrap();
        assert_eq!(imported, get_all_questions(&source).await.unwrap());
        assert!(imported.iter().all(|q| q.id != gap));
    }

    #[tokio::test]
    async fn imports_bundled_seed_data() {
        let db_dir = tempfile::tempdir().unwrap();
        let pool = fresh_db(db_dir.path()).await;
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");

        import_data(&pool, &data).await.unwrap();

        let categories = get_all_categories(&pool).await.unwrap();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[4].id, 5);
        assert_eq!(categories[4].kind, "Entertainment");

        let questions = get_all_questions(&pool).await.unwrap();
        assert_eq!(questions.len(), 19);
        assert_eq!(questions.first().map(|q| q.id), Some(2));
        assert_eq!(questions.last().map(|q| q.id), Some(23));
        let pollock = questions.iter().find(|q| q.id == 19).unwrap();
        assert_eq!(pollock.answer, "Jackson Pollock");
    }
}
