//! SQLite-backed vector index.
//!
//! Reads the index file the indexing pipeline maintains: a `chunks` table
//! holding content, string metadata as JSON, and the embedding serialized
//! as a little-endian f32 blob. Search is brute-force cosine over all rows,
//! which is fine at the corpus sizes this engine targets. This process
//! never writes to the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::store::{cosine_similarity, Chunk, SearchHit, VectorIndex};
use crate::core::errors::RagError;

pub struct SqliteIndex {
    pool: SqlitePool,
    #[allow(dead_code)]
    db_path: PathBuf,
}

impl SqliteIndex {
    /// Open an existing index file read-only. A missing file means the
    /// indexing pipeline has not run here; that is `IndexUnavailable`, not
    /// an empty index.
    pub async fn open(db_path: &Path) -> Result<Self, RagError> {
        if !db_path.exists() {
            return Err(RagError::IndexUnavailable(format!(
                "no index at {}",
                db_path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(RagError::index)?;

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn row_to_chunk(row: &sqlx::sqlite::SqliteRow) -> Chunk {
        let metadata_str: String = row.get("metadata");
        let metadata: HashMap<String, String> =
            serde_json::from_str(&metadata_str).unwrap_or_default();

        Chunk {
            id: row.get("chunk_id"),
            content: row.get("content"),
            metadata,
        }
    }
}

#[async_trait]
impl VectorIndex for SqliteIndex {
    async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchHit>, RagError> {
        let rows = sqlx::query(
            "SELECT chunk_id, content, metadata, embedding FROM chunks ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RagError::index)?;

        let mut scored: Vec<SearchHit> = rows
            .iter()
            .filter_map(|row| {
                let embedding_bytes: Vec<u8> = row.get("embedding");
                if embedding_bytes.is_empty() {
                    return None;
                }
                let stored = Self::deserialize_embedding(&embedding_bytes);
                let score = cosine_similarity(query_embedding, &stored);

                Some(SearchHit {
                    chunk: Self::row_to_chunk(row),
                    score,
                })
            })
            .collect();

        // sort_by is stable, so equal scores keep insertion (rowid) order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k.max(1));

        Ok(scored)
    }

    async fn count(&self) -> Result<usize, RagError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM chunks")
            .fetch_one(&self.pool)
            .await
            .map_err(RagError::index)?;
        let n: i64 = row.get("n");
        Ok(n as usize)
    }

    async fn dimension(&self) -> Result<Option<usize>, RagError> {
        let row = sqlx::query("SELECT embedding FROM chunks ORDER BY rowid LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(RagError::index)?;

        Ok(row.map(|row| {
            let bytes: Vec<u8> = row.get("embedding");
            bytes.len() / 4
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_fixture(db_path: &Path, rows: &[(&str, &str, &str, Vec<f32>)]) {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .expect("create fixture db");

        sqlx::query(
            "CREATE TABLE chunks (
                chunk_id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}',
                embedding BLOB NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .expect("create table");

        for (id, content, metadata, embedding) in rows {
            let blob: Vec<u8> = embedding.iter().flat_map(|f| f.to_le_bytes()).collect();
            sqlx::query("INSERT INTO chunks (chunk_id, content, metadata, embedding) VALUES (?1, ?2, ?3, ?4)")
                .bind(id)
                .bind(content)
                .bind(metadata)
                .bind(blob)
                .execute(&pool)
                .await
                .expect("insert row");
        }
        pool.close().await;
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let result = SqliteIndex::open(Path::new("/nonexistent/index.db")).await;
        assert!(matches!(result, Err(RagError::IndexUnavailable(_))));
    }

    #[tokio::test]
    async fn search_orders_by_similarity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("index.db");
        write_fixture(
            &db_path,
            &[
                ("c1", "off-topic", r#"{"source":"a.md"}"#, vec![0.0, 1.0]),
                ("c2", "on-topic", r#"{"source":"b.md"}"#, vec![1.0, 0.0]),
                ("c3", "nearby", r#"{"source":"c.md"}"#, vec![0.9, 0.1]),
            ],
        )
        .await;

        let index = SqliteIndex::open(&db_path).await.expect("open");
        assert_eq!(index.count().await.expect("count"), 3);
        assert_eq!(index.dimension().await.expect("dimension"), Some(2));

        let hits = index.search(&[1.0, 0.0], 2).await.expect("search");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.id, "c2");
        assert_eq!(hits[1].chunk.id, "c3");
        assert_eq!(hits[0].chunk.source(), Some("b.md"));
    }
}
