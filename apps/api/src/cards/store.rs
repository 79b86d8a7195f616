use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::cards::models::CareerCardData;
use crate::models::card::CareerCardRow;

/// Persistence for career card documents.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Inserts a new card owned by `user_id` under a freshly generated id.
    async fn insert(&self, user_id: Uuid, card: &CareerCardData)
        -> Result<CareerCardRow, sqlx::Error>;

    async fn fetch(&self, id: Uuid) -> Result<Option<CareerCardRow>, sqlx::Error>;

    /// Replaces the card document. Only matches rows owned by `user_id`;
    /// returns `None` when nothing matched.
    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        card: &CareerCardData,
    ) -> Result<Option<CareerCardRow>, sqlx::Error>;
}

/// `career_cards` table in Postgres.
pub struct PgCardStore {
    pool: PgPool,
}

impl PgCardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CardStore for PgCardStore {
    async fn insert(
        &self,
        user_id: Uuid,
        card: &CareerCardData,
    ) -> Result<CareerCardRow, sqlx::Error> {
        let row = sqlx::query_as::<_, CareerCardRow>(
            r#"
            INSERT INTO career_cards (id, user_id, card_data)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, card_data, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Json(card))
        .fetch_one(&self.pool)
        .await?;

        info!("Created career card {} for user {}", row.id, user_id);
        Ok(row)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<CareerCardRow>, sqlx::Error> {
        sqlx::query_as::<_, CareerCardRow>(
            "SELECT id, user_id, card_data, created_at, updated_at FROM career_cards WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        card: &CareerCardData,
    ) -> Result<Option<CareerCardRow>, sqlx::Error> {
        let row = sqlx::query_as::<_, CareerCardRow>(
            r#"
            UPDATE career_cards
            SET card_data = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, card_data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Json(card))
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            info!("Updated career card {id}");
        }
        Ok(row)
    }
}

/// In-process store with the same ownership rules, for handler tests.
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryCardStore {
    rows: std::sync::Mutex<std::collections::HashMap<Uuid, CareerCardRow>>,
}

#[cfg(test)]
#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn insert(
        &self,
        user_id: Uuid,
        card: &CareerCardData,
    ) -> Result<CareerCardRow, sqlx::Error> {
        let now = chrono::Utc::now();
        let row = CareerCardRow {
            id: Uuid::new_v4(),
            user_id,
            card_data: serde_json::to_value(card).map_err(|e| sqlx::Error::Decode(e.into()))?,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(row.id, row.clone());
        Ok(row)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<CareerCardRow>, sqlx::Error> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        card: &CareerCardData,
    ) -> Result<Option<CareerCardRow>, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id).filter(|row| row.user_id == user_id) else {
            return Ok(None);
        };
        row.card_data = serde_json::to_value(card).map_err(|e| sqlx::Error::Decode(e.into()))?;
        row.updated_at = chrono::Utc::now();
        Ok(Some(row.clone()))
    }
}
