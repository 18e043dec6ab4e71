use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionSession, TransactionTrait,
};
use tracing::{debug, info};

use super::ServiceError;
use crate::domain::{Game, RecordId, SortDir, Studio, StudioChanges};
use crate::entity::{game, studio};

pub struct StudioService<'a, C> {
    conn: &'a C,
}

impl<'a, C> StudioService<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Persist a studio that has never been saved.
    pub async fn insert(&self, studio: Studio) -> Result<Studio, ServiceError> {
        if let RecordId::Assigned(id) = studio.id {
            return Err(ServiceError::already_inserted(id));
        }

        let saved = self.save(&studio).await?;
        info!(id = ?saved.id, name = %saved.name, "Studio created");
        Ok(saved)
    }

    pub async fn find(&self, id: i32) -> Result<Option<Studio>, DbErr> {
        load_aggregate(self.conn, id).await
    }

    pub async fn get(&self, id: i32) -> Result<Studio, ServiceError> {
        self.find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no studio found with id {id}")))
    }

    pub async fn list(&self, dir: SortDir) -> Result<Vec<Studio>, ServiceError> {
        let rows = studio::Entity::find()
            .order_by(studio::Column::Id, dir.order())
            .all(self.conn)
            .await?;

        let ids: Vec<i32> = rows.iter().map(|s| s.id).collect();
        let mut games_by_studio: HashMap<i32, Vec<Game>> = HashMap::new();
        if !ids.is_empty() {
            let games = game::Entity::find()
                .filter(game::Column::StudioId.is_in(ids))
                .order_by_asc(game::Column::Id)
                .all(self.conn)
                .await?;
            for g in games {
                games_by_studio.entry(g.studio_id).or_default().push(g.into());
            }
        }

        Ok(rows
            .into_iter()
            .map(|m| {
                let games = games_by_studio.remove(&m.id).unwrap_or_default();
                Studio::from_parts(m, games)
            })
            .collect())
    }

    /// Games owned by one studio, ordered by id.
    pub async fn list_games(&self, id: i32, dir: SortDir) -> Result<Vec<Game>, ServiceError> {
        studio::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no studio found with id {id}")))?;

        let games = game::Entity::find()
            .filter(game::Column::StudioId.eq(id))
            .order_by(game::Column::Id, dir.order())
            .all(self.conn)
            .await?;

        Ok(games.into_iter().map(Game::from).collect())
    }

    pub async fn update(&self, id: i32, changes: StudioChanges) -> Result<Studio, ServiceError> {
        let mut studio = self.get(id).await?;
        studio.name = changes.name;
        studio.location = changes.location;
        studio.creation_date = changes.creation_date;

        Ok(self.save(&studio).await?)
    }

    /// Delete a studio together with every game it owns.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let studio = self.get(id).await?;

        let txn = self.conn.begin().await?;
        let removed = game::Entity::delete_many()
            .filter(game::Column::StudioId.eq(id))
            .exec(&txn)
            .await?;
        studio::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            id,
            name = %studio.name,
            games = removed.rows_affected,
            "Studio deleted"
        );
        Ok(())
    }

    /// Write the whole aggregate in one transaction.
    ///
    /// The studio row is inserted or updated, every unassigned game in the
    /// collection is inserted under the studio's key, and the aggregate is
    /// re-read before commit. Games that already have an id are left where
    /// they are.
    pub async fn save(&self, studio: &Studio) -> Result<Studio, DbErr> {
        let txn = self.conn.begin().await?;

        let row = match studio.id {
            RecordId::Assigned(id) => {
                let existing = studio::Entity::find_by_id(id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound(format!("studio {id}")))?;
                let mut active: studio::ActiveModel = existing.into();
                active.name = Set(studio.name.clone());
                active.location = Set(studio.location.clone());
                active.creation_date = Set(studio.creation_date);
                active.update(&txn).await?
            }
            RecordId::Unassigned => {
                studio::ActiveModel {
                    name: Set(studio.name.clone()),
                    location: Set(studio.location.clone()),
                    creation_date: Set(studio.creation_date),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        for child in studio.games.iter().filter(|g| !g.id.is_assigned()) {
            let inserted = game::ActiveModel {
                name: Set(child.name.clone()),
                overview: Set(child.overview.clone()),
                launch_date: Set(child.launch_date),
                studio_name: Set(child.studio.clone()),
                studio_id: Set(row.id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            debug!(studio_id = row.id, game_id = inserted.id, "Inserted owned game");
        }

        let saved = load_aggregate(&txn, row.id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("studio {}", row.id)))?;
        txn.commit().await?;

        Ok(saved)
    }
}

async fn load_aggregate<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<Studio>, DbErr> {
    let Some(model) = studio::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };

    let games = game::Entity::find()
        .filter(game::Column::StudioId.eq(id))
        .order_by_asc(game::Column::Id)
        .all(conn)
        .await?;

    Ok(Some(Studio::from_parts(
        model,
        games.into_iter().map(Game::from).collect(),
    )))
}
