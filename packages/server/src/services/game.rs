use sea_orm::prelude::Expr;
use sea_orm::sea_query::{BinOper, Func};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, ExprTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tracing::info;

use super::{ServiceError, StudioService};
use crate::domain::{Game, GameChanges, RecordId, SortDir};
use crate::entity::game;

pub struct GameService<'a, C> {
    conn: &'a C,
}

impl<'a, C> GameService<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Create a game inside an existing studio.
    ///
    /// Games are never inserted directly: the owning studio is loaded, the
    /// game is appended to its collection and the studio aggregate is saved.
    /// The result is the last game of the saved collection. Two concurrent
    /// calls against the same studio are not serialized; the studio row is
    /// last-writer-wins.
    pub async fn insert(&self, mut game: Game, studio_id: i32) -> Result<Game, ServiceError> {
        if let RecordId::Assigned(id) = game.id {
            return Err(ServiceError::already_inserted(id));
        }

        let studios = StudioService::new(self.conn);
        let mut studio = studios.find(studio_id).await?.ok_or_else(|| {
            ServiceError::InvalidArgument(format!("no studio registered with id {studio_id}"))
        })?;

        game.studio = studio.name.clone();
        studio.games.push(game);

        let saved = studios.save(&studio).await?;
        let created = saved
            .games
            .into_iter()
            .last()
            .ok_or(ServiceError::Db(DbErr::RecordNotInserted))?;

        info!(id = ?created.id, studio_id, name = %created.name, "Game created");
        Ok(created)
    }

    pub async fn list(&self, dir: SortDir) -> Result<Vec<Game>, ServiceError> {
        let rows = game::Entity::find()
            .order_by(game::Column::Id, dir.order())
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Game::from).collect())
    }

    /// Case-insensitive substring search on the game name.
    ///
    /// Column and pattern are both folded by the database's `lower()`; how far
    /// non-ASCII letters fold depends on its `LC_CTYPE`. Wildcards in the
    /// fragment are escaped with `\`, PostgreSQL's default LIKE escape.
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Game>, ServiceError> {
        let pattern = format!("%{}%", escape_like(fragment));

        let rows = game::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(game::Column::Name)))
                    .binary(BinOper::Like, Func::lower(Expr::val(pattern))),
            )
            .order_by_asc(game::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Game::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Game, ServiceError> {
        Ok(self.find_model(id).await?.into())
    }

    /// Overwrite name, overview and launch date. The owning studio stays put.
    pub async fn update(&self, id: i32, changes: GameChanges) -> Result<Game, ServiceError> {
        let existing = self.find_model(id).await?;

        let mut active: game::ActiveModel = existing.into();
        active.name = Set(changes.name);
        active.overview = Set(changes.overview);
        active.launch_date = Set(changes.launch_date);

        let model = active.update(self.conn).await?;
        Ok(model.into())
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.find_model(id).await?;
        game::Entity::delete_by_id(id).exec(self.conn).await?;

        info!(id, studio_id = existing.studio_id, "Game deleted");
        Ok(())
    }

    async fn find_model(&self, id: i32) -> Result<game::Model, ServiceError> {
        game::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no game found with id {id}")))
    }
}

/// Escape LIKE wildcard characters in a search string.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
