use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{OnConflict, Query as SeaQuery};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionSession, TransactionTrait,
};
use tracing::{debug, info};

use super::ServiceError;
use crate::domain::SortDir;
use crate::entity::role::DEFAULT_ROLE;
use crate::entity::{role, user, user_role};
use crate::utils::hash;

/// A user together with the names of the roles granted to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    fn new(m: user::Model, roles: Vec<String>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            roles,
            created_at: m.created_at,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

pub struct UserService<'a, C> {
    conn: &'a C,
}

impl<'a, C> UserService<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Create an account with the default role.
    pub async fn register(
        &self,
        name: String,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, ServiceError> {
        let hashed =
            hash::hash_password(password).map_err(|e| ServiceError::Hashing(e.to_string()))?;

        let txn = self.conn.begin().await?;

        let model = user::ActiveModel {
            name: Set(name),
            email: Set(normalize_email(email)),
            password: Set(hashed),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                debug!("Registration rejected: email already present");
                ServiceError::Conflict("email is already registered".into())
            }
            _ => ServiceError::from(e),
        })?;

        user_role::ActiveModel {
            user_id: Set(model.id),
            role: Set(DEFAULT_ROLE.to_string()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(id = model.id, "User registered");
        Ok(UserAccount::new(model, vec![DEFAULT_ROLE.to_string()]))
    }

    /// Check a password against the stored hash.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, ServiceError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(self.conn)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let valid = hash::verify_password(password, &model.password)
            .map_err(|e| ServiceError::Hashing(e.to_string()))?;
        if !valid {
            return Err(ServiceError::InvalidCredentials);
        }

        self.with_roles(model).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, ServiceError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(self.conn)
            .await?;

        match model {
            Some(m) => Ok(Some(self.with_roles(m).await?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: i32) -> Result<UserAccount, ServiceError> {
        let model = self.find_model(id).await?;
        self.with_roles(model).await
    }

    /// All users ordered by id, optionally restricted to holders of `role`.
    pub async fn list(
        &self,
        dir: SortDir,
        role: Option<&str>,
    ) -> Result<Vec<UserAccount>, ServiceError> {
        let mut select = user::Entity::find();
        if let Some(role) = role {
            select = select.filter(
                user::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(user_role::Column::UserId)
                        .from(user_role::Entity)
                        .and_where(user_role::Column::Role.eq(role.to_uppercase()))
                        .to_owned(),
                ),
            );
        }

        let users = select
            .order_by(user::Column::Id, dir.order())
            .all(self.conn)
            .await?;

        let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
        let mut roles_by_user: HashMap<i32, Vec<String>> = HashMap::new();
        if !ids.is_empty() {
            let grants = user_role::Entity::find()
                .filter(user_role::Column::UserId.is_in(ids))
                .order_by_asc(user_role::Column::Role)
                .all(self.conn)
                .await?;
            for grant in grants {
                roles_by_user.entry(grant.user_id).or_default().push(grant.role);
            }
        }

        Ok(users
            .into_iter()
            .map(|m| {
                let roles = roles_by_user.remove(&m.id).unwrap_or_default();
                UserAccount::new(m, roles)
            })
            .collect())
    }

    pub async fn update_name(&self, id: i32, name: String) -> Result<UserAccount, ServiceError> {
        let existing = self.find_model(id).await?;

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(name);
        let model = active.update(self.conn).await?;

        self.with_roles(model).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.find_model(id).await?;

        let txn = self.conn.begin().await?;
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        user::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(id, "User deleted");
        Ok(())
    }

    /// Grant a role. Granting a role the user already holds is a no-op.
    pub async fn grant_role(&self, id: i32, role: &str) -> Result<UserAccount, ServiceError> {
        let role = role.to_uppercase();
        role::Entity::find_by_id(role.clone())
            .one(self.conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no role named {role}")))?;
        let model = self.find_model(id).await?;

        let result = user_role::Entity::insert(user_role::ActiveModel {
            user_id: Set(id),
            role: Set(role.clone()),
        })
        .on_conflict(
            OnConflict::columns([user_role::Column::UserId, user_role::Column::Role])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.conn)
        .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        info!(id, role = %role, "Role granted");
        self.with_roles(model).await
    }

    async fn find_model(&self, id: i32) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no user found with id {id}")))
    }

    async fn with_roles(&self, model: user::Model) -> Result<UserAccount, ServiceError> {
        let roles = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(model.id))
            .order_by_asc(user_role::Column::Role)
            .all(self.conn)
            .await?
            .into_iter()
            .map(|grant| grant.role)
            .collect();

        Ok(UserAccount::new(model, roles))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
