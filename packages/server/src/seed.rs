use sea_orm::*;
use tracing::info;

use crate::config::AdminConfig;
use crate::entity::role::{self, ADMIN_ROLE, DEFAULT_ROLE};
use crate::services::{ServiceError, UserService};

/// Roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &[ADMIN_ROLE, DEFAULT_ROLE];

/// Seed the role table with defaults.
pub async fn seed_roles(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(role::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new roles", inserted);
    }

    Ok(())
}

/// Make sure the configured bootstrap account exists and holds the admin role.
pub async fn ensure_admin(db: &DatabaseConnection, admin: &AdminConfig) -> Result<(), ServiceError> {
    let users = UserService::new(db);

    let account = match users.find_by_email(&admin.email).await? {
        Some(account) => account,
        None => {
            let account = users
                .register(admin.name.clone(), &admin.email, &admin.password)
                .await?;
            info!(id = account.id, "Created bootstrap admin account");
            account
        }
    };

    if !account.has_role(ADMIN_ROLE) {
        users.grant_role(account.id, ADMIN_ROLE).await?;
    }

    Ok(())
}
