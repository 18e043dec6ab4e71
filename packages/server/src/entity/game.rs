use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tbGame")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub overview: String,
    pub launch_date: Date,
    pub studio_name: String, // denormalized owner name

    pub studio_id: i32,
    #[sea_orm(belongs_to, from = "studio_id", to = "id", on_delete = "Cascade")]
    pub studio: HasOne<super::studio::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
