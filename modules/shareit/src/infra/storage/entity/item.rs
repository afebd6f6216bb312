use sea_orm::entity::prelude::*;

use crate::contract::model::{Item, ItemSummary};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::item_request::Entity",
        from = "Column::RequestId",
        to = "super::item_request::Column::Id"
    )]
    Request,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::item_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Item {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            available: m.available,
            owner_id: m.owner_id,
            request_id: m.request_id,
        }
    }
}

impl From<&Model> for ItemSummary {
    fn from(m: &Model) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
        }
    }
}
