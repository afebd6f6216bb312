use sea_orm::entity::prelude::*;

use crate::contract::model::ItemRequest;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "item_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequestorId",
        to = "super::user::Column::Id"
    )]
    Requestor,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requestor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ItemRequest {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            description: m.description,
            requestor_id: m.requestor_id,
            created: m.created,
            items: Vec::new(),
        }
    }
}
