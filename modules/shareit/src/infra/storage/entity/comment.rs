use anyhow::anyhow;
use sea_orm::entity::prelude::*;

use crate::contract::model::Comment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Assemble a contract comment from a row joined with its author.
pub fn into_comment(
    (m, author): (Model, Option<super::user::Model>),
) -> anyhow::Result<Comment> {
    let author =
        author.ok_or_else(|| anyhow!("comment {} references missing user {}", m.id, m.author_id))?;
    Ok(Comment {
        id: m.id,
        text: m.text,
        item_id: m.item_id,
        author_id: m.author_id,
        author_name: author.name,
        created: m.created,
    })
}
