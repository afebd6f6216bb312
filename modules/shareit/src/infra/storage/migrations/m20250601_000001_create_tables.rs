use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(ColumnDef::new(Users::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(512)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItemRequests::Table)
                    .if_not_exists()
                    .col(pk(ItemRequests::Id))
                    .col(ColumnDef::new(ItemRequests::Description).text().not_null())
                    .col(
                        ColumnDef::new(ItemRequests::RequestorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItemRequests::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_requests_requestor")
                            .from(ItemRequests::Table, ItemRequests::RequestorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(pk(Items::Id))
                    .col(ColumnDef::new(Items::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Items::Description).text().not_null())
                    .col(ColumnDef::new(Items::Available).boolean().not_null())
                    .col(ColumnDef::new(Items::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Items::RequestId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_owner")
                            .from(Items::Table, Items::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_request")
                            .from(Items::Table, Items::RequestId)
                            .to(ItemRequests::Table, ItemRequests::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(pk(Bookings::Id))
                    .col(
                        ColumnDef::new(Bookings::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::ItemId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::BookerId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::Status).string_len(16).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_item")
                            .from(Bookings::Table, Bookings::ItemId)
                            .to(Items::Table, Items::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_booker")
                            .from(Bookings::Table, Bookings::BookerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_item_id")
                    .table(Bookings::Table)
                    .col(Bookings::ItemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_booker_id")
                    .table(Bookings::Table)
                    .col(Bookings::BookerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(pk(Comments::Id))
                    .col(ColumnDef::new(Comments::Text).text().not_null())
                    .col(ColumnDef::new(Comments::ItemId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::AuthorId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Comments::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_item")
                            .from(Comments::Table, Comments::ItemId)
                            .to(Items::Table, Items::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_author")
                            .from(Comments::Table, Comments::AuthorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItemRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

/// 64-bit auto-increment primary key.
fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
}

#[derive(DeriveIden)]
enum ItemRequests {
    Table,
    Id,
    Description,
    RequestorId,
    Created,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Name,
    Description,
    Available,
    OwnerId,
    RequestId,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    StartDate,
    EndDate,
    ItemId,
    BookerId,
    Status,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Text,
    ItemId,
    AuthorId,
    Created,
}
