//! Create `reservations` with FK to `restaurant_tables`.
//!
//! Rows are soft-deleted by the expiry sweep (`deleted = true`) and never
//! physically removed. `start_time` and `updated` are Unix epoch seconds.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(pk_auto(Reservations::Id))
                    .col(big_integer(Reservations::StartTime).not_null())
                    .col(integer(Reservations::RestaurantId).not_null())
                    .col(integer(Reservations::TableId).not_null())
                    .col(string_len(Reservations::UserId, 128).not_null())
                    .col(big_integer(Reservations::Updated).not_null())
                    .col(boolean(Reservations::Deleted).not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_table")
                            .from(Reservations::Table, Reservations::TableId)
                            .to(RestaurantTables::Table, RestaurantTables::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reservations::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reservations { Table, Id, StartTime, RestaurantId, TableId, UserId, Updated, Deleted }

#[derive(DeriveIden)]
enum RestaurantTables { Table, Id }
