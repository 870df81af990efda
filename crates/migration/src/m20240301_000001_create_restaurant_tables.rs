//! Create `restaurant_tables`.
//!
//! One row per physical seating unit; rows are inserted in bulk when a
//! restaurant is provisioned and never updated afterwards.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RestaurantTables::Table)
                    .if_not_exists()
                    .col(pk_auto(RestaurantTables::Id))
                    .col(integer(RestaurantTables::RestaurantId).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RestaurantTables::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RestaurantTables { Table, Id, RestaurantId }
