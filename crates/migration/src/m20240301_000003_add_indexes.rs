use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // RestaurantTables: index on restaurant_id
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_tables_restaurant")
                    .table(RestaurantTables::Table)
                    .col(RestaurantTables::RestaurantId)
                    .to_owned(),
            )
            .await?;

        // Reservations: availability lookups filter on (restaurant_id, table_id) and a start_time range
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_slot")
                    .table(Reservations::Table)
                    .col(Reservations::RestaurantId)
                    .col(Reservations::TableId)
                    .col(Reservations::StartTime)
                    .to_owned(),
            )
            .await?;

        // Reservations: expiry sweep scans live rows by start_time
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_expiry")
                    .table(Reservations::Table)
                    .col(Reservations::Deleted)
                    .col(Reservations::StartTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_restaurant_tables_restaurant").table(RestaurantTables::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reservations_slot").table(Reservations::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reservations_expiry").table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RestaurantTables { Table, RestaurantId }

#[derive(DeriveIden)]
enum Reservations { Table, RestaurantId, TableId, StartTime, Deleted }
