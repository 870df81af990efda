use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::reservation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant_tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub restaurant_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Reservations,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Reservations => Entity::has_many(reservation::Entity).into() }
    }
}

impl Related<reservation::Entity> for Entity {
    fn to() -> RelationDef { Relation::Reservations.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Tables of `restaurant_id` with no live reservation inside the slot window
/// around `start_time`. Counting and picking a table both go through here.
pub fn available_at(restaurant_id: i32, start_time: i64) -> Select<Entity> {
    Entity::find()
        .filter(Column::RestaurantId.eq(restaurant_id))
        .filter(Column::Id.not_in_subquery(reservation::occupied_tables(restaurant_id, start_time)))
}

pub async fn count_available<C: ConnectionTrait>(db: &C, restaurant_id: i32, start_time: i64) -> Result<u64, errors::ModelError> {
    Ok(available_at(restaurant_id, start_time).count(db).await?)
}

/// Lowest-id free table, if any.
pub async fn first_available<C: ConnectionTrait>(db: &C, restaurant_id: i32, start_time: i64) -> Result<Option<Model>, errors::ModelError> {
    Ok(available_at(restaurant_id, start_time)
        .order_by_asc(Column::Id)
        .one(db)
        .await?)
}

/// Insert `count` tables for a restaurant. Callers wanting all-or-nothing pass a transaction.
pub async fn create_for_restaurant<C: ConnectionTrait>(db: &C, restaurant_id: i32, count: u32) -> Result<Vec<Model>, errors::ModelError> {
    if restaurant_id <= 0 { return Err(errors::ModelError::Validation("restaurant_id must be positive".into())); }
    if count == 0 { return Err(errors::ModelError::Validation("table count must be at least 1".into())); }
    let mut created = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let am = ActiveModel { restaurant_id: Set(restaurant_id), ..Default::default() };
        created.push(am.insert(db).await?);
    }
    Ok(created)
}

pub async fn list_for_restaurant<C: ConnectionTrait>(db: &C, restaurant_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}
