use sea_orm::{entity::prelude::*, sea_query::{Expr, Query, SelectStatement}, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::restaurant_table;

/// Two live reservations on one table must start at least this far apart.
pub const SLOT_WINDOW_SECS: i64 = 3600;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub start_time: i64,
    pub restaurant_id: i32,
    pub table_id: i32,
    pub user_id: String,
    pub updated: i64,
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Table,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Table => Entity::belongs_to(restaurant_table::Entity)
                .from(Column::TableId)
                .to(restaurant_table::Column::Id)
                .into(),
        }
    }
}

impl Related<restaurant_table::Entity> for Entity {
    fn to() -> RelationDef { Relation::Table.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Exclusive bounds of the slot window: a reservation at `t` blocks `start_time`
/// iff `lo < t < hi`, i.e. `|t - start_time| < SLOT_WINDOW_SECS`.
pub fn window_bounds(start_time: i64) -> (i64, i64) {
    (start_time.saturating_sub(SLOT_WINDOW_SECS), start_time.saturating_add(SLOT_WINDOW_SECS))
}

/// A reservation starting at `start_time` is over once `start_time + SLOT_WINDOW_SECS <= now`.
pub fn is_expired(start_time: i64, now: i64) -> bool {
    start_time.saturating_add(SLOT_WINDOW_SECS) <= now
}

/// `SELECT table_id` of live reservations overlapping the slot window.
pub fn occupied_tables(restaurant_id: i32, start_time: i64) -> SelectStatement {
    let (lo, hi) = window_bounds(start_time);
    Query::select()
        .column(Column::TableId)
        .from(Entity)
        .and_where(Column::RestaurantId.eq(restaurant_id))
        .and_where(Column::Deleted.eq(false))
        .and_where(Column::StartTime.gt(lo))
        .and_where(Column::StartTime.lt(hi))
        .to_owned()
}

/// Latest start time whose slot window still fits in `i64`.
pub const MAX_START_TIME: i64 = i64::MAX - SLOT_WINDOW_SECS;

/// Start times are epoch seconds in `0..=MAX_START_TIME`, where the window bounds never saturate.
pub fn validate_start_time(start_time: i64) -> Result<(), errors::ModelError> {
    if !(0..=MAX_START_TIME).contains(&start_time) {
        return Err(errors::ModelError::Validation(format!("start_time must be within 0..={MAX_START_TIME}")));
    }
    Ok(())
}

pub fn validate_user_id(user_id: &str) -> Result<(), errors::ModelError> {
    if user_id.trim().is_empty() { return Err(errors::ModelError::Validation("user_id required".into())); }
    if user_id.len() > 128 { return Err(errors::ModelError::Validation("user_id longer than 128 bytes".into())); }
    Ok(())
}

/// Insert a live reservation; the returned model carries the id assigned by the database.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    restaurant_id: i32,
    table_id: i32,
    start_time: i64,
    user_id: &str,
    now: i64,
) -> Result<Model, errors::ModelError> {
    validate_start_time(start_time)?;
    validate_user_id(user_id)?;
    let am = ActiveModel {
        start_time: Set(start_time),
        restaurant_id: Set(restaurant_id),
        table_id: Set(table_id),
        user_id: Set(user_id.to_string()),
        updated: Set(now),
        deleted: Set(false),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Soft-delete every live reservation that ended at or before `now`, in one statement.
pub async fn expire_before<C: ConnectionTrait>(db: &C, now: i64) -> Result<u64, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Deleted, Expr::value(true))
        .col_expr(Column::Updated, Expr::value(now))
        .filter(Column::Deleted.eq(false))
        .filter(Column::StartTime.lte(now.saturating_sub(SLOT_WINDOW_SECS)))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}
