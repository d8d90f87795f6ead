use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{provider, schedule_interval};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Provider, ScheduleInterval }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity).from(Column::ProviderId).to(provider::Column::Id).into(),
            Relation::ScheduleInterval => Entity::has_many(schedule_interval::Entity).into(),
        }
    }
}

impl Related<provider::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl Related<schedule_interval::Entity> for Entity {
    fn to() -> RelationDef { Relation::ScheduleInterval.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// All schedules of a provider with their intervals, ordered by date and start time.
pub async fn with_intervals<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
) -> Result<Vec<(Model, Vec<schedule_interval::Model>)>, ModelError> {
    let rows = Entity::find()
        .filter(Column::ProviderId.eq(provider_id))
        .order_by_asc(Column::Date)
        .find_with_related(schedule_interval::Entity)
        .order_by_asc(schedule_interval::Column::StartTime)
        .all(db)
        .await?;
    Ok(rows)
}

/// One provider's schedule on `date`, with its intervals.
pub async fn for_date<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
    date: Date,
) -> Result<Option<(Model, Vec<schedule_interval::Model>)>, ModelError> {
    let Some(schedule) = Entity::find()
        .filter(Column::ProviderId.eq(provider_id))
        .filter(Column::Date.eq(date))
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    let intervals = schedule_interval::Entity::find()
        .filter(schedule_interval::Column::ScheduleId.eq(schedule.id))
        .order_by_asc(schedule_interval::Column::StartTime)
        .all(db)
        .await?;
    Ok(Some((schedule, intervals)))
}
