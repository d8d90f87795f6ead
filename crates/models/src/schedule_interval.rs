use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::daily_schedule;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule_interval")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub start_time: Time,
    pub end_time: Time,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { DailySchedule }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::DailySchedule => Entity::belongs_to(daily_schedule::Entity)
                .from(Column::ScheduleId)
                .to(daily_schedule::Column::Id)
                .into(),
        }
    }
}

impl Related<daily_schedule::Entity> for Entity {
    fn to() -> RelationDef { Relation::DailySchedule.def() }
}

impl ActiveModelBehavior for ActiveModel {}
