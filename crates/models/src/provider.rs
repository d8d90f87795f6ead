use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: String,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ProviderCatalog, DailySchedule }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ProviderCatalog => Entity::has_many(crate::provider_catalog::Entity).into(),
            Relation::DailySchedule => Entity::has_many(crate::daily_schedule::Entity).into(),
        }
    }
}

impl Related<crate::daily_schedule::Entity> for Entity {
    fn to() -> RelationDef { Relation::DailySchedule.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_tax_id<C: ConnectionTrait>(db: &C, tax_id: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::TaxId.eq(tax_id))
        .one(db)
        .await
        .map_err(ModelError::from)
}
