use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{catalog, provider};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_catalog")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub provider_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub catalog_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Provider, Catalog }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity).from(Column::ProviderId).to(provider::Column::Id).into(),
            Relation::Catalog => Entity::belongs_to(catalog::Entity).from(Column::CatalogId).to(catalog::Column::Id).into(),
        }
    }
}

impl Related<provider::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Catalog ids linked to a provider.
pub async fn catalog_ids<C: ConnectionTrait>(db: &C, provider_id: Uuid) -> Result<Vec<Uuid>, ModelError> {
    let rows = Entity::find()
        .filter(Column::ProviderId.eq(provider_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.catalog_id).collect())
}
