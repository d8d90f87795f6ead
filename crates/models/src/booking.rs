use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{catalog, client, provider};

/// Stored status text of a cancelled booking; cancelled rows never block a slot.
pub const STATUS_CANCELLED: &str = "cancelled";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub catalog_id: Uuid,
    pub start_at: DateTimeWithTimeZone,
    pub end_at: DateTimeWithTimeZone,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Client, Provider, Catalog }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(client::Entity).from(Column::ClientId).to(client::Column::Id).into(),
            Relation::Provider => Entity::belongs_to(provider::Entity).from(Column::ProviderId).to(provider::Column::Id).into(),
            Relation::Catalog => Entity::belongs_to(catalog::Entity).from(Column::CatalogId).to(catalog::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Which side of the booking an overlap lookup is scoped to.
#[derive(Clone, Copy, Debug)]
pub enum Owner {
    Provider(Uuid),
    Client(Uuid),
}

/// Non-cancelled bookings of `owner` intersecting `[start, end)`.
pub async fn find_overlapping<C: ConnectionTrait>(
    db: &C,
    owner: Owner,
    start: DateTimeWithTimeZone,
    end: DateTimeWithTimeZone,
) -> Result<Vec<Model>, ModelError> {
    let scoped = match owner {
        Owner::Provider(id) => Entity::find().filter(Column::ProviderId.eq(id)),
        Owner::Client(id) => Entity::find().filter(Column::ClientId.eq(id)),
    };
    let rows = scoped
        .filter(Column::Status.ne(STATUS_CANCELLED))
        .filter(Column::StartAt.lt(end))
        .filter(Column::EndAt.gt(start))
        .order_by_asc(Column::StartAt)
        .all(db)
        .await?;
    Ok(rows)
}
