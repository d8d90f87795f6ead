//! Postgres-backed store adapters over the `models` entities.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, IsolationLevel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, warn};
use uuid::Uuid;

use models::booking::Owner;
use models::errors::ModelError;
use models::{booking, catalog, client, daily_schedule, provider, provider_catalog, schedule_interval};

use crate::domain::{Booking, BookingStatus, Catalog, Client, DailySchedule, Interval, Provider};
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::repository::{BookingStore, CatalogStore, ClientStore, ProviderStore};

const SERIALIZATION_FAILURE: &str = "40001";

fn db_err(context: &'static str) -> impl FnOnce(DbErr) -> ServiceError {
    move |e| ServiceError::infra(context, e)
}

fn model_db_err(e: ModelError) -> DbErr {
    match e {
        ModelError::Db(e) => e,
        ModelError::Validation(msg) => DbErr::Custom(msg),
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn is_serialization_failure(e: &DbErr) -> bool {
    let runtime = match e {
        DbErr::Conn(r) | DbErr::Exec(r) | DbErr::Query(r) => r,
        _ => return false,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx_err) => sqlx_err
            .as_database_error()
            .and_then(|d| d.code())
            .is_some_and(|code| code == SERIALIZATION_FAILURE),
        _ => false,
    }
}

fn schedule_from_rows(row: daily_schedule::Model, intervals: Vec<schedule_interval::Model>) -> DailySchedule {
    let mut intervals: Vec<Interval> = intervals
        .into_iter()
        .map(|i| Interval { id: i.id, start: i.start_time, end: i.end_time })
        .collect();
    intervals.sort_by_key(|i| (i.start, i.end));
    DailySchedule { id: row.id, date: row.date, intervals }
}

fn booking_from_row(row: booking::Model) -> Result<Booking, ServiceError> {
    let status: BookingStatus = row.status.parse().map_err(|e: String| ServiceError::infra("booking status", e))?;
    Ok(Booking {
        id: row.id,
        client_id: row.client_id,
        provider_id: row.provider_id,
        catalog_id: row.catalog_id,
        start: row.start_at.with_timezone(&Utc),
        end: row.end_at.with_timezone(&Utc),
        status,
        notes: row.notes,
        created_at: row.created_at.with_timezone(&Utc),
    })
}

fn catalog_from_row(row: catalog::Model) -> Result<Catalog, ServiceError> {
    let minutes = u32::try_from(row.standard_duration_minutes)
        .map_err(|e| ServiceError::infra("catalog duration", e))?;
    Ok(Catalog {
        id: row.id,
        name: row.name,
        standard_duration_minutes: minutes,
        price: row.price,
        category: row.category,
        image_url: row.image_url,
    })
}

fn client_from_row(row: client::Model) -> Client {
    Client { id: row.id, name: row.name, email: row.email, phone: row.phone }
}

pub struct SeaOrmProviderStore {
    pub db: DatabaseConnection,
}

impl SeaOrmProviderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Row lock on the provider for the rest of the transaction, so an
    /// activation change cannot interleave with a schedule append.
    async fn lock_row(&self, txn: &DatabaseTransaction, id: Uuid) -> Result<Option<provider::Model>, ServiceError> {
        provider::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(db_err("lock provider"))
    }

    async fn insert_row(&self, txn: &DatabaseTransaction, p: &Provider) -> Result<(), ServiceError> {
        let now = Utc::now().fixed_offset();
        provider::ActiveModel {
            id: Set(p.id),
            name: Set(p.name.clone()),
            tax_id: Set(p.tax_id.clone()),
            email: Set(p.email.clone()),
            phone: Set(p.phone.clone()),
            active: Set(p.active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map(|_| ())
        .map_err(|e| if is_unique_violation(&e) { ServiceError::DuplicateTaxId } else { ServiceError::infra("save provider", e) })
    }

    async fn link_catalogs(&self, txn: &DatabaseTransaction, p: &Provider) -> Result<(), ServiceError> {
        if p.catalogs.is_empty() {
            return Ok(());
        }
        let links = p.catalogs.iter().map(|catalog_id| provider_catalog::ActiveModel {
            provider_id: Set(p.id),
            catalog_id: Set(*catalog_id),
        });
        provider_catalog::Entity::insert_many(links)
            .exec_without_returning(txn)
            .await
            .map_err(db_err("link catalogs"))?;
        Ok(())
    }

    /// Insert schedules the database does not hold yet; stored ones are immutable.
    /// `active` is the provider's state as locked in this transaction.
    async fn append_schedules(&self, txn: &DatabaseTransaction, p: &Provider, active: bool) -> Result<(), ServiceError> {
        let stored: HashMap<NaiveDate, Uuid> = daily_schedule::Entity::find()
            .filter(daily_schedule::Column::ProviderId.eq(p.id))
            .all(txn)
            .await
            .map_err(db_err("load schedules"))?
            .into_iter()
            .map(|s| (s.date, s.id))
            .collect();

        for (date, schedule) in &p.schedules {
            match stored.get(date) {
                Some(id) if *id == schedule.id => continue,
                Some(_) => return Err(ServiceError::DuplicateSchedule(*date)),
                None if !active => return Err(ServiceError::ProviderInactive(p.id)),
                None => {}
            }
            daily_schedule::ActiveModel {
                id: Set(schedule.id),
                provider_id: Set(p.id),
                date: Set(*date),
                created_at: Set(Utc::now().fixed_offset()),
            }
            .insert(txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ServiceError::DuplicateSchedule(*date)
                } else {
                    ServiceError::infra("insert schedule", e)
                }
            })?;

            let rows = schedule.intervals.iter().map(|i| schedule_interval::ActiveModel {
                id: Set(i.id),
                schedule_id: Set(schedule.id),
                start_time: Set(i.start),
                end_time: Set(i.end),
            });
            schedule_interval::Entity::insert_many(rows)
                .exec_without_returning(txn)
                .await
                .map_err(db_err("insert intervals"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ProviderStore for SeaOrmProviderStore {
    async fn save(&self, p: &Provider) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(db_err("begin provider save"))?;
        let active = match self.lock_row(&txn, p.id).await? {
            // stored scalars and catalog links win over the caller's copy
            Some(row) => row.active,
            None => {
                self.insert_row(&txn, p).await?;
                self.link_catalogs(&txn, p).await?;
                p.active
            }
        };
        self.append_schedules(&txn, p, active).await?;
        txn.commit().await.map_err(db_err("commit provider save"))?;
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), ServiceError> {
        let res = provider::Entity::update_many()
            .col_expr(provider::Column::Active, Expr::value(active))
            .col_expr(provider::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(provider::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err("update provider activation"))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::ProviderNotFound(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Provider>, ServiceError> {
        let Some(row) = provider::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("load provider"))?
        else {
            return Ok(None);
        };
        let catalogs: BTreeSet<Uuid> = provider_catalog::catalog_ids(&self.db, id)
            .await?
            .into_iter()
            .collect();
        let schedules: BTreeMap<NaiveDate, DailySchedule> = daily_schedule::with_intervals(&self.db, id)
            .await?
            .into_iter()
            .map(|(s, intervals)| (s.date, schedule_from_rows(s, intervals)))
            .collect();
        Ok(Some(Provider {
            id: row.id,
            name: row.name,
            tax_id: row.tax_id,
            email: row.email,
            phone: row.phone,
            active: row.active,
            catalogs,
            schedules,
        }))
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Provider>, ServiceError> {
        match provider::find_by_tax_id(&self.db, tax_id).await? {
            Some(row) => self.find_by_id(row.id).await,
            None => Ok(None),
        }
    }

    async fn find_schedule_for_date(&self, provider_id: Uuid, date: NaiveDate) -> Result<Option<DailySchedule>, ServiceError> {
        let found = daily_schedule::for_date(&self.db, provider_id, date).await?;
        Ok(found.map(|(s, intervals)| schedule_from_rows(s, intervals)))
    }
}

pub struct SeaOrmBookingStore {
    pub db: DatabaseConnection,
    /// Attempts for one `create` before a serialization failure is surfaced.
    pub serialization_retries: u32,
}

impl SeaOrmBookingStore {
    pub fn new(db: DatabaseConnection, store: &configs::StoreConfig) -> Self {
        Self { db, serialization_retries: store.serialization_retries.max(1) }
    }

    /// One serializable attempt. The outer error is a database failure
    /// (possibly retryable); the inner one is a domain rejection.
    async fn try_create(&self, b: &Booking) -> Result<Result<(), ServiceError>, DbErr> {
        let txn = self.db.begin_with_config(Some(IsolationLevel::Serializable), None).await?;
        let (start, end) = (b.start.fixed_offset(), b.end.fixed_offset());

        let provider_clash = booking::find_overlapping(&txn, Owner::Provider(b.provider_id), start, end)
            .await
            .map_err(model_db_err)?;
        if !provider_clash.is_empty() {
            return Ok(Err(ServiceError::ProviderBusy));
        }
        let client_clash = booking::find_overlapping(&txn, Owner::Client(b.client_id), start, end)
            .await
            .map_err(model_db_err)?;
        if !client_clash.is_empty() {
            return Ok(Err(ServiceError::ClientBusy));
        }

        let created_at = b.created_at.fixed_offset();
        booking::ActiveModel {
            id: Set(b.id),
            client_id: Set(b.client_id),
            provider_id: Set(b.provider_id),
            catalog_id: Set(b.catalog_id),
            start_at: Set(start),
            end_at: Set(end),
            status: Set(b.status.as_str().to_string()),
            notes: Set(b.notes.clone()),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(Ok(()))
    }

    async fn overlapping(&self, owner: Owner, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, ServiceError> {
        let rows = booking::find_overlapping(&self.db, owner, start.fixed_offset(), end.fixed_offset()).await?;
        let mut found = rows.into_iter().map(booking_from_row).collect::<Result<Vec<_>, _>>()?;
        found.sort_by_key(|b| (b.start, b.id));
        Ok(found)
    }
}

#[async_trait]
impl BookingStore for SeaOrmBookingStore {
    async fn create(&self, b: &Booking) -> Result<(), ServiceError> {
        let mut attempt = 1;
        loop {
            match self.try_create(b).await {
                Ok(outcome) => return outcome,
                Err(e) if is_serialization_failure(&e) && attempt < self.serialization_retries => {
                    debug!(booking_id = %b.id, attempt, "booking_insert_retry");
                    attempt += 1;
                }
                Err(e) => {
                    if is_serialization_failure(&e) {
                        warn!(booking_id = %b.id, attempts = attempt, "booking_insert_retries_exhausted");
                    }
                    return Err(ServiceError::infra("insert booking", e));
                }
            }
        }
    }

    async fn find_overlapping_for_provider(&self, provider_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, ServiceError> {
        self.overlapping(Owner::Provider(provider_id), start, end).await
    }

    async fn find_overlapping_for_client(&self, client_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, ServiceError> {
        self.overlapping(Owner::Client(client_id), start, end).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, ServiceError> {
        booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("load booking"))?
            .map(booking_from_row)
            .transpose()
    }

    async fn update_status(&self, id: Uuid, from: BookingStatus, to: BookingStatus) -> Result<(), ServiceError> {
        let res = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(to.as_str()))
            .col_expr(booking::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err("update booking status"))?;
        if res.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                Some(current) => Err(ServiceError::InvalidTransition { from: current.status, to }),
                None => Err(ServiceError::BookingNotFound(id)),
            };
        }
        Ok(())
    }

    async fn list_for_provider(&self, provider_id: Uuid, page: Pagination) -> Result<Vec<Booking>, ServiceError> {
        let (page_idx, per_page) = page.normalize();
        let rows = booking::Entity::find()
            .filter(booking::Column::ProviderId.eq(provider_id))
            .order_by_asc(booking::Column::StartAt)
            .order_by_asc(booking::Column::Id)
            .paginate(&self.db, per_page)
            .fetch_page(page_idx)
            .await
            .map_err(db_err("list bookings"))?;
        rows.into_iter().map(booking_from_row).collect()
    }
}

pub struct SeaOrmClientStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ClientStore for SeaOrmClientStore {
    async fn save(&self, c: &Client) -> Result<(), ServiceError> {
        let row = client::ActiveModel {
            id: Set(c.id),
            name: Set(c.name.clone()),
            email: Set(c.email.clone()),
            phone: Set(c.phone.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        client::Entity::insert(row)
            .on_conflict(
                OnConflict::column(client::Column::Id)
                    .update_columns([client::Column::Name, client::Column::Email, client::Column::Phone])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("save client"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError> {
        let row = client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("load client"))?;
        Ok(row.map(client_from_row))
    }
}

pub struct SeaOrmCatalogStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CatalogStore for SeaOrmCatalogStore {
    async fn save(&self, c: &Catalog) -> Result<(), ServiceError> {
        let minutes = i32::try_from(c.standard_duration_minutes)
            .map_err(|_| ServiceError::InvalidCatalog("duration out of range".into()))?;
        let row = catalog::ActiveModel {
            id: Set(c.id),
            name: Set(c.name.clone()),
            standard_duration_minutes: Set(minutes),
            price: Set(c.price),
            category: Set(c.category.clone()),
            image_url: Set(c.image_url.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        catalog::Entity::insert(row)
            .on_conflict(
                OnConflict::column(catalog::Column::Id)
                    .update_columns([
                        catalog::Column::Name,
                        catalog::Column::StandardDurationMinutes,
                        catalog::Column::Price,
                        catalog::Column::Category,
                        catalog::Column::ImageUrl,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("save catalog"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Catalog>, ServiceError> {
        catalog::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("load catalog"))?
            .map(catalog_from_row)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCatalog, NewClient, NewProvider};
    use crate::test_support::{get_db, random_cpf};
    use chrono::{Duration, NaiveTime, TimeZone};
    use std::sync::Arc;

    struct Stores {
        providers: SeaOrmProviderStore,
        bookings: Arc<SeaOrmBookingStore>,
        clients: SeaOrmClientStore,
        catalogs: SeaOrmCatalogStore,
    }

    fn stores(db: DatabaseConnection) -> Stores {
        Stores {
            providers: SeaOrmProviderStore::new(db.clone()),
            bookings: Arc::new(SeaOrmBookingStore::new(db.clone(), &configs::StoreConfig::default())),
            clients: SeaOrmClientStore { db: db.clone() },
            catalogs: SeaOrmCatalogStore { db },
        }
    }

    async fn seed(s: &Stores) -> (Catalog, Client, Provider) {
        let catalog = Catalog::new(NewCatalog {
            name: "Haircut".into(),
            standard_duration_minutes: 60,
            price: 5000,
            category: "hair".into(),
            image_url: None,
        })
        .unwrap();
        s.catalogs.save(&catalog).await.unwrap();
        let client = Client::new(NewClient { name: "Ana".into(), email: None, phone: "11999990000".into() }).unwrap();
        s.clients.save(&client).await.unwrap();
        let provider = Provider::new(NewProvider {
            name: "Bia".into(),
            tax_id: random_cpf(),
            email: None,
            phone: "11988887777".into(),
            catalogs: vec![catalog.id],
        })
        .unwrap();
        s.providers.save(&provider).await.unwrap();
        (catalog, client, provider)
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn provider_round_trips_with_schedules() {
        let Some(db) = get_db().await else { return };
        let s = stores(db);
        let (catalog, _, mut provider) = seed(&s).await;
        let date = NaiveDate::from_ymd_opt(2030, 1, 3).unwrap();
        let schedule = DailySchedule::new(date, [(t(14), t(18)), (t(8), t(12))], date).unwrap();
        provider.add_schedule(schedule.clone()).unwrap();
        s.providers.save(&provider).await.unwrap();

        let loaded = s.providers.find_by_id(provider.id).await.unwrap().unwrap();
        assert!(loaded.offers(catalog.id));
        assert_eq!(loaded.schedule_for(date), Some(&schedule));
        let by_tax = s.providers.find_by_tax_id(&provider.tax_id).await.unwrap().unwrap();
        assert_eq!(by_tax.id, provider.id);
        assert_eq!(s.providers.find_schedule_for_date(provider.id, date).await.unwrap(), Some(schedule));
    }

    #[tokio::test]
    async fn second_schedule_for_same_date_is_duplicate() {
        let Some(db) = get_db().await else { return };
        let s = stores(db);
        let (_, _, provider) = seed(&s).await;
        let date = NaiveDate::from_ymd_opt(2030, 2, 1).unwrap();

        let mut first = provider.clone();
        first.add_schedule(DailySchedule::new(date, [(t(8), t(12))], date).unwrap()).unwrap();
        s.providers.save(&first).await.unwrap();

        let mut stale = provider.clone();
        stale.add_schedule(DailySchedule::new(date, [(t(13), t(17))], date).unwrap()).unwrap();
        let err = s.providers.save(&stale).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateSchedule(d) if d == date));
    }

    #[tokio::test]
    async fn duplicate_tax_id_is_reported() {
        let Some(db) = get_db().await else { return };
        let s = stores(db);
        let (catalog, _, provider) = seed(&s).await;
        let twin = Provider::new(NewProvider {
            name: "Twin".into(),
            tax_id: provider.tax_id.clone(),
            email: None,
            phone: "1".into(),
            catalogs: vec![catalog.id],
        })
        .unwrap();
        assert!(matches!(s.providers.save(&twin).await, Err(ServiceError::DuplicateTaxId)));
    }

    #[tokio::test]
    async fn booking_lifecycle_in_postgres() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let s = stores(db);
        let (catalog, client, provider) = seed(&s).await;
        let start = Utc.with_ymd_and_hms(2030, 1, 3, 10, 0, 0).unwrap();
        let b = Booking::new(client.id, provider.id, catalog.id, start, catalog.duration(), Some("first visit".into()))?;
        s.bookings.create(&b).await?;

        let clash = Booking::new(client.id, provider.id, catalog.id, start + Duration::minutes(30), catalog.duration(), None)?;
        assert!(matches!(s.bookings.create(&clash).await, Err(ServiceError::ProviderBusy)));

        let found = s.bookings.find_overlapping_for_client(client.id, start, start + Duration::minutes(1)).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].notes.as_deref(), Some("first visit"));

        s.bookings.update_status(b.id, BookingStatus::Pending, BookingStatus::Cancelled).await?;
        assert_eq!(s.bookings.find_by_id(b.id).await.unwrap().unwrap().status, BookingStatus::Cancelled);
        s.bookings.create(&clash).await?;

        let listed = s.bookings.list_for_provider(provider.id, Pagination::default()).await?;
        assert_eq!(listed.iter().map(|b| b.id).collect::<Vec<_>>(), vec![b.id, clash.id]);
        assert!(matches!(
            s.bookings.update_status(Uuid::now_v7(), BookingStatus::Pending, BookingStatus::Confirmed).await,
            Err(ServiceError::BookingNotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn stale_status_write_is_refused() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let s = stores(db);
        let (catalog, client, provider) = seed(&s).await;
        let start = Utc.with_ymd_and_hms(2030, 1, 4, 9, 0, 0).unwrap();
        let first = Booking::new(client.id, provider.id, catalog.id, start, catalog.duration(), None)?;
        s.bookings.create(&first).await?;
        s.bookings.update_status(first.id, BookingStatus::Pending, BookingStatus::Cancelled).await?;
        let other = Client::new(NewClient { name: "Caio".into(), email: None, phone: "11977776666".into() })?;
        s.clients.save(&other).await?;
        let second = Booking::new(other.id, provider.id, catalog.id, start, catalog.duration(), None)?;
        s.bookings.create(&second).await?;

        let err = s.bookings.update_status(first.id, BookingStatus::Pending, BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidTransition { from: BookingStatus::Cancelled, to: BookingStatus::Confirmed }
        ));
        let held = s.bookings.find_overlapping_for_provider(provider.id, start, start + Duration::hours(1)).await?;
        assert_eq!(held.iter().map(|b| b.id).collect::<Vec<_>>(), vec![second.id]);
        Ok(())
    }

    #[tokio::test]
    async fn schedule_save_keeps_stored_activation() {
        let Some(db) = get_db().await else { return };
        let s = stores(db);
        let (_, _, provider) = seed(&s).await;
        let date = NaiveDate::from_ymd_opt(2030, 4, 2).unwrap();

        let mut stale = s.providers.find_by_id(provider.id).await.unwrap().unwrap();
        s.providers.set_active(provider.id, false).await.unwrap();
        stale.add_schedule(DailySchedule::new(date, [(t(8), t(12))], date).unwrap()).unwrap();
        assert!(matches!(s.providers.save(&stale).await, Err(ServiceError::ProviderInactive(id)) if id == provider.id));

        let loaded = s.providers.find_by_id(provider.id).await.unwrap().unwrap();
        assert!(!loaded.active);
        assert!(loaded.schedule_for(date).is_none());

        s.providers.set_active(provider.id, true).await.unwrap();
        s.providers.save(&stale).await.unwrap();
        assert!(s.providers.find_schedule_for_date(provider.id, date).await.unwrap().is_some());
        assert!(matches!(s.providers.set_active(Uuid::now_v7(), true).await, Err(ServiceError::ProviderNotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_inserts_leave_one_winner() {
        let Some(db) = get_db().await else { return };
        let s = stores(db);
        let (catalog, client, provider) = seed(&s).await;
        let rival = Client::new(NewClient { name: "Caio".into(), email: None, phone: "11977776666".into() }).unwrap();
        s.clients.save(&rival).await.unwrap();
        let start = Utc.with_ymd_and_hms(2030, 3, 5, 9, 0, 0).unwrap();

        let gate = Arc::new(tokio::sync::Barrier::new(2));
        let mut handles = Vec::new();
        for (client_id, offset) in [(client.id, 0), (rival.id, 30)] {
            let store = Arc::clone(&s.bookings);
            let gate = Arc::clone(&gate);
            let b = Booking::new(client_id, provider.id, catalog.id, start + Duration::minutes(offset), catalog.duration(), None).unwrap();
            handles.push(tokio::spawn(async move {
                gate.wait().await;
                store.create(&b).await
            }));
        }
        let mut outcomes = Vec::new();
        for h in handles {
            outcomes.push(h.await.unwrap());
        }
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        // the retry re-runs the overlap check, so the loser sees a typed conflict
        let loser = outcomes.into_iter().find_map(Result::err).unwrap();
        assert!(matches!(loser, ServiceError::ProviderBusy), "unexpected error: {loser}");
        let held = s.bookings.find_overlapping_for_provider(provider.id, start, start + Duration::hours(2)).await.unwrap();
        assert_eq!(held.len(), 1);
    }
}
