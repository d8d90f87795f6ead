use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use chrono::Utc;
use uuid::Uuid;

use crate::{catalog, client, db, provider, provider_catalog};


/// CRUD and relation tests for the booking schema
pub mod crud_tests;


/// Connect and migrate, or `None` when the database is unavailable.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

/// Eleven digits unlikely to collide across test runs; the table does not check CPF digits.
pub(crate) fn unique_tax_id() -> String {
    Uuid::new_v4().as_u128().to_string().chars().take(11).collect()
}

pub(crate) async fn insert_catalog(db: &DatabaseConnection) -> anyhow::Result<catalog::Model> {
    let am = catalog::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set("Haircut".into()),
        standard_duration_minutes: Set(60),
        price: Set(5000),
        category: Set("hair".into()),
        image_url: Set(None),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub(crate) async fn insert_client(db: &DatabaseConnection) -> anyhow::Result<client::Model> {
    let am = client::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set("Ana".into()),
        email: Set(Some("ana@example.com".into())),
        phone: Set("11999990000".into()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub(crate) async fn insert_provider(db: &DatabaseConnection, catalog_id: Uuid) -> anyhow::Result<provider::Model> {
    let now = Utc::now();
    let am = provider::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set("Bia".into()),
        tax_id: Set(unique_tax_id()),
        email: Set(None),
        phone: Set("11988887777".into()),
        active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let p = am.insert(db).await?;
    provider_catalog::ActiveModel { provider_id: Set(p.id), catalog_id: Set(catalog_id) }
        .insert(db)
        .await?;
    Ok(p)
}
