use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;
use anyhow::Result;

use super::{insert_catalog, insert_client, insert_provider, setup_test_db};
use crate::booking::{self, Owner};
use crate::{daily_schedule, provider, provider_catalog, schedule_interval};

fn t(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

/// Provider with catalog link and a schedule loads back with its intervals in order
#[tokio::test]
async fn test_provider_schedule_round_trip() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let cat = insert_catalog(&db).await?;
    let p = insert_provider(&db, cat.id).await?;
    assert_eq!(provider_catalog::catalog_ids(&db, p.id).await?, vec![cat.id]);

    let date = NaiveDate::from_ymd_opt(2030, 1, 3).unwrap();
    let s = daily_schedule::ActiveModel {
        id: Set(Uuid::now_v7()),
        provider_id: Set(p.id),
        date: Set(date),
        created_at: Set(Utc::now().into()),
    }
    .insert(&db)
    .await?;
    for (start, end) in [(14, 18), (8, 12)] {
        schedule_interval::ActiveModel {
            id: Set(Uuid::now_v7()),
            schedule_id: Set(s.id),
            start_time: Set(t(start)),
            end_time: Set(t(end)),
        }
        .insert(&db)
        .await?;
    }

    let (found, intervals) = daily_schedule::for_date(&db, p.id, date).await?.expect("schedule");
    assert_eq!(found.id, s.id);
    assert_eq!(intervals.iter().map(|i| i.start_time).collect::<Vec<_>>(), vec![t(8), t(14)]);
    assert!(daily_schedule::for_date(&db, p.id, date.succ_opt().unwrap()).await?.is_none());

    let by_tax = provider::find_by_tax_id(&db, &p.tax_id).await?.expect("by tax id");
    assert_eq!(by_tax.id, p.id);

    // cascade removes schedules and intervals
    provider::Entity::delete_by_id(p.id).exec(&db).await?;
    assert!(daily_schedule::Entity::find_by_id(s.id).one(&db).await?.is_none());
    Ok(())
}

/// Overlap query skips cancelled rows and treats windows as half-open
#[tokio::test]
async fn test_booking_overlap_query() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let cat = insert_catalog(&db).await?;
    let p = insert_provider(&db, cat.id).await?;
    let c = insert_client(&db).await?;
    let at = |h: u32| Utc.with_ymd_and_hms(2030, 1, 3, h, 0, 0).unwrap().fixed_offset();

    let mut ids = vec![];
    for (h, status) in [(10, "pending"), (12, "cancelled")] {
        let now = Utc::now().into();
        let b = booking::ActiveModel {
            id: Set(Uuid::now_v7()),
            client_id: Set(c.id),
            provider_id: Set(p.id),
            catalog_id: Set(cat.id),
            start_at: Set(at(h)),
            end_at: Set(at(h + 1)),
            status: Set(status.into()),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await?;
        ids.push(b.id);
    }

    let hits = booking::find_overlapping(&db, Owner::Provider(p.id), at(10), at(13)).await?;
    assert_eq!(hits.iter().map(|b| b.id).collect::<Vec<_>>(), vec![ids[0]]);
    let touching = booking::find_overlapping(&db, Owner::Client(c.id), at(11), at(12)).await?;
    assert!(touching.is_empty());

    // bookings cascade with the provider
    provider::Entity::delete_by_id(p.id).exec(&db).await?;
    assert!(booking::Entity::find_by_id(ids[0]).one(&db).await?.is_none());
    Ok(())
}
