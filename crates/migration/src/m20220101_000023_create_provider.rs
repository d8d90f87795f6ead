//! Create `provider` and the `provider_catalog` link table.
//!
//! `tax_id` is unique so concurrent registrations with the same CPF cannot
//! both commit.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Provider::Table)
                    .if_not_exists()
                    .col(uuid(Provider::Id).primary_key())
                    .col(string_len(Provider::Name, 128).not_null())
                    .col(string_len(Provider::TaxId, 11).unique_key().not_null())
                    .col(ColumnDef::new(Provider::Email).string_len(255).null())
                    .col(string_len(Provider::Phone, 32).not_null())
                    .col(boolean(Provider::Active).not_null())
                    .col(timestamp_with_time_zone(Provider::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Provider::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProviderCatalog::Table)
                    .if_not_exists()
                    .col(uuid(ProviderCatalog::ProviderId).not_null())
                    .col(uuid(ProviderCatalog::CatalogId).not_null())
                    .primary_key(
                        Index::create()
                            .col(ProviderCatalog::ProviderId)
                            .col(ProviderCatalog::CatalogId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_catalog_provider")
                            .from(ProviderCatalog::Table, ProviderCatalog::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_catalog_catalog")
                            .from(ProviderCatalog::Table, ProviderCatalog::CatalogId)
                            .to(Catalog::Table, Catalog::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProviderCatalog::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Provider::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Provider { Table, Id, Name, TaxId, Email, Phone, Active, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum ProviderCatalog { Table, ProviderId, CatalogId }

#[derive(DeriveIden)]
enum Catalog { Table, Id }
