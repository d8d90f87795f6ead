use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::tax_id::normalize_cpf;
use crate::domain::{Catalog, Client, NewCatalog, NewClient, NewProvider, Provider};
use crate::errors::ServiceError;
use crate::repository::{CatalogStore, ClientStore, ProviderStore};

/// Registration of the reference entities bookings point at.
pub struct RegistryService<P, C, K> {
    providers: Arc<P>,
    clients: Arc<C>,
    catalogs: Arc<K>,
}

impl<P, C, K> RegistryService<P, C, K>
where
    P: ProviderStore,
    C: ClientStore,
    K: CatalogStore,
{
    pub fn new(providers: Arc<P>, clients: Arc<C>, catalogs: Arc<K>) -> Self {
        Self { providers, clients, catalogs }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn register_catalog(&self, input: NewCatalog) -> Result<Catalog, ServiceError> {
        let catalog = Catalog::new(input)?;
        self.catalogs.save(&catalog).await?;
        info!(catalog_id = %catalog.id, minutes = catalog.standard_duration_minutes, "catalog_registered");
        Ok(catalog)
    }

    #[instrument(skip(self, input))]
    pub async fn register_client(&self, input: NewClient) -> Result<Client, ServiceError> {
        let client = Client::new(input)?;
        self.clients.save(&client).await?;
        info!(client_id = %client.id, "client_registered");
        Ok(client)
    }

    /// Register an active provider offering the given catalogs.
    ///
    /// Every catalog must exist and the CPF must not belong to another
    /// provider; the store enforces the latter again at write time.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn register_provider(&self, input: NewProvider) -> Result<Provider, ServiceError> {
        let tax_id = normalize_cpf(&input.tax_id)?;
        for catalog_id in &input.catalogs {
            if self.catalogs.find_by_id(*catalog_id).await?.is_none() {
                return Err(ServiceError::CatalogNotFound(*catalog_id));
            }
        }
        if self.providers.find_by_tax_id(&tax_id).await?.is_some() {
            debug!("tax id already registered");
            return Err(ServiceError::DuplicateTaxId);
        }
        let provider = Provider::new(input)?;
        self.providers.save(&provider).await?;
        info!(provider_id = %provider.id, catalogs = provider.catalogs.len(), "provider_registered");
        Ok(provider)
    }

    /// Toggle whether the provider accepts new schedules and bookings.
    /// Existing bookings are left untouched.
    #[instrument(skip(self))]
    pub async fn set_active(&self, provider_id: Uuid, active: bool) -> Result<Provider, ServiceError> {
        self.providers.set_active(provider_id, active).await?;
        info!(%provider_id, active, "provider_activation_changed");
        self.get_provider(provider_id).await
    }

    pub async fn get_provider(&self, id: Uuid) -> Result<Provider, ServiceError> {
        self.providers.find_by_id(id).await?.ok_or(ServiceError::ProviderNotFound(id))
    }

    pub async fn get_client(&self, id: Uuid) -> Result<Client, ServiceError> {
        self.clients.find_by_id(id).await?.ok_or(ServiceError::ClientNotFound(id))
    }

    pub async fn get_catalog(&self, id: Uuid) -> Result<Catalog, ServiceError> {
        self.catalogs.find_by_id(id).await?.ok_or(ServiceError::CatalogNotFound(id))
    }
}
