use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, CatalogService, ImportService, SeaOrmAccountService, SeaOrmCatalogService,
    SeaOrmImportService, TokenService,
};

#[derive(Clone)]
pub struct SharedState {
    /// Read-only after startup.
    pub config: Arc<Config>,

    pub store: Store,

    pub tokens: TokenService,

    pub catalog: Arc<dyn CatalogService>,

    pub importer: Arc<dyn ImportService>,

    pub accounts: Arc<dyn AccountService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already opened store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let tokens = TokenService::from_config(&config.auth);

        let catalog = Arc::new(SeaOrmCatalogService::new(store.clone()))
            as Arc<dyn CatalogService>;

        let importer = Arc::new(SeaOrmImportService::new(config.import.incomplete_records))
            as Arc<dyn ImportService>;

        let accounts = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            tokens.clone(),
            config.security.clone(),
        )) as Arc<dyn AccountService>;

        Self {
            config: Arc::new(config),
            store,
            tokens,
            catalog,
            importer,
            accounts,
        }
    }
}
