pub mod account_service;
pub use account_service::{AccountError, AccountService};

pub mod account_service_impl;
pub use account_service_impl::SeaOrmAccountService;

pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService};

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod import_service;
pub use import_service::{ImportError, ImportService, ImportSummary};

pub mod import_service_impl;
pub use import_service_impl::SeaOrmImportService;

pub mod token;
pub use token::{Claims, TokenError, TokenService};
