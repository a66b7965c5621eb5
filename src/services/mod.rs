pub mod auth_service;
pub use auth_service::{AuthError, AuthScheme, AuthService, Credentials, Identity, Principal};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService};

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod policy;
pub use policy::{AccessPolicy, Action, Denied};

pub mod token;
pub use token::{TokenCodec, TokenRejection};

pub mod user_service;
pub use user_service::{UserError, UserService, UserWithToken};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;
