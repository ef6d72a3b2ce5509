pub mod provider;
pub mod providers;
pub mod registry;
pub mod types;

pub use provider::OAuthProvider;
pub use providers::CmbcProvider;
pub use registry::{OAuthConfig, ProviderRegistry};
pub use types::{AuthorizeQuery, OAuthUserInfo};
