// Adapters layer: concrete registry and validator sources (GitHub, filesystem, CDN).

pub mod cdn;
pub mod github;
pub mod http;
pub mod layout;
pub mod local;

pub use cdn::CdnValidatorSource;
pub use github::GithubRegistry;
pub use local::LocalRegistry;
