pub mod client;
pub mod lookup;
pub mod types;

pub use client::{
    build_lookup, create_client, create_http_client, get_token_from_env, install_crypto_provider,
    lookup_kind, LookupKind,
};
pub use lookup::{LookupError, OctocrabLookup, PullRequestLookup, RestLookup};
pub use types::PullRequestSummary;
