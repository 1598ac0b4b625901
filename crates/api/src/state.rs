use std::sync::Arc;

use bankd_core::token::TokenCodec;

use crate::config::Config;
use crate::service::IdentityService;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; the service sits behind `Arc<dyn IdentityService>` so
/// tests can swap in a fake without touching the router.
#[derive(Clone)]
pub struct AppState {
    /// The identity and session service.
    pub auth: Arc<dyn IdentityService>,
    /// Token codec, used by the bearer-token extractor to verify access
    /// tokens on protected routes.
    pub codec: TokenCodec,
    /// Server configuration.
    pub config: Arc<Config>,
}
