//! Provider registry for looking up adapters by [`ProviderKind`].

use std::collections::HashMap;
use std::sync::LazyLock;

use beacon_config::ProviderKind;

use super::backends::{RailwayAdapter, VercelAdapter};
use super::traits::ProviderAdapter;

/// Global registry of all supported provider adapters.
static REGISTRY: LazyLock<ProviderRegistry> = LazyLock::new(ProviderRegistry::new);

/// Registry that owns one adapter per provider kind.
struct ProviderRegistry {
    adapters: HashMap<ProviderKind, Box<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    fn new() -> Self {
        let client = super::http_client();
        let mut adapters: HashMap<ProviderKind, Box<dyn ProviderAdapter>> = HashMap::new();

        let vercel = Box::new(VercelAdapter::new(client.clone()));
        debug_assert_eq!(vercel.kind(), ProviderKind::Vercel);
        adapters.insert(ProviderKind::Vercel, vercel);

        let railway = Box::new(RailwayAdapter::new(client));
        debug_assert_eq!(railway.kind(), ProviderKind::Railway);
        adapters.insert(ProviderKind::Railway, railway);

        Self { adapters }
    }

    fn get(&self, kind: ProviderKind) -> Option<&dyn ProviderAdapter> {
        self.adapters.get(&kind).map(|a| a.as_ref())
    }
}

/// Get the adapter for a provider kind.
pub fn get_adapter(kind: ProviderKind) -> Option<&'static dyn ProviderAdapter> {
    REGISTRY.get(kind)
}
