//! Network configuration namespaces

pub mod eth;

use crate::xapi_trait::XapiClientTrait;
use std::sync::Arc;

/// Namespaces under `network`
pub struct Network {
    /// `network > interface > ethernet`
    pub ethernet_interface: eth::Eth,
}

impl Network {
    /// Create every network namespace over one transport
    pub fn new(client: Arc<dyn XapiClientTrait>) -> Self {
        Self {
            ethernet_interface: eth::Eth::new(client),
        }
    }
}
