//! Firewall facade
//!
//! Groups the configuration namespaces of a firewall behind one value that
//! shares a single transport.

use crate::client::XapiClient;
use crate::config::ClientConfig;
use crate::error::PanosError;
use crate::netw::Network;
use crate::version::Version;
use crate::xapi_trait::XapiClientTrait;
use std::sync::Arc;

/// A PAN-OS firewall
pub struct Firewall {
    client: Arc<dyn XapiClientTrait>,
    /// `network` configuration
    pub network: Network,
}

impl Firewall {
    /// Wrap an existing transport
    pub fn new(client: Arc<dyn XapiClientTrait>) -> Self {
        Self {
            network: Network::new(Arc::clone(&client)),
            client,
        }
    }

    /// Connect to the device described by `config`
    pub async fn connect(config: ClientConfig) -> Result<Self, PanosError> {
        let client = XapiClient::connect(config).await?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Software version of the device
    pub fn version(&self) -> Version {
        self.client.versioning()
    }

    /// The underlying transport
    pub fn client(&self) -> &Arc<dyn XapiClientTrait> {
        &self.client
    }
}
