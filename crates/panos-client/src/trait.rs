//! XapiClient trait for mocking
//!
//! This trait abstracts the PAN-OS XML API transport so namespaces can be
//! driven by the concrete [`XapiClient`](crate::XapiClient) or by a mock in
//! unit tests.

use crate::error::PanosError;
use crate::version::Version;
use crate::xml::{Element, entry_names};
use tracing::debug;

/// Read primitive used for list operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retriever {
    /// Candidate configuration
    Get,
    /// Running configuration
    Show,
}

/// Trait for PAN-OS XML API operations
///
/// Every config primitive takes a rendered xpath. Read primitives return the
/// parsed `<response>` document; write primitives take the serialized
/// element body. All async methods must be `Send` to work with Tokio's
/// work-stealing runtime.
#[async_trait::async_trait]
pub trait XapiClientTrait: Send + Sync {
    /// Software version negotiated with the device
    fn versioning(&self) -> Version;

    /// `type=config&action=get` (candidate configuration)
    async fn get(&self, xpath: &str) -> Result<Element, PanosError>;

    /// `type=config&action=show` (running configuration)
    async fn show(&self, xpath: &str) -> Result<Element, PanosError>;

    /// `type=config&action=set`
    async fn set(&self, xpath: &str, element: &str) -> Result<Element, PanosError>;

    /// `type=config&action=edit`
    async fn edit(&self, xpath: &str, element: &str) -> Result<Element, PanosError>;

    /// `type=config&action=delete`
    async fn delete(&self, xpath: &str) -> Result<Element, PanosError>;

    /// Import interfaces into a vsys so the vsys may use them
    async fn import_interfaces(&self, vsys: &str, names: &[String]) -> Result<(), PanosError>;

    /// Remove interfaces from a vsys import list
    async fn unimport_interfaces(&self, vsys: &str, names: &[String]) -> Result<(), PanosError>;

    /// Read a container xpath and return the entry names under it, in device order
    async fn entry_list_using(&self, retriever: Retriever, xpath: &str) -> Result<Vec<String>, PanosError> {
        let response = match retriever {
            Retriever::Get => self.get(xpath).await?,
            Retriever::Show => self.show(xpath).await?,
        };
        let names = response
            .find("result")
            .and_then(|result| result.children.first())
            .map(entry_names)
            .unwrap_or_default();
        debug!("{} entries under {}", names.len(), xpath);
        Ok(names)
    }

    /// Audit hook for read operations
    fn log_query(&self, message: &str) {
        debug!(target: "panos::query", "{}", message);
    }

    /// Audit hook for write operations
    fn log_action(&self, message: &str) {
        debug!(target: "panos::action", "{}", message);
    }
}
