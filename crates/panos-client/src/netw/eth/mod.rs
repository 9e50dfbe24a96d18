//! Ethernet interfaces
//!
//! CRUD operations for `network > interface > ethernet` entries. Writes
//! that name a vsys also maintain the vsys interface import list: `set` and
//! `edit` import after writing, `delete` unimports before deleting. Neither
//! pair is atomic; when the second step fails the error is
//! [`PanosError::Partial`] and the first step stays committed.

mod entry;
mod wire;

#[cfg(test)]
mod tests;

pub use entry::{Entry, InterfaceRef, Layer2Settings, Layer3Settings, Mode, ModeKind, RawSection};

use crate::error::PanosError;
use crate::schema::{Codec, SchemaSet};
use crate::xapi_trait::{Retriever, XapiClientTrait};
use crate::xml::Element;
use crate::xpath::{Xpath, as_entry_xpath, device_root};
use std::sync::Arc;
use tracing::{debug, info};

/// Ethernet interface namespace
pub struct Eth {
    client: Arc<dyn XapiClientTrait>,
    schemas: SchemaSet<Entry>,
}

impl Eth {
    /// Create the namespace over a transport
    pub fn new(client: Arc<dyn XapiClientTrait>) -> Self {
        Self {
            client,
            schemas: wire::schemas(),
        }
    }

    /// Path to the named entries.
    ///
    /// No names addresses the `ethernet` container itself.
    pub fn xpath<S: AsRef<str>>(&self, names: &[S]) -> Xpath {
        let container = device_root()
            .join("network")
            .join("interface")
            .join("ethernet");
        if names.is_empty() {
            container
        } else {
            container.join(as_entry_xpath(names))
        }
    }

    fn codec(&self) -> Codec<Entry> {
        let version = self.client.versioning();
        let codec = self.schemas.select(&version);
        debug!("ethernet schema {} for PAN-OS {}", codec.name(), version);
        codec
    }

    /// GET the names of all ethernet interfaces in the candidate configuration
    pub async fn get_list(&self) -> Result<Vec<String>, PanosError> {
        self.client.log_query("(get) list of ethernet interfaces");
        self.list(Retriever::Get).await
    }

    /// SHOW the names of all ethernet interfaces in the running configuration
    pub async fn show_list(&self) -> Result<Vec<String>, PanosError> {
        self.client.log_query("(show) list of ethernet interfaces");
        self.list(Retriever::Show).await
    }

    async fn list(&self, retriever: Retriever) -> Result<Vec<String>, PanosError> {
        let none: [&str; 0] = [];
        let path = self.xpath(&none);
        self.client.entry_list_using(retriever, &path.to_string()).await
    }

    /// GET one ethernet interface from the candidate configuration
    pub async fn get(&self, name: &str) -> Result<Entry, PanosError> {
        self.client
            .log_query(&format!("(get) ethernet interface {:?}", name));
        self.details(Retriever::Get, name).await
    }

    /// SHOW one ethernet interface from the running configuration
    pub async fn show(&self, name: &str) -> Result<Entry, PanosError> {
        self.client
            .log_query(&format!("(show) ethernet interface {:?}", name));
        self.details(Retriever::Show, name).await
    }

    async fn details(&self, retriever: Retriever, name: &str) -> Result<Entry, PanosError> {
        let path = self.xpath(&[name]).to_string();
        let codec = self.codec();
        let response = match retriever {
            Retriever::Get => self.client.get(&path).await?,
            Retriever::Show => self.client.show(&path).await?,
        };
        let elem = response
            .path(&["result", "entry"])
            .ok_or_else(|| PanosError::ObjectNotFound(name.to_string()))?;
        codec.normalize(elem)
    }

    /// Create or update ethernet interfaces, then import them into `vsys`.
    ///
    /// One entry is written at its own entry path, several in one request at
    /// the interface container. An entry with no settings at all is written
    /// whole at the `ethernet` container, since an entry path needs a
    /// non-empty body. HA and aggregate-group members are left out
    /// of the import. An empty `vsys` skips the import.
    pub async fn set(&self, vsys: &str, entries: &[Entry]) -> Result<(), PanosError> {
        if entries.is_empty() {
            return Ok(());
        }

        let codec = self.codec();
        let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
        self.client
            .log_action(&format!("(set) ethernet interfaces: {:?}", names));

        let (path, element) = match entries {
            [entry] => {
                let elem = codec.specify(entry);
                if elem.children.is_empty() {
                    (self.xpath(names.as_slice()).parent(), elem.to_xml()?)
                } else {
                    (self.xpath(&[&entry.name]), elem.inner_xml()?)
                }
            }
            _ => {
                let mut bulk = Element::new("ethernet");
                for entry in entries {
                    bulk.push(codec.specify(entry));
                }
                (self.xpath(names.as_slice()).parent().parent(), bulk.to_xml()?)
            }
        };
        self.client.set(&path.to_string(), &element).await?;
        info!("set {} ethernet interface(s)", names.len());

        let import: Vec<String> = entries
            .iter()
            .filter(|e| e.is_vsys_importable())
            .map(|e| e.name.clone())
            .collect();
        self.import(vsys, "set", &import, names).await
    }

    /// Replace one ethernet interface, then import it into `vsys`.
    ///
    /// The import is skipped for an empty `vsys` or an HA or aggregate-group
    /// member.
    pub async fn edit(&self, vsys: &str, entry: &Entry) -> Result<(), PanosError> {
        let codec = self.codec();
        self.client
            .log_action(&format!("(edit) ethernet interface {:?}", entry.name));

        let path = self.xpath(&[&entry.name]);
        let element = codec.specify(entry).to_xml()?;
        self.client.edit(&path.to_string(), &element).await?;
        info!("edited ethernet interface {}", entry.name);

        let import = if entry.is_vsys_importable() {
            vec![entry.name.clone()]
        } else {
            Vec::new()
        };
        self.import(vsys, "edit", &import, vec![entry.name.clone()]).await
    }

    async fn import(
        &self,
        vsys: &str,
        operation: &'static str,
        names: &[String],
        committed: Vec<String>,
    ) -> Result<(), PanosError> {
        if vsys.is_empty() || names.is_empty() {
            return Ok(());
        }
        self.client
            .import_interfaces(vsys, names)
            .await
            .map_err(|source| PanosError::Partial {
                operation,
                committed,
                source: Box::new(source),
            })
    }

    /// Remove ethernet interfaces from `vsys`, then delete them.
    ///
    /// Targets are names or entries. Entries known to be HA or
    /// aggregate-group members are not unimported; bare names always are.
    /// If the unimport fails nothing is deleted.
    pub async fn delete<T>(&self, vsys: &str, targets: &[T]) -> Result<(), PanosError>
    where
        T: InterfaceRef + Sync,
    {
        if targets.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = targets
            .iter()
            .map(|t| t.interface_name().to_string())
            .collect();
        self.client
            .log_action(&format!("(delete) ethernet interface(s): {:?}", names));

        let unimport: Vec<String> = targets
            .iter()
            .filter(|t| t.is_vsys_importable())
            .map(|t| t.interface_name().to_string())
            .collect();
        let unimported = !vsys.is_empty() && !unimport.is_empty();
        if unimported {
            self.client.unimport_interfaces(vsys, &unimport).await?;
        }

        let path = self.xpath(names.as_slice());
        match self.client.delete(&path.to_string()).await {
            Ok(_) => {
                info!("deleted {} ethernet interface(s)", names.len());
                Ok(())
            }
            Err(source) if unimported => Err(PanosError::Partial {
                operation: "delete",
                committed: unimport,
                source: Box::new(source),
            }),
            Err(e) => Err(e),
        }
    }
}
