//! Mock XapiClient for unit testing
//!
//! This module provides a mock implementation of XapiClientTrait that can be
//! used in tests without a reachable firewall.
//!
//! - Read primitives answer from canned responses keyed by xpath, or an
//!   empty `<result/>` when nothing was registered.
//! - Every primitive call is recorded, in order, as a [`Call`].
//! - Any primitive can be made to fail with [`MockXapiClient::fail`].
//! - `responses.rs` builds the response documents.

mod responses;

use crate::error::PanosError;
use crate::version::Version;
use crate::xapi_trait::XapiClientTrait;
use crate::xml::Element;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use responses::{empty_result, success};

/// A recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Candidate config read of an xpath
    Get(String),
    /// Running config read of an xpath
    Show(String),
    /// Merge write
    Set {
        /// Target path
        xpath: String,
        /// Element body as sent
        element: String,
    },
    /// Replace write
    Edit {
        /// Target path
        xpath: String,
        /// Element body as sent
        element: String,
    },
    /// Removal of an xpath
    Delete(String),
    /// Interfaces added to a vsys import list
    Import {
        /// Target vsys
        vsys: String,
        /// Interface names
        names: Vec<String>,
    },
    /// Interfaces removed from a vsys import list
    Unimport {
        /// Target vsys
        vsys: String,
        /// Interface names
        names: Vec<String>,
    },
}

impl Call {
    /// Which primitive this call used
    pub fn primitive(&self) -> Primitive {
        match self {
            Call::Get(_) => Primitive::Get,
            Call::Show(_) => Primitive::Show,
            Call::Set { .. } => Primitive::Set,
            Call::Edit { .. } => Primitive::Edit,
            Call::Delete(_) => Primitive::Delete,
            Call::Import { .. } => Primitive::Import,
            Call::Unimport { .. } => Primitive::Unimport,
        }
    }
}

/// Transport primitive, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `get`
    Get,
    /// `show`
    Show,
    /// `set`
    Set,
    /// `edit`
    Edit,
    /// `delete`
    Delete,
    /// vsys import
    Import,
    /// vsys unimport
    Unimport,
}

/// Mock XapiClient for testing
///
/// Clones share state, so a test can keep one handle for assertions while
/// a namespace owns another.
#[derive(Clone)]
pub struct MockXapiClient {
    version: Arc<Mutex<Version>>,
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    failures: Arc<Mutex<HashSet<Primitive>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockXapiClient {
    /// Create a mock reporting the given device version
    pub fn new(version: Version) -> Self {
        Self {
            version: Arc::new(Mutex::new(version)),
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Change the reported device version
    pub fn set_version(&self, version: Version) {
        *lock(&self.version) = version;
    }

    /// Register the full response document returned by `get`/`show` for an xpath
    pub fn add_response(&self, xpath: impl Into<String>, document: impl Into<String>) {
        lock(&self.responses).insert(xpath.into(), document.into());
    }

    /// Make every call to `primitive` fail with an API error
    pub fn fail(&self, primitive: Primitive) {
        lock(&self.failures).insert(primitive);
    }

    /// Recorded calls, in order
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Recorded primitives, in order
    pub fn primitives(&self) -> Vec<Primitive> {
        lock(&self.calls).iter().map(Call::primitive).collect()
    }

    fn record(&self, call: Call) -> Result<(), PanosError> {
        let primitive = call.primitive();
        lock(&self.calls).push(call);
        if lock(&self.failures).contains(&primitive) {
            return Err(PanosError::Api {
                code: 0,
                message: format!("injected {:?} failure", primitive),
            });
        }
        Ok(())
    }

    fn read(&self, xpath: &str) -> Result<Element, PanosError> {
        let document = lock(&self.responses)
            .get(xpath)
            .cloned()
            .unwrap_or_else(empty_result);
        Element::parse(&document)
    }
}

#[async_trait::async_trait]
impl XapiClientTrait for MockXapiClient {
    fn versioning(&self) -> Version {
        lock(&self.version).clone()
    }

    async fn get(&self, xpath: &str) -> Result<Element, PanosError> {
        self.record(Call::Get(xpath.to_string()))?;
        self.read(xpath)
    }

    async fn show(&self, xpath: &str) -> Result<Element, PanosError> {
        self.record(Call::Show(xpath.to_string()))?;
        self.read(xpath)
    }

    async fn set(&self, xpath: &str, element: &str) -> Result<Element, PanosError> {
        self.record(Call::Set {
            xpath: xpath.to_string(),
            element: element.to_string(),
        })?;
        Element::parse(&success())
    }

    async fn edit(&self, xpath: &str, element: &str) -> Result<Element, PanosError> {
        self.record(Call::Edit {
            xpath: xpath.to_string(),
            element: element.to_string(),
        })?;
        Element::parse(&success())
    }

    async fn delete(&self, xpath: &str) -> Result<Element, PanosError> {
        self.record(Call::Delete(xpath.to_string()))?;
        Element::parse(&success())
    }

    async fn import_interfaces(&self, vsys: &str, names: &[String]) -> Result<(), PanosError> {
        self.record(Call::Import {
            vsys: vsys.to_string(),
            names: names.to_vec(),
        })
    }

    async fn unimport_interfaces(&self, vsys: &str, names: &[String]) -> Result<(), PanosError> {
        self.record(Call::Unimport {
            vsys: vsys.to_string(),
            names: names.to_vec(),
        })
    }
}
