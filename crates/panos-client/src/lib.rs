//! PAN-OS XML API Client
//!
//! A Rust client library for configuring Palo Alto Networks firewalls
//! through the PAN-OS XML API. Configuration objects are exposed as
//! namespaces with `get`/`show`/`set`/`edit`/`delete` operations over
//! normalized, version independent types; the wire layout used for each
//! request is picked from the device's software version.
//!
//! # Example
//!
//! ```no_run
//! use panos_client::{ClientConfig, Firewall};
//! use panos_client::netw::eth::{Entry, Layer3Settings, Mode};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let fw = Firewall::connect(config).await?;
//! let eth = &fw.network.ethernet_interface;
//!
//! // List interfaces in the candidate configuration
//! for name in eth.get_list().await? {
//!     println!("{}", name);
//! }
//!
//! // Configure a layer3 interface and import it into vsys1
//! let entry = Entry::new("ethernet1/3").with_mode(Mode::Layer3(Layer3Settings {
//!     static_ips: vec!["10.3.0.1/24".to_string()],
//!     ..Default::default()
//! }));
//! eth.set("vsys1", &[entry]).await?;
//!
//! // Remove it again
//! eth.delete("vsys1", &["ethernet1/3"]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Versioned wire schemas**: one normalized type per object, encoded for
//!   the schema matching the device version
//! - **Vsys import**: interface writes keep the vsys import list in step
//! - **Pass-through fragments**: unmodelled sections survive a read and
//!   write-back unchanged
//! - **Mocking**: `MockXapiClient` behind the `test-util` feature

pub mod client;
pub mod config;
pub mod error;
pub mod firewall;
pub mod netw;
pub mod schema;
pub mod version;
#[path = "trait.rs"]
pub mod xapi_trait;
pub mod xml;
pub mod xpath;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::XapiClient;
pub use config::{ClientConfig, CredsSpec, LogFlags, Protocol};
pub use error::PanosError;
pub use firewall::Firewall;
pub use version::Version;
pub use xapi_trait::{Retriever, XapiClientTrait};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockXapiClient;
