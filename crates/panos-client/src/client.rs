//! PAN-OS XML API client
//!
//! Every request is a form-encoded `POST` to `/api/`. Responses are XML
//! documents whose root carries `status="success"` or `status="error"`.

use crate::config::{ClientConfig, LogFlags};
use crate::error::PanosError;
use crate::version::Version;
use crate::xapi_trait::XapiClientTrait;
use crate::xml::{Element, member_list};
use crate::xpath::{as_member_xpath, vsys_interface_import};
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, info, warn};

const SYSTEM_INFO_CMD: &str = "<show><system><info/></system></show>";

/// PAN-OS XML API client
pub struct XapiClient {
    client: Client,
    url: String,
    api_key: String,
    logging: LogFlags,
    version: Version,
    system_info: HashMap<String, String>,
}

impl XapiClient {
    /// Connect to a device.
    ///
    /// Retrieves an API key when the config has none, then reads the
    /// device's system info to learn its software version.
    pub async fn connect(config: ClientConfig) -> Result<Self, PanosError> {
        config.validate()?;

        let mut builder = Client::builder().timeout(config.timeout);
        if !config.verify_certificate {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build()?;

        let mut xapi = Self {
            client,
            url: config.api_url(),
            api_key: config.api_key.clone(),
            logging: config.logging,
            version: Version::default(),
            system_info: HashMap::new(),
        };

        if xapi.api_key.is_empty() {
            xapi.api_key = xapi.keygen(&config.username, &config.password).await?;
        }
        xapi.retrieve_system_info().await?;
        info!("connected to {} running PAN-OS {}", config.hostname, xapi.version);
        Ok(xapi)
    }

    /// API key in use
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// `show system info` fields, e.g. `hostname`, `model`, `serial`
    pub fn system_info(&self) -> &HashMap<String, String> {
        &self.system_info
    }

    async fn keygen(&self, username: &str, password: &str) -> Result<String, PanosError> {
        debug!("retrieving API key for {}", username);
        let response = self
            .post(&[("type", "keygen"), ("user", username), ("password", password)])
            .await?;
        response
            .text_at(&["result", "key"])
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| PanosError::Api {
                code: 0,
                message: "keygen response carried no key".to_string(),
            })
    }

    async fn retrieve_system_info(&mut self) -> Result<(), PanosError> {
        let response = self.op(SYSTEM_INFO_CMD).await?;
        let system = response.path(&["result", "system"]).ok_or_else(|| {
            PanosError::Decode("system info response has no result/system".to_string())
        })?;

        self.system_info = system
            .children
            .iter()
            .filter(|c| c.children.is_empty())
            .map(|c| (c.name.clone(), c.text.clone().unwrap_or_default()))
            .collect();

        let sw_version = self
            .system_info
            .get("sw-version")
            .ok_or_else(|| PanosError::Decode("system info has no sw-version".to_string()))?;
        self.version = sw_version.parse()?;
        Ok(())
    }

    /// Run an operational command
    pub async fn op(&self, cmd: &str) -> Result<Element, PanosError> {
        if self.logging.op {
            info!(target: "panos::op", "(op) {}", cmd);
        }
        self.post(&[("type", "op"), ("cmd", cmd), ("key", self.api_key.as_str())])
            .await
    }

    async fn config(
        &self,
        action: &str,
        xpath: &str,
        element: Option<&str>,
    ) -> Result<Element, PanosError> {
        if self.logging.xpath {
            debug!(target: "panos::xpath", "({}) {}", action, xpath);
        }
        let mut form = vec![
            ("type", "config"),
            ("action", action),
            ("xpath", xpath),
            ("key", self.api_key.as_str()),
        ];
        if let Some(element) = element {
            form.push(("element", element));
        }
        self.post(&form).await
    }

    async fn post(&self, form: &[(&str, &str)]) -> Result<Element, PanosError> {
        if self.logging.send {
            let shown: Vec<_> = form
                .iter()
                .map(|(k, v)| match *k {
                    "key" | "password" => (*k, "########"),
                    _ => (*k, *v),
                })
                .collect();
            debug!(target: "panos::send", "sending: {:?}", shown);
        }

        let response = self.client.post(&self.url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if self.logging.receive {
            debug!(target: "panos::receive", "received ({}): {}", status, body);
        }

        match parse_response(&body) {
            Err(PanosError::Xml(e)) if !status.is_success() => Err(PanosError::Api {
                code: u32::from(status.as_u16()),
                message: format!("HTTP {}: {}", status, e),
            }),
            other => other,
        }
    }
}

/// Parse a response document, turning `status="error"` into an error
pub(crate) fn parse_response(body: &str) -> Result<Element, PanosError> {
    let doc = Element::parse(body)?;
    if doc.attribute("status") != Some("error") {
        return Ok(doc);
    }

    let code = doc
        .attribute("code")
        .and_then(|c| c.parse().ok())
        .unwrap_or(0);
    let msg = doc.find("msg").or_else(|| doc.path(&["result", "msg"]));
    let lines: Vec<String> = match msg {
        Some(msg) if msg.children.is_empty() => msg.text.iter().map(|t| t.trim().to_string()).collect(),
        Some(msg) => msg
            .find_all("line")
            .filter_map(|l| l.text.as_deref())
            .map(|t| t.trim().to_string())
            .collect(),
        None => Vec::new(),
    };

    if lines.is_empty() {
        warn!("error response without a message (code {})", code);
    }
    Err(PanosError::Api {
        code,
        message: lines.join(" | "),
    })
}

#[async_trait::async_trait]
impl XapiClientTrait for XapiClient {
    fn versioning(&self) -> Version {
        self.version.clone()
    }

    async fn get(&self, xpath: &str) -> Result<Element, PanosError> {
        self.config("get", xpath, None).await
    }

    async fn show(&self, xpath: &str) -> Result<Element, PanosError> {
        self.config("show", xpath, None).await
    }

    async fn set(&self, xpath: &str, element: &str) -> Result<Element, PanosError> {
        self.config("set", xpath, Some(element)).await
    }

    async fn edit(&self, xpath: &str, element: &str) -> Result<Element, PanosError> {
        self.config("edit", xpath, Some(element)).await
    }

    async fn delete(&self, xpath: &str) -> Result<Element, PanosError> {
        self.config("delete", xpath, None).await
    }

    async fn import_interfaces(&self, vsys: &str, names: &[String]) -> Result<(), PanosError> {
        if vsys.is_empty() {
            return Ok(());
        }
        let Some(members) = member_list("interface", names) else {
            return Ok(());
        };
        self.log_action(&format!("(import) {:?} into {}", names, vsys));

        let path = vsys_interface_import(vsys);
        self.set(&path.to_string(), &members.inner_xml()?).await?;
        Ok(())
    }

    async fn unimport_interfaces(&self, vsys: &str, names: &[String]) -> Result<(), PanosError> {
        if vsys.is_empty() || names.is_empty() {
            return Ok(());
        }
        self.log_action(&format!("(unimport) {:?} from {}", names, vsys));

        let path = vsys_interface_import(vsys).join(as_member_xpath(names));
        self.delete(&path.to_string()).await?;
        Ok(())
    }

    fn log_query(&self, message: &str) {
        if self.logging.query {
            info!(target: "panos::query", "{}", message);
        }
    }

    fn log_action(&self, message: &str) {
        if self.logging.action {
            info!(target: "panos::action", "{}", message);
        }
    }
}
