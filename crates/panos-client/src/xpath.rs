//! Address paths into the device configuration tree

use std::fmt;

/// Name of the single device entry on a firewall
pub const LOCALHOST: &str = "localhost.localdomain";

/// An ordered list of xpath segments, rendered as `/a/b/c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Xpath(Vec<String>);

impl Xpath {
    /// Build an xpath from segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The segments of this path
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The last segment, if any
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// This path with its last segment removed
    pub fn parent(&self) -> Xpath {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    /// This path with one more segment appended
    pub fn join(&self, segment: impl Into<String>) -> Xpath {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl fmt::Display for Xpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// XPath 1.0 string literal for `value`.
///
/// Single quotes unless the value contains one; a value holding both quote
/// characters becomes a `concat()` of literals.
pub fn quote(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Entry selector for zero, one or many names.
///
/// No names (or a single empty name) selects every entry: `entry`.
/// Otherwise: `entry[@name='a']` or `entry[@name='a' or @name='b']`.
pub fn as_entry_xpath<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() || (names.len() == 1 && names[0].as_ref().is_empty()) {
        return "entry".to_string();
    }
    let selector = names
        .iter()
        .map(|n| format!("@name={}", quote(n.as_ref())))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("entry[{}]", selector)
}

/// Member selector matching any of the given member texts
pub fn as_member_xpath<S: AsRef<str>>(members: &[S]) -> String {
    let selector = members
        .iter()
        .map(|m| format!("text()={}", quote(m.as_ref())))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("member[{}]", selector)
}

/// `/config/devices/entry[@name='localhost.localdomain']`
pub fn device_root() -> Xpath {
    Xpath::new(["config", "devices"]).join(as_entry_xpath(&[LOCALHOST]))
}

/// Interface import list of a vsys
pub fn vsys_interface_import(vsys: &str) -> Xpath {
    device_root()
        .join("vsys")
        .join(as_entry_xpath(&[vsys]))
        .join("import")
        .join("network")
        .join("interface")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_selector() {
        let none: [&str; 0] = [];
        assert_eq!(as_entry_xpath(&none), "entry");
        assert_eq!(as_entry_xpath(&[""]), "entry");
        assert_eq!(as_entry_xpath(&["a"]), "entry[@name='a']");
        assert_eq!(as_entry_xpath(&["a", "b"]), "entry[@name='a' or @name='b']");
    }

    #[test]
    fn test_selector_quotes_names_with_apostrophes() {
        assert_eq!(as_entry_xpath(&["o'neil"]), r#"entry[@name="o'neil"]"#);
        assert_eq!(
            as_entry_xpath(&["a", "it's \"x\""]),
            r#"entry[@name='a' or @name=concat('it', "'", 's "x"')]"#
        );
        assert_eq!(as_member_xpath(&["o'neil"]), r#"member[text()="o'neil"]"#);
    }

    #[test]
    fn test_member_selector() {
        assert_eq!(
            as_member_xpath(&["ethernet1/1", "ethernet1/2"]),
            "member[text()='ethernet1/1' or text()='ethernet1/2']"
        );
    }

    #[test]
    fn test_render_and_parent() {
        let path = device_root().join("network");
        assert_eq!(
            path.to_string(),
            "/config/devices/entry[@name='localhost.localdomain']/network"
        );
        assert_eq!(path.parent(), device_root());
        assert_eq!(path.last(), Some("network"));
    }

    #[test]
    fn test_vsys_import_path() {
        assert_eq!(
            vsys_interface_import("vsys2").to_string(),
            "/config/devices/entry[@name='localhost.localdomain']/vsys/entry[@name='vsys2']/import/network/interface"
        );
    }
}
