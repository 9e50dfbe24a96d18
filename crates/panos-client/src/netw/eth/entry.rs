//! Normalized ethernet interface model

use crate::error::PanosError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A normalized, version independent representation of an ethernet interface.
///
/// `name` is the identity key and is used to build the entry xpath.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Interface name, e.g. `ethernet1/1`
    pub name: String,
    /// Interface mode; `None` when the device returned no mode block
    pub mode: Option<Mode>,
    /// `auto`, `10`, `100`, `1000`, ...
    pub link_speed: Option<String>,
    /// `auto`, `full` or `half`
    pub link_duplex: Option<String>,
    /// `auto`, `up` or `down`
    pub link_state: Option<String>,
    /// Free-form description
    pub comment: Option<String>,
    pub(super) raw: Option<BTreeMap<RawSection, String>>,
}

/// Interface mode, each variant carrying only its own settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Routed interface
    Layer3(Layer3Settings),
    /// Switched interface
    Layer2(Layer2Settings),
    /// Virtual wire endpoint
    VirtualWire(Layer2Settings),
    /// Passive tap
    Tap,
    /// HA link
    Ha,
    /// Decryption mirror port
    DecryptMirror,
    /// Member of the named aggregate ethernet group
    AggregateGroup(String),
}

/// Layer3 mode settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer3Settings {
    /// Static addresses in CIDR form or address object names
    pub static_ips: Vec<String>,
    /// Act as a DHCP client
    pub enable_dhcp: bool,
    /// Install the DHCP server's default route
    pub create_dhcp_default_route: bool,
    /// Metric of the DHCP default route
    pub dhcp_default_route_metric: Option<u32>,
    /// IPv6 enabled on the interface
    pub ipv6_enabled: bool,
    /// Interface management profile name
    pub management_profile: Option<String>,
    /// Layer3 MTU
    pub mtu: Option<u32>,
    /// NetFlow server profile name
    pub netflow_profile: Option<String>,
    /// Adjust TCP MSS
    pub adjust_tcp_mss: bool,
    /// PAN-OS 7.1+
    pub ipv4_mss_adjust: Option<u32>,
    /// PAN-OS 7.1+
    pub ipv6_mss_adjust: Option<u32>,
}

impl Layer3Settings {
    pub(crate) fn has_dhcp(&self) -> bool {
        self.enable_dhcp || self.create_dhcp_default_route || self.dhcp_default_route_metric.is_some()
    }
}

/// Layer2 and virtual-wire mode settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer2Settings {
    /// LLDP enabled
    pub lldp_enabled: bool,
    /// LLDP profile name
    pub lldp_profile: Option<String>,
    /// NetFlow server profile name
    pub netflow_profile: Option<String>,
}

/// Mode discriminant, as named on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// `layer3`
    Layer3,
    /// `layer2`
    Layer2,
    /// `virtual-wire`
    VirtualWire,
    /// `tap`
    Tap,
    /// `ha`
    Ha,
    /// `decrypt-mirror`
    DecryptMirror,
    /// `aggregate-group`
    AggregateGroup,
}

impl ModeKind {
    /// Device name of the mode element
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Layer3 => "layer3",
            ModeKind::Layer2 => "layer2",
            ModeKind::VirtualWire => "virtual-wire",
            ModeKind::Tap => "tap",
            ModeKind::Ha => "ha",
            ModeKind::DecryptMirror => "decrypt-mirror",
            ModeKind::AggregateGroup => "aggregate-group",
        }
    }

    /// Whether interfaces in this mode may be imported into a vsys.
    ///
    /// HA and aggregate-group member interfaces are owned by the device,
    /// not a vsys, and are never imported or unimported.
    pub fn is_vsys_importable(&self) -> bool {
        !matches!(self, ModeKind::Ha | ModeKind::AggregateGroup)
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeKind {
    type Err = PanosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layer3" => Ok(ModeKind::Layer3),
            "layer2" => Ok(ModeKind::Layer2),
            "virtual-wire" => Ok(ModeKind::VirtualWire),
            "tap" => Ok(ModeKind::Tap),
            "ha" => Ok(ModeKind::Ha),
            "decrypt-mirror" => Ok(ModeKind::DecryptMirror),
            "aggregate-group" => Ok(ModeKind::AggregateGroup),
            other => Err(PanosError::InvalidMode(other.to_string())),
        }
    }
}

impl Mode {
    /// The mode discriminant
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Layer3(_) => ModeKind::Layer3,
            Mode::Layer2(_) => ModeKind::Layer2,
            Mode::VirtualWire(_) => ModeKind::VirtualWire,
            Mode::Tap => ModeKind::Tap,
            Mode::Ha => ModeKind::Ha,
            Mode::DecryptMirror => ModeKind::DecryptMirror,
            Mode::AggregateGroup(_) => ModeKind::AggregateGroup,
        }
    }
}

/// Configuration sub-sections carried through unparsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawSection {
    /// layer3 `arp`
    Arp,
    /// layer3 `ipv6 > address`
    Ipv6Address,
    /// layer3 `units`
    L3Subinterface,
    /// layer2 `units`
    L2Subinterface,
    /// virtual-wire `units`
    VwSubinterface,
}

impl RawSection {
    /// Section key
    pub fn as_str(&self) -> &'static str {
        match self {
            RawSection::Arp => "arp",
            RawSection::Ipv6Address => "ipv6",
            RawSection::L3Subinterface => "l3subinterface",
            RawSection::L2Subinterface => "l2subinterface",
            RawSection::VwSubinterface => "vwsubinterface",
        }
    }
}

impl Entry {
    /// Create an entry with no mode
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: set the mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Builder: set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The mode discriminant, if a mode is set
    pub fn mode_kind(&self) -> Option<ModeKind> {
        self.mode.as_ref().map(Mode::kind)
    }

    /// Whether this interface takes part in vsys import/unimport.
    ///
    /// An entry without a mode is treated as importable.
    pub fn is_vsys_importable(&self) -> bool {
        self.mode_kind().is_none_or(|k| k.is_vsys_importable())
    }

    /// Unparsed content of a pass-through section
    pub fn raw_section(&self, section: RawSection) -> Option<&str> {
        self.raw.as_ref()?.get(&section).map(String::as_str)
    }

    /// All pass-through sections; `None` when there are none
    pub fn raw_sections(&self) -> Option<&BTreeMap<RawSection, String>> {
        self.raw.as_ref()
    }

    pub(crate) fn set_raw(&mut self, raw: BTreeMap<RawSection, String>) {
        self.raw = if raw.is_empty() { None } else { Some(raw) };
    }

    /// Copy every setting from `src` except `name`.
    ///
    /// Pass-through sections are kept from `self`: they come from a device
    /// read and are not part of a desired configuration.
    pub fn copy_from(&mut self, src: &Entry) {
        self.mode = src.mode.clone();
        self.link_speed = src.link_speed.clone();
        self.link_duplex = src.link_duplex.clone();
        self.link_state = src.link_state.clone();
        self.comment = src.comment.clone();
    }
}

/// Something that names an ethernet interface: a bare name or an [`Entry`]
pub trait InterfaceRef {
    /// Interface name
    fn interface_name(&self) -> &str;

    /// Whether this interface takes part in vsys import/unimport
    fn is_vsys_importable(&self) -> bool {
        true
    }
}

impl InterfaceRef for str {
    fn interface_name(&self) -> &str {
        self
    }
}

impl InterfaceRef for String {
    fn interface_name(&self) -> &str {
        self
    }
}

impl InterfaceRef for Entry {
    fn interface_name(&self) -> &str {
        &self.name
    }

    fn is_vsys_importable(&self) -> bool {
        Entry::is_vsys_importable(self)
    }
}

impl<T: InterfaceRef + ?Sized> InterfaceRef for &T {
    fn interface_name(&self) -> &str {
        (**self).interface_name()
    }

    fn is_vsys_importable(&self) -> bool {
        (**self).is_vsys_importable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_kind_names() {
        for kind in [
            ModeKind::Layer3,
            ModeKind::Layer2,
            ModeKind::VirtualWire,
            ModeKind::Tap,
            ModeKind::Ha,
            ModeKind::DecryptMirror,
            ModeKind::AggregateGroup,
        ] {
            assert_eq!(kind.as_str().parse::<ModeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        let err = "layer4".parse::<ModeKind>().unwrap_err();
        assert!(matches!(err, PanosError::InvalidMode(ref m) if m == "layer4"));
    }

    #[test]
    fn test_vsys_importable() {
        assert!(Entry::new("e1").is_vsys_importable());
        assert!(Entry::new("e1").with_mode(Mode::Tap).is_vsys_importable());
        assert!(!Entry::new("e1").with_mode(Mode::Ha).is_vsys_importable());
        assert!(
            !Entry::new("e1")
                .with_mode(Mode::AggregateGroup("ae1".to_string()))
                .is_vsys_importable()
        );
        assert!(InterfaceRef::is_vsys_importable("e1"));
    }

    #[test]
    fn test_copy_from_keeps_name_and_raw() {
        let mut current = Entry::new("ethernet1/1").with_comment("old");
        let mut raw = BTreeMap::new();
        raw.insert(RawSection::Arp, "<entry name=\"1.1.1.1\"/>".to_string());
        current.set_raw(raw);

        let desired = Entry::new("other")
            .with_mode(Mode::Layer3(Layer3Settings {
                mtu: Some(9000),
                ..Default::default()
            }))
            .with_comment("new");
        current.copy_from(&desired);

        assert_eq!(current.name, "ethernet1/1");
        assert_eq!(current.comment.as_deref(), Some("new"));
        assert_eq!(current.mode, desired.mode);
        assert_eq!(current.raw_section(RawSection::Arp), Some("<entry name=\"1.1.1.1\"/>"));
    }

    #[test]
    fn test_empty_raw_is_absent() {
        let mut entry = Entry::new("e1");
        entry.set_raw(BTreeMap::new());
        assert!(entry.raw_sections().is_none());
    }
}
