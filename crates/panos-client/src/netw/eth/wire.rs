//! Ethernet interface wire schemas
//!
//! Two layouts exist. Before PAN-OS 7.1 `adjust-tcp-mss` is a yes/no
//! token directly under `layer3`; from 7.1 it is a structured element with
//! `enable` and per-protocol adjustment values. Everything else is shared,
//! so the entry layout is generic over the TCP MSS representation.

use super::entry::{Entry, Layer2Settings, Layer3Settings, Mode, RawSection};
use crate::error::PanosError;
use crate::schema::{Codec, SchemaSet, WireSchema};
use crate::version::Version;
use crate::xml::{Element, as_bool, entry_names, parse_num, yes_no};
use std::collections::BTreeMap;

/// Wire schemas for ethernet interfaces, keyed by minimum PAN-OS version
pub fn schemas() -> SchemaSet<Entry> {
    SchemaSet::new(Codec::of::<EntryV1>("ethernet-v1"))
        .with(Version::new(7, 1, 0), Codec::of::<EntryV2>("ethernet-v2"))
}

type RawMap = BTreeMap<RawSection, String>;

fn text(elem: &Element, names: &[&str]) -> Option<String> {
    elem.text_at(names).map(str::to_string)
}

fn raw_inner(elem: &Element, name: &str) -> Result<Option<String>, PanosError> {
    elem.find(name).map(Element::inner_xml).transpose()
}

fn push_raw(elem: &mut Element, name: &str, raw: Option<&String>) {
    if let Some(content) = raw {
        elem.push(Element::verbatim(name, content.as_str()));
    }
}

/// Pre-7.1 layout
pub(crate) type EntryV1 = EntryWire<MssV1>;

/// 7.1+ layout
pub(crate) type EntryV2 = EntryWire<MssV2>;

/// TCP MSS adjustment representation inside `layer3`
pub(crate) trait TcpMss: Sized + Default {
    fn decode(layer3: &Element) -> Result<Self, PanosError>;
    fn encode(&self, layer3: &mut Element);
    fn normalize(self, settings: &mut Layer3Settings);
    fn specify(settings: &Layer3Settings) -> Self;
}

/// `<adjust-tcp-mss>yes</adjust-tcp-mss>`
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MssV1 {
    adjust_tcp_mss: Option<String>,
}

impl TcpMss for MssV1 {
    fn decode(layer3: &Element) -> Result<Self, PanosError> {
        Ok(Self {
            adjust_tcp_mss: text(layer3, &["adjust-tcp-mss"]),
        })
    }

    fn encode(&self, layer3: &mut Element) {
        layer3.push_opt("adjust-tcp-mss", self.adjust_tcp_mss.as_deref());
    }

    fn normalize(self, settings: &mut Layer3Settings) {
        settings.adjust_tcp_mss = as_bool(self.adjust_tcp_mss.as_deref());
    }

    fn specify(settings: &Layer3Settings) -> Self {
        Self {
            adjust_tcp_mss: Some(yes_no(settings.adjust_tcp_mss).to_string()),
        }
    }
}

/// `<adjust-tcp-mss><enable/><ipv4-mss-adjustment/><ipv6-mss-adjustment/></adjust-tcp-mss>`
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MssV2 {
    enable: Option<String>,
    ipv4_mss_adjust: Option<u32>,
    ipv6_mss_adjust: Option<u32>,
}

impl TcpMss for MssV2 {
    fn decode(layer3: &Element) -> Result<Self, PanosError> {
        Ok(Self {
            enable: text(layer3, &["adjust-tcp-mss", "enable"]),
            ipv4_mss_adjust: parse_num(layer3, &["adjust-tcp-mss", "ipv4-mss-adjustment"])?,
            ipv6_mss_adjust: parse_num(layer3, &["adjust-tcp-mss", "ipv6-mss-adjustment"])?,
        })
    }

    fn encode(&self, layer3: &mut Element) {
        let mut mss = Element::new("adjust-tcp-mss");
        mss.push_opt("enable", self.enable.as_deref());
        mss.push_opt("ipv4-mss-adjustment", self.ipv4_mss_adjust.map(|v| v.to_string()).as_deref());
        mss.push_opt("ipv6-mss-adjustment", self.ipv6_mss_adjust.map(|v| v.to_string()).as_deref());
        if !mss.children.is_empty() {
            layer3.push(mss);
        }
    }

    fn normalize(self, settings: &mut Layer3Settings) {
        settings.adjust_tcp_mss = as_bool(self.enable.as_deref());
        settings.ipv4_mss_adjust = self.ipv4_mss_adjust;
        settings.ipv6_mss_adjust = self.ipv6_mss_adjust;
    }

    fn specify(settings: &Layer3Settings) -> Self {
        Self {
            enable: Some(yes_no(settings.adjust_tcp_mss).to_string()),
            ipv4_mss_adjust: settings.ipv4_mss_adjust,
            ipv6_mss_adjust: settings.ipv6_mss_adjust,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DhcpWire {
    enable: Option<String>,
    create_default_route: Option<String>,
    metric: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Layer3Wire<M> {
    ipv6_enabled: Option<String>,
    ipv6_address: Option<String>,
    management_profile: Option<String>,
    mtu: Option<u32>,
    netflow_profile: Option<String>,
    mss: M,
    static_ips: Vec<String>,
    dhcp: Option<DhcpWire>,
    arp: Option<String>,
    subinterface: Option<String>,
}

impl<M: TcpMss> Layer3Wire<M> {
    fn decode(elem: &Element) -> Result<Self, PanosError> {
        let dhcp = match elem.find("dhcp-client") {
            Some(d) => Some(DhcpWire {
                enable: text(d, &["enable"]),
                create_default_route: text(d, &["create-default-route"]),
                metric: parse_num(d, &["default-route-metric"])?,
            }),
            None => None,
        };
        let ipv6_address = match elem.find("ipv6") {
            Some(ipv6) => raw_inner(ipv6, "address")?,
            None => None,
        };

        Ok(Self {
            ipv6_enabled: text(elem, &["ipv6", "enabled"]),
            ipv6_address,
            management_profile: text(elem, &["interface-management-profile"]),
            mtu: parse_num(elem, &["mtu"])?,
            netflow_profile: text(elem, &["netflow-profile"]),
            mss: M::decode(elem)?,
            static_ips: elem.find("ip").map(entry_names).unwrap_or_default(),
            dhcp,
            arp: raw_inner(elem, "arp")?,
            subinterface: raw_inner(elem, "units")?,
        })
    }

    fn encode(&self) -> Element {
        let mut elem = Element::new("layer3");

        let mut ipv6 = Element::new("ipv6");
        ipv6.push_opt("enabled", self.ipv6_enabled.as_deref());
        push_raw(&mut ipv6, "address", self.ipv6_address.as_ref());
        if !ipv6.children.is_empty() {
            elem.push(ipv6);
        }

        elem.push_opt("interface-management-profile", self.management_profile.as_deref());
        elem.push_opt("mtu", self.mtu.map(|v| v.to_string()).as_deref());
        elem.push_opt("netflow-profile", self.netflow_profile.as_deref());
        self.mss.encode(&mut elem);

        if !self.static_ips.is_empty() {
            let mut ip = Element::new("ip");
            for addr in &self.static_ips {
                ip.push(Element::entry(addr.as_str()));
            }
            elem.push(ip);
        }

        if let Some(dhcp) = &self.dhcp {
            let mut d = Element::new("dhcp-client");
            d.push_opt("enable", dhcp.enable.as_deref());
            d.push_opt("create-default-route", dhcp.create_default_route.as_deref());
            d.push_opt("default-route-metric", dhcp.metric.map(|v| v.to_string()).as_deref());
            elem.push(d);
        }

        push_raw(&mut elem, "arp", self.arp.as_ref());
        push_raw(&mut elem, "units", self.subinterface.as_ref());
        elem
    }

    fn normalize(self, raw: &mut RawMap) -> Layer3Settings {
        let mut settings = Layer3Settings {
            static_ips: self.static_ips,
            ipv6_enabled: as_bool(self.ipv6_enabled.as_deref()),
            management_profile: self.management_profile,
            mtu: self.mtu,
            netflow_profile: self.netflow_profile,
            ..Default::default()
        };
        self.mss.normalize(&mut settings);
        if let Some(dhcp) = self.dhcp {
            settings.enable_dhcp = as_bool(dhcp.enable.as_deref());
            settings.create_dhcp_default_route = as_bool(dhcp.create_default_route.as_deref());
            settings.dhcp_default_route_metric = dhcp.metric;
        }
        if let Some(arp) = self.arp {
            raw.insert(RawSection::Arp, arp);
        }
        if let Some(units) = self.subinterface {
            raw.insert(RawSection::L3Subinterface, units);
        }
        if let Some(address) = self.ipv6_address {
            raw.insert(RawSection::Ipv6Address, address);
        }
        settings
    }

    fn specify(settings: &Layer3Settings, raw: Option<&RawMap>) -> Self {
        let section = |s: RawSection| raw.and_then(|r| r.get(&s)).cloned();
        let dhcp = settings.has_dhcp().then(|| DhcpWire {
            enable: Some(yes_no(settings.enable_dhcp).to_string()),
            create_default_route: Some(yes_no(settings.create_dhcp_default_route).to_string()),
            metric: settings.dhcp_default_route_metric,
        });

        Self {
            ipv6_enabled: Some(yes_no(settings.ipv6_enabled).to_string()),
            ipv6_address: section(RawSection::Ipv6Address),
            management_profile: settings.management_profile.clone(),
            mtu: settings.mtu,
            netflow_profile: settings.netflow_profile.clone(),
            mss: M::specify(settings),
            static_ips: settings.static_ips.clone(),
            dhcp,
            arp: section(RawSection::Arp),
            subinterface: section(RawSection::L3Subinterface),
        }
    }
}

/// Shared layout of `layer2` and `virtual-wire`
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct OtherMode {
    lldp_enabled: Option<String>,
    lldp_profile: Option<String>,
    netflow_profile: Option<String>,
    subinterface: Option<String>,
}

impl OtherMode {
    fn decode(elem: &Element) -> Result<Self, PanosError> {
        Ok(Self {
            lldp_enabled: text(elem, &["lldp", "enable"]),
            lldp_profile: text(elem, &["lldp", "profile"]),
            netflow_profile: text(elem, &["netflow-profile"]),
            subinterface: raw_inner(elem, "units")?,
        })
    }

    fn encode(&self, name: &str) -> Element {
        let mut elem = Element::new(name);
        let mut lldp = Element::new("lldp");
        lldp.push_opt("enable", self.lldp_enabled.as_deref());
        lldp.push_opt("profile", self.lldp_profile.as_deref());
        if !lldp.children.is_empty() {
            elem.push(lldp);
        }
        elem.push_opt("netflow-profile", self.netflow_profile.as_deref());
        push_raw(&mut elem, "units", self.subinterface.as_ref());
        elem
    }

    fn normalize(self) -> (Layer2Settings, Option<String>) {
        let settings = Layer2Settings {
            lldp_enabled: as_bool(self.lldp_enabled.as_deref()),
            lldp_profile: self.lldp_profile,
            netflow_profile: self.netflow_profile,
        };
        (settings, self.subinterface)
    }

    fn specify(settings: &Layer2Settings, subinterface: Option<String>) -> Self {
        Self {
            lldp_enabled: Some(yes_no(settings.lldp_enabled).to_string()),
            lldp_profile: settings.lldp_profile.clone(),
            netflow_profile: settings.netflow_profile.clone(),
            subinterface,
        }
    }
}

/// One ethernet `entry` as laid out on the wire
///
/// The device schema makes the mode blocks mutually exclusive; when more
/// than one is present the first in layer3, layer2, virtual-wire, tap, ha,
/// decrypt-mirror, aggregate-group order wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EntryWire<M> {
    name: String,
    layer3: Option<Layer3Wire<M>>,
    layer2: Option<OtherMode>,
    virtual_wire: Option<OtherMode>,
    tap: bool,
    ha: bool,
    decrypt_mirror: bool,
    aggregate_group: Option<String>,
    link_speed: Option<String>,
    link_duplex: Option<String>,
    link_state: Option<String>,
    comment: Option<String>,
}

impl<M: TcpMss> WireSchema for EntryWire<M> {
    type Entry = Entry;

    fn decode(elem: &Element) -> Result<Self, PanosError> {
        Ok(Self {
            name: elem.attribute("name").unwrap_or_default().to_string(),
            layer3: elem.find("layer3").map(Layer3Wire::decode).transpose()?,
            layer2: elem.find("layer2").map(OtherMode::decode).transpose()?,
            virtual_wire: elem.find("virtual-wire").map(OtherMode::decode).transpose()?,
            tap: elem.find("tap").is_some(),
            ha: elem.find("ha").is_some(),
            decrypt_mirror: elem.find("decrypt-mirror").is_some(),
            aggregate_group: text(elem, &["aggregate-group"]),
            link_speed: text(elem, &["link-speed"]),
            link_duplex: text(elem, &["link-duplex"]),
            link_state: text(elem, &["link-state"]),
            comment: text(elem, &["comment"]),
        })
    }

    fn encode(&self) -> Element {
        let mut elem = Element::entry(self.name.as_str());
        if let Some(l3) = &self.layer3 {
            elem.push(l3.encode());
        }
        if let Some(l2) = &self.layer2 {
            elem.push(l2.encode("layer2"));
        }
        if let Some(vw) = &self.virtual_wire {
            elem.push(vw.encode("virtual-wire"));
        }
        if self.tap {
            elem.push(Element::new("tap"));
        }
        if self.ha {
            elem.push(Element::new("ha"));
        }
        if self.decrypt_mirror {
            elem.push(Element::new("decrypt-mirror"));
        }
        elem.push_opt("aggregate-group", self.aggregate_group.as_deref());
        elem.push_opt("link-speed", self.link_speed.as_deref());
        elem.push_opt("link-duplex", self.link_duplex.as_deref());
        elem.push_opt("link-state", self.link_state.as_deref());
        elem.push_opt("comment", self.comment.as_deref());
        elem
    }

    fn normalize(self) -> Entry {
        let mut raw = RawMap::new();
        let mode = if let Some(l3) = self.layer3 {
            Some(Mode::Layer3(l3.normalize(&mut raw)))
        } else if let Some(l2) = self.layer2 {
            let (settings, units) = l2.normalize();
            if let Some(units) = units {
                raw.insert(RawSection::L2Subinterface, units);
            }
            Some(Mode::Layer2(settings))
        } else if let Some(vw) = self.virtual_wire {
            let (settings, units) = vw.normalize();
            if let Some(units) = units {
                raw.insert(RawSection::VwSubinterface, units);
            }
            Some(Mode::VirtualWire(settings))
        } else if self.tap {
            Some(Mode::Tap)
        } else if self.ha {
            Some(Mode::Ha)
        } else if self.decrypt_mirror {
            Some(Mode::DecryptMirror)
        } else {
            self.aggregate_group.map(Mode::AggregateGroup)
        };

        let mut entry = Entry {
            name: self.name,
            mode,
            link_speed: self.link_speed,
            link_duplex: self.link_duplex,
            link_state: self.link_state,
            comment: self.comment,
            ..Default::default()
        };
        entry.set_raw(raw);
        entry
    }

    fn specify(entry: &Entry) -> Self {
        let raw = entry.raw_sections();
        let mut wire = Self {
            name: entry.name.clone(),
            link_speed: entry.link_speed.clone(),
            link_duplex: entry.link_duplex.clone(),
            link_state: entry.link_state.clone(),
            comment: entry.comment.clone(),
            ..Default::default()
        };

        match &entry.mode {
            Some(Mode::Layer3(settings)) => {
                wire.layer3 = Some(Layer3Wire::specify(settings, raw));
            }
            Some(Mode::Layer2(settings)) => {
                let units = entry.raw_section(RawSection::L2Subinterface).map(str::to_string);
                wire.layer2 = Some(OtherMode::specify(settings, units));
            }
            Some(Mode::VirtualWire(settings)) => {
                let units = entry.raw_section(RawSection::VwSubinterface).map(str::to_string);
                wire.virtual_wire = Some(OtherMode::specify(settings, units));
            }
            Some(Mode::Tap) => wire.tap = true,
            Some(Mode::Ha) => wire.ha = true,
            Some(Mode::DecryptMirror) => wire.decrypt_mirror = true,
            Some(Mode::AggregateGroup(group)) => wire.aggregate_group = Some(group.clone()),
            None => {}
        }
        wire
    }
}
