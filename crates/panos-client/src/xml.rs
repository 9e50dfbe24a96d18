//! Owned XML element tree for PAN-OS API payloads
//!
//! Responses are read into an [`Element`] tree with `quick_xml::Reader`
//! (whitespace-only text between tags dropped, other text kept as is) and
//! request bodies are written back out with `quick_xml::Writer`. An element may carry verbatim inner
//! content instead of children; that content is written unescaped, which is
//! how pass-through configuration fragments are re-emitted byte for byte.

use crate::error::PanosError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// A single XML element with its attributes, children and text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<Element>,
    /// Text content, unescaped
    pub text: Option<String>,
    verbatim: Option<String>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an element holding only text
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create an element whose inner content is written verbatim
    pub fn verbatim(name: impl Into<String>, inner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verbatim: Some(inner.into()),
            ..Default::default()
        }
    }

    /// Create an `entry` element keyed by `name`
    pub fn entry(name: impl Into<String>) -> Self {
        Self::new("entry").attr("name", name)
    }

    /// Builder: add an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder: append a child
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append a text child when `value` is present
    pub fn push_opt(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.children.push(Element::with_text(name, value));
        }
    }

    /// Look up an attribute value
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First child with the given name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Walk a chain of child names, e.g. `["result", "entry"]`
    pub fn path(&self, names: &[&str]) -> Option<&Element> {
        names.iter().try_fold(self, |elem, name| elem.find(name))
    }

    /// Text of a nested child; an empty element yields `Some("")`
    pub fn text_at(&self, names: &[&str]) -> Option<&str> {
        self.path(names)
            .map(|e| e.text.as_deref().unwrap_or_default())
    }

    /// True if the element has no attributes, children, text or verbatim content
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
            && self.children.is_empty()
            && self.text.is_none()
            && self.verbatim.is_none()
    }

    /// Compact serialization of this element's content, without the element itself.
    ///
    /// Whitespace between elements is not preserved, so reading a fragment
    /// and writing it again is stable.
    pub fn inner_xml(&self) -> Result<String, PanosError> {
        if let Some(verbatim) = &self.verbatim {
            return Ok(verbatim.clone());
        }
        let mut writer = Writer::new(Vec::new());
        if let Some(text) = &self.text {
            write_event(&mut writer, Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(&mut writer)?;
        }
        into_string(writer)
    }

    /// Serialize this element as a compact XML document fragment
    pub fn to_xml(&self) -> Result<String, PanosError> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        into_string(writer)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), PanosError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let has_content = self.text.is_some() || self.verbatim.is_some() || !self.children.is_empty();
        if !has_content {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        if let Some(verbatim) = &self.verbatim {
            write_event(writer, Event::Text(BytesText::from_escaped(verbatim.as_str())))?;
        } else {
            if let Some(text) = &self.text {
                write_event(writer, Event::Text(BytesText::new(text)))?;
            }
            for child in &self.children {
                child.write_to(writer)?;
            }
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }

    /// Parse a document and return its root element
    pub fn parse(input: &str) -> Result<Element, PanosError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(|e| xml_error(&reader, e))? {
                Event::Start(start) => {
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let elem = element_from_start(&start)?;
                    attach(&mut stack, &mut root, elem)?;
                }
                Event::End(_) => {
                    let elem = stack
                        .pop()
                        .ok_or_else(|| PanosError::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, elem)?;
                }
                Event::Text(text) => {
                    let value = text
                        .unescape()
                        .map_err(|e| PanosError::Xml(e.to_string()))?;
                    if !value.trim().is_empty() {
                        append_text(&mut stack, &value);
                    }
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    append_text(&mut stack, &value);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(PanosError::Xml(format!(
                "unexpected end of document inside <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }
        root.ok_or_else(|| PanosError::Xml("document has no root element".to_string()))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, PanosError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut elem = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| PanosError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| PanosError::Xml(e.to_string()))?
            .into_owned();
        elem.attributes.push((key, value));
    }
    Ok(elem)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, elem: Element) -> Result<(), PanosError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(elem);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(elem);
            Ok(())
        }
        None => Err(PanosError::Xml(format!(
            "multiple root elements, second is <{}>",
            elem.name
        ))),
    }
}

fn append_text(stack: &mut [Element], value: &str) {
    if let Some(current) = stack.last_mut() {
        match &mut current.text {
            Some(existing) => existing.push_str(value),
            None => current.text = Some(value.to_string()),
        }
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), PanosError> {
    writer
        .write_event(event)
        .map_err(|e| PanosError::Xml(e.to_string()))
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String, PanosError> {
    String::from_utf8(writer.into_inner()).map_err(|e| PanosError::Xml(e.to_string()))
}

fn xml_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> PanosError {
    PanosError::Xml(format!("at byte {}: {}", reader.buffer_position(), err))
}

/// Convert a boolean to the device's `yes`/`no` token
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Read a `yes`/`no` token; anything other than `yes` is false
pub fn as_bool(token: Option<&str>) -> bool {
    token == Some("yes")
}

/// Build a `<member>` list element, or `None` for an empty list
pub fn member_list(name: &str, members: &[String]) -> Option<Element> {
    if members.is_empty() {
        return None;
    }
    let mut list = Element::new(name);
    for m in members {
        list.push(Element::with_text("member", m.as_str()));
    }
    Some(list)
}

/// Entry names listed under an element, in document order
pub fn entry_names(elem: &Element) -> Vec<String> {
    elem.find_all("entry")
        .filter_map(|e| e.attribute("name"))
        .map(str::to_string)
        .collect()
}

/// Parse an optional numeric field
pub fn parse_num(elem: &Element, names: &[&str]) -> Result<Option<u32>, PanosError> {
    match elem.text_at(names) {
        None => Ok(None),
        Some(text) => text.trim().parse().map(Some).map_err(|e| {
            PanosError::Decode(format!("{} in <{}>: {:?}: {}", names.join(">"), elem.name, text, e))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let doc = r#"<response status="success"><result total-count="1" count="1">
            <entry name="ethernet1/1">
              <layer3><mtu>1500</mtu></layer3>
              <comment>uplink &amp; core</comment>
            </entry>
        </result></response>"#;
        let root = Element::parse(doc).unwrap();
        assert_eq!(root.name, "response");
        assert_eq!(root.attribute("status"), Some("success"));
        let entry = root.path(&["result", "entry"]).unwrap();
        assert_eq!(entry.attribute("name"), Some("ethernet1/1"));
        assert_eq!(entry.text_at(&["layer3", "mtu"]), Some("1500"));
        assert_eq!(entry.text_at(&["comment"]), Some("uplink & core"));
        assert_eq!(entry.text_at(&["missing"]), None);
    }

    #[test]
    fn test_empty_element_text_is_empty_string() {
        let root = Element::parse("<a><b/></a>").unwrap();
        assert_eq!(root.text_at(&["b"]), Some(""));
    }

    #[test]
    fn test_inner_xml_is_compact() {
        let doc = "<arp>\n   <entry name=\"10.0.0.1\">\n     <hw-address>00:11:22:33:44:55</hw-address>\n   </entry>\n</arp>";
        let root = Element::parse(doc).unwrap();
        assert_eq!(
            root.inner_xml().unwrap(),
            r#"<entry name="10.0.0.1"><hw-address>00:11:22:33:44:55</hw-address></entry>"#
        );
    }

    #[test]
    fn test_text_keeps_surrounding_spaces() {
        let root = Element::parse("<entry>\n  <comment> edge </comment>\n  <blank>  </blank>\n</entry>").unwrap();
        assert_eq!(root.text, None);
        assert_eq!(root.text_at(&["comment"]), Some(" edge "));
        assert_eq!(root.text_at(&["blank"]), Some(""));
    }

    #[test]
    fn test_verbatim_written_unescaped() {
        let elem = Element::new("layer3").child(Element::verbatim("arp", "<entry name=\"x\"/>"));
        assert_eq!(elem.to_xml().unwrap(), r#"<layer3><arp><entry name="x"/></arp></layer3>"#);
    }

    #[test]
    fn test_text_escaped_on_write() {
        let elem = Element::with_text("comment", "a < b");
        assert_eq!(elem.to_xml().unwrap(), "<comment>a &lt; b</comment>");
    }

    #[test]
    fn test_parse_rejects_unbalanced() {
        assert!(matches!(Element::parse("<a><b></a>"), Err(PanosError::Xml(_))));
        assert!(matches!(Element::parse("<a>"), Err(PanosError::Xml(_))));
        assert!(matches!(Element::parse(""), Err(PanosError::Xml(_))));
    }

    #[test]
    fn test_parse_num() {
        let root = Element::parse("<l3><mtu>9000</mtu><bad>x</bad></l3>").unwrap();
        assert_eq!(parse_num(&root, &["mtu"]).unwrap(), Some(9000));
        assert_eq!(parse_num(&root, &["nope"]).unwrap(), None);
        assert!(matches!(parse_num(&root, &["bad"]), Err(PanosError::Decode(_))));
    }

    #[test]
    fn test_entry_names_in_document_order() {
        let root = Element::parse(
            r#"<ethernet><entry name="ethernet1/3"/><entry name="ethernet1/1"/></ethernet>"#,
        )
        .unwrap();
        assert_eq!(entry_names(&root), vec!["ethernet1/3", "ethernet1/1"]);
    }
}
