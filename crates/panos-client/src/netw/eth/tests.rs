use super::*;
use crate::mock::{Call, MockXapiClient, Primitive};
use crate::version::Version;

const ROOT: &str = "/config/devices/entry[@name='localhost.localdomain']/network/interface";

fn setup(version: Version) -> (Eth, MockXapiClient) {
    let mock = MockXapiClient::new(version);
    let eth = Eth::new(Arc::new(mock.clone()));
    (eth, mock)
}

fn l3(name: &str) -> Entry {
    Entry::new(name).with_mode(Mode::Layer3(Layer3Settings {
        static_ips: vec!["10.0.0.1/24".to_string()],
        ..Default::default()
    }))
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_xpath_shapes() {
    let (eth, _) = setup(Version::new(8, 0, 0));
    let none: [&str; 0] = [];

    let container = eth.xpath(&none).to_string();
    assert_eq!(container, format!("{}/ethernet", ROOT));

    let one = eth.xpath(&["ethernet1/1"]).to_string();
    assert_eq!(one, format!("{}/ethernet/entry[@name='ethernet1/1']", ROOT));

    let many = eth.xpath(&["ethernet1/1", "ethernet1/2"]).to_string();
    assert_eq!(
        many,
        format!("{}/ethernet/entry[@name='ethernet1/1' or @name='ethernet1/2']", ROOT)
    );
    assert_ne!(many, one);
    assert_ne!(many, container);
}

#[tokio::test]
async fn test_get_list_uses_container_path() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    mock.add_response(
        format!("{}/ethernet", ROOT),
        r#"<response status="success"><result><ethernet>
            <entry name="ethernet1/3"/><entry name="ethernet1/1"/>
        </ethernet></result></response>"#,
    );

    let list = eth.get_list().await.unwrap();
    assert_eq!(list, names(&["ethernet1/3", "ethernet1/1"]));
    assert_eq!(mock.calls(), vec![Call::Get(format!("{}/ethernet", ROOT))]);

    let shown = eth.show_list().await.unwrap();
    assert_eq!(shown, list);
    assert_eq!(mock.primitives(), vec![Primitive::Get, Primitive::Show]);
}

#[tokio::test]
async fn test_get_normalizes_with_device_schema() {
    let (eth, mock) = setup(Version::new(7, 1, 0));
    mock.add_response(
        format!("{}/ethernet/entry[@name='ethernet1/1']", ROOT),
        r#"<response status="success"><result total-count="1" count="1">
            <entry name="ethernet1/1">
              <layer3>
                <adjust-tcp-mss><enable>yes</enable><ipv6-mss-adjustment>80</ipv6-mss-adjustment></adjust-tcp-mss>
                <ip><entry name="10.0.0.1/24"/></ip>
              </layer3>
              <comment>core</comment>
            </entry>
        </result></response>"#,
    );

    let entry = eth.get("ethernet1/1").await.unwrap();
    assert_eq!(entry.name, "ethernet1/1");
    assert_eq!(entry.comment.as_deref(), Some("core"));
    match entry.mode {
        Some(Mode::Layer3(settings)) => {
            assert!(settings.adjust_tcp_mss);
            assert_eq!(settings.ipv6_mss_adjust, Some(80));
            assert_eq!(settings.static_ips, names(&["10.0.0.1/24"]));
        }
        other => panic!("expected layer3, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_missing_entry() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    let err = eth.show("ethernet1/9").await.unwrap_err();
    assert!(matches!(err, PanosError::ObjectNotFound(ref n) if n == "ethernet1/9"));
    assert_eq!(mock.primitives(), vec![Primitive::Show]);
}

#[tokio::test]
async fn test_get_propagates_transport_error() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    mock.fail(Primitive::Get);
    let err = eth.get("ethernet1/1").await.unwrap_err();
    assert!(matches!(err, PanosError::Api { .. }));
}

#[tokio::test]
async fn test_single_set_uses_edit_path() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    let entry = l3("ethernet1/1");

    eth.set("", std::slice::from_ref(&entry)).await.unwrap();
    eth.edit("", &entry).await.unwrap();

    let calls = mock.calls();
    let (set_path, set_body) = match &calls[0] {
        Call::Set { xpath, element } => (xpath.clone(), element.clone()),
        other => panic!("expected set, got {:?}", other),
    };
    let (edit_path, edit_body) = match &calls[1] {
        Call::Edit { xpath, element } => (xpath.clone(), element.clone()),
        other => panic!("expected edit, got {:?}", other),
    };
    assert_eq!(set_path, edit_path);
    assert_eq!(set_path, format!("{}/ethernet/entry[@name='ethernet1/1']", ROOT));
    assert!(set_body.starts_with("<layer3>"));
    assert!(edit_body.starts_with(r#"<entry name="ethernet1/1">"#));
    assert!(edit_body.ends_with(&format!("{}</entry>", set_body)));
}

#[tokio::test]
async fn test_bulk_set_uses_container_path() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    let entries = vec![l3("ethernet1/1"), l3("ethernet1/2"), Entry::new("ethernet1/3").with_mode(Mode::Tap)];

    eth.set("", &entries).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Call::Set { xpath, element } => {
            assert_eq!(xpath, ROOT);
            let body = Element::parse(element).unwrap();
            assert_eq!(body.name, "ethernet");
            assert_eq!(
                crate::xml::entry_names(&body),
                names(&["ethernet1/1", "ethernet1/2", "ethernet1/3"])
            );
        }
        other => panic!("expected set, got {:?}", other),
    }
}

#[tokio::test]
async fn test_set_imports_all_but_ha_and_aggregate_members() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    let entries = vec![
        Entry::new("ethernet1/1").with_mode(Mode::Ha),
        l3("ethernet1/2"),
        Entry::new("ethernet1/3").with_mode(Mode::AggregateGroup("ae1".to_string())),
    ];

    eth.set("vsys2", &entries).await.unwrap();

    assert_eq!(mock.primitives(), vec![Primitive::Set, Primitive::Import]);
    assert_eq!(
        mock.calls()[1],
        Call::Import {
            vsys: "vsys2".to_string(),
            names: names(&["ethernet1/2"]),
        }
    );
}

#[tokio::test]
async fn test_set_skips_import_without_eligible_entries() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    eth.set("vsys1", &[Entry::new("ethernet1/1").with_mode(Mode::Ha)]).await.unwrap();
    eth.edit("vsys1", &Entry::new("ethernet1/2").with_mode(Mode::AggregateGroup("ae2".to_string())))
        .await
        .unwrap();
    assert_eq!(mock.primitives(), vec![Primitive::Set, Primitive::Edit]);
}

#[tokio::test]
async fn test_empty_batches_are_no_ops() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    eth.set("vsys1", &[]).await.unwrap();
    let none: [&str; 0] = [];
    eth.delete("vsys1", &none).await.unwrap();
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_set_import_failure_is_partial() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    mock.fail(Primitive::Import);

    let err = eth.set("vsys1", &[l3("ethernet1/1"), l3("ethernet1/2")]).await.unwrap_err();
    match err {
        PanosError::Partial { operation, committed, source } => {
            assert_eq!(operation, "set");
            assert_eq!(committed, names(&["ethernet1/1", "ethernet1/2"]));
            assert!(matches!(*source, PanosError::Api { .. }));
        }
        other => panic!("expected partial, got {:?}", other),
    }
    assert_eq!(mock.primitives(), vec![Primitive::Set, Primitive::Import]);
}

#[tokio::test]
async fn test_edit_import_failure_is_partial() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    mock.fail(Primitive::Import);
    let err = eth.edit("vsys1", &l3("ethernet1/4")).await.unwrap_err();
    assert!(err.is_partial());
}

#[tokio::test]
async fn test_set_failure_skips_import() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    mock.fail(Primitive::Set);
    let err = eth.set("vsys1", &[l3("ethernet1/1")]).await.unwrap_err();
    assert!(!err.is_partial());
    assert_eq!(mock.primitives(), vec![Primitive::Set]);
}

#[tokio::test]
async fn test_delete_unimports_first() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    eth.delete("vsys1", &["ethernet1/1", "ethernet1/2"]).await.unwrap();

    assert_eq!(
        mock.calls(),
        vec![
            Call::Unimport {
                vsys: "vsys1".to_string(),
                names: names(&["ethernet1/1", "ethernet1/2"]),
            },
            Call::Delete(format!(
                "{}/ethernet/entry[@name='ethernet1/1' or @name='ethernet1/2']",
                ROOT
            )),
        ]
    );
}

#[tokio::test]
async fn test_delete_unimport_failure_never_deletes() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    mock.fail(Primitive::Unimport);
    let err = eth.delete("vsys1", &["ethernet1/1"]).await.unwrap_err();
    assert!(matches!(err, PanosError::Api { .. }));
    assert_eq!(mock.primitives(), vec![Primitive::Unimport]);
}

#[tokio::test]
async fn test_delete_failure_after_unimport_is_partial() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    mock.fail(Primitive::Delete);
    let err = eth.delete("vsys1", &[l3("ethernet1/5")]).await.unwrap_err();
    match err {
        PanosError::Partial { operation, committed, .. } => {
            assert_eq!(operation, "delete");
            assert_eq!(committed, names(&["ethernet1/5"]));
        }
        other => panic!("expected partial, got {:?}", other),
    }

    let (eth, mock) = setup(Version::new(8, 0, 0));
    mock.fail(Primitive::Delete);
    let err = eth.delete("", &["ethernet1/5"]).await.unwrap_err();
    assert!(!err.is_partial());
}

#[tokio::test]
async fn test_delete_entries_skip_unimport_for_ha() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    let targets = vec![Entry::new("ethernet1/1").with_mode(Mode::Ha), l3("ethernet1/2")];
    eth.delete("vsys3", &targets).await.unwrap();

    let calls = mock.calls();
    assert_eq!(
        calls[0],
        Call::Unimport {
            vsys: "vsys3".to_string(),
            names: names(&["ethernet1/2"]),
        }
    );
    assert_eq!(
        calls[1],
        Call::Delete(format!(
            "{}/ethernet/entry[@name='ethernet1/1' or @name='ethernet1/2']",
            ROOT
        ))
    );
}

#[tokio::test]
async fn test_delete_without_vsys_skips_unimport() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    eth.delete("", &[String::from("ethernet1/1")]).await.unwrap();
    assert_eq!(mock.primitives(), vec![Primitive::Delete]);
}

#[tokio::test]
async fn test_read_then_write_preserves_arp_fragment() {
    let (eth, mock) = setup(Version::new(8, 1, 0));
    let arp = r#"<entry name="10.0.0.9"><hw-address>00:0c:29:aa:bb:cc</hw-address><interface>ethernet1/1</interface></entry>"#;
    mock.add_response(
        format!("{}/ethernet/entry[@name='ethernet1/1']", ROOT),
        format!(
            r#"<response status="success"><result>
                <entry name="ethernet1/1"><layer3>
                  <arp>
                    {}
                  </arp>
                </layer3></entry>
            </result></response>"#,
            arp
        ),
    );

    let mut entry = eth.get("ethernet1/1").await.unwrap();
    assert_eq!(entry.raw_section(RawSection::Arp), Some(arp));
    entry.comment = Some("touched".to_string());
    eth.edit("", &entry).await.unwrap();

    match &mock.calls()[1] {
        Call::Edit { element, .. } => {
            assert!(element.contains(&format!("<arp>{}</arp>", arp)));
        }
        other => panic!("expected edit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_schema_follows_device_version() {
    let (eth, mock) = setup(Version::new(7, 0, 1));
    let mut entry = l3("ethernet1/1");
    if let Some(Mode::Layer3(settings)) = &mut entry.mode {
        settings.adjust_tcp_mss = true;
    }

    eth.edit("", &entry).await.unwrap();
    mock.set_version(Version::new(7, 1, 0));
    eth.edit("", &entry).await.unwrap();

    let bodies: Vec<String> = mock
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Edit { element, .. } => Some(element),
            _ => None,
        })
        .collect();
    assert!(bodies[0].contains("<adjust-tcp-mss>yes</adjust-tcp-mss>"));
    assert!(bodies[1].contains("<adjust-tcp-mss><enable>yes</enable></adjust-tcp-mss>"));
}

#[tokio::test]
async fn test_set_of_bare_entry_writes_whole_entry_at_container() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    eth.set("", &[Entry::new("ethernet1/9")]).await.unwrap();

    assert_eq!(
        mock.calls(),
        vec![Call::Set {
            xpath: format!("{}/ethernet", ROOT),
            element: r#"<entry name="ethernet1/9"/>"#.to_string(),
        }]
    );
}

#[tokio::test]
async fn test_read_then_write_preserves_virtual_wire_units() {
    let (eth, mock) = setup(Version::new(8, 0, 0));
    let units = r#"<entry name="ethernet1/1.5"><tag>5</tag></entry>"#;
    mock.add_response(
        format!("{}/ethernet/entry[@name='ethernet1/1']", ROOT),
        format!(
            r#"<response status="success"><result>
                <entry name="ethernet1/1"><virtual-wire>
                  <lldp><enable>no</enable></lldp>
                  <units>{}</units>
                </virtual-wire></entry>
            </result></response>"#,
            units
        ),
    );

    let entry = eth.get("ethernet1/1").await.unwrap();
    assert_eq!(entry.mode_kind(), Some(ModeKind::VirtualWire));
    assert_eq!(entry.raw_section(RawSection::VwSubinterface), Some(units));
    eth.edit("", &entry).await.unwrap();

    match &mock.calls()[1] {
        Call::Edit { element, .. } => {
            assert!(element.contains(&format!("<units>{}</units></virtual-wire>", units)));
        }
        other => panic!("expected edit, got {:?}", other),
    }
}
