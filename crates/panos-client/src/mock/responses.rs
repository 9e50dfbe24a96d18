//! Response documents returned by the mock

/// A successful write response
pub fn success() -> String {
    r#"<response status="success" code="20"><msg>command succeeded</msg></response>"#.to_string()
}

/// A successful read that matched nothing
pub fn empty_result() -> String {
    r#"<response status="success"><result total-count="0" count="0"/></response>"#.to_string()
}
