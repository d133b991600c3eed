//! Small helpers shared by the quick-xml readers in this crate.

use pptmd_core::{Error, Result};
use quick_xml::events::BytesStart;
use quick_xml::Reader;

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Value of the attribute whose full (prefixed) key is `key`.
pub(crate) fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| match a.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
        })
}

/// Value of a namespaced relationship id attribute (`r:id` or any other prefix).
pub(crate) fn rel_id(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| {
            let key = a.key.as_ref();
            key.contains(&b':') && local_name(key) == b"id"
        })
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
        .filter(|id| !id.is_empty())
}

/// Parse an integer attribute, ignoring malformed values.
pub(crate) fn attr_num<T: std::str::FromStr>(e: &BytesStart, key: &[u8]) -> Option<T> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// OOXML boolean attribute (`1`/`true`).
pub(crate) fn attr_flag(e: &BytesStart, key: &[u8]) -> bool {
    matches!(attr(e, key).as_deref(), Some("1") | Some("true"))
}

/// Consume events up to and including the end of `start`.
pub(crate) fn skip_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<()> {
    reader
        .read_to_end(start.name())
        .map(|_| ())
        .map_err(|e| Error::XmlError(format!("Error skipping element: {}", e)))
}
