//! Helpers shared by the XML reader and writer.

/// Key under which character data of an element that also has attributes or
/// child elements is stored.
pub const TEXT_KEY: &str = "$text";

/// Checks if an attribute is a namespace declaration (`xmlns`, `xmlns:x`).
///
/// Namespace declarations are document plumbing, not entity data, so they
/// never reach the tree.
pub fn is_namespace_attribute(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

/// Resolves the name of a general reference (`amp`, `#38`, `#x26`).
///
/// Returns `None` for entities that are neither predefined nor valid
/// character references.
pub fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    quick_xml::escape::resolve_predefined_entity(name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_namespace_attribute() {
        assert!(is_namespace_attribute("xmlns"));
        assert!(is_namespace_attribute("xmlns:xsi"));
        assert!(!is_namespace_attribute("name"));
        assert!(!is_namespace_attribute("xmlnsish"));
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("amp").as_deref(), Some("&"));
        assert_eq!(resolve_reference("lt").as_deref(), Some("<"));
        assert_eq!(resolve_reference("#38").as_deref(), Some("&"));
        assert_eq!(resolve_reference("#x26").as_deref(), Some("&"));
        assert_eq!(resolve_reference("nbsp"), None);
        assert_eq!(resolve_reference("#xZZ"), None);
    }
}
