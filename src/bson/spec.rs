//! BSON element type tags and binary subtypes.
//!
//! Tag values follow the BSON 1.1 specification. The deprecated tags are
//! listed so the reader can name them in its error messages, but they have
//! no [`Value`](super::Value) counterpart.

/// Element type tag of a BSON field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElementType {
    Double = 0x01,
    String = 0x02,
    EmbeddedDocument = 0x03,
    Array = 0x04,
    Binary = 0x05,
    ObjectId = 0x07,
    Boolean = 0x08,
    DateTime = 0x09,
    Null = 0x0A,
    RegularExpression = 0x0B,
    JavaScriptCode = 0x0D,
    Int32 = 0x10,
    Timestamp = 0x11,
    Int64 = 0x12,
    Decimal128 = 0x13,
    MaxKey = 0x7F,
    MinKey = 0xFF,
}

impl ElementType {
    /// Map a tag byte to its element type, `None` for anything outside the
    /// supported set.
    pub fn from_u8(tag: u8) -> Option<Self> {
        let ty = match tag {
            0x01 => ElementType::Double,
            0x02 => ElementType::String,
            0x03 => ElementType::EmbeddedDocument,
            0x04 => ElementType::Array,
            0x05 => ElementType::Binary,
            0x07 => ElementType::ObjectId,
            0x08 => ElementType::Boolean,
            0x09 => ElementType::DateTime,
            0x0A => ElementType::Null,
            0x0B => ElementType::RegularExpression,
            0x0D => ElementType::JavaScriptCode,
            0x10 => ElementType::Int32,
            0x11 => ElementType::Timestamp,
            0x12 => ElementType::Int64,
            0x13 => ElementType::Decimal128,
            0x7F => ElementType::MaxKey,
            0xFF => ElementType::MinKey,
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Human-readable name of a deprecated tag, if `tag` is one.
pub fn deprecated_name(tag: u8) -> Option<&'static str> {
    match tag {
        0x06 => Some("undefined"),
        0x0C => Some("DBPointer"),
        0x0E => Some("symbol"),
        0x0F => Some("JavaScript code with scope"),
        _ => None,
    }
}

/// Binary subtypes the codec produces itself. Every other subtype byte is
/// carried through unchanged.
pub mod binary_subtype {
    /// RFC 4122 UUID, the subtype a `$uuid` value decodes to.
    pub const UUID: u8 = 0x04;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_mapping() {
        for tag in 0u8..=255 {
            if let Some(ty) = ElementType::from_u8(tag) {
                assert_eq!(ty.as_u8(), tag);
            }
        }
        assert_eq!(ElementType::from_u8(0x13), Some(ElementType::Decimal128));
        assert_eq!(ElementType::from_u8(0xFF), Some(ElementType::MinKey));
        assert_eq!(ElementType::from_u8(0x00), None);
    }

    #[test]
    fn test_deprecated_tags_are_not_supported() {
        for tag in [0x06u8, 0x0C, 0x0E, 0x0F] {
            assert!(ElementType::from_u8(tag).is_none());
            assert!(deprecated_name(tag).is_some());
        }
        assert_eq!(deprecated_name(0x0E), Some("symbol"));
        assert_eq!(deprecated_name(0x02), None);
    }
}
