use super::{Node, NodeKind};

/// Coarse classification of a type-name node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeInfo<'a> {
    /// `uint`, `uint8`, ..., `uint256`; carries the spelled name.
    Uint(&'a str),
    /// `int`, `int8`, ..., `int256`; carries the spelled name.
    Int(&'a str),
    Bool,
    Address { payable: bool },
    /// `bytes1` through `bytes32`.
    FixedBytes,
    Bytes,
    String,
    Mapping,
    Array,
    UserDefined(&'a str),
    Other,
}

impl<'a> TypeInfo<'a> {
    pub fn of(type_name: &'a Node) -> Self {
        match &type_name.kind {
            NodeKind::ElementaryTypeName(elementary) => {
                let payable = elementary.state_mutability.as_deref() == Some("payable");
                Self::elementary(&elementary.name, payable)
            }
            NodeKind::UserDefinedTypeName(user) => Self::UserDefined(&user.name_path),
            NodeKind::Mapping(_) => Self::Mapping,
            NodeKind::ArrayTypeName(_) => Self::Array,
            _ => Self::Other,
        }
    }

    fn elementary(name: &'a str, payable: bool) -> Self {
        match name {
            "bool" => Self::Bool,
            "address" => Self::Address { payable },
            "bytes" => Self::Bytes,
            "string" => Self::String,
            "byte" => Self::FixedBytes,
            _ if name.strip_prefix("uint").is_some_and(|bits| is_width(bits, 8, 256)) => {
                Self::Uint(name)
            }
            _ if name.strip_prefix("int").is_some_and(|bits| is_width(bits, 8, 256)) => {
                Self::Int(name)
            }
            _ if name.strip_prefix("bytes").is_some_and(|len| is_width(len, 1, 32)) => {
                Self::FixedBytes
            }
            _ => Self::Other,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Uint(_) | Self::Int(_))
    }

    /// The zero-like literal for this type, if it has one.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            Self::Uint(_) | Self::Int(_) | Self::FixedBytes => Some("0"),
            Self::Bytes => Some("new bytes(0)"),
            Self::Bool => Some("false"),
            Self::String => Some("\"\""),
            Self::Address { payable: false } => Some("address(0)"),
            Self::Address { payable: true }
            | Self::Mapping
            | Self::Array
            | Self::UserDefined(_)
            | Self::Other => None,
        }
    }
}

/// Empty suffix (`uint`) or a decimal width within `min..=max`.
fn is_width(suffix: &str, min: u32, max: u32) -> bool {
    suffix.is_empty() || suffix.parse::<u32>().is_ok_and(|width| (min..=max).contains(&width))
}

/// Shorthand for [`TypeInfo::default_value`] on a type-name node.
pub fn default_value(type_name: &Node) -> Option<&'static str> {
    TypeInfo::of(type_name).default_value()
}
