// Tue Mar 10 2026 - Alex

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Pointer width of the target ABI (LP64).
pub const POINTER_SIZE: u64 = 8;

/// Fundamental machine types the registry knows without a name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Bool,
    Void,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    F128,
}

impl Primitive {
    pub fn size(self) -> u64 {
        match self {
            Self::Void => 0,
            Self::Bool | Self::Char | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::I128 | Self::U128 | Self::F128 => 16,
        }
    }

    pub fn alignment(self) -> u64 {
        self.size().max(1)
    }
}

bitflags::bitflags! {
    /// Role markers for aggregate members.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MemberFlags: u8 {
        const BASE_CLASS = 1 << 0;
        const VIRTUAL_BASE = 1 << 1;
        const VTABLE_PTR = 1 << 2;
    }
}

impl Serialize for MemberFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for MemberFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

/// Calling conventions the registry can attach to function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallingConvention {
    /// The target ABI's member-function convention.
    Fastcall,
    Cdecl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParam {
    pub name: Option<String>,
    pub ty: TypeHandle,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionType {
    pub convention: CallingConvention,
    pub return_type: TypeHandle,
    pub params: Vec<FunctionParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub byte_size: u64,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateKind {
    Struct,
    Union,
}

/// One member of an aggregate definition. Offsets and sizes are in bits so
/// bitfield members can share a byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMember {
    pub name: String,
    pub ty: TypeHandle,
    pub bit_offset: u64,
    pub bit_size: u64,
    pub flags: MemberFlags,
    pub comment: Option<String>,
}

impl AggregateMember {
    pub fn new(name: impl Into<String>, ty: TypeHandle, bit_offset: u64, bit_size: u64) -> Self {
        Self {
            name: name.into(),
            ty,
            bit_offset,
            bit_size,
            flags: MemberFlags::empty(),
            comment: None,
        }
    }

    pub fn with_flags(mut self, flags: MemberFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// An aggregate definition with explicit, pre-computed member placement.
/// `alignment == 1` means the unaligned (tail-reusable) form: the total size
/// is not rounded up past the last member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateType {
    pub kind: AggregateKind,
    pub alignment: u64,
    pub members: Vec<AggregateMember>,
}

impl AggregateType {
    pub fn new(kind: AggregateKind, alignment: u64) -> Self {
        Self {
            kind,
            alignment: alignment.max(1),
            members: Vec::new(),
        }
    }

    /// An empty struct usable as an opaque stand-in for an unknown type.
    pub fn opaque() -> Self {
        Self::new(AggregateKind::Struct, 1)
    }

    pub fn push(&mut self, member: AggregateMember) {
        self.members.push(member);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Highest occupied bit, before any trailing alignment padding.
    pub fn end_bits(&self) -> u64 {
        self.members
            .iter()
            .map(|m| m.bit_offset + m.bit_size)
            .max()
            .unwrap_or(0)
    }
}

/// A structural reference to a type. Named identity and size reporting go
/// through a registry; everything else is a pure value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeHandle {
    Primitive(Primitive),
    Named(String),
    Pointer(Box<TypeHandle>),
    Volatile(Box<TypeHandle>),
    Array { element: Box<TypeHandle>, count: u64 },
    Function(Box<FunctionType>),
    Enum(EnumType),
    Aggregate(AggregateType),
}

impl TypeHandle {
    pub fn pointer(self) -> Self {
        Self::Pointer(Box::new(self))
    }

    pub fn volatile(self) -> Self {
        Self::Volatile(Box::new(self))
    }

    pub fn array(self, count: u64) -> Self {
        Self::Array {
            element: Box::new(self),
            count,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate(_))
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{:?}", p),
            Self::Named(name) => write!(f, "{}", name),
            Self::Pointer(inner) => write!(f, "{}*", inner),
            Self::Volatile(inner) => write!(f, "volatile {}", inner),
            Self::Array { element, count } => write!(f, "{}[{}]", element, count),
            Self::Function(func) => {
                write!(f, "{}(", func.return_type)?;
                for (i, param) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.ty)?;
                }
                write!(f, ")")
            }
            Self::Enum(e) => write!(f, "enum<{} bytes>", e.byte_size),
            Self::Aggregate(a) => match a.kind {
                AggregateKind::Struct => write!(f, "struct<{} members>", a.members.len()),
                AggregateKind::Union => write!(f, "union<{} members>", a.members.len()),
            },
        }
    }
}
