//! Type handles and shape descriptors shared by every universe.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// =============================================================================
// TypeId
// =============================================================================

/// Opaque handle to a type inside one [`TypeUniverse`](crate::TypeUniverse).
///
/// Handles are only meaningful relative to the universe that produced them.
/// Comparing handles from two different universes is a logic error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel value for an invalid handle. Universes never hand it out.
    pub const INVALID: Self = Self(0);

    /// First valid handle.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generic argument list. Almost every generic in practice has one or two.
pub type TypeArgs = SmallVec<[TypeId; 2]>;

// =============================================================================
// TypeKind
// =============================================================================

/// Structural kind of a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// The host could not determine the kind.
    Unknown,
    Array,
    Class,
    Delegate,
    Dynamic,
    Enum,
    /// Unresolvable or erroneous type.
    Error,
    Interface,
    Module,
    Pointer,
    Struct,
    /// Unbound generic type parameter.
    TypeParameter,
    /// Script submission type.
    Submission,
}

impl TypeKind {
    /// Kinds whose values can be nominal, user-visible data.
    pub const fn is_data_kind(self) -> bool {
        matches!(
            self,
            TypeKind::Array | TypeKind::Class | TypeKind::Enum | TypeKind::Interface | TypeKind::Struct
        )
    }
}

// =============================================================================
// SpecialType
// =============================================================================

/// Built-in types the host recognizes by identity rather than by name.
///
/// Constructed generic types report [`SpecialType::None`]; their original
/// definition carries the tag (`Nullable<int>` is `None`, `Nullable<T>` is
/// [`SpecialType::NullableT`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialType {
    None,
    Object,
    Enum,
    ValueType,
    Void,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Decimal,
    Single,
    Double,
    String,
    IntPtr,
    UIntPtr,
    Array,
    Delegate,
    MulticastDelegate,
    IEnumerable,
    IEnumerableT,
    ICollectionT,
    IListT,
    IReadOnlyCollectionT,
    IReadOnlyListT,
    IEnumeratorT,
    NullableT,
    DateTime,
    IDisposable,
}

impl SpecialType {
    /// Numeric types for conversion purposes. `char` participates in
    /// numeric conversions even though it is not arithmetic.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            SpecialType::Char
                | SpecialType::SByte
                | SpecialType::Byte
                | SpecialType::Int16
                | SpecialType::UInt16
                | SpecialType::Int32
                | SpecialType::UInt32
                | SpecialType::Int64
                | SpecialType::UInt64
                | SpecialType::Decimal
                | SpecialType::Single
                | SpecialType::Double
        )
    }

    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            SpecialType::SByte
                | SpecialType::Byte
                | SpecialType::Int16
                | SpecialType::UInt16
                | SpecialType::Int32
                | SpecialType::UInt32
                | SpecialType::Int64
                | SpecialType::UInt64
        )
    }

    pub const fn is_floating_point(self) -> bool {
        matches!(self, SpecialType::Single | SpecialType::Double)
    }

    /// C# keyword alias, used for display.
    pub const fn keyword(self) -> Option<&'static str> {
        Some(match self {
            SpecialType::Object => "object",
            SpecialType::Void => "void",
            SpecialType::Boolean => "bool",
            SpecialType::Char => "char",
            SpecialType::SByte => "sbyte",
            SpecialType::Byte => "byte",
            SpecialType::Int16 => "short",
            SpecialType::UInt16 => "ushort",
            SpecialType::Int32 => "int",
            SpecialType::UInt32 => "uint",
            SpecialType::Int64 => "long",
            SpecialType::UInt64 => "ulong",
            SpecialType::Decimal => "decimal",
            SpecialType::Single => "float",
            SpecialType::Double => "double",
            SpecialType::String => "string",
            SpecialType::IntPtr => "nint",
            SpecialType::UIntPtr => "nuint",
            _ => return None,
        })
    }

    /// Inverse of [`SpecialType::keyword`].
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "object" => SpecialType::Object,
            "void" => SpecialType::Void,
            "bool" => SpecialType::Boolean,
            "char" => SpecialType::Char,
            "sbyte" => SpecialType::SByte,
            "byte" => SpecialType::Byte,
            "short" => SpecialType::Int16,
            "ushort" => SpecialType::UInt16,
            "int" => SpecialType::Int32,
            "uint" => SpecialType::UInt32,
            "long" => SpecialType::Int64,
            "ulong" => SpecialType::UInt64,
            "decimal" => SpecialType::Decimal,
            "float" => SpecialType::Single,
            "double" => SpecialType::Double,
            "string" => SpecialType::String,
            "nint" => SpecialType::IntPtr,
            "nuint" => SpecialType::UIntPtr,
            _ => return None,
        })
    }
}

// =============================================================================
// Conversion
// =============================================================================

bitflags! {
    /// Classification of the built-in conversion from one type to another.
    ///
    /// A conversion that exists is either `IMPLICIT` or `EXPLICIT`; the
    /// remaining bits say which language rule produced it.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Conversion: u16 {
        const EXISTS = 1 << 0;
        const IDENTITY = 1 << 1;
        const IMPLICIT = 1 << 2;
        const EXPLICIT = 1 << 3;
        const NUMERIC = 1 << 4;
        const UNBOXING = 1 << 5;
        const BOXING = 1 << 6;
        const REFERENCE = 1 << 7;
        const USER_DEFINED = 1 << 8;
        const NULLABLE = 1 << 9;
        const ENUMERATION = 1 << 10;
    }
}

impl Conversion {
    /// No conversion exists.
    pub const NONE: Self = Self::empty();

    pub const fn exists(self) -> bool {
        self.contains(Self::EXISTS)
    }

    pub const fn is_identity(self) -> bool {
        self.contains(Self::IDENTITY)
    }

    pub const fn is_implicit(self) -> bool {
        self.contains(Self::IMPLICIT)
    }

    pub const fn is_explicit(self) -> bool {
        self.contains(Self::EXPLICIT)
    }

    pub const fn is_numeric(self) -> bool {
        self.contains(Self::NUMERIC)
    }

    pub const fn is_unboxing(self) -> bool {
        self.contains(Self::UNBOXING)
    }

    pub const fn is_boxing(self) -> bool {
        self.contains(Self::BOXING)
    }

    pub const fn is_reference(self) -> bool {
        self.contains(Self::REFERENCE)
    }

    pub const fn is_user_defined(self) -> bool {
        self.contains(Self::USER_DEFINED)
    }

    pub const fn is_nullable(self) -> bool {
        self.contains(Self::NULLABLE)
    }

    pub(crate) const fn implicit(kind: Self) -> Self {
        Self::from_bits_truncate(Self::EXISTS.bits() | Self::IMPLICIT.bits() | kind.bits())
    }

    pub(crate) const fn explicit(kind: Self) -> Self {
        Self::from_bits_truncate(Self::EXISTS.bits() | Self::EXPLICIT.bits() | kind.bits())
    }
}

// =============================================================================
// Type parameters and attributes
// =============================================================================

/// Constraints declared on a generic type parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeParamConstraints {
    /// `where T : struct`
    pub value_type: bool,
    /// `where T : class`
    pub reference_type: bool,
    /// `where T : new()`
    pub constructor: bool,
    /// Explicit constraint types (`where T : IFoo, Bar`).
    pub constraint_types: Vec<TypeId>,
}

impl TypeParamConstraints {
    pub fn value_type() -> Self {
        Self {
            value_type: true,
            ..Self::default()
        }
    }

    pub fn reference_type() -> Self {
        Self {
            reference_type: true,
            ..Self::default()
        }
    }

    pub fn with_constraint_type(mut self, constraint: TypeId) -> Self {
        self.constraint_types.push(constraint);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        !self.value_type && !self.reference_type && self.constraint_types.is_empty()
    }
}

/// Assembly-level attribute whose constructor arguments are all types,
/// e.g. `[assembly: RegisterXunitSerializer(typeof(S), typeof(A), typeof(B))]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeData {
    pub attribute_class: TypeId,
    pub type_arguments: Vec<TypeId>,
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
