//! JSON program manifests.
//!
//! A manifest describes the slice of a program the engine needs: which
//! libraries it references, which of its own types matter, and which
//! conversions and serializers it declares. Loading one produces a seeded
//! [`TypeTable`].
//!
//! ```json
//! {
//!   "references": [{ "name": "xunit.v3.core", "version": "1.0.0" }],
//!   "types": [
//!     { "name": "Shop.Money", "kind": "struct" },
//!     { "name": "Shop.MoneySerializer", "kind": "class", "sealed": true,
//!       "interfaces": ["Xunit.Sdk.IXunitSerializer"] }
//!   ],
//!   "serializers": [{ "serializer": "Shop.MoneySerializer", "types": ["Shop.Money"] }],
//!   "conversions": [{ "source": "Shop.Money", "destination": "decimal" }],
//!   "overrides": { "core-v2": "2.2.0" }
//! }
//! ```

use crate::type_syntax::{TypeExpr, TypeSyntaxError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use xan_common::LibraryReference;
use xan_solver::VersionOverrides;
use xan_universe::framework;
use xan_universe::{
    NamedTypeBuilder, SpecialType, TypeId, TypeKind, TypeParamConstraints, TypeTable, TypeUniverse,
};

/// Namespaces searched, in order, for names that are not found as written.
const IMPLICIT_NAMESPACES: [&str; 3] = ["System", "System.Collections.Generic", "System.Numerics"];

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Syntax(#[from] TypeSyntaxError),
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("type `{0}` is declared twice")]
    DuplicateType(String),
    #[error("`{0}` is not generic")]
    NotGeneric(String),
    #[error("serializer `{0}` needs a reference to xunit.v3.core")]
    RegistrationUnavailable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub references: Vec<LibraryReference>,
    #[serde(default)]
    pub types: Vec<TypeDeclaration>,
    #[serde(default)]
    pub serializers: Vec<SerializerRegistration>,
    #[serde(default)]
    pub conversions: Vec<ConversionDeclaration>,
    #[serde(default, skip_serializing_if = "VersionOverrides::is_empty")]
    pub overrides: VersionOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDeclaration {
    /// Qualified name without the generic arity suffix.
    pub name: String,
    pub kind: DeclaredKind,
    /// Defaults to sealed for structs and enums, open otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sealed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameterDeclaration>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredKind {
    Class,
    Struct,
    Interface,
    Enum,
}

impl DeclaredKind {
    fn type_kind(self) -> TypeKind {
        match self {
            Self::Class => TypeKind::Class,
            Self::Struct => TypeKind::Struct,
            Self::Interface => TypeKind::Interface,
            Self::Enum => TypeKind::Enum,
        }
    }

    /// Base every declaration of this kind gets unless it names one.
    fn implicit_base(self) -> Option<SpecialType> {
        match self {
            Self::Class => Some(SpecialType::Object),
            Self::Struct => Some(SpecialType::ValueType),
            Self::Enum => Some(SpecialType::Enum),
            Self::Interface => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeParameterDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<ParameterConstraint>,
    /// Constraint types; may name core types and earlier declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraint_types: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterConstraint {
    /// `where T : struct`
    Struct,
    /// `where T : class`
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializerRegistration {
    pub serializer: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionDeclaration {
    pub source: String,
    pub destination: String,
    /// `implicit operator` rather than `explicit operator`.
    #[serde(default)]
    pub implicit: bool,
}

impl Manifest {
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the program's type table: the core library, then references,
    /// then declared types, conversions and serializer registrations.
    pub fn load(&self) -> Result<TypeTable, ManifestError> {
        let table = TypeTable::with_core_library();
        for reference in &self.references {
            framework::declare_reference(&table, reference.clone());
        }

        // Declare every type first so bases and interfaces may refer forward.
        let mut declared = Vec::with_capacity(self.types.len());
        for declaration in &self.types {
            declared.push(declare(&table, declaration)?);
        }
        for (declaration, &id) in self.types.iter().zip(&declared) {
            connect(&table, declaration, id)?;
        }

        let resolver = TypeResolver::new(&table);
        for conversion in &self.conversions {
            let source = resolver.resolve_str(&conversion.source)?;
            let destination = resolver.resolve_str(&conversion.destination)?;
            table.add_user_defined_conversion(source, destination, conversion.implicit);
        }
        for registration in &self.serializers {
            let serializer = resolver.resolve_str(&registration.serializer)?;
            let supported = registration
                .types
                .iter()
                .map(|name| resolver.resolve_str(name))
                .collect::<Result<Vec<_>, _>>()?;
            if !framework::register_serializer(&table, serializer, &supported) {
                return Err(ManifestError::RegistrationUnavailable(
                    registration.serializer.clone(),
                ));
            }
        }

        debug!(
            references = self.references.len(),
            types = self.types.len(),
            conversions = self.conversions.len(),
            serializers = self.serializers.len(),
            "loaded program manifest"
        );
        Ok(table)
    }
}

/// Metadata name of a declaration: `Name` or ``Name`N``.
fn metadata_name(declaration: &TypeDeclaration) -> String {
    match declaration.type_parameters.len() {
        0 => declaration.name.clone(),
        arity => format!("{}`{arity}", declaration.name),
    }
}

fn declare(table: &TypeTable, declaration: &TypeDeclaration) -> Result<TypeId, ManifestError> {
    let name = metadata_name(declaration);
    if table.named(&name).is_some() {
        return Err(ManifestError::DuplicateType(name));
    }

    let resolver = TypeResolver::new(table);
    let mut builder = NamedTypeBuilder::new(name, declaration.kind.type_kind());
    if let Some(sealed) = declaration.sealed {
        builder = builder.sealed(sealed);
    }
    if let Some(base) = declaration.kind.implicit_base().and_then(|s| table.special(s)) {
        builder = builder.base(base);
    }
    for parameter in &declaration.type_parameters {
        let mut constraints = match parameter.constraint {
            Some(ParameterConstraint::Struct) => TypeParamConstraints::value_type(),
            Some(ParameterConstraint::Class) => TypeParamConstraints::reference_type(),
            None => TypeParamConstraints::default(),
        };
        for constraint in &parameter.constraint_types {
            constraints = constraints.with_constraint_type(resolver.resolve_str(constraint)?);
        }
        builder = builder.constrained_type_parameter(parameter.name.clone(), constraints);
    }
    Ok(table.declare(builder))
}

fn connect(table: &TypeTable, declaration: &TypeDeclaration, id: TypeId) -> Result<(), ManifestError> {
    let resolver = TypeResolver::new(table);
    let parameters = table.type_arguments(id);
    let scope: Vec<(&str, TypeId)> = declaration
        .type_parameters
        .iter()
        .map(|parameter| parameter.name.as_str())
        .zip(parameters.iter().copied())
        .collect();

    if let Some(base) = &declaration.base {
        table.set_base(id, resolver.resolve_in(&base.parse()?, &scope)?);
    }
    for interface in &declaration.interfaces {
        table.add_interface(id, resolver.resolve_in(&interface.parse()?, &scope)?);
    }
    Ok(())
}

/// Resolves [`TypeExpr`]s against a table.
pub struct TypeResolver<'t> {
    table: &'t TypeTable,
}

impl<'t> TypeResolver<'t> {
    pub fn new(table: &'t TypeTable) -> Self {
        Self { table }
    }

    /// Parse and resolve a type expression.
    pub fn resolve_str(&self, text: &str) -> Result<TypeId, ManifestError> {
        self.resolve(&text.parse()?)
    }

    pub fn resolve(&self, expr: &TypeExpr) -> Result<TypeId, ManifestError> {
        self.resolve_in(expr, &[])
    }

    /// Resolve with `scope` naming type parameters visible by simple name.
    pub fn resolve_in(&self, expr: &TypeExpr, scope: &[(&str, TypeId)]) -> Result<TypeId, ManifestError> {
        match expr {
            TypeExpr::Array(element) => Ok(self.table.array_of(self.resolve_in(element, scope)?)),
            TypeExpr::Nullable(underlying) => {
                let underlying = self.resolve_in(underlying, scope)?;
                self.table
                    .nullable_of(underlying)
                    .ok_or_else(|| ManifestError::UnknownType("System.Nullable`1".to_string()))
            }
            TypeExpr::Named { name, arguments } if arguments.is_empty() => {
                if let Some(&(_, parameter)) = scope.iter().find(|(param, _)| param == name) {
                    return Ok(parameter);
                }
                if let Some(special) = SpecialType::from_keyword(name) {
                    return self
                        .table
                        .special(special)
                        .ok_or_else(|| ManifestError::UnknownType(name.clone()));
                }
                self.lookup(name)
                    .ok_or_else(|| ManifestError::UnknownType(name.clone()))
            }
            TypeExpr::Named { name, arguments } => {
                let metadata = format!("{name}`{}", arguments.len());
                let Some(definition) = self.lookup(&metadata) else {
                    return Err(match self.lookup(name) {
                        Some(_) => ManifestError::NotGeneric(name.clone()),
                        None => ManifestError::UnknownType(expr.to_string()),
                    });
                };
                let arguments = arguments
                    .iter()
                    .map(|argument| self.resolve_in(argument, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.table.construct(definition, &arguments))
            }
        }
    }

    fn lookup(&self, name: &str) -> Option<TypeId> {
        self.table.named(name).or_else(|| {
            IMPLICIT_NAMESPACES
                .iter()
                .find_map(|namespace| self.table.named(&format!("{namespace}.{name}")))
        })
    }
}

#[cfg(test)]
#[path = "../tests/manifest_tests.rs"]
mod tests;
