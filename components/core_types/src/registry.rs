//! In-memory type registry.
//!
//! The registry is an arena of type definitions addressed by [`TypeId`]. It
//! comes preloaded with the built-in types (the two implicit roots, the
//! string type and every primitive) and offers a builder API for classes,
//! structs and enums. It implements [`TypeIntrospection`], so it can drive
//! the estimator directly.
//!
//! # Examples
//!
//! ```
//! use core_types::{Category, PrimitiveKind, TypeIntrospection, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! let int64 = registry.primitive(PrimitiveKind::Int64);
//! let point = registry
//!     .structure("Point")
//!     .field("x", int64)
//!     .field("y", int64)
//!     .finish()
//!     .unwrap();
//!
//! assert_eq!(registry.category_of(&point), Category::ValueType);
//! assert_eq!(registry.declared_fields(&point), vec![int64, int64]);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::trace;

use crate::{Category, PrimitiveKind, ScaleError, ScaleResult, TypeIntrospection};

/// Suffix marking a single-dimension array type name.
pub const ARRAY_SUFFIX: &str = "[]";

/// Name of the universal object root.
pub const OBJECT_TYPE_NAME: &str = "Object";

/// Name of the value-type root.
pub const VALUE_TYPE_NAME: &str = "ValueType";

/// Name of the built-in string type.
pub const STRING_TYPE_NAME: &str = "String";

/// Number of types preloaded before the primitives.
const FIRST_PRIMITIVE: u32 = 3;

/// Handle to a type in a [`TypeRegistry`].
///
/// Handles are only meaningful to the registry that issued them. The
/// registry's own methods reject unknown handles with an error, but the
/// [`TypeIntrospection`] queries panic on a handle from another registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// The universal object root.
    pub const OBJECT: TypeId = TypeId(0);
    /// The root of all value types.
    pub const VALUE_TYPE: TypeId = TypeId(1);
    /// The built-in string type.
    pub const STRING: TypeId = TypeId(2);

    /// Position of this type in its registry.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named instance field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name (diagnostics only)
    pub name: String,
    /// Declared type of the field
    pub ty: TypeId,
}

/// The layout-relevant shape of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// Built-in primitive
    Primitive(PrimitiveKind),
    /// The built-in string type
    String,
    /// Single-dimension array of the given element type
    Array(TypeId),
    /// Reference type with an optional base class
    Class {
        /// Base class, `None` only for the object root
        base: Option<TypeId>,
        /// Fields declared directly on this class
        fields: Vec<FieldDef>,
    },
    /// Value type; its base is always the value-type root
    Struct {
        /// Fields declared on this struct
        fields: Vec<FieldDef>,
    },
    /// Enumeration backed by a primitive
    Enum {
        /// Underlying primitive kind
        underlying: PrimitiveKind,
    },
}

/// A type definition stored in a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    /// Unique type name
    pub name: String,
    /// Layout-relevant shape
    pub shape: TypeShape,
}

impl TypeDef {
    /// Category of this type.
    pub fn category(&self) -> Category {
        match self.shape {
            TypeShape::Primitive(_) => Category::Primitive,
            TypeShape::String => Category::String,
            TypeShape::Array(_) => Category::Array,
            TypeShape::Class { .. } => Category::ReferenceType,
            TypeShape::Struct { .. } => Category::ValueType,
            TypeShape::Enum { .. } => Category::Enumeration,
        }
    }

    /// Fields declared directly on this type.
    pub fn fields(&self) -> &[FieldDef] {
        match &self.shape {
            TypeShape::Class { fields, .. } | TypeShape::Struct { fields } => fields,
            _ => &[],
        }
    }
}

/// Arena of type definitions with name lookup.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<TypeDef>,
    by_name: HashMap<String, TypeId>,
    arrays: HashMap<TypeId, TypeId>,
    // Declared but not yet defined.
    reserved: HashSet<TypeId>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry holding only the built-in types.
    pub fn new() -> Self {
        let mut registry = TypeRegistry {
            types: Vec::new(),
            by_name: HashMap::new(),
            arrays: HashMap::new(),
            reserved: HashSet::new(),
        };
        registry.push(
            OBJECT_TYPE_NAME,
            TypeShape::Class {
                base: None,
                fields: Vec::new(),
            },
        );
        registry.push(
            VALUE_TYPE_NAME,
            TypeShape::Class {
                base: Some(TypeId::OBJECT),
                fields: Vec::new(),
            },
        );
        registry.push(STRING_TYPE_NAME, TypeShape::String);
        for kind in PrimitiveKind::ALL {
            registry.push(kind.name(), TypeShape::Primitive(kind));
        }
        registry
    }

    fn push(&mut self, name: &str, shape: TypeShape) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeDef {
            name: name.to_string(),
            shape,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    fn insert_new(&mut self, name: &str, shape: TypeShape) -> ScaleResult<TypeId> {
        if name.is_empty() || name.ends_with(ARRAY_SUFFIX) {
            return Err(ScaleError::InvalidSchema(format!(
                "`{name}` is not a valid type name"
            )));
        }
        if self.by_name.contains_key(name) {
            return Err(ScaleError::DuplicateType(name.to_string()));
        }
        Ok(self.push(name, shape))
    }

    /// The universal object root.
    pub fn object_root(&self) -> TypeId {
        TypeId::OBJECT
    }

    /// The value-type root.
    pub fn value_type_root(&self) -> TypeId {
        TypeId::VALUE_TYPE
    }

    /// The built-in string type.
    pub fn string_type(&self) -> TypeId {
        TypeId::STRING
    }

    /// The built-in type for a primitive kind.
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        let position = PrimitiveKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        TypeId(FIRST_PRIMITIVE + position as u32)
    }

    /// Returns the single-dimension array type of `element`, creating it on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::UnknownType`] if `element` was not issued by
    /// this registry.
    pub fn array_of(&mut self, element: TypeId) -> ScaleResult<TypeId> {
        if let Some(id) = self.arrays.get(&element) {
            return Ok(*id);
        }
        let element_name = self
            .get(element)
            .map(|def| def.name.clone())
            .ok_or_else(|| ScaleError::UnknownType(element.to_string()))?;
        let id = self.push(&format!("{element_name}{ARRAY_SUFFIX}"), TypeShape::Array(element));
        self.arrays.insert(element, id);
        Ok(id)
    }

    /// Starts building a new class named `name`.
    ///
    /// If [`finish`](TypeBuilder::finish) fails the name is released again
    /// and the registry is left as it was.
    pub fn class(&mut self, name: &str) -> TypeBuilder<'_> {
        let target = self.declare_class(name);
        TypeBuilder::new(self, target).owning()
    }

    /// Starts building a new struct named `name`.
    ///
    /// Like [`class`](Self::class), a failed build leaves no trace.
    pub fn structure(&mut self, name: &str) -> TypeBuilder<'_> {
        let target = self.declare_struct(name);
        TypeBuilder::new(self, target).owning()
    }

    /// Reserves a class name so that fields (including the class's own)
    /// can refer to it before it is defined with [`define`](Self::define).
    pub fn declare_class(&mut self, name: &str) -> ScaleResult<TypeId> {
        let id = self.insert_new(
            name,
            TypeShape::Class {
                base: Some(TypeId::OBJECT),
                fields: Vec::new(),
            },
        )?;
        self.reserved.insert(id);
        Ok(id)
    }

    /// Reserves a struct name for later definition.
    pub fn declare_struct(&mut self, name: &str) -> ScaleResult<TypeId> {
        let id = self.insert_new(name, TypeShape::Struct { fields: Vec::new() })?;
        self.reserved.insert(id);
        Ok(id)
    }

    /// Fills in a type previously reserved with `declare_class` or
    /// `declare_struct`.
    ///
    /// Each reservation can be defined once. Built-ins, enums, arrays and
    /// types that were already defined are rejected when the builder
    /// finishes.
    pub fn define(&mut self, id: TypeId) -> TypeBuilder<'_> {
        let target = match self.get(id) {
            Some(_) if self.reserved.contains(&id) => Ok(id),
            Some(def) => Err(ScaleError::InvalidSchema(format!(
                "`{}` cannot be redefined",
                def.name
            ))),
            None => Err(ScaleError::UnknownType(id.to_string())),
        };
        TypeBuilder::new(self, target)
    }

    /// Registers an enumeration over `underlying`.
    pub fn enumeration(&mut self, name: &str, underlying: PrimitiveKind) -> ScaleResult<TypeId> {
        self.insert_new(name, TypeShape::Enum { underlying })
    }

    /// Looks up a type by exact name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Resolves a type name, creating array types for trailing `[]`
    /// suffixes.
    ///
    /// ```
    /// use core_types::{Category, TypeIntrospection, TypeRegistry};
    ///
    /// let mut registry = TypeRegistry::new();
    /// let jagged = registry.resolve("Int32[][]").unwrap();
    /// assert_eq!(registry.category_of(&jagged), Category::Array);
    /// assert_eq!(registry.type_name(&jagged), "Int32[][]");
    /// ```
    pub fn resolve(&mut self, name: &str) -> ScaleResult<TypeId> {
        let name = name.trim();
        if let Some(id) = self.lookup(name) {
            return Ok(id);
        }
        match name.strip_suffix(ARRAY_SUFFIX) {
            Some(element) => {
                let element = self.resolve(element)?;
                self.array_of(element)
            }
            None => Err(ScaleError::UnknownType(name.to_string())),
        }
    }

    /// Returns the definition of `id`.
    pub fn get(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(id.index())
    }

    /// Returns whether `id` is one of the preloaded built-in types.
    pub fn is_builtin(&self, id: TypeId) -> bool {
        id.0 < FIRST_PRIMITIVE + PrimitiveKind::ALL.len() as u32
    }

    /// User-declared classes, structs and enums, in declaration order.
    pub fn declared_types(&self) -> impl Iterator<Item = (TypeId, &TypeDef)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(index, def)| (TypeId(index as u32), def))
            .filter(|(id, def)| !self.is_builtin(*id) && !matches!(def.shape, TypeShape::Array(_)))
    }

    /// Number of registered types, built-ins included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false; the built-in types are present from construction.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn def(&self, id: &TypeId) -> &TypeDef {
        // Panics on a foreign handle, see `TypeId`.
        &self.types[id.index()]
    }

    /// Drops a reservation made by a builder whose definition failed. The
    /// reservation is always the newest entry because the builder holds the
    /// registry exclusively until it finishes.
    fn release(&mut self, id: TypeId) {
        if id.index() + 1 != self.types.len() {
            return;
        }
        if let Some(def) = self.types.pop() {
            self.by_name.remove(&def.name);
            self.reserved.remove(&id);
            trace!("released reservation of {}", def.name);
        }
    }

    /// Returns whether `fields`, or any value type they embed, embeds
    /// `target` by value.
    fn embeds(&self, target: TypeId, fields: &[FieldDef]) -> bool {
        let mut pending: Vec<TypeId> = fields.iter().map(|f| f.ty).collect();
        let mut seen = HashSet::new();
        while let Some(ty) = pending.pop() {
            if ty == target {
                return true;
            }
            if !seen.insert(ty) {
                continue;
            }
            if let TypeShape::Struct { fields } = &self.def(&ty).shape {
                pending.extend(fields.iter().map(|f| f.ty));
            }
        }
        false
    }

    /// Returns whether walking up from `base` reaches `target`.
    fn inherits_from(&self, base: TypeId, target: TypeId) -> bool {
        let mut current = Some(base);
        let mut steps = 0;
        while let Some(ty) = current {
            if ty == target || steps > self.types.len() {
                return true;
            }
            current = match &self.def(&ty).shape {
                TypeShape::Class { base, .. } => *base,
                _ => None,
            };
            steps += 1;
        }
        false
    }

    fn commit(
        &mut self,
        id: TypeId,
        base: Option<TypeId>,
        fields: Vec<FieldDef>,
    ) -> ScaleResult<TypeId> {
        let name = self.def(&id).name.clone();
        if let Some(field) = fields.iter().find(|f| self.get(f.ty).is_none()) {
            return Err(ScaleError::UnknownType(format!(
                "{} (field `{}` of `{name}`)",
                field.ty, field.name
            )));
        }
        let shape = match self.def(&id).shape {
            TypeShape::Class { .. } => {
                let base = base.unwrap_or(TypeId::OBJECT);
                match self.get(base).map(TypeDef::category) {
                    Some(Category::ReferenceType) => {}
                    Some(_) => {
                        return Err(ScaleError::InvalidSchema(format!(
                            "base of `{name}` must be a class"
                        )))
                    }
                    None => return Err(ScaleError::UnknownType(base.to_string())),
                }
                if base == TypeId::VALUE_TYPE {
                    return Err(ScaleError::InvalidSchema(format!(
                        "class `{name}` cannot derive from the value-type root"
                    )));
                }
                if self.inherits_from(base, id) {
                    return Err(ScaleError::CyclicLayout(name));
                }
                TypeShape::Class {
                    base: Some(base),
                    fields,
                }
            }
            _ => {
                if base.is_some() {
                    return Err(ScaleError::InvalidSchema(format!(
                        "struct `{name}` cannot declare a base type"
                    )));
                }
                if self.embeds(id, &fields) {
                    return Err(ScaleError::CyclicLayout(name));
                }
                TypeShape::Struct { fields }
            }
        };
        trace!("registered {} as {:?}", name, shape);
        self.types[id.index()].shape = shape;
        self.reserved.remove(&id);
        Ok(id)
    }
}

impl TypeIntrospection for TypeRegistry {
    type Type = TypeId;

    fn category_of(&self, ty: &TypeId) -> Category {
        self.def(ty).category()
    }

    fn primitive_kind_of(&self, ty: &TypeId) -> Option<PrimitiveKind> {
        match self.def(ty).shape {
            TypeShape::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    fn declared_fields(&self, ty: &TypeId) -> Vec<TypeId> {
        let def = self.def(ty);
        match def.shape {
            TypeShape::Enum { underlying } => vec![self.primitive(underlying)],
            _ => def.fields().iter().map(|f| f.ty).collect(),
        }
    }

    fn base_type_of(&self, ty: &TypeId) -> Option<TypeId> {
        match &self.def(ty).shape {
            TypeShape::Class { base, .. } => *base,
            TypeShape::Struct { .. } | TypeShape::Enum { .. } => Some(TypeId::VALUE_TYPE),
            TypeShape::Primitive(_) => Some(TypeId::VALUE_TYPE),
            TypeShape::String | TypeShape::Array(_) => Some(TypeId::OBJECT),
        }
    }

    fn element_type_of(&self, ty: &TypeId) -> Option<TypeId> {
        match self.def(ty).shape {
            TypeShape::Array(element) => Some(element),
            _ => None,
        }
    }

    fn is_implicit_root(&self, ty: &TypeId) -> bool {
        *ty == TypeId::OBJECT || *ty == TypeId::VALUE_TYPE
    }

    fn type_name(&self, ty: &TypeId) -> String {
        self.get(*ty)
            .map(|def| def.name.clone())
            .unwrap_or_else(|| ty.to_string())
    }
}

/// Builder for classes and structs.
///
/// Errors from declaring the type are deferred to [`finish`](Self::finish)
/// so calls can be chained.
pub struct TypeBuilder<'r> {
    registry: &'r mut TypeRegistry,
    target: ScaleResult<TypeId>,
    base: Option<TypeId>,
    fields: Vec<FieldDef>,
    owns_reservation: bool,
}

impl<'r> TypeBuilder<'r> {
    fn new(registry: &'r mut TypeRegistry, target: ScaleResult<TypeId>) -> Self {
        TypeBuilder {
            registry,
            target,
            base: None,
            fields: Vec::new(),
            owns_reservation: false,
        }
    }

    fn owning(mut self) -> Self {
        self.owns_reservation = self.target.is_ok();
        self
    }

    /// Sets the base class. Only classes may have a base.
    pub fn base(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    /// Appends a declared instance field.
    pub fn field(mut self, name: &str, ty: TypeId) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            ty,
        });
        self
    }

    /// Validates and stores the definition.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, unknown field types, a non-class base,
    /// a struct that embeds itself, an inheritance cycle, or a type that
    /// was already defined.
    pub fn finish(self) -> ScaleResult<TypeId> {
        let id = self.target?;
        let result = self.registry.commit(id, self.base, self.fields);
        if result.is_err() && self.owns_reservation {
            self.registry.release(id);
        }
        result
    }
}
