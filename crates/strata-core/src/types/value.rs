//! Typed views into captured debuggee memory.

use std::fmt;

use super::Address;

/// Shape of a debuggee type, as far as the bridge needs to know it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeKind
{
    /// Leaf value (integer, pointer, tagged word, ...).
    Scalar,
    /// Aggregate with named members laid out at fixed offsets.
    Record(Vec<FieldDescriptor>),
}

/// A single member of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor
{
    /// Member name as recorded by the host's type database.
    pub name: String,
    /// Byte offset relative to the start of the enclosing value.
    pub offset: usize,
    /// Type of the member.
    pub ty: TypeDescriptor,
}

impl FieldDescriptor
{
    pub fn new(name: impl Into<String>, offset: usize, ty: TypeDescriptor) -> Self
    {
        Self {
            name: name.into(),
            offset,
            ty,
        }
    }
}

/// Type information the host attaches to every value it asks us to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor
{
    name: String,
    size: usize,
    kind: TypeKind,
}

impl TypeDescriptor
{
    /// A leaf type of `size` bytes.
    pub fn scalar(name: impl Into<String>, size: usize) -> Self
    {
        Self {
            name: name.into(),
            size,
            kind: TypeKind::Scalar,
        }
    }

    /// A record type. The size is the furthest extent reached by any field.
    pub fn record(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self
    {
        let size = fields
            .iter()
            .map(|field| field.offset.saturating_add(field.ty.size))
            .max()
            .unwrap_or(0);
        Self {
            name: name.into(),
            size,
            kind: TypeKind::Record(fields),
        }
    }

    /// Type name, handed to the embedded printer to pick its formatter.
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> usize
    {
        self.size
    }

    /// Record members, empty for scalars.
    pub fn fields(&self) -> &[FieldDescriptor]
    {
        match &self.kind {
            TypeKind::Record(fields) => fields,
            TypeKind::Scalar => &[],
        }
    }
}

impl fmt::Display for TypeDescriptor
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.name)
    }
}

/// Immutable view of one debuggee value.
///
/// The host owns both the bytes and the descriptor; the bridge only borrows
/// them for the duration of a single print or demangle call. `embedded_offset`
/// locates the value inside `bytes`, which lets nested fields share the span
/// of their enclosing value instead of being copied out.
#[derive(Debug, Clone, Copy)]
pub struct TypedValueRef<'a>
{
    bytes: &'a [u8],
    ty: &'a TypeDescriptor,
    embedded_offset: usize,
    address: Address,
}

impl<'a> TypedValueRef<'a>
{
    pub fn new(bytes: &'a [u8], ty: &'a TypeDescriptor, embedded_offset: usize, address: Address) -> Self
    {
        Self {
            bytes,
            ty,
            embedded_offset,
            address,
        }
    }

    /// View a value that starts at the beginning of `bytes`.
    pub fn at_start(bytes: &'a [u8], ty: &'a TypeDescriptor, address: Address) -> Self
    {
        Self::new(bytes, ty, 0, address)
    }

    pub fn bytes(&self) -> &'a [u8]
    {
        self.bytes
    }

    pub fn ty(&self) -> &'a TypeDescriptor
    {
        self.ty
    }

    pub fn embedded_offset(&self) -> usize
    {
        self.embedded_offset
    }

    /// Debuggee address of this value. The embedded offset is not added: it
    /// only locates the value inside the captured span.
    pub fn address(&self) -> Address
    {
        self.address
    }

    /// View of the `index`th record member, sharing this value's byte span.
    pub fn field(&self, index: usize) -> Option<TypedValueRef<'a>>
    {
        let field = self.ty.fields().get(index)?;
        Some(TypedValueRef {
            bytes: self.bytes,
            ty: &field.ty,
            embedded_offset: self.embedded_offset.saturating_add(field.offset),
            address: self.address.offset_by(field.offset),
        })
    }
}

/// Options the host passes with a print request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrintOptions
{
    /// Ask the embedded printer for an abbreviated rendering.
    pub summary_only: bool,
    /// Depth at which nested printing stops.
    ///
    /// `None` means "use the bridge's configured max depth", read at the
    /// moment the top-level print starts.
    pub max_depth: Option<u32>,
}

impl PrintOptions
{
    #[must_use]
    pub fn summary() -> Self
    {
        Self {
            summary_only: true,
            max_depth: None,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self
    {
        self.max_depth = Some(max_depth);
        self
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn pair() -> TypeDescriptor
    {
        TypeDescriptor::record(
            "pair",
            vec![
                FieldDescriptor::new("fst", 0, TypeDescriptor::scalar("int", 8)),
                FieldDescriptor::new("snd", 8, TypeDescriptor::scalar("int", 8)),
            ],
        )
    }

    #[test]
    fn test_record_size_covers_last_field()
    {
        assert_eq!(pair().size(), 16);
        assert_eq!(TypeDescriptor::record("unit", Vec::new()).size(), 0);
    }

    #[test]
    fn test_field_view_shares_span()
    {
        let ty = pair();
        let bytes = [0u8; 24];
        let value = TypedValueRef::new(&bytes, &ty, 4, Address::new(0x1000));

        let snd = value.field(1).unwrap();
        assert_eq!(snd.embedded_offset(), 12);
        assert_eq!(snd.address(), Address::new(0x1008));
        assert_eq!(snd.ty().name(), "int");
        assert_eq!(snd.bytes().len(), 24);
        assert!(value.field(2).is_none());
    }

    #[test]
    fn test_scalar_has_no_fields()
    {
        let ty = TypeDescriptor::scalar("int", 8);
        let bytes = [0u8; 8];
        let value = TypedValueRef::at_start(&bytes, &ty, Address::ZERO);
        assert!(ty.fields().is_empty());
        assert!(value.field(0).is_none());
    }
}
