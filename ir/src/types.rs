//! Type definitions for the buffer-semantics IR.
//!
//! This module contains the fundamental type enums and structs: scalar element
//! kinds, strided memory layouts, buffer types, and attribute values.

use std::collections::BTreeMap;
use std::fmt;

use smallvec::SmallVec;

/// Static shape of a buffer (one extent per dimension).
pub type Shape = SmallVec<[i64; 4]>;

/// Scalar element kinds carried by buffers and scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElemType {
    Pred,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ElemType {
    /// Size of one element in bytes.
    pub const fn byte_size(self) -> usize {
        use ElemType::*;
        match self {
            Pred | I8 | U8 => 1,
            I16 | U16 => 2,
            I32 | U32 | F32 => 4,
            I64 | U64 | F64 => 8,
        }
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ElemType::*;
        let name = match self {
            Pred => "pred",
            I8 => "i8",
            I16 => "i16",
            I32 => "i32",
            I64 => "i64",
            U8 => "u8",
            U16 => "u16",
            U32 => "u32",
            U64 => "u64",
            F32 => "f32",
            F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Compute row-major contiguous strides for a shape.
///
/// For dims `[D0, D1, D2]`, strides are `[D1*D2, D2, 1]`.
pub fn row_major_strides(shape: &[i64]) -> SmallVec<[i64; 4]> {
    let mut strides: SmallVec<[i64; 4]> = smallvec::smallvec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Per-buffer memory layout: an element offset plus one stride per dimension.
///
/// The identity layout (row-major contiguous, zero offset) is the canonical
/// form; anything else is a strided view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    pub offset: i64,
    pub strides: SmallVec<[i64; 4]>,
}

impl Layout {
    /// The canonical layout for `shape`.
    pub fn identity(shape: &[i64]) -> Self {
        Self { offset: 0, strides: row_major_strides(shape) }
    }

    /// Whether this layout is the canonical layout for `shape`.
    pub fn is_identity(&self, shape: &[i64]) -> bool {
        self.offset == 0 && self.strides == row_major_strides(shape)
    }
}

/// A buffer value's static type: shape, element kind, and layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferType {
    pub shape: Shape,
    pub elem: ElemType,
    pub layout: Layout,
}

impl BufferType {
    /// Buffer type with the canonical layout for `shape`.
    pub fn new(shape: &[i64], elem: ElemType) -> Self {
        Self { shape: SmallVec::from_slice(shape), elem, layout: Layout::identity(shape) }
    }

    /// Buffer type with an explicit (possibly strided) layout.
    pub fn strided(shape: &[i64], elem: ElemType, layout: Layout) -> Self {
        Self { shape: SmallVec::from_slice(shape), elem, layout }
    }

    /// Whether the layout is the canonical one for this shape.
    pub fn is_canonical(&self) -> bool {
        self.layout.is_identity(&self.shape)
    }

    /// The same shape and element kind with the canonical layout.
    pub fn identity(&self) -> Self {
        Self::new(&self.shape, self.elem)
    }
}

impl fmt::Display for BufferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.elem)?;
        for (i, dim) in self.shape.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{dim}")?;
        }
        write!(f, "]")?;
        if !self.is_canonical() {
            write!(f, "{{offset={}, strides={:?}}}", self.layout.offset, self.layout.strides.as_slice())?;
        }
        Ok(())
    }
}

/// Static type of an IR value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Buffer(BufferType),
    Scalar(ElemType),
}

impl Type {
    pub fn as_buffer(&self) -> Option<&BufferType> {
        match self {
            Type::Buffer(buf) => Some(buf),
            Type::Scalar(_) => None,
        }
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self, Type::Buffer(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Buffer(buf) => buf.fmt(f),
            Type::Scalar(elem) => elem.fmt(f),
        }
    }
}

/// Attribute value attached to an operation.
///
/// Integer widths are part of the runtime ABI: a 32-bit attribute must stay
/// 32-bit for downstream dispatch to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr {
    I32(i32),
    I64(i64),
    Str(String),
    I64Array(Vec<i64>),
}

impl Attr {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Attr::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Attr::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attr::Str(v) => Some(v),
            _ => None,
        }
    }
}

/// Ordered attribute map. Inserting an existing name overwrites its value.
pub type AttrMap = BTreeMap<String, Attr>;
