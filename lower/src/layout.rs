//! Canonical-layout normalization of buffer operands.
//!
//! The runtime ABI only accepts contiguous buffers. Strided views (e.g. the
//! result of a sub-view) are copied into a freshly allocated identity-layout
//! buffer right before the call; operands already in canonical layout pass
//! through untouched.

use sable_ir::{AttrMap, OpKind, Rewriter, Type, ValueId};

/// Return the operand to pass to the runtime call and the type to declare for
/// its slot.
///
/// For a strided buffer this emits one `Alloc` of the identity-layout type and
/// one `Copy` from the original operand, and substitutes the copy. Each
/// operand is normalized independently. Non-buffer operands pass through.
pub fn normalized_operand(rw: &mut Rewriter<'_>, operand: ValueId) -> (ValueId, Type) {
    let ty = rw.func().value_type(operand).clone();
    let Type::Buffer(buf) = &ty else {
        return (operand, ty);
    };
    if buf.is_canonical() {
        return (operand, ty);
    }

    let canonical = Type::Buffer(buf.identity());
    let alloc = rw.create(OpKind::Alloc, &[], std::slice::from_ref(&canonical), AttrMap::new());
    let contiguous = rw.func().op(alloc).results[0];
    rw.create(OpKind::Copy, &[operand, contiguous], &[], AttrMap::new());
    tracing::debug!(?canonical, "copied strided operand to canonical layout");
    (contiguous, canonical)
}
