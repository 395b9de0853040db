//! Property tests for canonical stride computation.

use proptest::prelude::*;

use crate::types::{Layout, row_major_strides};

proptest! {
    /// Each identity stride is the product of the trailing extents.
    #[test]
    fn identity_strides_are_suffix_products(shape in prop::collection::vec(1i64..9, 0..6)) {
        let strides = row_major_strides(&shape);
        prop_assert_eq!(strides.len(), shape.len());
        for i in 0..shape.len() {
            let expected: i64 = shape[i + 1..].iter().product();
            prop_assert_eq!(strides[i], expected);
        }
    }

    /// The identity layout always classifies as identity for its own shape.
    #[test]
    fn identity_layout_is_identity(shape in prop::collection::vec(1i64..9, 0..6)) {
        prop_assert!(Layout::identity(&shape).is_identity(&shape));
    }
}
