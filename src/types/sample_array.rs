// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Growable sample buffer whose capacity never shrinks.
//!
//! Sessions and codecs keep one [`SampleArray`] per per-beam or per-sample
//! quantity. Lengths move freely with every record, but the allocation only
//! ever grows: a large ping followed by a small one keeps the large
//! allocation so the next large ping decodes without reallocating.
//!
//! Growth goes through `Vec::try_reserve`, so an allocation failure surfaces
//! as [`MbError::ResourceExhausted`] instead of aborting the process.

use std::ops::{Deref, DerefMut};

use crate::core::{MbError, Result};

/// A length-tracked buffer with monotonically non-decreasing capacity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleArray<T> {
    data: Vec<T>,
}

impl<T: Copy + Default> SampleArray<T> {
    /// Create an empty array with no allocation.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create an empty array with room for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut array = Self::new();
        array.reserve(capacity)?;
        Ok(array)
    }

    /// Get the current logical length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the allocated capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Ensure capacity for at least `required` elements.
    ///
    /// Never reduces capacity and never touches existing elements.
    pub fn reserve(&mut self, required: usize) -> Result<()> {
        if required <= self.data.capacity() {
            return Ok(());
        }
        let additional = required - self.data.len();
        self.data
            .try_reserve(additional)
            .map_err(|_| MbError::resource_exhausted("sample array", required))?;
        tracing::debug!(
            required = required,
            capacity = self.data.capacity(),
            "grew sample array"
        );
        Ok(())
    }

    /// Set the logical length, growing capacity first if needed.
    ///
    /// New elements are `T::default()`. Shrinking only drops the tail from
    /// view; the allocation is kept.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        self.reserve(len)?;
        self.data.resize(len, T::default());
        Ok(())
    }

    /// Replace the contents with `values`, growing capacity first if needed.
    pub fn assign(&mut self, values: &[T]) -> Result<()> {
        self.reserve(values.len())?;
        self.data.clear();
        self.data.extend_from_slice(values);
        Ok(())
    }

    /// Append one element.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.reserve(self.data.len() + 1)?;
        self.data.push(value);
        Ok(())
    }

    /// Reset the length to zero (allocation is kept).
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get a reference to the elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get a mutable reference to the elements.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Copy the elements into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }
}

impl<T> Deref for SampleArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for SampleArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Copy + Default> From<Vec<T>> for SampleArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_is_unallocated() {
        let array = SampleArray::<f64>::new();
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 0);
    }

    #[test]
    fn test_resize_keeps_capacity_on_shrink() {
        let mut array = SampleArray::<f64>::new();
        array.resize(100).unwrap();
        let cap = array.capacity();
        assert!(cap >= 100);

        array.resize(3).unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.capacity(), cap);

        array.clear();
        assert_eq!(array.capacity(), cap);
    }

    #[test]
    fn test_growth_preserves_contents() {
        let mut array = SampleArray::<i32>::new();
        array.assign(&[1, 2, 3]).unwrap();
        array.reserve(10_000).unwrap();
        assert_eq!(array.as_slice(), &[1, 2, 3]);
        array.resize(5).unwrap();
        assert_eq!(array.as_slice(), &[1, 2, 3, 0, 0]);
    }

    #[test]
    fn test_push_and_deref() {
        let mut array = SampleArray::<u8>::new();
        array.push(7).unwrap();
        array.push(9).unwrap();
        assert_eq!(&array[..], &[7, 9]);
        array[0] = 1;
        assert_eq!(array.to_vec(), vec![1, 9]);
    }

    #[test]
    fn test_huge_reserve_is_recoverable() {
        let mut array = SampleArray::<f64>::new();
        let err = array.reserve(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, MbError::ResourceExhausted { .. }));
        assert!(array.is_empty());
    }

    proptest! {
        #[test]
        fn prop_capacity_never_shrinks(lengths in proptest::collection::vec(0usize..4096, 1..32)) {
            let mut array = SampleArray::<f32>::new();
            let mut last_cap = 0;
            let mut max_len = 0;
            for len in lengths {
                array.resize(len).unwrap();
                max_len = max_len.max(len);
                prop_assert!(array.capacity() >= last_cap);
                prop_assert!(array.capacity() >= max_len);
                last_cap = array.capacity();
            }
        }
    }
}
