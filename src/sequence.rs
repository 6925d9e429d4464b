// src/sequence.rs
use crate::native::cast;
use crate::target::Target;
use crate::value::Value;
use std::any::type_name;
use tracing::debug;

/// A place where sequence conversion substituted a zero value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degrade {
    /// The element at `index` was neither the element type nor natively convertible to it
    Element {
        index: usize,
        /// Declared type of the rejected element
        from: &'static str,
    },
    /// A fixed-length target did not match the input length; the whole result is zero
    LengthMismatch { expected: usize, actual: usize },
    /// The target is not a sequence; the result is its zero value
    NotASequence,
}

/// The outcome of [`convert_slice_report`]: the converted value and every
/// point where it was degraded.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceReport<T> {
    pub value: T,
    pub degrades: Vec<Degrade>,
}

impl<T> SliceReport<T> {
    /// True when no element was replaced by a zero value.
    pub fn is_lossless(&self) -> bool {
        self.degrades.is_empty()
    }

    /// Drop the report and keep the converted value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Convert loosely-typed elements into a sequence target.
///
/// This never fails. Each element is taken as-is when it already has the
/// element type, converted when native conversion allows it, and replaced by
/// the element type's zero value otherwise. A fixed-length target whose
/// length differs from the input comes back all zero.
///
/// Elements are not run through the full strategy chain: a nested sequence
/// or a mapping element only survives if it already has the element type.
///
/// # Examples
///
/// ```
/// use sovran_convert::{convert_slice, Value};
///
/// let input = vec![Value::from("1"), Value::from("2"), Value::from("bad")];
/// assert_eq!(convert_slice::<[i32; 3]>(input.clone()), [1, 2, 0]);
/// assert_eq!(convert_slice::<Vec<i64>>(input), vec![1, 2, 0]);
///
/// // length mismatch degrades to the zero value
/// let short = vec![Value::I32(1), Value::I32(2)];
/// assert_eq!(convert_slice::<[i32; 3]>(short), [0, 0, 0]);
/// ```
pub fn convert_slice<T: Target>(elements: Vec<Value>) -> T {
    convert_slice_report(elements).value
}

/// Like [`convert_slice`], but also reports where zero values were substituted.
///
/// # Examples
///
/// ```
/// use sovran_convert::{convert_slice_report, Degrade, Value};
///
/// let report = convert_slice_report::<Vec<u8>>(vec![Value::I32(7), Value::I32(-1)]);
/// assert_eq!(report.value, vec![7, 0]);
/// assert_eq!(report.degrades, vec![Degrade::Element { index: 1, from: "i32" }]);
/// ```
pub fn convert_slice_report<T: Target>(elements: Vec<Value>) -> SliceReport<T> {
    let mut degrades = Vec::new();
    let value = match T::from_elements(elements, &mut degrades) {
        Some(value) => value,
        None => {
            degrades.push(Degrade::NotASequence);
            T::zero()
        }
    };

    if !degrades.is_empty() {
        debug!(
            target_type = type_name::<T>(),
            degraded = degrades.len(),
            "sequence conversion substituted zero values"
        );
    }

    SliceReport { value, degrades }
}

pub(crate) fn collect_vec<E: Target>(elements: Vec<Value>, degrades: &mut Vec<Degrade>) -> Vec<E> {
    elements
        .into_iter()
        .enumerate()
        .map(|(index, value)| element(index, value, degrades))
        .collect()
}

pub(crate) fn fill_array<E: Target, const N: usize>(
    elements: Vec<Value>,
    degrades: &mut Vec<Degrade>,
) -> [E; N] {
    if elements.len() != N {
        degrades.push(Degrade::LengthMismatch {
            expected: N,
            actual: elements.len(),
        });
        return std::array::from_fn(|_| E::zero());
    }

    let mut elements = elements.into_iter().enumerate();
    std::array::from_fn(|_| match elements.next() {
        Some((index, value)) => element(index, value, degrades),
        None => E::zero(),
    })
}

fn element<E: Target>(index: usize, value: Value, degrades: &mut Vec<Degrade>) -> E {
    match cast::<E>(value) {
        Ok(converted) => converted,
        Err(rejected) => {
            degrades.push(Degrade::Element {
                index,
                from: rejected.type_name(),
            });
            E::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_preserves_length() {
        let input = vec![
            Value::I32(1),
            Value::Null,
            Value::from("3"),
            Value::Seq(vec![]),
            Value::F64(5.0),
        ];
        let report = convert_slice_report::<Vec<i32>>(input);
        assert_eq!(report.value, vec![1, 0, 3, 0, 5]);
        assert_eq!(
            report.degrades,
            vec![
                Degrade::Element { index: 1, from: "()" },
                Degrade::Element { index: 3, from: "Vec<Value>" },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(convert_slice::<Vec<String>>(vec![]), Vec::<String>::new());
        assert_eq!(convert_slice::<[bool; 0]>(vec![]), [false; 0]);
    }

    #[test]
    fn test_array_length_mismatch() {
        let report = convert_slice_report::<[i32; 3]>(vec![Value::I32(1), Value::I32(2)]);
        assert_eq!(report.value, [0, 0, 0]);
        assert_eq!(
            report.degrades,
            vec![Degrade::LengthMismatch { expected: 3, actual: 2 }]
        );

        let long = vec![Value::I32(1); 4];
        assert_eq!(convert_slice::<[i32; 3]>(long), [0, 0, 0]);
    }

    #[test]
    fn test_identity_elements_pass_through() {
        let input = vec![Value::from("a"), Value::from("b")];
        let report = convert_slice_report::<Vec<String>>(input);
        assert!(report.is_lossless());
        assert_eq!(report.into_value(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_nested_sequences_are_not_converted() {
        let input = vec![
            Value::Seq(vec![Value::I32(1)]),
            Value::Bytes(vec![1, 2]),
        ];
        let out: Vec<Vec<u8>> = convert_slice(input);
        // only the element already typed Vec<u8> survives
        assert_eq!(out, vec![vec![], vec![1, 2]]);
    }

    #[test]
    fn test_non_sequence_target_is_zero() {
        let report = convert_slice_report::<i32>(vec![Value::I32(1)]);
        assert_eq!(report.value, 0);
        assert_eq!(report.degrades, vec![Degrade::NotASequence]);
    }

    #[test]
    fn test_dynamic_elements() {
        let input = vec![Value::I32(1), Value::from("x")];
        let out: Vec<Value> = convert_slice(input.clone());
        assert_eq!(out, input);
    }
}
