use std::any::{Any, TypeId};
use std::fmt;

type CloneFn = fn(&(dyn Any + Send + Sync)) -> Option<Box<dyn Any + Send + Sync>>;

/// A type-erased payload that remembers what it was.
///
/// `AnyValue` is how [`Value::Other`](crate::Value::Other) carries values the
/// closed variants cannot describe (a user struct, an already-decoded address,
/// a handle). It records the payload's `TypeId` and type name so the converter
/// can compare declared types and report them in errors.
pub struct AnyValue {
    type_id: TypeId,
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
    clone_fn: CloneFn,
}

impl AnyValue {
    /// Create a new AnyValue from a value of any type that implements Any, Clone, Send, and Sync
    pub fn new<T: 'static + Any + Clone + Send + Sync>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: Box::new(value),
            clone_fn: clone_payload::<T>,
        }
    }

    /// The `TypeId` of the payload
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The type name of the payload
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if the contained value is of type T
    pub fn is_type<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Get a reference to the contained value if it is of type T
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the payload out as a `T`, handing the container back on mismatch.
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        let Self {
            type_id,
            type_name,
            value,
            clone_fn,
        } = self;
        value.downcast::<T>().map(|boxed| *boxed).map_err(|value| Self {
            type_id,
            type_name,
            value,
            clone_fn,
        })
    }
}

fn clone_payload<T: 'static + Any + Clone + Send + Sync>(
    value: &(dyn Any + Send + Sync),
) -> Option<Box<dyn Any + Send + Sync>> {
    value
        .downcast_ref::<T>()
        .map(|v| Box::new(v.clone()) as Box<dyn Any + Send + Sync>)
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        // clone_fn is always paired with the payload type it was created for
        let value = match (self.clone_fn)(self.value.as_ref()) {
            Some(value) => value,
            None => unreachable!("AnyValue payload does not match its clone function"),
        };
        Self {
            type_id: self.type_id,
            type_name: self.type_name,
            value,
            clone_fn: self.clone_fn,
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
