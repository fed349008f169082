//! # Runtime check for type-erased input.
//!
//! Typed `attach` calls are checked by the compiler. [`Candidate`] covers the
//! remaining case: values whose concrete type is only known at runtime (plugin
//! tables, heterogeneous registries). Every `'static` type is a candidate; the
//! pool downcasts it and reports the actual type name when it does not conform.
//!
//! A conforming watcher candidate is a boxed [`WatcherRef`](crate::WatcherRef),
//! i.e. the `Rc<dyn Watch<S, A>>` handle, not the concrete `Rc<MyWatcher>`.

use std::any::{self, Any};

/// A value offered to a pool whose type is checked at runtime.
pub trait Candidate: Any {
    /// Fully qualified type name of the value.
    fn type_label(&self) -> &'static str;

    /// Borrow as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Convert into a boxed [`Any`] for by-value downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> Candidate for T {
    fn type_label(&self) -> &'static str {
        any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
