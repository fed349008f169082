//! # Reassignable method slots.
//!
//! Rust methods cannot be patched at runtime, so a spyable method is stored as a
//! [`Method`]: a slot holding the callable that the object's real method forwards to.
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use watchify::{Method, Spyable};
//!
//! struct Food {
//!     name: RefCell<String>,
//!     cook: Method<Food, String>,
//! }
//!
//! impl Food {
//!     fn new() -> Self {
//!         Self {
//!             name: RefCell::default(),
//!             cook: Method::new(|this: &Food, name: &String| {
//!                 *this.name.borrow_mut() = name.clone();
//!             }),
//!         }
//!     }
//!
//!     fn cook(&self, name: &str) {
//!         self.cook.call(self, &name.to_string())
//!     }
//! }
//!
//! impl Spyable<String> for Food {
//!     fn method(&self, name: &str) -> Option<&Method<Self, String>> {
//!         match name {
//!             "cook" => Some(&self.cook),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let food = Food::new();
//! food.cook("fish");
//! assert_eq!(*food.name.borrow(), "fish");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::watchers::short_type_name;

/// Callable stored in a [`Method`] slot: `(self, args) -> result`.
pub type MethodFn<S, A = (), R = ()> = Rc<dyn Fn(&S, &A) -> R>;

/// Cell a spy wrapper forwards to: the body that was installed below it.
pub(crate) type Link<S, A, R> = Rc<RefCell<MethodFn<S, A, R>>>;

/// Body plus the stack of spy wrappers layered on top of it.
///
/// Each wrapper forwards through its own [`Link`], so a wrapper that is not on
/// top can still be spliced out by pointing the layer above it past it.
pub(crate) struct Slot<S, A, R> {
    body: RefCell<MethodFn<S, A, R>>,
    layers: RefCell<Vec<Layer<S, A, R>>>,
}

struct Layer<S, A, R> {
    installed: MethodFn<S, A, R>,
    below: Link<S, A, R>,
}

impl<S, A, R> Slot<S, A, R> {
    fn new(body: MethodFn<S, A, R>) -> Self {
        Self {
            body: RefCell::new(body),
            layers: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn current(&self) -> MethodFn<S, A, R> {
        Rc::clone(&*self.body.borrow())
    }

    /// Installs the wrapper built by `build` on top of the current body.
    ///
    /// Returns the installed wrapper and the link it forwards through.
    pub(crate) fn push_layer<F>(&self, build: F) -> (MethodFn<S, A, R>, Link<S, A, R>)
    where
        F: FnOnce(Link<S, A, R>) -> MethodFn<S, A, R>,
    {
        let below: Link<S, A, R> = Rc::new(RefCell::new(self.current()));
        let installed = build(Rc::clone(&below));
        *self.body.borrow_mut() = Rc::clone(&installed);
        self.layers.borrow_mut().push(Layer {
            installed: Rc::clone(&installed),
            below: Rc::clone(&below),
        });
        (installed, below)
    }

    /// Removes `installed` from the chain wherever it sits.
    ///
    /// Returns `false` if `installed` is not a layer of this slot.
    pub(crate) fn remove_layer(&self, installed: &MethodFn<S, A, R>) -> bool {
        let removed = {
            let mut layers = self.layers.borrow_mut();
            match layers
                .iter()
                .position(|layer| same_body(&layer.installed, installed))
            {
                Some(index) => layers.remove(index),
                None => return false,
            }
        };
        let next = Rc::clone(&*removed.below.borrow());

        let on_top = same_body(&self.body.borrow(), installed);
        if on_top {
            *self.body.borrow_mut() = next;
            return true;
        }
        for layer in self.layers.borrow().iter() {
            let covers = same_body(&layer.below.borrow(), installed);
            if covers {
                *layer.below.borrow_mut() = next;
                break;
            }
        }
        true
    }
}

/// Body identity: both handles point at the same closure.
pub(crate) fn same_body<S, A, R>(a: &MethodFn<S, A, R>, b: &MethodFn<S, A, R>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A method whose body can be swapped while the owner is alive.
///
/// Cloning produces an **independent** slot holding the body the method was
/// created with. Spies active on the source are not carried over, so a clone of a
/// spied object never notifies.
pub struct Method<S, A = (), R = ()> {
    slot: Rc<Slot<S, A, R>>,
    base: MethodFn<S, A, R>,
}

impl<S: 'static, A: 'static, R: 'static> Method<S, A, R> {
    /// Creates a slot holding `body`.
    pub fn new(body: impl Fn(&S, &A) -> R + 'static) -> Self {
        let body: MethodFn<S, A, R> = Rc::new(body);
        Self {
            slot: Rc::new(Slot::new(Rc::clone(&body))),
            base: body,
        }
    }

    /// Invokes the current body.
    ///
    /// The body is cloned out of the slot first, so it may swap the slot while running.
    pub fn call(&self, this: &S, args: &A) -> R {
        let body = self.slot.current();
        body(this, args)
    }

    /// The body currently installed.
    #[must_use]
    pub fn current(&self) -> MethodFn<S, A, R> {
        self.slot.current()
    }

    pub(crate) fn slot(&self) -> Rc<Slot<S, A, R>> {
        Rc::clone(&self.slot)
    }

    pub(crate) fn is_slot(&self, slot: &Rc<Slot<S, A, R>>) -> bool {
        Rc::ptr_eq(&self.slot, slot)
    }
}

impl<S, A, R> Clone for Method<S, A, R> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::new(Slot::new(Rc::clone(&self.base))),
            base: Rc::clone(&self.base),
        }
    }
}

impl<S, A, R> fmt::Debug for Method<S, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").finish_non_exhaustive()
    }
}

/// An object exposing named [`Method`] slots to a [`SpyRegistry`](crate::SpyRegistry).
pub trait Spyable<A = (), R = ()>: Sized + 'static {
    /// Returns the slot registered under `name`.
    fn method(&self, name: &str) -> Option<&Method<Self, A, R>>;

    /// Text used for this object in spy records and log lines.
    ///
    /// Defaults to `<TypeName object>`.
    fn describe(&self) -> String {
        format!("<{} object>", short_type_name::<Self>())
    }
}
