//! # SpyRegistry: watchers plus reversible method interception
//!
//! [`SpyRegistry`] owns a [`Watchers`] pool and a table of active spies. Every
//! pool operation behaves exactly as on [`Watchers`]; the registry adds
//! [`spy`](SpyRegistry::spy) / [`undo_spy`](SpyRegistry::undo_spy).
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use watchify::{Method, PushError, SpyRegistry, Spyable, Trigger, Watch};
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
//!         (name == "cook").then_some(&self.cook)
//!     }
//! }
//!
//! #[derive(Default)]
//! struct CatWatcher(RefCell<Vec<String>>);
//!
//! impl Watch<Food, String> for CatWatcher {
//!     fn push(&self, food: &Food, _dish: &String) -> Result<(), PushError> {
//!         let verdict = if *food.name.borrow() == "fish" { "loves" } else { "hates" };
//!         self.0.borrow_mut().push(format!("Cat {verdict} {}!", food.name.borrow()));
//!         Ok(())
//!     }
//! }
//!
//! let food = Food::new();
//! let cat = Rc::new(CatWatcher::default());
//! let mut spies: SpyRegistry<Food, String> = SpyRegistry::new();
//! spies.attach(cat.clone());
//!
//! let record = spies.spy(&food, "cook", Trigger::After).unwrap();
//! assert_eq!(record.to_string(), "Spying(sender=<Food object>, method=cook, trigger=after)");
//!
//! food.cook("fish");
//! food.cook("banana");
//! assert_eq!(*cat.0.borrow(), ["Cat loves fish!", "Cat hates banana!"]);
//!
//! spies.undo_spy(&food, "cook").unwrap();
//! food.cook("fish");
//! assert_eq!(cat.0.borrow().len(), 2);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::WatchError;
use crate::pool::{render_listing, Candidate, NotifyMode, WatcherSource, Watchers};
use crate::spy::method::{Link, MethodFn, Spyable};
use crate::spy::record::{SpyRecord, Trigger};
use crate::watchers::WatcherRef;

type Accept<R> = Rc<dyn Fn(&R) -> bool>;

/// Watcher pool that can spy on methods of [`Spyable`] objects.
///
/// `S` is the sender type, `A` the spied methods' arguments, `R` their return type.
pub struct SpyRegistry<S, A = (), R = ()> {
    watchers: Rc<RefCell<Watchers<S, A>>>,
    spies: Vec<SpyRecord<S, A, R>>,
}

impl<S: 'static, A: 'static, R: 'static> SpyRegistry<S, A, R> {
    /// Creates a registry around a default [`Watchers`] pool.
    #[must_use]
    pub fn new() -> Self {
        Self::from_watchers(Watchers::new())
    }

    /// Creates a registry around an existing pool (e.g. one built with
    /// [`PoolBuilder`](crate::PoolBuilder)).
    #[must_use]
    pub fn from_watchers(watchers: Watchers<S, A>) -> Self {
        Self {
            watchers: Rc::new(RefCell::new(watchers)),
            spies: Vec::new(),
        }
    }

    /// Wraps `method` of `sender` so each call also notifies this registry's watchers.
    ///
    /// Fails without touching `sender` when the method does not exist
    /// ([`WatchError::NoSuchMethod`]) or is already spied by this registry
    /// ([`WatchError::AlreadySpied`]).
    pub fn spy(
        &mut self,
        sender: &S,
        method: &str,
        trigger: Trigger,
    ) -> Result<SpyRecord<S, A, R>, WatchError>
    where
        S: Spyable<A, R>,
    {
        self.install(sender, method, trigger, None)
    }

    /// Like [`spy`](Self::spy) with [`Trigger::After`], but notifies only when
    /// `accept` returns `true` for the original call's result.
    pub fn spy_on_return<F>(
        &mut self,
        sender: &S,
        method: &str,
        accept: F,
    ) -> Result<SpyRecord<S, A, R>, WatchError>
    where
        S: Spyable<A, R>,
        F: Fn(&R) -> bool + 'static,
    {
        self.install(sender, method, Trigger::After, Some(Rc::new(accept)))
    }

    /// Active spies, in the order they were installed.
    #[must_use]
    pub fn spies(&self) -> Vec<SpyRecord<S, A, R>> {
        self.spies.clone()
    }

    /// Active spies collected into any container.
    pub fn spies_as<C>(&self) -> C
    where
        C: FromIterator<SpyRecord<S, A, R>>,
    {
        self.spies.iter().cloned().collect()
    }

    /// Stops spying `method` of `sender` and reinstalls the original callable.
    ///
    /// When another registry spied the same method afterwards, its wrapper stays in
    /// place and is relinked past this one, so undoing the two in any order leaves the
    /// original body installed.
    ///
    /// Fails with [`WatchError::SpyNotFound`], changing nothing, if the pair is not spied.
    pub fn undo_spy(&mut self, sender: &S, method: &str) -> Result<SpyRecord<S, A, R>, WatchError>
    where
        S: Spyable<A, R>,
    {
        let index = sender
            .method(method)
            .and_then(|m| self.spies.iter().position(|s| m.is_slot(s.slot())))
            .ok_or_else(|| WatchError::SpyNotFound {
                sender: sender.describe(),
                method: method.to_string(),
            })?;

        let record = self.spies.remove(index);
        self.restore(&record);
        Ok(record)
    }

    /// Undoes every active spy, returning the records in install order.
    pub fn undo_spies(&mut self) -> Vec<SpyRecord<S, A, R>> {
        let records = std::mem::take(&mut self.spies);
        for record in &records {
            self.restore(record);
        }
        records
    }

    /// Removes all watchers, after undoing every spy when `also_undo_spies` is set.
    pub fn reset(&mut self, also_undo_spies: bool) -> &mut Self {
        if also_undo_spies {
            self.undo_spies();
        }
        self.watchers.borrow_mut().reset();
        self
    }

    /// Undoes every spy and removes all watchers.
    pub fn reset_all(&mut self) -> &mut Self {
        self.reset(true)
    }

    /// See [`Watchers::attach`].
    pub fn attach(&mut self, watcher: WatcherRef<S, A>) -> &mut Self {
        self.watchers.borrow_mut().attach(watcher);
        self
    }

    /// See [`Watchers::attach_many`].
    pub fn attach_many<I>(&mut self, watchers: I) -> &mut Self
    where
        I: IntoIterator<Item = WatcherRef<S, A>>,
    {
        self.watchers.borrow_mut().attach_many(watchers);
        self
    }

    /// See [`Watchers::attach_candidate`].
    pub fn attach_candidate(
        &mut self,
        candidate: Box<dyn Candidate>,
    ) -> Result<&mut Self, WatchError> {
        self.watchers.borrow_mut().attach_candidate(candidate)?;
        Ok(self)
    }

    /// See [`Watchers::attach_many_candidates`].
    pub fn attach_many_candidates(
        &mut self,
        candidates: Vec<Box<dyn Candidate>>,
    ) -> Result<&mut Self, WatchError> {
        self.watchers
            .borrow_mut()
            .attach_many_candidates(candidates)?;
        Ok(self)
    }

    /// See [`Watchers::detach`].
    pub fn detach(&mut self, watcher: &WatcherRef<S, A>) -> Result<&mut Self, WatchError> {
        self.watchers.borrow_mut().detach(watcher)?;
        Ok(self)
    }

    /// See [`Watchers::detach_many`].
    pub fn detach_many(&mut self, watchers: &[WatcherRef<S, A>]) -> Result<&mut Self, WatchError> {
        self.watchers.borrow_mut().detach_many(watchers)?;
        Ok(self)
    }

    /// Merges the watchers (not the spies) into a new [`Watchers`] pool.
    ///
    /// `other` may be any pool, including another registry.
    #[must_use]
    pub fn merge(&self, other: &impl WatcherSource<S, A>) -> Watchers<S, A> {
        self.watchers.borrow().merge(other)
    }

    /// See [`Watchers::merge_candidate`]; additionally accepts a registry with this
    /// registry's return type `R`.
    pub fn merge_candidate(&self, other: &dyn Candidate) -> Result<Watchers<S, A>, WatchError> {
        let any = Candidate::as_any(other);
        if let Some(registry) = any.downcast_ref::<SpyRegistry<S, A, R>>() {
            return Ok(self.merge(registry));
        }
        self.watchers.borrow().merge_candidate(other)
    }

    /// See [`Watchers::notify`].
    pub fn notify(&self, sender: &S, args: &A) -> &Self {
        notify_snapshot(&self.watchers, sender, args);
        self
    }

    /// See [`Watchers::notify_strict`].
    pub fn notify_strict(&self, sender: &S, args: &A) -> Result<&Self, WatchError> {
        self.notify_with(sender, args, NotifyMode::Strict)
    }

    /// See [`Watchers::notify_with`].
    pub fn notify_with(&self, sender: &S, args: &A, mode: NotifyMode) -> Result<&Self, WatchError> {
        let snapshot = self.watchers.borrow().clone();
        snapshot.notify_with(sender, args, mode)?;
        Ok(self)
    }

    /// Number of attached watchers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.watchers.borrow().count()
    }

    /// True if no watcher is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watchers.borrow().is_empty()
    }

    /// True if an identical handle is attached.
    #[must_use]
    pub fn contains(&self, watcher: &WatcherRef<S, A>) -> bool {
        self.watchers.borrow().contains(watcher)
    }

    /// Returns (a handle to) the watcher at `index`.
    pub fn get(&self, index: usize) -> Result<WatcherRef<S, A>, WatchError> {
        self.watchers.borrow().get(index).cloned()
    }

    /// Snapshot of the attached watchers, in notify order.
    #[must_use]
    pub fn watchers(&self) -> Vec<WatcherRef<S, A>> {
        self.watchers.borrow().watchers_as()
    }

    /// Collects the watchers into any container.
    pub fn watchers_as<C>(&self) -> C
    where
        C: FromIterator<WatcherRef<S, A>>,
    {
        self.watchers.borrow().watchers_as()
    }

    fn install(
        &mut self,
        sender: &S,
        method: &str,
        trigger: Trigger,
        accept: Option<Accept<R>>,
    ) -> Result<SpyRecord<S, A, R>, WatchError>
    where
        S: Spyable<A, R>,
    {
        let slot = sender.method(method).ok_or_else(|| WatchError::NoSuchMethod {
            sender: sender.describe(),
            method: method.to_string(),
        })?;
        if self.spies.iter().any(|s| slot.is_slot(s.slot())) {
            return Err(WatchError::AlreadySpied {
                sender: sender.describe(),
                method: method.to_string(),
            });
        }

        let target = slot.slot();
        let on_return = accept.is_some();
        let watchers = Rc::downgrade(&self.watchers);
        let (installed, below) =
            target.push_layer(|below| wrap(below, watchers, trigger, accept));

        let record = SpyRecord::new(
            sender.describe(),
            method,
            trigger,
            on_return,
            installed,
            below,
            target,
        );
        self.spies.push(record.clone());
        self.watchers.borrow().logger().debug(|| {
            format!(
                "<sender '{}'> <method '{}'> is now being spied...",
                record.sender(),
                record.method()
            )
        });
        Ok(record)
    }

    fn restore(&self, record: &SpyRecord<S, A, R>) {
        record.restore();
        self.watchers.borrow().logger().debug(|| {
            format!(
                "<sender '{}'> <method '{}'> is no longer being spied.",
                record.sender(),
                record.method()
            )
        });
    }
}

/// Builds the wrapper installed on top of the body held by `below`.
fn wrap<S: 'static, A: 'static, R: 'static>(
    below: Link<S, A, R>,
    watchers: Weak<RefCell<Watchers<S, A>>>,
    trigger: Trigger,
    accept: Option<Accept<R>>,
) -> MethodFn<S, A, R> {
    Rc::new(move |this: &S, args: &A| {
        let original = Rc::clone(&*below.borrow());
        match trigger {
            Trigger::Before => {
                if let Some(watchers) = watchers.upgrade() {
                    notify_snapshot(&watchers, this, args);
                }
                original(this, args)
            }
            Trigger::After => {
                let out = original(this, args);
                let wanted = accept.as_ref().map_or(true, |accept| accept(&out));
                if let Some(watchers) = watchers.upgrade().filter(|_| wanted) {
                    notify_snapshot(&watchers, this, args);
                }
                out
            }
        }
    })
}

/// Isolated notify over a copy of the pool, so watchers may reach back into the registry.
fn notify_snapshot<S: 'static, A: 'static>(
    watchers: &RefCell<Watchers<S, A>>,
    sender: &S,
    args: &A,
) {
    let snapshot = watchers.borrow().clone();
    snapshot.notify(sender, args);
}

impl<S: 'static, A: 'static, R: 'static> WatcherSource<S, A> for SpyRegistry<S, A, R> {
    fn watcher_handles(&self) -> Vec<WatcherRef<S, A>> {
        self.watchers.borrow().watcher_handles()
    }
}

impl<S: 'static, A: 'static, R: 'static> Default for SpyRegistry<S, A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, A: 'static, R: 'static> fmt::Display for SpyRegistry<S, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let watchers = self.watchers.borrow();
        f.write_str(&render_listing("SpyRegistry", watchers.iter()))
    }
}

impl<S: 'static, A: 'static, R: 'static> fmt::Debug for SpyRegistry<S, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyRegistry")
            .field("watchers", &*self.watchers.borrow())
            .field("spies", &self.spies)
            .finish()
    }
}
