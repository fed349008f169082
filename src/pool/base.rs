//! # WatcherPool: minimal ordered pool
//!
//! [`WatcherPool`] keeps watchers in attach order and pushes to each of them on
//! [`notify`](WatcherPool::notify).
//!
//! ## What it guarantees
//! - Attach order is notify order.
//! - Duplicates are kept; detach removes the first identical handle.
//! - `merge` never modifies its inputs.
//!
//! ## What it does **not** do
//! - No validation and no logging.
//! - No failure isolation: the first failing watcher aborts the notification.
//!
//! ## Example
//! ```rust
//! use watchify::{WatchFn, WatcherPool, WatcherRef};
//!
//! let hello: WatcherRef<String> = WatchFn::rc("hello", |who: &String, _: &()| {
//!     println!("hello {who}");
//!     Ok(())
//! });
//!
//! let mut pool = WatcherPool::new();
//! pool.attach(hello.clone()).attach(hello.clone());
//! assert_eq!(pool.count(), 2);
//!
//! pool.detach(&hello).unwrap();
//! assert_eq!(pool.count(), 1);
//! pool.notify(&"world".to_string(), &()).unwrap();
//! ```

use std::fmt;
use std::ops::Add;
use std::rc::Rc;

use crate::error::WatchError;
use crate::watchers::{short_type_name, WatcherRef};

/// Number of watcher names shown by `Display` before truncating.
const LISTING_LIMIT: usize = 8;

/// Anything holding an ordered set of watchers: the input side of `merge`.
///
/// Implemented by [`WatcherPool`], [`Watchers`](crate::Watchers) and
/// [`SpyRegistry`](crate::SpyRegistry), so any of them can be merged into any other.
pub trait WatcherSource<S, A = ()> {
    /// Handles in notify order.
    fn watcher_handles(&self) -> Vec<WatcherRef<S, A>>;
}

/// Ordered, mutable collection of watchers.
pub struct WatcherPool<S, A = ()> {
    watchers: Vec<WatcherRef<S, A>>,
}

impl<S: 'static, A: 'static> WatcherPool<S, A> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            watchers: Vec::new(),
        }
    }

    /// Appends a watcher.
    pub fn attach(&mut self, watcher: WatcherRef<S, A>) -> &mut Self {
        self.watchers.push(watcher);
        self
    }

    /// Appends watchers, keeping their relative order.
    pub fn attach_many<I>(&mut self, watchers: I) -> &mut Self
    where
        I: IntoIterator<Item = WatcherRef<S, A>>,
    {
        self.watchers.extend(watchers);
        self
    }

    /// Removes the first entry identical to `watcher`.
    ///
    /// Fails with [`WatchError::WatcherNotFound`] and leaves the pool untouched if absent.
    pub fn detach(&mut self, watcher: &WatcherRef<S, A>) -> Result<&mut Self, WatchError> {
        let index = self
            .position(watcher)
            .ok_or_else(|| WatchError::WatcherNotFound {
                watcher: watcher.name().to_string(),
            })?;
        self.watchers.remove(index);
        Ok(self)
    }

    /// Detaches each watcher in turn.
    ///
    /// Stops at the first absent watcher; removals made before it stay applied.
    pub fn detach_many(&mut self, watchers: &[WatcherRef<S, A>]) -> Result<&mut Self, WatchError> {
        for watcher in watchers {
            self.detach(watcher)?;
        }
        Ok(self)
    }

    /// Returns a new pool holding `self`'s watchers followed by `other`'s.
    #[must_use]
    pub fn merge(&self, other: &impl WatcherSource<S, A>) -> WatcherPool<S, A> {
        let mut merged = self.clone();
        merged.attach_many(other.watcher_handles());
        merged
    }

    /// Pushes to every watcher in order.
    ///
    /// The first failure is returned as [`WatchError::Push`]; remaining watchers are skipped.
    pub fn notify(&self, sender: &S, args: &A) -> Result<&Self, WatchError> {
        for watcher in &self.watchers {
            watcher
                .push(sender, args)
                .map_err(|source| WatchError::Push {
                    watcher: watcher.name().to_string(),
                    source,
                })?;
        }
        Ok(self)
    }

    /// Removes all watchers.
    pub fn reset(&mut self) -> &mut Self {
        self.watchers.clear();
        self
    }

    /// Number of attached watchers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.watchers.len()
    }

    /// True if no watcher is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    /// True if an identical handle is attached.
    #[must_use]
    pub fn contains(&self, watcher: &WatcherRef<S, A>) -> bool {
        self.position(watcher).is_some()
    }

    /// Returns the watcher at `index`.
    pub fn get(&self, index: usize) -> Result<&WatcherRef<S, A>, WatchError> {
        self.watchers
            .get(index)
            .ok_or(WatchError::IndexOutOfRange {
                index,
                len: self.count(),
            })
    }

    /// Iterates watchers in notify order.
    pub fn iter(&self) -> std::slice::Iter<'_, WatcherRef<S, A>> {
        self.watchers.iter()
    }

    /// All watchers, in notify order.
    #[must_use]
    pub fn watchers(&self) -> &[WatcherRef<S, A>] {
        &self.watchers
    }

    /// Collects the watchers into any container.
    ///
    /// ```rust
    /// # use std::collections::VecDeque;
    /// # use watchify::{WatchFn, WatcherPool, WatcherRef};
    /// let noop: WatcherRef<u8> = WatchFn::rc("noop", |_: &u8, _: &()| Ok(()));
    /// let mut pool = WatcherPool::new();
    /// pool.attach(noop);
    /// let queue: VecDeque<_> = pool.watchers_as();
    /// assert_eq!(queue.len(), 1);
    /// ```
    pub fn watchers_as<C>(&self) -> C
    where
        C: FromIterator<WatcherRef<S, A>>,
    {
        self.watchers.iter().cloned().collect()
    }

    fn position(&self, watcher: &WatcherRef<S, A>) -> Option<usize> {
        self.watchers
            .iter()
            .position(|attached| same_watcher(attached, watcher))
    }
}

/// Watcher identity: both handles point at the same allocation.
fn same_watcher<S: 'static, A: 'static>(a: &WatcherRef<S, A>, b: &WatcherRef<S, A>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// `Kind<Sender, Args>` with module paths stripped, for error messages.
pub(crate) fn generic_label<S: ?Sized, A: ?Sized>(kind: &str) -> String {
    format!("{kind}<{}, {}>", short_type_name::<S>(), short_type_name::<A>())
}

/// `<Label object:Observers[A, B, ...]>`, at most [`LISTING_LIMIT`] names.
pub(crate) fn render_listing<'a, S, A, I>(label: &str, watchers: I) -> String
where
    S: 'static,
    A: 'static,
    I: ExactSizeIterator<Item = &'a WatcherRef<S, A>>,
{
    let total = watchers.len();
    let mut names = watchers
        .take(LISTING_LIMIT)
        .map(|w| w.name())
        .collect::<Vec<_>>()
        .join(", ");
    if total > LISTING_LIMIT {
        names.push_str(", ...");
    }
    format!("<{label} object:Observers[{names}]>")
}

impl<S: 'static, A: 'static> WatcherSource<S, A> for WatcherPool<S, A> {
    fn watcher_handles(&self) -> Vec<WatcherRef<S, A>> {
        self.watchers.clone()
    }
}

impl<S, A> Clone for WatcherPool<S, A> {
    fn clone(&self) -> Self {
        Self {
            watchers: self.watchers.clone(),
        }
    }
}

impl<S: 'static, A: 'static> Default for WatcherPool<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, A: 'static> fmt::Display for WatcherPool<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_listing("WatcherPool", self.watchers.iter()))
    }
}

impl<S: 'static, A: 'static> fmt::Debug for WatcherPool<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<S: 'static, A: 'static> Add for &WatcherPool<S, A> {
    type Output = WatcherPool<S, A>;

    fn add(self, other: &WatcherPool<S, A>) -> WatcherPool<S, A> {
        self.merge(other)
    }
}

impl<'a, S: 'static, A: 'static> IntoIterator for &'a WatcherPool<S, A> {
    type Item = &'a WatcherRef<S, A>;
    type IntoIter = std::slice::Iter<'a, WatcherRef<S, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.watchers.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::error::PushError;
    use crate::watchers::Watch;

    struct Food {
        name: String,
    }

    impl Food {
        fn named(name: &str) -> Self {
            Self {
                name: name.to_string(),
            }
        }
    }

    #[derive(Default)]
    struct CatWatcher {
        said: RefCell<Vec<String>>,
    }

    impl Watch<Food> for CatWatcher {
        fn push(&self, food: &Food, _args: &()) -> Result<(), PushError> {
            let phrase = if food.name == "fish" {
                "Cat loves fish!".to_string()
            } else {
                format!("Cat hates {}!", food.name)
            };
            self.said.borrow_mut().push(phrase);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MonkeyWatcher {
        calls: Cell<usize>,
    }

    impl Watch<Food> for MonkeyWatcher {
        fn push(&self, _food: &Food, _args: &()) -> Result<(), PushError> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    struct Broken;

    impl Watch<Food> for Broken {
        fn push(&self, _food: &Food, _args: &()) -> Result<(), PushError> {
            Err("no appetite".into())
        }
    }

    fn cat() -> (Rc<CatWatcher>, WatcherRef<Food>) {
        let cat = Rc::new(CatWatcher::default());
        let handle: WatcherRef<Food> = cat.clone();
        (cat, handle)
    }

    fn monkey() -> (Rc<MonkeyWatcher>, WatcherRef<Food>) {
        let monkey = Rc::new(MonkeyWatcher::default());
        let handle: WatcherRef<Food> = monkey.clone();
        (monkey, handle)
    }

    #[test]
    fn test_new_is_empty() {
        let pool: WatcherPool<Food> = WatcherPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.count(), 0);
        assert!(pool.watchers().is_empty());
    }

    #[test]
    fn test_attach_and_contains() {
        let (_, cat) = cat();
        let (_, monkey) = monkey();
        let mut pool = WatcherPool::new();

        assert!(pool.attach(cat.clone()).contains(&cat));
        assert!(!pool.contains(&monkey));
    }

    #[test]
    fn test_attach_many_keeps_order() {
        let (_, cat) = cat();
        let (_, monkey) = monkey();
        let mut pool = WatcherPool::new();
        pool.attach_many([cat.clone(), monkey.clone()]);

        let names: Vec<_> = pool.iter().map(|w| w.name().to_string()).collect();
        assert_eq!(names, ["CatWatcher", "MonkeyWatcher"]);
        assert!(Rc::ptr_eq(pool.get(0).unwrap(), &cat));
        assert!(Rc::ptr_eq(pool.get(1).unwrap(), &monkey));
    }

    #[test]
    fn test_get_out_of_range_reports_count() {
        let (_, cat) = cat();
        let mut pool = WatcherPool::new();
        pool.attach(cat);

        let err = pool.get(3).err().expect("index 3 must fail");
        assert!(matches!(err, WatchError::IndexOutOfRange { index: 3, len: 1 }));
        assert!(err.to_string().contains("<1>"));
    }

    #[test]
    fn test_detach_removes_first_identical() {
        let (_, cat) = cat();
        let (_, monkey) = monkey();
        let mut pool = WatcherPool::new();
        pool.attach_many([cat.clone(), monkey.clone(), cat.clone()]);

        pool.detach(&cat).unwrap();

        assert_eq!(pool.count(), 2);
        assert!(Rc::ptr_eq(pool.get(0).unwrap(), &monkey));
        assert!(Rc::ptr_eq(pool.get(1).unwrap(), &cat));
    }

    #[test]
    fn test_detach_missing_fails_without_change() {
        let (_, cat) = cat();
        let (_, monkey) = monkey();
        let mut pool = WatcherPool::new();
        pool.attach(cat);

        let err = pool.detach(&monkey).err().expect("monkey is not attached");
        assert!(matches!(err, WatchError::WatcherNotFound { .. }));
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn test_detach_many_keeps_prior_removals() {
        let (_, cat) = cat();
        let (_, monkey) = monkey();
        let mut pool = WatcherPool::new();
        pool.attach(cat.clone());

        let res = pool.detach_many(&[cat.clone(), monkey.clone()]);

        assert!(res.is_err());
        assert!(!pool.contains(&cat));
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn test_count_tracks_attach_minus_detach() {
        let (_, cat) = cat();
        let (_, monkey) = monkey();
        let mut pool = WatcherPool::new();
        let mut expected = 0usize;

        for round in 0..10 {
            pool.attach(cat.clone());
            expected += 1;
            if round % 3 == 0 {
                pool.attach(monkey.clone());
                expected += 1;
            }
            if round % 2 == 0 && pool.detach(&cat).is_ok() {
                expected -= 1;
            }
            if pool.detach(&monkey).is_ok() {
                expected -= 1;
            }
            assert_eq!(pool.count(), expected);
        }
    }

    #[test]
    fn test_merge_leaves_inputs_untouched() {
        let (_, cat) = cat();
        let (_, monkey) = monkey();
        let mut left = WatcherPool::new();
        let mut right = WatcherPool::new();
        left.attach(cat.clone());
        right.attach(monkey.clone());

        let merged = &left + &right;

        assert_eq!(merged.count(), 2);
        assert!(Rc::ptr_eq(merged.get(0).unwrap(), &cat));
        assert!(Rc::ptr_eq(merged.get(1).unwrap(), &monkey));
        assert_eq!(left.count(), 1);
        assert_eq!(right.count(), 1);
    }

    #[test]
    fn test_merged_pool_is_independent() {
        let (_, cat) = cat();
        let mut left = WatcherPool::new();
        left.attach(cat.clone());
        let right: WatcherPool<Food> = WatcherPool::new();

        let mut merged = left.merge(&right);
        merged.reset();

        assert_eq!(left.count(), 1);
    }

    #[test]
    fn test_notify_pushes_sender_once() {
        let (cat_state, cat) = cat();
        let mut pool = WatcherPool::new();
        pool.attach(cat);

        pool.notify(&Food::named("fish"), &()).unwrap();

        assert_eq!(*cat_state.said.borrow(), vec!["Cat loves fish!".to_string()]);
    }

    #[test]
    fn test_notify_aborts_on_first_failure() {
        let (monkey_state, monkey) = monkey();
        let broken: WatcherRef<Food> = Rc::new(Broken);
        let mut pool = WatcherPool::new();
        pool.attach_many([broken, monkey]);

        let err = pool.notify(&Food::named("banana"), &()).err().expect("broken fails");

        assert!(matches!(err, WatchError::Push { ref watcher, .. } if watcher == "Broken"));
        assert_eq!(monkey_state.calls.get(), 0);
    }

    #[test]
    fn test_reset_clears() {
        let (_, cat) = cat();
        let mut pool = WatcherPool::new();
        pool.attach(cat.clone());
        assert!(pool.reset().is_empty());
        assert!(!pool.contains(&cat));
    }

    #[test]
    fn test_display() {
        let (_, cat) = cat();
        let (_, monkey) = monkey();
        let mut pool = WatcherPool::new();
        assert_eq!(pool.to_string(), "<WatcherPool object:Observers[]>");

        pool.attach_many([cat, monkey]);
        assert_eq!(
            pool.to_string(),
            "<WatcherPool object:Observers[CatWatcher, MonkeyWatcher]>"
        );
    }

    #[test]
    fn test_display_truncates_after_eight() {
        let (_, cat) = cat();
        let mut pool = WatcherPool::new();
        pool.attach_many(std::iter::repeat(cat).take(20));

        let shown = pool.to_string();
        assert_eq!(shown.matches("CatWatcher").count(), 8);
        assert!(shown.ends_with("CatWatcher, ...]>"));
    }

    #[test]
    fn test_watchers_as_collects() {
        let (_, cat) = cat();
        let mut pool = WatcherPool::new();
        pool.attach_many([cat.clone(), cat]);
        let collected: Vec<WatcherRef<Food>> = pool.watchers_as();
        assert_eq!(collected.len(), 2);
    }
}
