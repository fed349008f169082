//! End-to-end scenarios through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use watchify::{
    Method, PoolBuilder, PushError, SpyRegistry, Spyable, Trigger, Watch, WatchError,
    WatcherPool, WatcherRef, Watchers,
};

struct Food {
    name: RefCell<String>,
    cook: Method<Food, String>,
}

impl Food {
    fn new() -> Self {
        Self {
            name: RefCell::default(),
            cook: Method::new(|this: &Food, name: &String| {
                *this.name.borrow_mut() = name.clone();
            }),
        }
    }

    fn named(name: &str) -> Self {
        let food = Self::new();
        *food.name.borrow_mut() = name.to_string();
        food
    }

    fn cook(&self, name: &str) {
        self.cook.call(self, &name.to_string())
    }
}

impl Spyable<String> for Food {
    fn method(&self, name: &str) -> Option<&Method<Self, String>> {
        (name == "cook").then_some(&self.cook)
    }
}

#[derive(Default)]
struct CatWatcher {
    replies: RefCell<Vec<String>>,
}

impl<A: 'static> Watch<Food, A> for CatWatcher {
    fn push(&self, food: &Food, _args: &A) -> Result<(), PushError> {
        let reply = if *food.name.borrow() == "fish" {
            "Cat loves fish!"
        } else {
            "Cat hates fish!"
        };
        self.replies.borrow_mut().push(reply.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct MonkeyWatcher {
    calls: Cell<usize>,
}

impl<A: 'static> Watch<Food, A> for MonkeyWatcher {
    fn push(&self, food: &Food, _args: &A) -> Result<(), PushError> {
        self.calls.set(self.calls.get() + 1);
        if *food.name.borrow() == "banana" {
            Ok(())
        } else {
            Err(format!("Monkey hates {}!", food.name.borrow()).into())
        }
    }
}

fn quiet<A: 'static>() -> Watchers<Food, A> {
    PoolBuilder::new().disable_logs(true).build()
}

#[test]
fn test_cat_loves_fish() {
    let cat = Rc::new(CatWatcher::default());
    let mut watchers = quiet::<()>();
    watchers.attach(cat.clone());

    watchers.notify(&Food::named("fish"), &());

    assert_eq!(*cat.replies.borrow(), ["Cat loves fish!"]);
}

#[test]
fn test_twenty_cats_show_eight() {
    let cat: WatcherRef<Food> = Rc::new(CatWatcher::default());
    let mut pool = WatcherPool::new();
    pool.attach_many(std::iter::repeat(cat).take(20));

    assert_eq!(
        pool.to_string(),
        "<WatcherPool object:Observers[CatWatcher, CatWatcher, CatWatcher, CatWatcher, \
         CatWatcher, CatWatcher, CatWatcher, CatWatcher, ...]>"
    );
}

#[test]
fn test_failing_watcher_is_isolated_by_default_and_fatal_in_strict_mode() {
    let monkey = Rc::new(MonkeyWatcher::default());
    let cat = Rc::new(CatWatcher::default());
    let mut watchers = quiet::<()>();
    watchers.attach(monkey.clone()).attach(cat.clone());
    let fish = Food::named("fish");

    watchers.notify(&fish, &());
    assert_eq!(monkey.calls.get(), 1);
    assert_eq!(cat.replies.borrow().len(), 1);

    let err = watchers.notify_strict(&fish, &()).unwrap_err();
    assert!(matches!(err, WatchError::Notification { ref watcher, .. } if watcher == "MonkeyWatcher"));
    assert_eq!(monkey.calls.get(), 2);
    assert_eq!(cat.replies.borrow().len(), 1);
}

#[test]
fn test_merging_pools() {
    let cat: WatcherRef<Food> = Rc::new(CatWatcher::default());
    let monkey: WatcherRef<Food> = Rc::new(MonkeyWatcher::default());
    let mut p1 = quiet::<()>();
    let mut p2 = quiet::<()>();
    p1.attach(cat.clone());
    p2.attach(monkey.clone());

    let merged = p1.merge(&p2);

    assert_eq!(merged.count(), 2);
    assert!(Rc::ptr_eq(merged.get(0).unwrap(), &cat));
    assert!(Rc::ptr_eq(merged.get(1).unwrap(), &monkey));
    assert_eq!(p1.count(), 1);
    assert_eq!(p2.count(), 1);
}

#[test]
fn test_non_watcher_is_rejected() {
    let mut watchers = quiet::<()>();
    let err = watchers
        .attach_candidate(Box::new(Food::new()))
        .unwrap_err();
    assert_eq!(err.as_label(), "not_a_watcher");
    assert_eq!(watchers.count(), 0);
}

#[test]
fn test_spying_cook_notifies_after_the_name_changes() {
    let cat = Rc::new(CatWatcher::default());
    let monkey = Rc::new(MonkeyWatcher::default());
    let food = Food::new();
    let mut registry: SpyRegistry<Food, String> = SpyRegistry::from_watchers(quiet());
    registry.attach(cat.clone()).attach(monkey.clone());
    assert!(registry.spies().is_empty());

    let record = registry.spy(&food, "cook", Trigger::After).unwrap();
    assert!(record.is_spying(&food));
    assert_eq!(record.method(), "cook");
    assert_eq!(registry.spies().len(), 1);

    food.cook("fish");
    food.cook("banana");

    assert_eq!(*food.name.borrow(), "banana");
    assert_eq!(*cat.replies.borrow(), ["Cat loves fish!", "Cat hates fish!"]);
    assert_eq!(monkey.calls.get(), 2);
}

#[test]
fn test_spying_before_sees_the_previous_state() {
    let cat = Rc::new(CatWatcher::default());
    let food = Food::named("fish");
    let mut registry: SpyRegistry<Food, String> = SpyRegistry::from_watchers(quiet());
    registry.attach(cat.clone());
    registry
        .spy(&food, "cook", "before".parse().unwrap())
        .unwrap();

    food.cook("banana");

    assert_eq!(*cat.replies.borrow(), ["Cat loves fish!"]);
    assert_eq!(*food.name.borrow(), "banana");
}

#[test]
fn test_undo_spy_behaves_as_never_spied() {
    let cat = Rc::new(CatWatcher::default());
    let food = Food::new();
    let mut registry: SpyRegistry<Food, String> = SpyRegistry::from_watchers(quiet());
    registry.attach(cat.clone());
    registry.spy(&food, "cook", Trigger::After).unwrap();

    registry.undo_spy(&food, "cook").unwrap();
    food.cook("fish");

    assert!(cat.replies.borrow().is_empty());
    assert_eq!(*food.name.borrow(), "fish");
    assert!(registry.undo_spy(&food, "cook").unwrap_err().is_not_found());
}
