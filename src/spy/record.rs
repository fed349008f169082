//! # Spy records and triggers.
//!
//! A [`SpyRecord`] is what a registry keeps per spied (sender, method) pair:
//! enough to describe the spy and to put the original callable back.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::WatchError;
use crate::spy::method::{Link, MethodFn, Slot, Spyable};

/// When a spied method notifies relative to the original call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Notify, then run the original.
    Before,
    /// Run the original, then notify.
    #[default]
    After,
}

impl Trigger {
    /// Lowercase name (`"before"` / `"after"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Before => "before",
            Trigger::After => "after",
        }
    }
}

impl FromStr for Trigger {
    type Err = WatchError;

    /// Parses `"before"` or `"after"`.
    ///
    /// ```rust
    /// use watchify::{Trigger, WatchError};
    ///
    /// assert_eq!("before".parse::<Trigger>().unwrap(), Trigger::Before);
    /// assert!(matches!(
    ///     "during".parse::<Trigger>(),
    ///     Err(WatchError::InvalidTrigger { .. })
    /// ));
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "before" => Ok(Trigger::Before),
            "after" => Ok(Trigger::After),
            other => Err(WatchError::InvalidTrigger {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of one active spy.
pub struct SpyRecord<S, A = (), R = ()> {
    sender: String,
    method: String,
    trigger: Trigger,
    on_return: bool,
    installed: MethodFn<S, A, R>,
    below: Link<S, A, R>,
    slot: Rc<Slot<S, A, R>>,
}

impl<S: 'static, A: 'static, R: 'static> SpyRecord<S, A, R> {
    pub(crate) fn new(
        sender: String,
        method: &str,
        trigger: Trigger,
        on_return: bool,
        installed: MethodFn<S, A, R>,
        below: Link<S, A, R>,
        slot: Rc<Slot<S, A, R>>,
    ) -> Self {
        Self {
            sender,
            method: method.to_string(),
            trigger,
            on_return,
            installed,
            below,
            slot,
        }
    }

    /// Description of the spied object.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Name of the spied method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// When notification fires.
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// True if notification is conditional on the returned value.
    pub fn on_return(&self) -> bool {
        self.on_return
    }

    /// The callable this spy forwards to.
    ///
    /// This is the body installed before spying, unless a spy installed earlier by
    /// another registry still sits below this one.
    #[must_use]
    pub fn original(&self) -> MethodFn<S, A, R> {
        Rc::clone(&*self.below.borrow())
    }

    /// True if this record spies `method()` of this exact `sender`.
    pub fn is_spying(&self, sender: &S) -> bool
    where
        S: Spyable<A, R>,
    {
        sender
            .method(&self.method)
            .is_some_and(|m| m.is_slot(&self.slot))
    }

    pub(crate) fn slot(&self) -> &Rc<Slot<S, A, R>> {
        &self.slot
    }

    /// Takes this spy's wrapper out of the method.
    ///
    /// If the wrapper is on top, what it forwarded to is reinstalled; otherwise the
    /// spy above it is relinked past it. Returns `false` if it was already removed.
    pub(crate) fn restore(&self) -> bool {
        self.slot.remove_layer(&self.installed)
    }
}

impl<S, A, R> Clone for SpyRecord<S, A, R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            method: self.method.clone(),
            trigger: self.trigger,
            on_return: self.on_return,
            installed: Rc::clone(&self.installed),
            below: Rc::clone(&self.below),
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<S, A, R> fmt::Display for SpyRecord<S, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Spying(sender={}, method={}, trigger={}",
            self.sender, self.method, self.trigger
        )?;
        if self.on_return {
            f.write_str(", on_return")?;
        }
        f.write_str(")")
    }
}

impl<S, A, R> fmt::Debug for SpyRecord<S, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spy::method::{same_body, Method};

    #[test]
    fn test_trigger_parse() {
        assert_eq!("after".parse::<Trigger>().unwrap(), Trigger::After);
        assert_eq!("before".parse::<Trigger>().unwrap(), Trigger::Before);
        assert_eq!(Trigger::default(), Trigger::After);
    }

    #[test]
    fn test_trigger_parse_rejects_unknown() {
        let err = "unknown".parse::<Trigger>().err().expect("not a trigger");
        assert!(matches!(err, WatchError::InvalidTrigger { ref value } if value == "unknown"));
        let msg = err.to_string();
        assert!(msg.contains("'unknown'"));
        assert!(msg.contains("('before', 'after')"));
    }

    struct Food {
        cook: Method<Food, (), u8>,
    }

    #[test]
    fn test_record_display_and_restore() {
        let food = Food {
            cook: Method::new(|_: &Food, _: &()| 1),
        };
        let original = food.cook.current();
        let slot = food.cook.slot();
        let (installed, below) = slot.push_layer(|_| -> MethodFn<Food, (), u8> {
            Rc::new(|_: &Food, _: &()| 2)
        });
        let record = SpyRecord::new(
            "<Food object>".to_string(),
            "cook",
            Trigger::After,
            false,
            installed,
            below,
            slot,
        );

        assert_eq!(
            record.to_string(),
            "Spying(sender=<Food object>, method=cook, trigger=after)"
        );
        assert_eq!(food.cook.call(&food, &()), 2);
        assert!(same_body(&record.original(), &original));

        assert!(record.restore());
        assert!(same_body(&food.cook.current(), &original));
        assert_eq!(food.cook.call(&food, &()), 1);
        assert!(!record.restore());
    }
}
