//! Pool module - LIFO free list for reusable instances
//!
//! Instances are handed out by value and returned by value, so an instance can
//! never be released twice or used after release without going through `get`
//! again.

use std::fmt;

/// Types that can be returned to a [`Pool`].
pub trait Recycle {
    /// Reset to a neutral state before the instance is stored for reuse.
    fn recycle(&mut self);
}

/// Free-list recycler with a factory for when the list is empty.
pub struct Pool<T> {
    available: Vec<T>,
    factory: Box<dyn FnMut() -> T>,
    created: usize,
}

impl<T: Recycle> Pool<T> {
    pub fn new(factory: impl FnMut() -> T + 'static) -> Self {
        Self {
            available: Vec::new(),
            factory: Box::new(factory),
            created: 0,
        }
    }

    /// Pool whose free list can hold `capacity` instances without reallocating.
    pub fn with_capacity(capacity: usize, factory: impl FnMut() -> T + 'static) -> Self {
        Self {
            available: Vec::with_capacity(capacity),
            factory: Box::new(factory),
            created: 0,
        }
    }

    /// Most recently released instance, or a fresh one from the factory.
    pub fn get(&mut self) -> T {
        match self.available.pop() {
            Some(item) => item,
            None => {
                self.created += 1;
                (self.factory)()
            }
        }
    }

    pub fn release(&mut self, mut item: T) {
        item.recycle();
        self.available.push(item);
    }

    /// Instances waiting for reuse.
    pub fn available(&self) -> usize {
        self.available.len()
    }

    /// Instances ever produced by the factory.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Instances currently handed out.
    pub fn in_use(&self) -> usize {
        self.created - self.available.len()
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("available", &self.available.len())
            .field("created", &self.created)
            .finish()
    }
}
