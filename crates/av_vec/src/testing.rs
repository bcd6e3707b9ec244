//! Element types that count drops or fail on demand.

use alloc::rc::Rc;
use core::cell::Cell;
use core::panic::AssertUnwindSafe;

/// Runs `f`, turning a panic into `Err`.
pub fn catch<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    std::panic::catch_unwind(AssertUnwindSafe(f))
}

// -----------------------------------------------------------------------------
// DropCounter

/// Hands out [`Tracked`] values sharing one drop count.
pub struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self {
            drops: Rc::new(Cell::new(0)),
        }
    }

    pub fn track(&self, id: i32) -> Tracked {
        Tracked {
            id,
            drops: self.drops.clone(),
        }
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }
}

#[derive(Debug)]
pub struct Tracked {
    pub id: i32,
    drops: Rc<Cell<usize>>,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            drops: self.drops.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

// -----------------------------------------------------------------------------
// Fragile

/// A value whose `clone` panics once the shared budget runs out.
#[derive(Debug)]
pub struct Fragile {
    value: i32,
    budget: Rc<Cell<usize>>,
}

impl Fragile {
    /// A shared budget allowing `clones` successful clones.
    pub fn budget(clones: usize) -> Rc<Cell<usize>> {
        Rc::new(Cell::new(clones))
    }

    pub fn new(value: i32, budget: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            budget: budget.clone(),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        let left = self.budget.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.budget.set(left - 1);

        Self {
            value: self.value,
            budget: self.budget.clone(),
        }
    }
}

impl PartialEq for Fragile {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
