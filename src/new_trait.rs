/*!

An object-safe trait for types that know how to construct themselves with
`new()`. Implementors must be `'static` (and therefore `std::any::Any`),
which every data container in this crate is. [`crate::Context`] relies on it
to create a subsystem's container the first time the subsystem is touched.

The syntax is identical to calling an ordinary `new()` constructor:

```rust
use episim_core::New;

struct Counter {
    hits: u64,
}

impl New for Counter {
    const new: &'static dyn Fn() -> Self = &|| Counter { hits: 0 };
}

let counter = Counter::new();
assert_eq!(counter.hits, 0);
```

*/

use std::any::Any;

/// An object-safe trait that can construct itself.
pub trait New: Any + 'static {
    /// A constant reference to a constructor
    #[allow(non_upper_case_globals)]
    const new: &'static dyn Fn() -> Self;
}

impl<T: 'static> New for Vec<T> {
    const new: &'static dyn Fn() -> Self = &Vec::<T>::new;
}
