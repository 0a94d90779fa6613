//! Parameter Set Item

use std::cell::Cell;

/// Stores the values of a single named parameter.
#[derive(Clone, Debug)]
pub struct ParamSetItem<T> {
    /// The parameter values.
    pub values: Vec<T>,

    /// Set when the parameter was read by a `find_*` lookup.
    pub looked_up: Cell<bool>,
}

impl<T> ParamSetItem<T> {
    /// Returns a new `ParamSetItem`.
    ///
    /// * `values` - The parameter values.
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            looked_up: Cell::new(false),
        }
    }
}
