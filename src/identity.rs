//! Identity-mapped input space.
//!
//! Used where the set of inputs is effectively unbounded and the device's
//! native id already is a usable input (every key of a keyboard). Every value
//! of `K` is valid, lookup is the identity, and normalization parameters are
//! the neutral `offset = 0`, `amplitude = 1`.

use crate::engine::InputMap;
use crate::error::Result;
use crate::input::IdentityInput;
use std::marker::PhantomData;

pub struct IdentityInputs<K> {
    _marker: PhantomData<fn() -> K>,
}

impl<K> IdentityInputs<K> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K> Default for IdentityInputs<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IdentityInput> InputMap for IdentityInputs<K> {
    type Id = K;
    type Input = K;

    fn is_input_valid(&self, _input: &K) -> bool {
        true
    }

    fn find_input(&self, id: &K) -> Option<K> {
        Some(*id)
    }

    fn params(&self, _input: &K) -> Result<(f32, f32)> {
        Ok((0.0, 1.0))
    }

    fn input_name(&self, input: &K) -> Result<String> {
        Ok(input.label())
    }
}
