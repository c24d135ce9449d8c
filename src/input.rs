//! Canonical inputs and their normalization parameters.
//!
//! An *input* is an engine-scoped identifier for a logical control (a button,
//! an axis, a key). Devices report *native ids* instead; engines translate
//! between the two.
//!
//! Two shapes of input space exist:
//! - [`InputList`]: a fixed, statically declared enumeration (gamepads). Each
//!   input has a semantic name and an optional default native id.
//! - [`IdentityInput`]: an effectively unbounded space where the native id *is*
//!   the input (keyboards, where every printable key is its own input).
//!
//! The "no such input" sentinel is expressed as `Option::None` throughout.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Statically declared input enumeration.
///
/// Implementors are plain `enum`s; [`InputList::ALL`] is an immutable table
/// fixed at compile time.
pub trait InputList: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Device-native identifier type.
    type Id: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Every declared input, in declaration order.
    const ALL: &'static [Self];

    /// Stable semantic name (used in configuration keys and diagnostics).
    fn name(self) -> &'static str;

    /// Native id used when no override is configured.
    fn default_id(self) -> Option<Self::Id>;

    /// Resolve a semantic name, ignoring ASCII case.
    fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|input| input.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::conversion(name, std::any::type_name::<Self>()))
    }
}

/// Input type of an identity-mapped input space.
pub trait IdentityInput: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Human-readable label.
    fn label(&self) -> String;
}

/// Resolved per-input normalization record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams<Id> {
    /// `None` when the input has no native id and cannot be reached by lookup.
    pub id: Option<Id>,
    pub offset: f32,
    /// Never zero; enforced when the record is built.
    pub amplitude: f32,
}

impl<Id> NormalizationParams<Id> {
    pub fn new(id: Option<Id>) -> Self {
        Self {
            id,
            offset: 0.0,
            amplitude: 1.0,
        }
    }
}

/// Partially populated normalization record; `None` fields keep the lower layer's value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "Id: Deserialize<'de>"))]
pub struct ParamOverride<Id> {
    pub id: Option<Id>,
    pub offset: Option<f32>,
    pub amplitude: Option<f32>,
}

impl<Id> Default for ParamOverride<Id> {
    fn default() -> Self {
        Self {
            id: None,
            offset: None,
            amplitude: None,
        }
    }
}

impl<Id: Copy> ParamOverride<Id> {
    /// Overlay `other` on top of `self`, field by field.
    pub fn merge(&mut self, other: &ParamOverride<Id>) {
        if other.id.is_some() {
            self.id = other.id;
        }
        if other.offset.is_some() {
            self.offset = other.offset;
        }
        if other.amplitude.is_some() {
            self.amplitude = other.amplitude;
        }
    }

    /// Apply this override to a resolved record.
    pub fn apply(&self, params: &mut NormalizationParams<Id>) {
        if let Some(id) = self.id {
            params.id = Some(id);
        }
        if let Some(offset) = self.offset {
            params.offset = offset;
        }
        if let Some(amplitude) = self.amplitude {
            params.amplitude = amplitude;
        }
    }
}

/// Typed per-input overrides for a fixed input list.
#[derive(Clone, Debug)]
pub struct Overrides<I: InputList> {
    entries: HashMap<I, ParamOverride<I::Id>>,
}

impl<I: InputList> Default for Overrides<I> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<I: InputList> Overrides<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, input: I, id: I::Id) -> Self {
        self.entry(input).id = Some(id);
        self
    }

    pub fn offset(mut self, input: I, offset: f32) -> Self {
        self.entry(input).offset = Some(offset);
        self
    }

    pub fn amplitude(mut self, input: I, amplitude: f32) -> Self {
        self.entry(input).amplitude = Some(amplitude);
        self
    }

    pub fn set(&mut self, input: I, params: ParamOverride<I::Id>) {
        self.entry(input).merge(&params);
    }

    pub fn get(&self, input: I) -> Option<&ParamOverride<I::Id>> {
        self.entries.get(&input)
    }

    /// Overlay every entry of `other` on top of `self`.
    pub fn merge(&mut self, other: &Overrides<I>) {
        for (input, params) in &other.entries {
            self.set(*input, *params);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, input: I) -> &mut ParamOverride<I::Id> {
        self.entries.entry(input).or_default()
    }
}

/// Field addressed by a flat `{name}_{field}` configuration key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamField {
    Id,
    Offset,
    Amplitude,
}

/// A flat configuration key such as `LH_amplitude`, split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamKey<'a> {
    pub input: &'a str,
    pub field: ParamField,
}

impl<'a> ParamKey<'a> {
    pub fn parse(key: &'a str) -> Result<Self> {
        let (input, field) = key
            .rsplit_once('_')
            .ok_or_else(|| EngineError::conversion(key, "a parameter key"))?;
        let field = match field {
            "id" => ParamField::Id,
            "offset" => ParamField::Offset,
            "amplitude" => ParamField::Amplitude,
            _ => return Err(EngineError::conversion(key, "a parameter key")),
        };
        if input.is_empty() {
            return Err(EngineError::conversion(key, "a parameter key"));
        }
        Ok(Self { input, field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Pad {
        Fire,
        Stick,
    }

    impl InputList for Pad {
        type Id = u16;
        const ALL: &'static [Self] = &[Pad::Fire, Pad::Stick];

        fn name(self) -> &'static str {
            match self {
                Pad::Fire => "fire",
                Pad::Stick => "stick",
            }
        }

        fn default_id(self) -> Option<u16> {
            match self {
                Pad::Fire => Some(304),
                Pad::Stick => None,
            }
        }
    }

    #[test]
    fn from_name_ignores_case() {
        assert_eq!(Pad::from_name("FIRE").unwrap(), Pad::Fire);
        assert!(matches!(
            Pad::from_name("jump"),
            Err(EngineError::Conversion { .. })
        ));
    }

    #[test]
    fn later_overrides_win_per_field() {
        let mut base = Overrides::new().id(Pad::Fire, 1).offset(Pad::Fire, 5.0);
        let top = Overrides::new().offset(Pad::Fire, 7.0);
        base.merge(&top);

        let merged = base.get(Pad::Fire).unwrap();
        assert_eq!(merged.id, Some(1));
        assert_eq!(merged.offset, Some(7.0));
        assert_eq!(merged.amplitude, None);
    }

    #[test]
    fn apply_keeps_unset_fields() {
        let mut params = NormalizationParams::new(Some(3u16));
        ParamOverride {
            id: None,
            offset: None,
            amplitude: Some(-128.0),
        }
        .apply(&mut params);
        assert_eq!(params.id, Some(3));
        assert_eq!(params.offset, 0.0);
        assert_eq!(params.amplitude, -128.0);
    }

    #[test]
    fn parses_flat_keys() {
        let key = ParamKey::parse("dir_H_amplitude").unwrap();
        assert_eq!(key.input, "dir_H");
        assert_eq!(key.field, ParamField::Amplitude);
        assert_eq!(ParamKey::parse("LH_id").unwrap().field, ParamField::Id);
        assert!(ParamKey::parse("LH_scale").is_err());
        assert!(ParamKey::parse("_offset").is_err());
        assert!(ParamKey::parse("offset").is_err());
    }
}
