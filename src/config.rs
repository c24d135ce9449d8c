//! Engine configuration.
//!
//! [`EngineConfig`] is the serializable, name-keyed form of an engine's
//! construction parameters: a smoothing epsilon plus per-input overrides of
//! native id, offset and amplitude. It is resolved against a concrete
//! [`InputList`] into typed [`Overrides`], which validates every name eagerly.
//!
//! # Example
//! ```
//! use inputflow::config::EngineConfig;
//! use inputflow::gamepad::GamepadInput;
//!
//! let cfg: EngineConfig<u16> = EngineConfig::from_toml_str(r#"
//!     smoothing_epsilon = 0.1
//!
//!     [inputs.LH]
//!     offset = 128.0
//!     amplitude = 128.0
//! "#).unwrap();
//!
//! let overrides = cfg.resolve::<GamepadInput>().unwrap();
//! assert_eq!(overrides.get(GamepadInput::LH).unwrap().offset, Some(128.0));
//! ```

use crate::error::{EngineError, Result};
use crate::input::{InputList, Overrides, ParamField, ParamKey, ParamOverride};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Construction parameters shared by every engine flavour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "Id: Deserialize<'de>"))]
pub struct EngineConfig<Id> {
    /// Normalized values with magnitude below this are reported as `0.0`.
    ///
    /// `None` leaves the choice to the layer below (a device preset, else `0.0`);
    /// an explicit `0.0` turns smoothing off.
    pub smoothing_epsilon: Option<f32>,
    /// Overrides keyed by semantic input name.
    pub inputs: BTreeMap<String, ParamOverride<Id>>,
}

impl<Id> Default for EngineConfig<Id> {
    fn default() -> Self {
        Self {
            smoothing_epsilon: None,
            inputs: BTreeMap::new(),
        }
    }
}

impl<Id: DeserializeOwned> EngineConfig<Id> {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl<Id: Copy> EngineConfig<Id> {
    pub fn with_smoothing(mut self, epsilon: f32) -> Self {
        self.smoothing_epsilon = Some(epsilon);
        self
    }

    /// Set the native id of the input called `name`.
    pub fn set_id(&mut self, name: &str, id: Id) {
        self.inputs.entry(name.to_string()).or_default().id = Some(id);
    }

    /// Apply a flat `{name}_offset` / `{name}_amplitude` key.
    ///
    /// Id keys carry a native id rather than a scalar and go through [`set_id`](Self::set_id).
    pub fn set_scalar(&mut self, key: &str, value: f32) -> Result<()> {
        let key = ParamKey::parse(key)?;
        let entry = self.inputs.entry(key.input.to_string()).or_default();
        match key.field {
            ParamField::Offset => entry.offset = Some(value),
            ParamField::Amplitude => entry.amplitude = Some(value),
            ParamField::Id => {
                return Err(EngineError::conversion(
                    format!("{}_id = {value}", key.input),
                    "a scalar parameter",
                ))
            }
        }
        Ok(())
    }

    /// Resolve names against `I`, producing typed overrides.
    ///
    /// Fails with [`EngineError::Conversion`] on the first unknown input name.
    pub fn resolve<I>(&self) -> Result<Overrides<I>>
    where
        I: InputList<Id = Id>,
    {
        let mut overrides = Overrides::new();
        for (name, params) in &self.inputs {
            let input = I::from_name(name)?;
            overrides.set(input, *params);
        }
        Ok(overrides)
    }
}
