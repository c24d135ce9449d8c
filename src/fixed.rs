//! Fixed-input-list input space.
//!
//! [`FixedInputs`] resolves a statically declared [`InputList`] into a
//! normalization table and a reverse id index, both built once at
//! construction and immutable afterwards. Per input, parameters are layered:
//! declared default id, offset `0`, amplitude `1`, then the supplied overrides.
//!
//! If two inputs end up with the same native id, only the one declared last
//! is reachable by id lookup. This is reported with a warning rather than
//! rejected.

use crate::config::EngineConfig;
use crate::engine::{Engine, InputMap};
use crate::error::{EngineError, Result};
use crate::input::{InputList, NormalizationParams, Overrides};
use log::warn;
use std::collections::HashMap;

/// Normalization table plus reverse id index for an [`InputList`].
#[derive(Debug)]
pub struct FixedInputs<I: InputList> {
    params: HashMap<I, NormalizationParams<I::Id>>,
    reverse: HashMap<I::Id, I>,
}

impl<I: InputList> FixedInputs<I> {
    /// Build from overrides, validating every offset and amplitude.
    pub fn new(overrides: &Overrides<I>) -> Result<Self> {
        let mut params = HashMap::with_capacity(I::ALL.len());
        for &input in I::ALL {
            let mut p = NormalizationParams::new(input.default_id());
            if let Some(o) = overrides.get(input) {
                o.apply(&mut p);
            }
            if p.amplitude == 0.0 || !p.amplitude.is_finite() {
                return Err(EngineError::InvalidAmplitude {
                    input: input.name().to_string(),
                    amplitude: p.amplitude,
                });
            }
            if !p.offset.is_finite() {
                return Err(EngineError::InvalidOffset {
                    input: input.name().to_string(),
                    offset: p.offset,
                });
            }
            params.insert(input, p);
        }

        let mut reverse = HashMap::with_capacity(params.len());
        for &input in I::ALL {
            let Some(id) = params[&input].id else {
                continue;
            };
            if let Some(previous) = reverse.insert(id, input) {
                warn!(
                    "native id {id:?} shared by '{}' and '{}'; '{}' wins",
                    previous.name(),
                    input.name(),
                    input.name()
                );
            }
        }

        Ok(Self { params, reverse })
    }

    /// Build with declared defaults only.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&Overrides::new())
    }

    /// Resolved parameters of `input`.
    pub fn normalization(&self, input: I) -> Option<&NormalizationParams<I::Id>> {
        self.params.get(&input)
    }

    /// Native id of `input`, if it has one.
    pub fn input_id(&self, input: I) -> Option<I::Id> {
        self.params.get(&input).and_then(|p| p.id)
    }
}

impl<I: InputList> InputMap for FixedInputs<I> {
    type Id = I::Id;
    type Input = I;

    fn is_input_valid(&self, input: &I) -> bool {
        self.params.contains_key(input)
    }

    fn find_input(&self, id: &I::Id) -> Option<I> {
        self.reverse.get(id).copied()
    }

    fn params(&self, input: &I) -> Result<(f32, f32)> {
        self.params
            .get(input)
            .map(|p| (p.offset, p.amplitude))
            .ok_or_else(|| invalid::<I>(input))
    }

    fn input_name(&self, input: &I) -> Result<String> {
        if self.is_input_valid(input) {
            Ok(input.name().to_string())
        } else {
            Err(invalid::<I>(input))
        }
    }
}

fn invalid<I: InputList>(input: &I) -> EngineError {
    EngineError::InvalidInput {
        input: format!("{input:?}"),
        engine: std::any::type_name::<I>(),
    }
}

impl<I: InputList> Engine<FixedInputs<I>> {
    /// Build a fixed-input-list engine from a name-keyed configuration.
    pub fn from_config(config: &EngineConfig<I::Id>) -> Result<Self> {
        let overrides = config.resolve::<I>()?;
        Self::new(
            FixedInputs::new(&overrides)?,
            config.smoothing_epsilon.unwrap_or(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Stick {
        X,
        Y,
        Button,
        Spare,
    }

    impl InputList for Stick {
        type Id = u16;
        const ALL: &'static [Self] = &[Stick::X, Stick::Y, Stick::Button, Stick::Spare];

        fn name(self) -> &'static str {
            match self {
                Stick::X => "X",
                Stick::Y => "Y",
                Stick::Button => "button",
                Stick::Spare => "spare",
            }
        }

        fn default_id(self) -> Option<u16> {
            match self {
                Stick::X => Some(0),
                Stick::Y => Some(1),
                Stick::Button => Some(304),
                Stick::Spare => None,
            }
        }
    }

    #[test]
    fn every_unique_id_finds_its_input() {
        let inputs = FixedInputs::<Stick>::with_defaults().unwrap();
        for &input in Stick::ALL {
            if let Some(id) = input.default_id() {
                assert_eq!(inputs.find_input(&id), Some(input));
            }
        }
        assert_eq!(inputs.find_input(&999), None);
        assert_eq!(inputs.input_id(Stick::Spare), None);
    }

    #[test]
    fn overrides_replace_defaults() {
        let overrides = Overrides::new()
            .id(Stick::Spare, 7)
            .offset(Stick::X, 128.0)
            .amplitude(Stick::X, 128.0);
        let inputs = FixedInputs::new(&overrides).unwrap();

        assert_eq!(inputs.find_input(&7), Some(Stick::Spare));
        assert_eq!(inputs.params(&Stick::X).unwrap(), (128.0, 128.0));
        assert_eq!(inputs.params(&Stick::Y).unwrap(), (0.0, 1.0));
    }

    #[test]
    fn shared_id_resolves_to_last_declared_input() {
        // X keeps id 0, Button is moved onto it and is declared later.
        let overrides = Overrides::new().id(Stick::Button, 0);
        let inputs = FixedInputs::new(&overrides).unwrap();

        assert_eq!(inputs.find_input(&0), Some(Stick::Button));
        assert_eq!(inputs.find_input(&304), None);
        assert_eq!(inputs.input_id(Stick::X), Some(0));
    }

    #[test]
    fn zero_amplitude_is_rejected_at_construction() {
        let overrides = Overrides::new().amplitude(Stick::Y, 0.0);
        assert!(matches!(
            FixedInputs::new(&overrides),
            Err(EngineError::InvalidAmplitude { .. })
        ));
        let overrides = Overrides::new().amplitude(Stick::Y, f32::NAN);
        assert!(FixedInputs::new(&overrides).is_err());
        let overrides = Overrides::new().offset(Stick::Y, f32::INFINITY);
        assert!(matches!(
            FixedInputs::new(&overrides),
            Err(EngineError::InvalidOffset { .. })
        ));
    }

    #[test]
    fn engine_from_config_applies_ids_params_and_smoothing() {
        let config: EngineConfig<u16> = EngineConfig::from_toml_str(
            r#"
            smoothing_epsilon = 0.1

            [inputs.spare]
            id = 7

            [inputs.x]
            offset = 128.0
            amplitude = 128.0
            "#,
        )
        .unwrap();
        let engine = Engine::<FixedInputs<Stick>>::from_config(&config).unwrap();

        assert_eq!(engine.find_input(&7), Some(Stick::Spare));
        assert_eq!(engine.smoothing_epsilon(), 0.1);
        assert_eq!(engine.event_value(&Stick::X, 0.0).unwrap(), -1.0);
        assert_eq!(engine.event_value(&Stick::X, 140.0).unwrap(), 0.0);

        let plain = Engine::<FixedInputs<Stick>>::from_config(&EngineConfig::default()).unwrap();
        assert_eq!(plain.smoothing_epsilon(), 0.0);
        assert_eq!(plain.find_input(&7), None);
    }

    #[test]
    fn engine_from_config_rejects_unknown_names() {
        let mut config = EngineConfig::default();
        config.set_id("trigger", 9);
        assert!(matches!(
            Engine::<FixedInputs<Stick>>::from_config(&config),
            Err(EngineError::Conversion { .. })
        ));
    }

    #[test]
    fn shared_engine_dispatches_from_another_thread() {
        use crate::event::EventRecord;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let engine = Engine::shared(FixedInputs::<Stick>::with_defaults().unwrap(), 0.0).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        engine
            .bind(Stick::Button, move |_: &EventRecord<Stick>| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let remote = Arc::clone(&engine);
        std::thread::spawn(move || remote.emit(&EventRecord::new(Stick::Button, 1.0)))
            .join()
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(Engine::shared(FixedInputs::<Stick>::with_defaults().unwrap(), -1.0).is_err());
    }

    #[test]
    fn names_come_from_the_declaration() {
        let inputs = FixedInputs::<Stick>::with_defaults().unwrap();
        assert_eq!(inputs.input_name(&Stick::Button).unwrap(), "button");
    }
}
