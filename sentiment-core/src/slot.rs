//! Classifier slots with one-shot loading and a fallback tier
//!
//! A slot wraps one logical classifier. Loading tries the primary capability
//! and, if that cannot be built, the fallback. Whatever the outcome, the slot
//! settles once and never loads again.
//!
//! # Design
//!
//! ```text
//! load()
//!   ├─ primary builds                → LoadOutcome::Primary   → Ready
//!   ├─ primary fails, fallback builds → LoadOutcome::Fallback  → Degraded
//!   └─ nothing builds                 → LoadOutcome::Failed    → Unavailable
//!
//! infer(text)
//!   ├─ Ready / Degraded, classify ok   → classifier result
//!   ├─ Ready / Degraded, classify err  → neutral (this call only)
//!   └─ Unavailable / never loaded      → neutral
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::device::DevicePreference;
use crate::error::{ConstructionError, InferenceError};
use crate::types::{ClassifierResult, SlotId};

/// A loaded text classifier: text in, label and confidence out.
#[cfg_attr(test, mockall::automock)]
pub trait Classify: Send {
    fn classify(&self, text: &str) -> Result<ClassifierResult, InferenceError>;
}

/// Builds a [`Classify`] capability. Construction may be expensive and may fail.
#[cfg_attr(test, mockall::automock)]
pub trait CapabilityFactory: Send {
    /// Human-readable name of what this factory builds, e.g. a model id.
    fn name(&self) -> String;

    fn build(&self, device: DevicePreference) -> Result<Box<dyn Classify>, ConstructionError>;
}

/// Lifecycle of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Not loaded yet.
    Unconfigured,
    /// Capability construction in progress.
    Loading,
    /// Primary capability active.
    Ready,
    /// Fallback capability active.
    Degraded,
    /// No capability could be built; every call yields neutral.
    Unavailable,
}

impl SlotState {
    /// Whether loading has finished, successfully or not.
    pub fn is_loaded(&self) -> bool {
        matches!(
            self,
            SlotState::Ready | SlotState::Degraded | SlotState::Unavailable
        )
    }

    /// Whether a capability is serving calls.
    pub fn is_serving(&self) -> bool {
        matches!(self, SlotState::Ready | SlotState::Degraded)
    }
}

impl std::fmt::Display for SlotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotState::Unconfigured => write!(f, "unconfigured"),
            SlotState::Loading => write!(f, "loading"),
            SlotState::Ready => write!(f, "ready"),
            SlotState::Degraded => write!(f, "degraded"),
            SlotState::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Result of trying the primary and fallback factories.
pub enum LoadOutcome {
    Primary(Box<dyn Classify>),
    Fallback {
        capability: Box<dyn Classify>,
        primary_error: ConstructionError,
    },
    Failed {
        primary_error: ConstructionError,
        /// `None` when no fallback is configured.
        fallback_error: Option<ConstructionError>,
    },
}

impl LoadOutcome {
    /// Build the primary; on failure, build the fallback if there is one.
    pub fn resolve(
        primary: &dyn CapabilityFactory,
        fallback: Option<&dyn CapabilityFactory>,
        device: DevicePreference,
    ) -> Self {
        let primary_error = match primary.build(device) {
            Ok(capability) => return LoadOutcome::Primary(capability),
            Err(e) => e,
        };

        let Some(fallback) = fallback else {
            return LoadOutcome::Failed {
                primary_error,
                fallback_error: None,
            };
        };

        match fallback.build(device) {
            Ok(capability) => LoadOutcome::Fallback {
                capability,
                primary_error,
            },
            Err(fallback_error) => LoadOutcome::Failed {
                primary_error,
                fallback_error: Some(fallback_error),
            },
        }
    }

    /// Terminal slot state for this outcome.
    pub fn state(&self) -> SlotState {
        match self {
            LoadOutcome::Primary(_) => SlotState::Ready,
            LoadOutcome::Fallback { .. } => SlotState::Degraded,
            LoadOutcome::Failed { .. } => SlotState::Unavailable,
        }
    }
}

impl std::fmt::Debug for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadOutcome::Primary(_) => f.write_str("Primary"),
            LoadOutcome::Fallback { primary_error, .. } => f
                .debug_struct("Fallback")
                .field("primary_error", primary_error)
                .finish(),
            LoadOutcome::Failed {
                primary_error,
                fallback_error,
            } => f
                .debug_struct("Failed")
                .field("primary_error", primary_error)
                .field("fallback_error", fallback_error)
                .finish(),
        }
    }
}

/// Diagnostic snapshot of a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStatus {
    pub slot: SlotId,
    pub state: SlotState,
    /// Name of the factory whose capability is serving, if any.
    pub served_by: Option<String>,
    pub device: Option<DevicePreference>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// One ensemble member: a primary factory, an optional fallback, and the
/// capability built from whichever succeeded.
pub struct ClassifierSlot {
    id: SlotId,
    primary: Box<dyn CapabilityFactory>,
    fallback: Option<Box<dyn CapabilityFactory>>,
    state: SlotState,
    capability: Option<Box<dyn Classify>>,
    served_by: Option<String>,
    device: Option<DevicePreference>,
    loaded_at: Option<DateTime<Utc>>,
}

impl ClassifierSlot {
    pub fn new(id: SlotId, primary: Box<dyn CapabilityFactory>) -> Self {
        Self {
            id,
            primary,
            fallback: None,
            state: SlotState::Unconfigured,
            capability: None,
            served_by: None,
            device: None,
            loaded_at: None,
        }
    }

    /// Configure the capability used when the primary cannot be built.
    pub fn with_fallback(mut self, fallback: Box<dyn CapabilityFactory>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Build the capability. No-op once the slot has loaded, whatever the result.
    ///
    /// Construction errors are logged, never returned.
    pub fn load(&mut self, device: DevicePreference) {
        if self.state.is_loaded() {
            debug!(slot = %self.id, state = %self.state, "Slot already loaded");
            return;
        }

        self.state = SlotState::Loading;
        info!(slot = %self.id, primary = %self.primary.name(), %device, "Loading slot");

        let outcome = LoadOutcome::resolve(
            &*self.primary,
            self.fallback.as_deref(),
            device,
        );
        self.state = outcome.state();
        self.device = Some(device);
        self.loaded_at = Some(Utc::now());

        match outcome {
            LoadOutcome::Primary(capability) => {
                self.served_by = Some(self.primary.name());
                self.capability = Some(capability);
                info!(slot = %self.id, model = %self.primary.name(), "Slot ready");
            }
            LoadOutcome::Fallback {
                capability,
                primary_error,
            } => {
                let fallback_name = self
                    .fallback
                    .as_ref()
                    .map(|f| f.name())
                    .unwrap_or_default();
                warn!(
                    slot = %self.id,
                    primary = %self.primary.name(),
                    fallback = %fallback_name,
                    "Primary classifier unavailable, using fallback: {}",
                    primary_error
                );
                self.served_by = Some(fallback_name);
                self.capability = Some(capability);
            }
            LoadOutcome::Failed {
                primary_error,
                fallback_error,
            } => {
                match fallback_error {
                    Some(fallback_error) => warn!(
                        slot = %self.id,
                        "Slot unavailable: primary failed ({}), fallback failed ({})",
                        primary_error,
                        fallback_error
                    ),
                    None => warn!(slot = %self.id, "Slot unavailable: {}", primary_error),
                }
            }
        }
    }

    /// Classify `text`, degrading to [`ClassifierResult::neutral`] on any failure.
    pub fn infer(&self, text: &str) -> ClassifierResult {
        let Some(capability) = self.capability.as_ref() else {
            if !self.state.is_loaded() {
                warn!(slot = %self.id, "Inference requested before slot was loaded");
            }
            return ClassifierResult::neutral();
        };

        match capability.classify(text) {
            Ok(result) => {
                debug!(
                    slot = %self.id,
                    label = %result.label,
                    confidence = result.confidence,
                    "Slot inference complete"
                );
                result
            }
            Err(e) => {
                warn!(slot = %self.id, "Inference failed, scoring neutral: {}", e);
                ClassifierResult::neutral()
            }
        }
    }

    pub fn status(&self) -> SlotStatus {
        SlotStatus {
            slot: self.id,
            state: self.state,
            served_by: self.served_by.clone(),
            device: self.device,
            loaded_at: self.loaded_at,
        }
    }
}

impl std::fmt::Debug for ClassifierSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierSlot")
            .field("id", &self.id)
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|f| f.name()))
            .field("state", &self.state)
            .field("served_by", &self.served_by)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier_returning(label: &'static str, confidence: f64) -> Box<dyn Classify> {
        let mut classifier = MockClassify::new();
        classifier
            .expect_classify()
            .returning(move |_| Ok(ClassifierResult::new(label, confidence)));
        Box::new(classifier)
    }

    fn working_factory(
        name: &str,
        label: &'static str,
        confidence: f64,
        builds: usize,
    ) -> MockCapabilityFactory {
        let mut factory = MockCapabilityFactory::new();
        factory.expect_name().return_const(name.to_string());
        factory
            .expect_build()
            .times(builds)
            .returning(move |_| Ok(classifier_returning(label, confidence)));
        factory
    }

    fn failing_factory(name: &str, builds: usize) -> MockCapabilityFactory {
        let mut factory = MockCapabilityFactory::new();
        factory.expect_name().return_const(name.to_string());
        factory
            .expect_build()
            .times(builds)
            .returning(|_| Err(ConstructionError::Other("weights missing".to_string())));
        factory
    }

    #[test]
    fn test_new_slot_is_unconfigured() {
        let slot = ClassifierSlot::new(SlotId::Social, Box::new(working_factory("p", "POSITIVE", 0.9, 0)));
        assert_eq!(slot.state(), SlotState::Unconfigured);
        assert!(!slot.state().is_loaded());
        assert!(slot.status().loaded_at.is_none());
    }

    #[test]
    fn test_primary_success_is_ready() {
        let mut slot = ClassifierSlot::new(
            SlotId::Social,
            Box::new(working_factory("primary", "POSITIVE", 0.9, 1)),
        );
        slot.load(DevicePreference::Auto);

        assert_eq!(slot.state(), SlotState::Ready);
        assert_eq!(slot.infer("great day"), ClassifierResult::new("POSITIVE", 0.9));

        let status = slot.status();
        assert_eq!(status.served_by.as_deref(), Some("primary"));
        assert_eq!(status.device, Some(DevicePreference::Auto));
        assert!(status.loaded_at.is_some());
    }

    #[test]
    fn test_fallback_activation_is_degraded() {
        let mut slot = ClassifierSlot::new(SlotId::MentalHealth, Box::new(failing_factory("primary", 1)))
            .with_fallback(Box::new(working_factory("fallback", "NEGATIVE", 0.8, 1)));
        slot.load(DevicePreference::Cpu);

        assert_eq!(slot.state(), SlotState::Degraded);
        assert!(slot.state().is_serving());
        assert_eq!(slot.infer("so tired of everything").label, "NEGATIVE");
        assert_eq!(slot.status().served_by.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_fallback_not_built_when_primary_succeeds() {
        let mut slot = ClassifierSlot::new(
            SlotId::MentalHealth,
            Box::new(working_factory("primary", "POSITIVE", 0.7, 1)),
        )
        .with_fallback(Box::new(working_factory("fallback", "NEGATIVE", 0.8, 0)));
        slot.load(DevicePreference::Auto);

        assert_eq!(slot.state(), SlotState::Ready);
    }

    #[test]
    fn test_primary_failure_without_fallback_is_unavailable() {
        let mut slot = ClassifierSlot::new(SlotId::Treebank, Box::new(failing_factory("primary", 1)));
        slot.load(DevicePreference::Auto);

        assert_eq!(slot.state(), SlotState::Unavailable);
        assert_eq!(slot.infer("anything at all"), ClassifierResult::neutral());
        assert!(slot.status().served_by.is_none());
    }

    #[test]
    fn test_both_failing_is_unavailable() {
        let mut slot = ClassifierSlot::new(SlotId::MentalHealth, Box::new(failing_factory("primary", 1)))
            .with_fallback(Box::new(failing_factory("fallback", 1)));
        slot.load(DevicePreference::Auto);

        assert_eq!(slot.state(), SlotState::Unavailable);
        assert_eq!(slot.infer("I feel awful"), ClassifierResult::neutral());
    }

    #[test]
    fn test_load_is_idempotent_when_ready() {
        // `times(1)` fails the test if the second load constructs again.
        let mut slot = ClassifierSlot::new(
            SlotId::Social,
            Box::new(working_factory("primary", "POSITIVE", 0.9, 1)),
        );
        slot.load(DevicePreference::Auto);
        let first_loaded_at = slot.status().loaded_at;
        slot.load(DevicePreference::Cpu);

        assert_eq!(slot.state(), SlotState::Ready);
        assert_eq!(slot.status().loaded_at, first_loaded_at);
        assert_eq!(slot.status().device, Some(DevicePreference::Auto));
    }

    #[test]
    fn test_load_is_idempotent_when_unavailable() {
        let mut slot = ClassifierSlot::new(SlotId::MentalHealth, Box::new(failing_factory("primary", 1)))
            .with_fallback(Box::new(failing_factory("fallback", 1)));
        slot.load(DevicePreference::Auto);
        slot.load(DevicePreference::Auto);

        assert_eq!(slot.state(), SlotState::Unavailable);
    }

    #[test]
    fn test_inference_failure_is_per_call() {
        let mut classifier = MockClassify::new();
        let mut calls = 0;
        classifier.expect_classify().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(InferenceError::Other("transient".to_string()))
            } else {
                Ok(ClassifierResult::new("NEGATIVE", 0.6))
            }
        });
        let mut capability = Some(Box::new(classifier) as Box<dyn Classify>);

        let mut factory = MockCapabilityFactory::new();
        factory.expect_name().return_const("flaky".to_string());
        factory.expect_build().times(1).returning(move |_| {
            capability
                .take()
                .ok_or_else(|| ConstructionError::Other("built twice".to_string()))
        });

        let mut slot = ClassifierSlot::new(SlotId::Social, Box::new(factory));
        slot.load(DevicePreference::Auto);

        assert_eq!(slot.infer("first"), ClassifierResult::neutral());
        assert_eq!(slot.state(), SlotState::Ready);
        assert_eq!(slot.infer("second"), ClassifierResult::new("NEGATIVE", 0.6));
    }

    #[test]
    fn test_infer_before_load_is_neutral() {
        let slot = ClassifierSlot::new(SlotId::Social, Box::new(working_factory("p", "POSITIVE", 0.9, 0)));
        assert_eq!(slot.infer("hello there"), ClassifierResult::neutral());
        assert_eq!(slot.state(), SlotState::Unconfigured);
    }

    #[test]
    fn test_load_outcome_states() {
        let primary = working_factory("p", "POSITIVE", 0.9, 1);
        let outcome = LoadOutcome::resolve(&primary, None, DevicePreference::Auto);
        assert_eq!(outcome.state(), SlotState::Ready);

        let primary = failing_factory("p", 1);
        let outcome = LoadOutcome::resolve(&primary, None, DevicePreference::Auto);
        assert!(matches!(
            outcome,
            LoadOutcome::Failed {
                fallback_error: None,
                ..
            }
        ));
    }

    #[test]
    fn test_factory_receives_device() {
        let mut factory = MockCapabilityFactory::new();
        factory.expect_name().return_const("p".to_string());
        factory
            .expect_build()
            .withf(|device| *device == DevicePreference::Cpu)
            .times(1)
            .returning(|_| Ok(classifier_returning("POSITIVE", 0.5)));

        let mut slot = ClassifierSlot::new(SlotId::Treebank, Box::new(factory));
        slot.load(DevicePreference::Cpu);
        assert_eq!(slot.state(), SlotState::Ready);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SlotState::Degraded.to_string(), "degraded");
        assert_eq!(SlotState::Unavailable.to_string(), "unavailable");
    }
}
