//! Intent classifier abstractions.
//!
//! - `IntentClassifier`: RPITIT trait for concrete provider implementations
//! - `BoxIntentClassifier`: object-safe wrapper so the relay never names a provider

pub mod box_classifier;
pub mod provider;
