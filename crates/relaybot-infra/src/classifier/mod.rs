//! Intent classifier providers.

pub mod dialogflow;
