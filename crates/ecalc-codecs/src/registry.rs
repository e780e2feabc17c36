//! Codec registry: codecs addressable by id
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::dna::{DnaCodec, RnaCodec};
use crate::melody::MelodyCodec;
use crate::morse::MorseCodec;
use crate::roman::RomanCodec;
use crate::Codec;

static STANDARD: Lazy<CodecRegistry> = Lazy::new(CodecRegistry::standard);

#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn Codec>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every codec shipped with the calculator
    pub fn standard() -> Self {
        Self::new()
            .register(Arc::new(DnaCodec))
            .register(Arc::new(RnaCodec))
            .register(Arc::new(MorseCodec))
            .register(Arc::new(MelodyCodec))
            .register(Arc::new(RomanCodec))
    }

    /// Process-wide read-only instance of [`CodecRegistry::standard`]
    pub fn global() -> &'static CodecRegistry {
        &STANDARD
    }

    /// Add a codec; one registered later under the same id replaces it.
    pub fn register(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codecs.retain(|c| c.id() != codec.id());
        self.codecs.push(codec);
        self
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Codec>> {
        self.codecs.iter().find(|c| c.id() == id).cloned()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.codecs.iter().map(|c| c.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ids() {
        let registry = CodecRegistry::global();
        assert_eq!(registry.ids(), vec!["dna", "rna", "morse", "melody", "roman"]);
        assert!(registry.get("braille").is_none());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let registry = CodecRegistry::standard().register(Arc::new(MorseCodec));
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.ids().last(), Some(&"morse"));
    }
}
