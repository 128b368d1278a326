//! Harness registry -- a named directory of harness factories.
//!
//! The registry maps a name to a constructor so callers can build a harness
//! per invocation with per-call [`HarnessConfig`]. Explicit instances pass
//! through the application's dependency graph; [`default_registry`] provides
//! one process-wide instance with the built-in harnesses for ergonomic
//! parity. Tests substitute isolated instances instead of mutating the
//! default.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use super::cli::{CliHarness, CliVariant};
use super::mock::MockHarness;
use super::trait_def::Harness;
use super::types::{HarnessConfig, HarnessError};

/// Constructor for one harness. Receives the per-call config with the
/// registered name already filled in.
pub type HarnessFactory = Box<dyn Fn(HarnessConfig) -> Box<dyn Harness> + Send + Sync>;

/// A directory of registered [`HarnessFactory`] constructors, keyed by name.
///
/// One read-write lock guards the map: [`register`](Self::register) takes
/// the write lock, everything else reads, so concurrent mixed lookups and
/// registrations from many tasks are safe.
#[derive(Default)]
pub struct HarnessRegistry {
    factories: RwLock<HashMap<String, HarnessFactory>>,
}

impl HarnessRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in harnesses registered:
    /// claude, gemini, codex, and mock.
    pub fn builtin() -> Self {
        let registry = Self::new();
        for variant in [CliVariant::Claude, CliVariant::Gemini, CliVariant::Codex] {
            registry.register(variant.name(), move |config| {
                Box::new(CliHarness::new(variant, config))
            });
        }
        registry.register("mock", |config| Box::new(MockHarness::new(config)));
        registry
    }

    /// Register a factory under `name`, overwriting any existing entry
    /// unconditionally (last write wins).
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn(HarnessConfig) -> Box<dyn Harness> + Send + Sync + 'static,
    {
        let mut factories = self.factories.write().expect("registry lock poisoned");
        factories.insert(name.to_string(), Box::new(factory));
    }

    /// Build the harness registered under `name`.
    ///
    /// `config.name` is always overwritten with the registered name before
    /// the factory runs.
    pub fn get(
        &self,
        name: &str,
        mut config: HarnessConfig,
    ) -> Result<Box<dyn Harness>, HarnessError> {
        let factories = self.factories.read().expect("registry lock poisoned");
        let factory = factories
            .get(name)
            .ok_or_else(|| HarnessError::UnknownHarness(name.to_string()))?;
        config.name = name.to_string();
        Ok(factory(config))
    }

    /// Names of all registered harnesses, in no guaranteed order.
    pub fn list(&self) -> Vec<String> {
        let factories = self.factories.read().expect("registry lock poisoned");
        factories.keys().cloned().collect()
    }

    /// Whether a harness is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        let factories = self.factories.read().expect("registry lock poisoned");
        factories.contains_key(name)
    }
}

impl std::fmt::Debug for HarnessRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessRegistry")
            .field("harnesses", &self.list())
            .finish()
    }
}

/// The process-wide default registry, built once with the built-in
/// harnesses on first use.
pub fn default_registry() -> &'static HarnessRegistry {
    static DEFAULT: OnceLock<HarnessRegistry> = OnceLock::new();
    DEFAULT.get_or_init(HarnessRegistry::builtin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::types::AutomationMode;
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    /// Minimal test harness capturing the config it was built with.
    struct FakeHarness {
        config: HarnessConfig,
        tag: &'static str,
    }

    #[async_trait]
    impl Harness for FakeHarness {
        fn name(&self) -> &str {
            &self.config.name
        }

        async fn execute(
            &self,
            _cancel: &CancellationToken,
            _prompt: &str,
        ) -> Result<String, HarnessError> {
            Ok(self.tag.to_string())
        }

        fn supports_automation(&self, _mode: AutomationMode) -> bool {
            true
        }
    }

    fn fake(tag: &'static str) -> impl Fn(HarnessConfig) -> Box<dyn Harness> + Send + Sync {
        move |config| Box::new(FakeHarness { config, tag })
    }

    #[test]
    fn registry_starts_empty() {
        let registry = HarnessRegistry::new();
        assert!(registry.list().is_empty());
        assert!(!registry.has("alpha"));
    }

    #[test]
    fn register_and_get() {
        let registry = HarnessRegistry::new();
        registry.register("alpha", fake("a"));

        assert!(registry.has("alpha"));
        let harness = registry.get("alpha", HarnessConfig::default()).unwrap();
        assert_eq!(harness.name(), "alpha");
    }

    #[test]
    fn get_overwrites_config_name() {
        let registry = HarnessRegistry::new();
        registry.register("alpha", fake("a"));

        let config = HarnessConfig {
            name: "something-else".to_string(),
            ..Default::default()
        };
        let harness = registry.get("alpha", config).unwrap();
        assert_eq!(harness.name(), "alpha");
    }

    #[tokio::test]
    async fn register_replaces_existing_last_write_wins() {
        let registry = HarnessRegistry::new();
        registry.register("x", fake("first"));
        registry.register("x", fake("second"));

        let harness = registry.get("x", HarnessConfig::default()).unwrap();
        let out = harness
            .execute(&CancellationToken::new(), "")
            .await
            .unwrap();
        assert_eq!(out, "second");
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn get_missing_is_unknown_harness() {
        let registry = HarnessRegistry::new();
        let err = registry
            .get("nonexistent", HarnessConfig::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown harness: nonexistent");
    }

    #[test]
    fn list_returns_all_names() {
        let registry = HarnessRegistry::new();
        registry.register("alpha", fake("a"));
        registry.register("beta", fake("b"));
        registry.register("gamma", fake("c"));

        let mut names = registry.list();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn builtin_has_all_four_harnesses() {
        let registry = HarnessRegistry::builtin();
        for name in ["claude", "gemini", "codex", "mock"] {
            assert!(registry.has(name), "missing builtin harness {name}");
        }
    }

    #[test]
    fn default_registry_is_shared_and_builtin() {
        let a = default_registry();
        let b = default_registry();
        assert!(std::ptr::eq(a, b));
        assert!(a.has("mock"));
    }

    #[test]
    fn registry_debug_shows_names() {
        let registry = HarnessRegistry::new();
        registry.register("test-harness", fake("t"));
        let debug = format!("{registry:?}");
        assert!(debug.contains("test-harness"));
    }

    #[test]
    fn concurrent_mixed_reads_and_writes_are_safe() {
        use std::sync::Arc;

        let registry = Arc::new(HarnessRegistry::new());
        registry.register("seed", fake("seed"));

        let mut handles = Vec::new();
        for i in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for round in 0..200 {
                    if i % 2 == 0 {
                        let name = format!("writer-{i}");
                        registry.register(&name, fake("w"));
                    } else {
                        let _ = registry.has("seed");
                        let _ = registry.list();
                        let _ = registry.get("seed", HarnessConfig::default());
                    }
                    // Interleave a lookup of a name being written.
                    if round % 10 == 0 {
                        let _ = registry.get("writer-0", HarnessConfig::default());
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(registry.has("seed"));
        assert!(registry.has("writer-0"));
    }
}
