//! Child agent registry — ordered, shared, runtime-extensible.
//!
//! The registry is seeded once at startup and may grow while the server
//! runs. Listing order is registration order; re-registering a name
//! replaces the descriptor without moving it.
//!
//! Descriptors can come from:
//! 1. The built-in seed set ([`default_descriptors`])
//! 2. YAML files (a single descriptor or a `childAgents:` list)
//! 3. Programmatic registration

use std::path::Path;

use parking_lot::RwLock;
use serde::Deserialize;

use super::capability::{default_descriptors, CapabilityDescriptor};
use crate::utilities::errors::OrchestratorError;

/// Registry of child agent descriptors.
///
/// Reads take a shared lock and return owned snapshots, so no lock is ever
/// held across an `.await` by callers.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    entries: RwLock<Vec<CapabilityDescriptor>>,
}

impl DescriptorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the three built-in child agents.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.entries.write().extend(default_descriptors());
        registry
    }

    /// Register a descriptor, replacing any existing one with the same name.
    ///
    /// Capability tags are lower-cased on the way in.
    pub fn register(&self, mut descriptor: CapabilityDescriptor) -> Result<(), OrchestratorError> {
        if descriptor.name.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "child agent name must not be empty".to_string(),
            ));
        }
        descriptor.normalize_tags();

        let mut entries = self.entries.write();
        match entries.iter_mut().find(|d| d.name == descriptor.name) {
            Some(existing) => {
                log::debug!("Replacing child agent {}", descriptor.name);
                *existing = descriptor;
            }
            None => {
                log::debug!("Registering child agent {}", descriptor.name);
                entries.push(descriptor);
            }
        }
        Ok(())
    }

    /// Snapshot of all descriptors in registration order.
    pub fn list(&self) -> Vec<CapabilityDescriptor> {
        self.entries.read().clone()
    }

    /// Look up a descriptor by exact name.
    pub fn lookup(&self, name: &str) -> Option<CapabilityDescriptor> {
        self.entries.read().iter().find(|d| d.name == name).cloned()
    }

    /// Get the total number of registered descriptors.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Register descriptors from a YAML document.
    ///
    /// The document can hold a single descriptor or a `childAgents:` list.
    /// Nothing is registered if any entry is invalid.
    pub fn load_yaml_str(&self, content: &str) -> Result<usize, OrchestratorError> {
        let descriptors = match serde_yaml::from_str::<CapabilityDescriptor>(content) {
            Ok(single) => vec![single],
            Err(_) => serde_yaml::from_str::<DescriptorListWrapper>(content)?.child_agents,
        };

        if let Some(bad) = descriptors.iter().position(|d| d.name.trim().is_empty()) {
            return Err(OrchestratorError::Validation(format!(
                "child agent #{} has an empty name",
                bad + 1
            )));
        }

        let count = descriptors.len();
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(count)
    }

    /// Register descriptors from a YAML file.
    pub fn load_file(&self, path: &Path) -> Result<usize, OrchestratorError> {
        let content = std::fs::read_to_string(path)?;
        let count = self.load_yaml_str(&content)?;
        log::info!("Loaded {} child agent(s) from {}", count, path.display());
        Ok(count)
    }
}

/// Wrapper for YAML list of descriptors
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorListWrapper {
    child_agents: Vec<CapabilityDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    fn descriptor(name: &str, tags: &[&str]) -> CapabilityDescriptor {
        CapabilityDescriptor::new(name, format!("{} agent", name), tags, "")
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = DescriptorRegistry::new();
        registry.register(descriptor("A", &["x"])).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("A").unwrap().capabilities, vec!["x"]);
        assert!(registry.lookup("B").is_none());
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let registry = DescriptorRegistry::new();
        let err = registry.register(descriptor("  ", &["x"])).unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reregister_overwrites_in_place() {
        let registry = DescriptorRegistry::new();
        registry.register(descriptor("A", &["x"])).unwrap();
        registry.register(descriptor("B", &["y"])).unwrap();
        registry.register(descriptor("A", &["z"])).unwrap();

        let listed = registry.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "A");
        assert_eq!(listed[0].capabilities, vec!["z"]);
        assert_eq!(listed[1].name, "B");
    }

    #[test]
    fn test_tags_are_lowercased() {
        let registry = DescriptorRegistry::new();
        registry.register(descriptor("A", &["Data_Analysis"])).unwrap();
        assert_eq!(registry.lookup("A").unwrap().capabilities, vec!["data_analysis"]);
    }

    #[test]
    fn test_with_defaults() {
        let registry = DescriptorRegistry::with_defaults();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.list()[0].name, "DataAnalysisAgent");
        assert!(registry.lookup("CodeAssistantAgent").is_some());
    }

    #[test]
    fn test_load_yaml_single_and_list() {
        let registry = DescriptorRegistry::new();

        let single = "name: Solo\ndescription: one\ncapabilities: [solo]\n";
        assert_eq!(registry.load_yaml_str(single).unwrap(), 1);

        let list = r#"
childAgents:
  - name: First
    description: first agent
    capabilities: [alpha]
    systemPrompt: "You are first."
  - name: Second
    description: second agent
    capabilities: [beta]
"#;
        assert_eq!(registry.load_yaml_str(list).unwrap(), 2);

        let names: Vec<String> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Solo", "First", "Second"]);
        assert_eq!(registry.lookup("First").unwrap().system_prompt, "You are first.");
    }

    #[test]
    fn test_load_yaml_rejects_empty_name_atomically() {
        let registry = DescriptorRegistry::new();
        let list = r#"
childAgents:
  - name: Good
    description: fine
  - name: ""
    description: broken
"#;
        let err = registry.load_yaml_str(list).unwrap_err();
        assert!(matches!(err, OrchestratorError::Validation(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_yaml_invalid_document() {
        let registry = DescriptorRegistry::new();
        let err = registry.load_yaml_str("just a string").unwrap_err();
        assert!(matches!(err, OrchestratorError::Yaml(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: FromFile\ndescription: loaded\ncapabilities: [file]").unwrap();

        let registry = DescriptorRegistry::with_defaults();
        assert_eq!(registry.load_file(file.path()).unwrap(), 1);
        assert_eq!(registry.list().last().unwrap().name, "FromFile");
    }

    #[test]
    fn test_load_missing_file() {
        let registry = DescriptorRegistry::new();
        let err = registry
            .load_file(Path::new("/nonexistent/child-agents.yaml"))
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Io(_)));
    }

    #[test]
    fn test_concurrent_register_and_list() {
        let registry = Arc::new(DescriptorRegistry::with_defaults());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .register(descriptor(&format!("Agent{}", i), &["tag"]))
                        .unwrap();
                    registry.list().len()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap() >= 4);
        }
        assert_eq!(registry.len(), 11);
    }
}
