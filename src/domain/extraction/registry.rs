//! Immutable extension → strategy table

use std::collections::HashMap;
use std::sync::Arc;

use super::loader::{DocumentLoader, RemoteDocumentLoader};
use super::strategy::ExtractionStrategy;
use crate::domain::ExtractionError;

/// Read-only mapping from file suffix (e.g. `.pdf`) to strategy.
///
/// Built once through [`ExtractorRegistryBuilder`]; lookups are exact and
/// case-sensitive.
#[derive(Debug, Clone)]
pub struct ExtractorRegistry {
    bindings: HashMap<String, ExtractionStrategy>,
}

impl ExtractorRegistry {
    pub fn builder() -> ExtractorRegistryBuilder {
        ExtractorRegistryBuilder::default()
    }

    /// Strategy bound to `extension`, if any
    pub fn resolve(&self, extension: &str) -> Option<&ExtractionStrategy> {
        self.bindings.get(extension)
    }

    /// All bindings, sorted by extension
    pub fn bindings(&self) -> Vec<(&str, &ExtractionStrategy)> {
        let mut bindings: Vec<_> = self
            .bindings
            .iter()
            .map(|(ext, strategy)| (ext.as_str(), strategy))
            .collect();
        bindings.sort_by_key(|(ext, _)| *ext);
        bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug)]
struct RemoteBinding {
    endpoint: String,
    loader: Arc<dyn RemoteDocumentLoader>,
    extensions: Vec<String>,
}

/// Startup-time construction of an [`ExtractorRegistry`].
///
/// Applied in order: base bindings, remote substitution, patches.
#[derive(Debug, Default)]
pub struct ExtractorRegistryBuilder {
    base: Vec<(String, Arc<dyn DocumentLoader>)>,
    remote: Option<RemoteBinding>,
    patches: Vec<(String, Arc<dyn DocumentLoader>)>,
}

impl ExtractorRegistryBuilder {
    /// Bind an extension from the base extractor family
    pub fn bind(mut self, extension: impl Into<String>, loader: Arc<dyn DocumentLoader>) -> Self {
        self.base.push((extension.into(), loader));
        self
    }

    /// Rebind `extensions` to a remote parser reachable at `endpoint`
    pub fn with_remote<I, S>(
        mut self,
        endpoint: impl Into<String>,
        loader: Arc<dyn RemoteDocumentLoader>,
        extensions: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remote = Some(RemoteBinding {
            endpoint: endpoint.into(),
            loader,
            extensions: extensions.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add or override a binding after the base table and remote substitution
    pub fn patch(mut self, extension: impl Into<String>, loader: Arc<dyn DocumentLoader>) -> Self {
        self.patches.push((extension.into(), loader));
        self
    }

    pub fn build(self) -> Result<ExtractorRegistry, ExtractionError> {
        if self.base.is_empty() {
            return Err(ExtractionError::configuration(
                "base extractor family is not loaded",
            ));
        }

        let mut bindings = HashMap::new();

        for (extension, loader) in self.base {
            validate_extension(&extension)?;
            bindings.insert(extension, ExtractionStrategy::local(loader));
        }

        if let Some(remote) = self.remote {
            validate_endpoint(&remote.endpoint)?;

            for extension in remote.extensions {
                validate_extension(&extension)?;
                bindings.insert(
                    extension,
                    ExtractionStrategy::remote(remote.endpoint.clone(), remote.loader.clone()),
                );
            }
        }

        for (extension, loader) in self.patches {
            validate_extension(&extension)?;
            bindings.insert(extension, ExtractionStrategy::local(loader));
        }

        Ok(ExtractorRegistry { bindings })
    }
}

fn validate_extension(extension: &str) -> Result<(), ExtractionError> {
    let valid = extension.len() > 1
        && extension.starts_with('.')
        && !extension[1..].contains(['.', '/', '\\']);

    if !valid {
        return Err(ExtractionError::configuration(format!(
            "invalid extension binding {:?}: expected a suffix like \".pdf\"",
            extension
        )));
    }

    Ok(())
}

fn validate_endpoint(endpoint: &str) -> Result<(), ExtractionError> {
    let url = reqwest::Url::parse(endpoint).map_err(|e| {
        ExtractionError::configuration(format!("invalid remote parser URL {:?}: {}", endpoint, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ExtractionError::configuration(format!(
            "unsupported remote parser scheme {:?}",
            scheme
        ))),
    }
}
