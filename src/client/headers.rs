//! Custom header registry applied to every outgoing request.

use std::sync::Mutex;

use reqwest::header::{HeaderName, HeaderValue};

use crate::{Error, Result};

/// A session-scoped registry of custom headers.
///
/// Every registered pair is attached to every outgoing request. Duplicate
/// names are permitted and appended in registration order; nothing is
/// deduplicated.
///
/// # Example
///
/// ```
/// use wstrade_rs::HeaderRegistry;
///
/// let registry = HeaderRegistry::new();
/// registry.add("X-Request-Source", "mobile")?;
/// registry.add("X-Request-Source", "web")?;
/// assert_eq!(registry.values().len(), 2);
///
/// registry.remove("X-Request-Source");
/// assert!(registry.values().is_empty());
/// # Ok::<(), wstrade_rs::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct HeaderRegistry {
    entries: Mutex<Vec<(HeaderName, HeaderValue)>>,
}

impl HeaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header. Names and values are validated here so invalid
    /// input fails at registration rather than at send time.
    pub fn add(&self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidInput(format!("invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidInput(format!("invalid header value for {}", name)))?;
        self.entries
            .lock()
            .expect("header registry lock poisoned")
            .push((name, value));
        Ok(())
    }

    /// Remove every entry with the given name. Unknown names are ignored.
    pub fn remove(&self, name: &str) {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            return;
        };
        self.entries
            .lock()
            .expect("header registry lock poisoned")
            .retain(|(n, _)| *n != name);
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("header registry lock poisoned")
            .clear();
    }

    /// Snapshot of the registered pairs, in registration order.
    pub fn values(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .expect("header registry lock poisoned")
            .iter()
            .map(|(n, v)| {
                (
                    n.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    /// Internal snapshot with validated types, for request assembly.
    pub(crate) fn snapshot(&self) -> Vec<(HeaderName, HeaderValue)> {
        self.entries
            .lock()
            .expect("header registry lock poisoned")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_values() {
        let registry = HeaderRegistry::new();
        registry.add("X-One", "1").unwrap();
        registry.add("X-Two", "2").unwrap();
        assert_eq!(
            registry.values(),
            vec![
                ("x-one".to_string(), "1".to_string()),
                ("x-two".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let registry = HeaderRegistry::new();
        registry.add("X-Tag", "a").unwrap();
        registry.add("X-Tag", "b").unwrap();
        assert_eq!(registry.values().len(), 2);
    }

    #[test]
    fn test_remove_drops_all_matching() {
        let registry = HeaderRegistry::new();
        registry.add("X-Tag", "a").unwrap();
        registry.add("X-Tag", "b").unwrap();
        registry.add("X-Other", "c").unwrap();
        registry.remove("x-tag");
        assert_eq!(registry.values(), vec![("x-other".to_string(), "c".to_string())]);
    }

    #[test]
    fn test_clear() {
        let registry = HeaderRegistry::new();
        registry.add("X-Tag", "a").unwrap();
        registry.clear();
        assert!(registry.values().is_empty());
    }

    #[test]
    fn test_invalid_names_rejected_at_registration() {
        let registry = HeaderRegistry::new();
        assert!(registry.add("bad header", "x").is_err());
        assert!(registry.add("X-Ok", "bad\nvalue").is_err());
    }
}
