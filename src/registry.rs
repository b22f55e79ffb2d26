//! Dispatch table from connector type to adapter instance.

use crate::connector::{Connector, ConnectorDescriptor};
use crate::error::{ConnectorError, Result};

use log::info;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Connectors keyed by their type discriminant.
#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: RwLock<HashMap<&'static str, Arc<dyn Connector>>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector, returning the one it replaces, if any.
    pub fn register(&self, connector: Arc<dyn Connector>) -> Option<Arc<dyn Connector>> {
        let kind = connector.connector_type();
        let previous = self.connectors.write().insert(kind, connector);
        if previous.is_some() {
            info!("Replaced connector {}", kind);
        } else {
            info!("Registered connector {}", kind);
        }
        previous
    }

    /// Look up the connector for `kind`.
    pub fn get(&self, kind: &str) -> Result<Arc<dyn Connector>> {
        self.connectors
            .read()
            .get(kind)
            .cloned()
            .ok_or_else(|| ConnectorError::UnknownConnectorType(kind.to_string()))
    }

    /// Registered types, sorted.
    pub fn types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = self.connectors.read().keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Descriptors of every registered connector, sorted by type.
    pub fn descriptors(&self) -> Vec<(&'static str, ConnectorDescriptor)> {
        let connectors = self.connectors.read();
        let mut descriptors: Vec<_> = connectors
            .iter()
            .map(|(kind, connector)| (*kind, connector.descriptor()))
            .collect();
        descriptors.sort_unstable_by_key(|(kind, _)| *kind);
        descriptors
    }

    pub fn len(&self) -> usize {
        self.connectors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.read().is_empty()
    }
}
