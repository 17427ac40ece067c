//! Load state shared between the background loader and request handlers.

use std::sync::{Arc, PoisonError, RwLock};

use crate::data::{DataRegistry, LoadError};
use crate::estimator::EstimateError;

#[derive(Debug)]
pub enum DataState {
    Loading,
    Ready(Arc<DataRegistry>),
    /// Combined load error; no calculation is possible until restart.
    Failed(String),
}

/// Why a request that needs data cannot be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    Loading,
    Failed(String),
}

impl Unavailable {
    pub fn message(&self) -> String {
        match self {
            Self::Loading => EstimateError::NotLoaded.to_string(),
            Self::Failed(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<RwLock<DataState>>,
}

impl SharedState {
    pub fn loading() -> Self {
        Self {
            inner: Arc::new(RwLock::new(DataState::Loading)),
        }
    }

    pub fn ready(registry: Arc<DataRegistry>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DataState::Ready(registry))),
        }
    }

    pub fn finish_load(&self, result: Result<Arc<DataRegistry>, LoadError>) {
        let next = match result {
            Ok(registry) => DataState::Ready(registry),
            Err(err) => DataState::Failed(err.to_string()),
        };
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Record a load that ended without producing a result.
    pub fn fail(&self, message: impl Into<String>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) =
            DataState::Failed(message.into());
    }

    pub fn registry(&self) -> Result<Arc<DataRegistry>, Unavailable> {
        match &*self.inner.read().unwrap_or_else(PoisonError::into_inner) {
            DataState::Loading => Err(Unavailable::Loading),
            DataState::Ready(registry) => Ok(Arc::clone(registry)),
            DataState::Failed(message) => Err(Unavailable::Failed(message.clone())),
        }
    }
}
