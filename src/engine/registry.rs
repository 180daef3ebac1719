/// Set of solver backends installed on this host.
///
/// Read-only from the service's point of view and consulted on every call,
/// so implementations backed by mutable state are observed without delay.
pub trait BackendRegistry: Send + Sync {
    /// Backend identifiers in registration order.
    fn list_available(&self) -> Vec<String>;

    fn is_available(&self, id: &str) -> bool {
        self.list_available().iter().any(|b| b == id)
    }
}

/// Registry fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    backends: Vec<String>,
}

impl StaticRegistry {
    pub fn new<I, S>(backends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        for id in backends {
            let id = id.into();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { backends: ids }
    }
}

impl BackendRegistry for StaticRegistry {
    fn list_available(&self) -> Vec<String> {
        self.backends.clone()
    }

    fn is_available(&self, id: &str) -> bool {
        self.backends.iter().any(|b| b == id)
    }
}
