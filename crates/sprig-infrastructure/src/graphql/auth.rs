use log::info;
use tokio::sync::RwLock;

/// Whether the dashboard currently holds a valid session with the CI server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    /// True until the first authenticate/deauthenticate decision
    pub initial_load: bool,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            initial_load: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Authenticate,
    Deauthenticate,
}

impl AuthSnapshot {
    pub fn reduce(self, action: AuthAction) -> Self {
        // Already settled as authenticated, repeated successes change nothing
        if self.is_authenticated && !self.initial_load && action == AuthAction::Authenticate {
            return self;
        }
        match action {
            AuthAction::Authenticate => Self {
                is_authenticated: true,
                initial_load: false,
            },
            AuthAction::Deauthenticate => Self {
                is_authenticated: false,
                initial_load: false,
            },
        }
    }
}

/// Shared authentication state, updated by the GraphQL client
#[derive(Debug, Default)]
pub struct AuthState {
    inner: RwLock<AuthSnapshot>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> AuthSnapshot {
        *self.inner.read().await
    }

    pub async fn dispatch(&self, action: AuthAction) -> AuthSnapshot {
        let mut state = self.inner.write().await;
        let next = (*state).reduce(action);
        if next != *state {
            info!(
                "Auth state changed: authenticated={} (was {})",
                next.is_authenticated, state.is_authenticated
            );
        }
        *state = next;
        next
    }
}
