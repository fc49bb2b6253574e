//! Client-side application state.
//!
//! State only changes through [`Store::dispatch`], which threads the current
//! [`RootState`] through the pure slice reducers. The host application owns
//! the single `Store` instance.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

pub mod session;
pub mod spots;

use session::{SessionAction, SessionState};
use spots::{SpotAction, SpotsState};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Session(SessionAction),
    Spots(SpotAction),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Session(a) => a.kind(),
            Action::Spots(a) => a.kind(),
        }
    }
}

impl From<SpotAction> for Action {
    fn from(a: SpotAction) -> Self {
        Action::Spots(a)
    }
}

impl From<SessionAction> for Action {
    fn from(a: SessionAction) -> Self {
        Action::Session(a)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    pub session: SessionState,
    pub spots: SpotsState,
}

pub fn reduce(state: RootState, action: &Action) -> RootState {
    RootState {
        session: session::reduce(state.session, action),
        spots: spots::reduce(state.spots, action),
    }
}

#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<RootState>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RootState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, &action);
        debug!(action = action.kind(), "dispatched");
    }

    /// Cheap clone of the current state; entities are shared.
    pub fn snapshot(&self) -> RootState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn select<R>(&self, f: impl FnOnce(&RootState) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}
