use std::fmt;

/// Lifecycle states of an entity.
///
/// `Transient` is in-memory only. `Persistent` matches a stored row.
/// `Detached` is stored-but-modified. `Removed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Transient,
    Persistent,
    Detached,
    Removed,
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Persistent => write!(f, "PERSISTENT"),
            Self::Detached => write!(f, "DETACHED"),
            Self::Removed => write!(f, "REMOVED"),
        }
    }
}

/// Capability token for manager-only state transitions.
///
/// Only the entity manager can construct one, so `Persistent` and `Removed`
/// cannot be reached from outside it: the transition needs a grant the caller
/// cannot name.
pub struct StateGrant {
    _seal: (),
}

impl StateGrant {
    pub(crate) const fn new() -> Self {
        Self { _seal: () }
    }
}

/// The state cell embedded in every entity. All transitions funnel through
/// here.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: EntityState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: EntityState::Transient,
        }
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    /// Records an attribute mutation: a persisted entity becomes detached.
    /// A transient entity stays transient and nothing leaves `Removed`.
    pub fn touch(&mut self) {
        if self.state == EntityState::Persistent {
            self.state = EntityState::Detached;
        }
    }

    /// Manager-driven transition. `Removed` is terminal and `Transient`
    /// can never be re-entered.
    pub fn advance(&mut self, next: EntityState, _grant: &StateGrant) {
        if self.state == EntityState::Removed || next == EntityState::Transient {
            return;
        }
        self.state = next;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_transient() {
        assert_eq!(Lifecycle::new().state(), EntityState::Transient);
    }

    #[test]
    fn test_touch_only_detaches_persistent() {
        let grant = StateGrant::new();

        let mut lifecycle = Lifecycle::new();
        lifecycle.touch();
        assert_eq!(lifecycle.state(), EntityState::Transient);

        lifecycle.advance(EntityState::Persistent, &grant);
        lifecycle.touch();
        assert_eq!(lifecycle.state(), EntityState::Detached);
    }

    #[test]
    fn test_removed_is_terminal() {
        let grant = StateGrant::new();
        let mut lifecycle = Lifecycle::new();

        lifecycle.advance(EntityState::Persistent, &grant);
        lifecycle.advance(EntityState::Removed, &grant);

        lifecycle.touch();
        assert_eq!(lifecycle.state(), EntityState::Removed);
        lifecycle.advance(EntityState::Persistent, &grant);
        assert_eq!(lifecycle.state(), EntityState::Removed);
    }

    #[test]
    fn test_transient_cannot_be_reentered() {
        let grant = StateGrant::new();
        let mut lifecycle = Lifecycle::new();

        lifecycle.advance(EntityState::Persistent, &grant);
        lifecycle.advance(EntityState::Transient, &grant);
        assert_eq!(lifecycle.state(), EntityState::Persistent);
    }
}
