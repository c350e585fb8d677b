//! Per-reel lifecycle state machine
//!
//! Callback-driven; owns no timing. Illegal transitions are silent no-ops
//! so a stale scheduled callback can never corrupt a reel.

use log::debug;

/// One reel's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReelState {
    #[default]
    Idle,
    Accelerating,
    ConstantSpin,
    Stopping,
    Result,
}

type StateCallback = Box<dyn FnMut(ReelState)>;
type ChangeCallback = Box<dyn FnMut(ReelState, ReelState)>;

/// Finite state machine for one reel.
///
/// Transitions: `Idle | Result → Accelerating → ConstantSpin → Stopping →
/// Result`, with `reset()` allowed from any state. Consumers register
/// callbacks fired in order: on-exit(old), on-enter(new), on-changed(old, new).
#[derive(Default)]
pub struct ReelStateMachine {
    state: ReelState,
    on_exit: Vec<StateCallback>,
    on_enter: Vec<StateCallback>,
    on_changed: Vec<ChangeCallback>,
}

impl ReelStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReelState {
        self.state
    }

    /// Accelerating or ConstantSpin
    pub fn is_spinning(&self) -> bool {
        matches!(self.state, ReelState::Accelerating | ReelState::ConstantSpin)
    }

    pub fn is_stopping(&self) -> bool {
        self.state == ReelState::Stopping
    }

    pub fn is_idle(&self) -> bool {
        self.state == ReelState::Idle
    }

    pub fn is_result(&self) -> bool {
        self.state == ReelState::Result
    }

    /// `Idle | Result → Accelerating`. Returns whether the transition fired.
    pub fn start_spin(&mut self) -> bool {
        match self.state {
            ReelState::Idle | ReelState::Result => {
                self.transition(ReelState::Accelerating);
                true
            }
            _ => false,
        }
    }

    /// `Accelerating → ConstantSpin`
    pub fn start_constant_spin(&mut self) -> bool {
        match self.state {
            ReelState::Accelerating => {
                self.transition(ReelState::ConstantSpin);
                true
            }
            _ => false,
        }
    }

    /// Either spinning state `→ Stopping`
    pub fn start_stopping(&mut self) -> bool {
        if self.is_spinning() {
            self.transition(ReelState::Stopping);
            true
        } else {
            false
        }
    }

    /// `Stopping → Result`
    pub fn set_result(&mut self) -> bool {
        match self.state {
            ReelState::Stopping => {
                self.transition(ReelState::Result);
                true
            }
            _ => false,
        }
    }

    /// Any state `→ Idle` (reset/abort). Always fires unless already idle.
    pub fn reset(&mut self) -> bool {
        if self.state == ReelState::Idle {
            return false;
        }
        self.transition(ReelState::Idle);
        true
    }

    /// Register an on-exit callback, invoked with the state being left.
    pub fn on_exit(&mut self, callback: impl FnMut(ReelState) + 'static) {
        self.on_exit.push(Box::new(callback));
    }

    /// Register an on-enter callback, invoked with the state being entered.
    pub fn on_enter(&mut self, callback: impl FnMut(ReelState) + 'static) {
        self.on_enter.push(Box::new(callback));
    }

    /// Register an on-changed callback, invoked with (old, new).
    pub fn on_changed(&mut self, callback: impl FnMut(ReelState, ReelState) + 'static) {
        self.on_changed.push(Box::new(callback));
    }

    fn transition(&mut self, new: ReelState) {
        let old = self.state;
        self.state = new;
        debug!("reel state {:?} -> {:?}", old, new);

        for callback in &mut self.on_exit {
            callback(old);
        }
        for callback in &mut self.on_enter {
            callback(new);
        }
        for callback in &mut self.on_changed {
            callback(old, new);
        }
    }
}

impl std::fmt::Debug for ReelStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReelStateMachine")
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_full_lifecycle() {
        let mut fsm = ReelStateMachine::new();
        assert!(fsm.is_idle());

        assert!(fsm.start_spin());
        assert!(fsm.is_spinning());
        assert_eq!(fsm.state(), ReelState::Accelerating);

        assert!(fsm.start_constant_spin());
        assert!(fsm.is_spinning());

        assert!(fsm.start_stopping());
        assert!(fsm.is_stopping());

        assert!(fsm.set_result());
        assert!(fsm.is_result());

        // Next spin straight from Result
        assert!(fsm.start_spin());
        assert_eq!(fsm.state(), ReelState::Accelerating);
    }

    #[test]
    fn test_stop_from_accelerating() {
        let mut fsm = ReelStateMachine::new();
        fsm.start_spin();
        assert!(fsm.start_stopping());
        assert!(fsm.is_stopping());
    }

    #[test]
    fn test_illegal_transitions_are_noops() {
        let mut fsm = ReelStateMachine::new();

        assert!(!fsm.start_stopping());
        assert!(fsm.is_idle());

        assert!(!fsm.start_constant_spin());
        assert!(fsm.is_idle());

        assert!(!fsm.set_result());
        assert!(fsm.is_idle());

        fsm.start_spin();
        assert!(!fsm.start_spin()); // already spinning
        assert!(!fsm.set_result()); // not stopping yet
        assert_eq!(fsm.state(), ReelState::Accelerating);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut fsm = ReelStateMachine::new();
        fsm.start_spin();
        fsm.start_constant_spin();
        assert!(fsm.reset());
        assert!(fsm.is_idle());
        assert!(!fsm.reset()); // already idle
    }

    #[test]
    fn test_callback_order() {
        let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        let mut fsm = ReelStateMachine::new();
        let l = log.clone();
        fsm.on_exit(move |old| l.borrow_mut().push(format!("exit:{old:?}")));
        let l = log.clone();
        fsm.on_enter(move |new| l.borrow_mut().push(format!("enter:{new:?}")));
        let l = log.clone();
        fsm.on_changed(move |old, new| {
            l.borrow_mut().push(format!("changed:{old:?}->{new:?}"))
        });

        fsm.start_spin();

        assert_eq!(
            log.borrow().as_slice(),
            [
                "exit:Idle",
                "enter:Accelerating",
                "changed:Idle->Accelerating"
            ]
        );
    }
}
