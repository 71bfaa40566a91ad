use std::time::Duration;

use formrelay_core::{update, Effect, Msg, PageState, PageViewModel, SubmitEvent};
use formrelay_engine::{EngineEvent, EngineHandle};
use relay_logging::{relay_debug, relay_info, relay_warn};

const SETTLE_POLL: Duration = Duration::from_millis(250);

/// The page's single submit listener. Every submission on the page goes
/// through [`Interceptor::submit`]; only marked forms are taken over.
pub struct Interceptor {
    state: PageState,
    engine: EngineHandle,
    scroll_requests: usize,
}

/// What happened to one submit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Taken over: default navigation suppressed, request in flight.
    Intercepted,
    /// Left to the page's default handling.
    Default,
    /// Dropped: the triggering control is still busy.
    Ignored,
}

impl Interceptor {
    pub fn install(state: PageState, engine: EngineHandle) -> Self {
        relay_info!("Form interceptor installed");
        Self {
            state,
            engine,
            scroll_requests: 0,
        }
    }

    pub fn submit(&mut self, event: SubmitEvent) -> Disposition {
        let busy = event
            .submitter
            .and_then(|id| self.state.control(id))
            .is_some_and(|control| !control.enabled);
        let effects = self.dispatch(Msg::FormSubmitted(event));
        if effects
            .iter()
            .any(|effect| matches!(effect, Effect::PreventDefault { .. }))
        {
            Disposition::Intercepted
        } else if busy {
            relay_info!("Form {} not submitted: its control is busy", event.form_id);
            Disposition::Ignored
        } else {
            relay_info!("Form {} submitted with default handling", event.form_id);
            Disposition::Default
        }
    }

    /// Block until every in-flight submission has settled, or until
    /// `idle_limit` passes without any of them settling.
    pub fn wait_until_settled(&mut self, idle_limit: Duration) -> bool {
        let mut idle = Duration::ZERO;
        while self.state.pending_count() > 0 {
            match self.engine.recv_timeout(SETTLE_POLL) {
                Some(EngineEvent::Settled(msg)) => {
                    idle = Duration::ZERO;
                    self.dispatch(msg);
                }
                None => {
                    idle += SETTLE_POLL;
                    if idle >= idle_limit {
                        relay_warn!(
                            "{} submission(s) still pending after {:?}",
                            self.state.pending_count(),
                            idle_limit
                        );
                        return false;
                    }
                }
            }
        }
        true
    }

    pub fn view(&self) -> PageViewModel {
        self.state.view()
    }

    pub fn scroll_requests(&self) -> usize {
        self.scroll_requests
    }

    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if self.state.consume_dirty() {
            relay_debug!("Page state changed: {} pending", self.state.pending_count());
        }
        self.run_effects(&effects);
        effects
    }

    fn run_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::PreventDefault { form_id } => {
                    relay_debug!("Default navigation suppressed for form {}", form_id);
                }
                Effect::Submit(request) => self.engine.submit(request.clone()),
                Effect::ScrollIntoView => self.scroll_requests += 1,
            }
        }
    }
}

impl Drop for Interceptor {
    fn drop(&mut self) {
        relay_info!("Form interceptor removed");
    }
}
