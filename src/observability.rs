use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("deepchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("deepchat.client.request_errors");
pub(crate) static CLIENT_TIMEOUTS: Counter = Counter::new("deepchat.client.timeouts");
pub(crate) static CLIENT_ABORTS: Counter = Counter::new("deepchat.client.aborts");
pub(crate) static CLIENT_AUTH_FAILURES: Counter = Counter::new("deepchat.client.auth_failures");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("deepchat.client.request_duration_seconds");

pub(crate) static ROUTER_RESOLUTIONS: Counter = Counter::new("deepchat.router.resolutions");
pub(crate) static ROUTER_NOT_FOUND: Counter = Counter::new("deepchat.router.not_found");

pub(crate) static CHAT_TURNS: Counter = Counter::new("deepchat.chat.turns");
pub(crate) static CHAT_TURN_ERRORS: Counter = Counter::new("deepchat.chat.turn_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_TIMEOUTS);
    collector.register_counter(&CLIENT_ABORTS);
    collector.register_counter(&CLIENT_AUTH_FAILURES);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&ROUTER_RESOLUTIONS);
    collector.register_counter(&ROUTER_NOT_FOUND);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_ERRORS);
}
