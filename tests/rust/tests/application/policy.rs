//! Access policy decision table and hooks

use pretty_assertions::assert_eq;
use std::sync::{Arc, RwLock};

use devlogs_core::{AccessPolicy, EnvironmentSource};
use tests::{Environment, LogOverride, LoggerName};

const ENVIRONMENTS: [Environment; 4] = [
    Environment::Local,
    Environment::Development,
    Environment::Staging,
    Environment::Production,
];

fn can_log(environment: Environment, enabled: LogOverride, logger: &str) -> bool {
    AccessPolicy::new(environment, enabled).can_log(&LoggerName::new(logger))
}

#[test]
fn unset_override_follows_environment() {
    for environment in ENVIRONMENTS {
        assert_eq!(
            can_log(environment, LogOverride::Unset, "billing"),
            !environment.is_production(),
            "{:?}",
            environment
        );
    }
}

#[test]
fn explicit_overrides_win_in_every_environment() {
    for environment in ENVIRONMENTS {
        assert!(!can_log(environment, LogOverride::Disabled, "billing"));
        assert!(can_log(environment, LogOverride::Enabled, "billing"));

        let only_billing = LogOverride::Only("billing".to_string());
        assert!(can_log(environment, only_billing.clone(), "billing"));
        assert!(!can_log(environment, only_billing, "shipping"));
    }
}

#[test]
fn override_values_parse_like_the_environment_variable() {
    assert!(!can_log(Environment::Production, LogOverride::parse("false"), "any"));
    assert!(can_log(Environment::Production, LogOverride::parse("1"), "any"));
    assert!(can_log(Environment::Production, LogOverride::parse("billing"), "billing"));
    assert!(!can_log(Environment::Production, LogOverride::parse("billing"), "shipping"));
}

#[test]
fn decision_hook_has_final_say() {
    let policy = AccessPolicy::new(Environment::Production, LogOverride::Unset)
        .with_decision_hook(|computed, logger| computed || logger.as_str() == "audit");

    assert!(policy.can_log(&LoggerName::new("audit")));
    assert!(!policy.can_log(&LoggerName::new("billing")));

    let silenced = AccessPolicy::new(Environment::Local, LogOverride::Enabled)
        .with_decision_hook(|_, _| false);
    assert!(!silenced.can_log(&LoggerName::new("billing")));
}

/// Environment that can be switched while a policy holds it
#[derive(Clone)]
struct Switchable(Arc<RwLock<Environment>>);

impl EnvironmentSource for Switchable {
    fn environment(&self) -> Environment {
        *self.0.read().unwrap()
    }
}

#[test]
fn environment_is_read_at_decision_time() {
    let source = Switchable(Arc::new(RwLock::new(Environment::Development)));
    let policy = AccessPolicy::new(source.clone(), LogOverride::Unset);
    let billing = LoggerName::new("billing");

    assert!(policy.can_log(&billing));
    *source.0.write().unwrap() = Environment::Production;
    assert!(!policy.can_log(&billing));
}

#[test]
fn log_visibility() {
    for environment in ENVIRONMENTS {
        let policy = AccessPolicy::new(environment, LogOverride::Unset);
        assert!(policy.can_view_logs(true));
        assert_eq!(policy.can_view_logs(false), !environment.is_production());
    }
}
