//! Access policy - decides whether a logger may write right now
//!
//! | mode           | unset | disabled | enabled | only(name)      |
//! |----------------|-------|----------|---------|-----------------|
//! | non-production | yes   | no       | yes     | iff name equals |
//! | production     | no    | no       | yes     | iff name equals |

use std::sync::Arc;
use tracing::trace;

use crate::config::{keys, DevLogConfig, Environment, LogOverride};
use crate::domain::LoggerName;

/// Source of the current environment mode
pub trait EnvironmentSource: Send + Sync {
    fn environment(&self) -> Environment;
}

impl EnvironmentSource for Environment {
    fn environment(&self) -> Environment {
        *self
    }
}

/// Reads an environment variable on every call, so a changed mode takes
/// effect without rebuilding the policy.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
    variable: String,
}

impl ProcessEnvironment {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl Default for ProcessEnvironment {
    fn default() -> Self {
        Self::new(keys::ENVIRONMENT)
    }
}

impl EnvironmentSource for ProcessEnvironment {
    fn environment(&self) -> Environment {
        std::env::var(&self.variable)
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Production)
    }
}

/// Final say over a computed decision: receives the computed value and the
/// logger, returns the value to use.
pub type DecisionHook = Arc<dyn Fn(bool, &LoggerName) -> bool + Send + Sync>;

/// Pure decision table, without the hook
pub fn evaluate(logger: &LoggerName, environment: Environment, enabled: &LogOverride) -> bool {
    match enabled {
        LogOverride::Unset => !environment.is_production(),
        LogOverride::Disabled => false,
        LogOverride::Enabled => true,
        LogOverride::Only(name) => logger == name.as_str(),
    }
}

/// Gate in front of every log call
#[derive(Clone)]
pub struct AccessPolicy {
    environment: Arc<dyn EnvironmentSource>,
    enabled: LogOverride,
    hook: Option<DecisionHook>,
}

impl AccessPolicy {
    pub fn new(environment: impl EnvironmentSource + 'static, enabled: LogOverride) -> Self {
        Self {
            environment: Arc::new(environment),
            enabled,
            hook: None,
        }
    }

    /// Policy for a loaded configuration (fixed environment mode)
    pub fn from_config(config: &DevLogConfig) -> Self {
        Self::new(config.environment, config.enabled.clone())
    }

    /// Install a hook that may override every decision
    pub fn with_decision_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(bool, &LoggerName) -> bool + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment.environment()
    }

    pub fn enabled(&self) -> &LogOverride {
        &self.enabled
    }

    /// Whether `logger` may write now
    pub fn can_log(&self, logger: &LoggerName) -> bool {
        let computed = evaluate(logger, self.environment(), &self.enabled);
        let decision = match &self.hook {
            Some(hook) => hook(computed, logger),
            None => computed,
        };
        trace!(logger = %logger, computed, decision, "[AccessPolicy] decision");
        decision
    }

    /// Whether stored logs may be viewed: always outside production,
    /// only by an authorized operator in production.
    pub fn can_view_logs(&self, authorized: bool) -> bool {
        !self.environment().is_production() || authorized
    }
}

impl std::fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessPolicy")
            .field("environment", &self.environment())
            .field("enabled", &self.enabled)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
