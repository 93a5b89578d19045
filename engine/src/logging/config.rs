use std::collections::HashMap;
use tracing::Level;

/// Per-scope log filtering.
///
/// Configured from a string such as `"warn,teleport=debug,teleport::sampler=trace"`.
/// A bare level sets the global threshold, `scope=level` overrides it for one scope.
/// Nested scopes (`teleport::sampler`) fall back to their parent (`teleport`)
/// before falling back to the global level.
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_env(env_var_name: &str) -> Self {
        match std::env::var(env_var_name) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::new(),
        }
    }

    pub fn parse(config_str: &str) -> Self {
        let mut config = Self::new();

        for part in config_str.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((scope, level)) => {
                    if let Ok(level) = level.trim().parse::<Level>() {
                        config.scope_levels.insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Ok(level) = part.parse::<Level>() {
                        config.global_level = level;
                    }
                }
            }
        }

        config
    }

    /// Threshold that applies to `scope`, walking up `::`-separated parents.
    pub fn level_for(&self, scope: &str) -> Level {
        let mut current = scope;
        loop {
            if let Some(level) = self.scope_levels.get(current) {
                return *level;
            }
            match current.rfind("::") {
                Some(idx) => current = &current[..idx],
                None => return self.global_level,
            }
        }
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        level <= self.level_for(scope)
    }

    pub fn set_global_level(&mut self, level: Level) {
        self.global_level = level;
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize logging with the specified environment variable name.
///
/// The `tracing` subscriber honours `RUST_LOG`; `env_var_name` drives the scope
/// filter used by `scoped_log!`. Safe to call more than once, only the first
/// call installs anything.
pub fn init_logging(env_var_name: &str) -> LogConfig {
    init_logging_with_config(LogConfig::from_env(env_var_name))
}

/// Like `init_logging`, for callers that adjust the scope filter first
/// (e.g. a `--verbose` flag).
pub fn init_logging_with_config(config: LogConfig) -> LogConfig {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::TRACE.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .try_init();

    super::set_log_config(config.clone());
    config
}
