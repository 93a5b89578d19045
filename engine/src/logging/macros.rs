/// Emit a `tracing` event only when the scope filter allows it.
///
/// `scoped_log!(debug, "teleport", aiming = true, "mode changed")`
#[macro_export]
macro_rules! scoped_log {
    (@level trace) => { $crate::logging::Level::TRACE };
    (@level debug) => { $crate::logging::Level::DEBUG };
    (@level info) => { $crate::logging::Level::INFO };
    (@level warn) => { $crate::logging::Level::WARN };
    (@level error) => { $crate::logging::Level::ERROR };
    ($level:ident, $scope:expr, $($arg:tt)*) => {
        if $crate::logging::get_log_config().should_log($scope, $crate::scoped_log!(@level $level)) {
            $crate::logging::$level!(scope = $scope, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! teleport_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "teleport", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "input", $($arg)*)
    };
}

#[macro_export]
macro_rules! physics_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "physics", $($arg)*)
    };
}
