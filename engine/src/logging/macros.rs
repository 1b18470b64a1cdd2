/// Emit a tracing event tagged with `scope`, filtered by the installed [`LogConfig`].
///
/// [`LogConfig`]: crate::logging::LogConfig
#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {{
        let log_config = $crate::logging::get_log_config();
        if log_config.should_log($scope, $crate::logging::Level::$level) {
            $crate::logging::tracing::event!(
                $crate::logging::Level::$level,
                scope = $scope,
                $($arg)*
            );
        }
    }};
}

#[macro_export]
macro_rules! locomotion_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "locomotion", $($arg)*)
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

#[macro_export]
macro_rules! runtime_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "runtime", $($arg)*)
    };
}
