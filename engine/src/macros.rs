/// Time a block and report the elapsed duration at debug level under the given scope.
#[macro_export]
macro_rules! profile {
    ($description:expr, $block:expr) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        $crate::scoped_log!(DEBUG, "profile", "[{}]: Time elapsed: {:?}", $description, duration);
        result
    }};
}
