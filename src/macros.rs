//! Logging shims.
//!
//! The crate only talks to `tracing` when the `tracing` feature is enabled;
//! with the feature off these expand to nothing.

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    };
}

macro_rules! info_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
    };
}

pub(crate) use debug_event;
pub(crate) use info_event;
