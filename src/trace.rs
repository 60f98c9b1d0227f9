//! Feature-gated diagnostics for the search path.
//!
//! Events and spans all use the `imgsearch` target, and each event carries
//! its kind in an `event` field, so `RUST_LOG=imgsearch=debug` shows every
//! worker. Without the `tracing` feature the macros still evaluate their
//! field values and otherwise compile to nothing.
//!
//! | macro | enabled | disabled |
//! |---|---|---|
//! | `enter_span!(name, k = v, ..)` | entered `tracing` span guard | tuple of the values |
//! | `record_event!(LEVEL, kind, k = v, ..)` | `tracing::event!` at `Level::LEVEL` | `()` |

#[cfg(feature = "tracing")]
pub(crate) const TARGET: &str = "imgsearch";

/// Opens and enters an info-level span; keep the guard alive for its scope.
#[cfg(feature = "tracing")]
macro_rules! enter_span {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::span!(
            target: $crate::trace::TARGET,
            tracing::Level::INFO,
            $name
            $(, $key = $value)*
        )
        .entered()
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! enter_span {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        ($($value,)*)
    };
}

/// Records one event, e.g. `record_event!(WARN, "search_failed", error = msg)`.
#[cfg(feature = "tracing")]
macro_rules! record_event {
    ($level:ident, $kind:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::event!(
            target: $crate::trace::TARGET,
            tracing::Level::$level,
            event = $kind
            $(, $key = $value)*
        )
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! record_event {
    ($level:ident, $kind:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        let _ = ($($value,)*);
    }};
}

pub(crate) use enter_span;
pub(crate) use record_event;
