//! # weft-hooks
//!
//! Scoped, exception-isolated before/after hooks for instrumented call sites.
//!
//! The instrumentation weaving wraps application call sites with a hook
//! implementing [`AroundHook`](hook::AroundHook). Installing the hook behind
//! a [`GuardedHook`](guarded::GuardedHook) adds two guarantees:
//!
//! - **Admission**: entry/exit hook logic runs only when the scope's
//!   [`ExecutionPolicy`](weft_scope::policy::ExecutionPolicy) admits it, so
//!   recursive or re-entrant passes through one semantic boundary do not
//!   produce duplicate observations.
//! - **Isolation**: failures raised by hook logic — error returns and
//!   panics alike — are routed to an [`ExceptionSink`](sink::ExceptionSink)
//!   and never escape into the instrumented call path.
//!
//! Depth bookkeeping is released on every exit path, so a failing hook can
//! never permanently desynchronize admission for future calls.

#![deny(unsafe_code)]

pub mod errors;
pub mod guarded;
pub mod hook;
pub mod settings;
pub mod sink;
