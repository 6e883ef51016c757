//! # weft-scope
//!
//! Reentrancy guard core for instrumentation hooks.
//!
//! A single logical operation can pass through the same instrumented call
//! site more than once — recursion, internal library delegation, nested
//! calls sharing one semantic boundary. Running every hook on every pass
//! produces duplicate or mis-nested observations. This crate tracks, per
//! call stack, how many times a named [`Scope`](scope::Scope) has been
//! entered and applies an [`ExecutionPolicy`](policy::ExecutionPolicy) to
//! decide which entries and exits should actually run hook logic.
//!
//! ## Model
//!
//! - A [`Scope`](scope::Scope) is a named, process-wide coordination point
//!   shared by all hooks instrumenting logically related call sites.
//! - Each call stack (keyed by an explicit [`StackToken`](ids::StackToken))
//!   owns one [`InvocationGuard`](invocation::InvocationGuard) per scope: a
//!   depth counter plus optional opaque attachment.
//! - Admission is a pure function of policy and depth; the guard itself
//!   never blocks, spawns, or yields.
//!
//! Scopes are created once via the [`ScopeRegistry`](registry::ScopeRegistry)
//! and live for the process lifetime.

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod invocation;
pub mod policy;
pub mod registry;
pub mod scope;
