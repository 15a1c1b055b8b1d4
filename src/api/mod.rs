//! HTTP host for the triggered invoker.
//!
//! A thin adapter: every `POST /invoke` is one invocation, answered with the
//! same `{statusCode, body}` object the function host returns.

pub mod handlers;
pub mod middleware;
pub mod routes;
