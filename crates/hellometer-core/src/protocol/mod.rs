//! Wire contracts for the hello endpoint.
//!
//! Query parsing is kept separate from validation: `HelloQuery` is whatever
//! the caller sent, `HelloRequest` only exists once every range check passed.
//! Nothing here touches metrics, so a rejected query has no side effects.

pub mod hello;
pub mod work;
