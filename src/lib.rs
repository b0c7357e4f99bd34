//! Business profit & loss aggregation and progressive tax estimation.
//!
//! The engine in [`core`] is pure: callers hand it transactions, a period
//! selection and a tax configuration and get back a [`core::PLReport`].

pub mod core;
