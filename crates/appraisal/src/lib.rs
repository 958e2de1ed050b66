// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: Apache-2.0

//! Structural validation for TCB provisioning metadata.
//!
//! A relying party deciding whether a platform's security patch level is
//! acceptable consumes records issued by a provisioning authority and relayed
//! over an untrusted channel. This crate is the gate in front of that
//! decision: [`Tcb::validate`], [`RawTcb::validate`] and [`TcbInfo::validate`]
//! check every field-presence, width and range contract of those records and
//! reject anything malformed before it can influence a trust decision.
//!
//! Validators are pure, synchronous and stateless: no I/O, no logging, no
//! shared state. They borrow their input for the duration of the call and
//! report the first violated contract as the error. Signature verification,
//! document retrieval and freshness policy belong to the caller.

#![warn(rust_2018_idioms, unused_lifetimes, unused_qualifications, clippy::all)]

pub mod provisioning;
pub mod tcb;

pub use provisioning::{CpuSvn, Fmspc, PceId, PceSvn};
pub use tcb::{
    KnownStatus, RawTcb, StatusKind, Tcb, TcbInfo, TcbInfoImpl, TcbInfoVariant, TcbLevel,
    TcbStatus, Timestamp,
};
