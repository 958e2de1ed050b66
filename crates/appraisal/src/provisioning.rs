// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

//! Scalar platform-provisioning identifiers and their field contracts.
//!
//! Each type wraps a single optional value the way the provisioning
//! authority's records encode it: a record that never had the field set is
//! distinguishable from one carrying a zero value, and only the former fails
//! the presence check.

use std::fmt::{Display, Formatter};

use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

/// Width in bytes of a raw CPU security-version value.
pub const CPU_SVN_SIZE: usize = 16;

/// Width in bytes of a platform family identifier.
pub const FMSPC_SIZE: usize = 6;

/// Largest PCE identifier representable in the 16-bit wire encoding.
pub const PCE_ID_MAX: u32 = u16::MAX as u32;

/// Largest PCE security version representable in the 16-bit wire encoding.
pub const PCE_SVN_MAX: u32 = u16::MAX as u32;

/// Security version of the Provisioning Certification Enclave.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct PceSvn {
    pub value: Option<u32>,
}

impl PceSvn {
    pub(crate) fn validate(&self) -> Result<()> {
        match self.value {
            None => bail!("PceSvn does not have a \"value\" field"),
            Some(value) => {
                ensure!(
                    value <= PCE_SVN_MAX,
                    "PceSvn has a \"value\" field that is out of range: {value}"
                );
                Ok(())
            }
        }
    }
}

/// Identifier of the Provisioning Certification Enclave on a platform.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct PceId {
    pub value: Option<u32>,
}

impl PceId {
    pub(crate) fn validate(&self) -> Result<()> {
        match self.value {
            None => bail!("PceId does not have a \"value\" field"),
            Some(value) => {
                ensure!(
                    value <= PCE_ID_MAX,
                    "PceId has a \"value\" field that is out of range: {value}"
                );
                Ok(())
            }
        }
    }
}

/// Family-Model-Stepping-Platform-CustomSKU identifier naming the platform
/// family a TCB-info document applies to.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Fmspc {
    pub value: Option<Vec<u8>>,
}

impl Fmspc {
    pub(crate) fn validate(&self) -> Result<()> {
        match &self.value {
            None => bail!("Fmspc does not have a \"value\" field"),
            Some(value) => {
                ensure!(
                    value.len() == FMSPC_SIZE,
                    "Fmspc has a \"value\" field with an invalid size: {} bytes",
                    value.len()
                );
                Ok(())
            }
        }
    }
}

impl Display for Fmspc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}", hex::encode(value)),
            None => f.write_str("(unset)"),
        }
    }
}

/// Raw CPU security version as reported by the platform.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct CpuSvn {
    pub value: Option<Vec<u8>>,
}

impl CpuSvn {
    pub(crate) fn validate(&self) -> Result<()> {
        match &self.value {
            None => bail!("CpuSvn does not have a \"value\" field"),
            Some(value) => {
                ensure!(
                    value.len() == CPU_SVN_SIZE,
                    "CpuSvn has a \"value\" field with an invalid size: {} bytes",
                    value.len()
                );
                Ok(())
            }
        }
    }
}

impl Display for CpuSvn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}", hex::encode(value)),
            None => f.write_str("(unset)"),
        }
    }
}
