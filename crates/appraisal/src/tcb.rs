// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

//! TCB security-version records and the versioned TCB-info document.
//!
//! A TCB-info document pairs security-version combinations with the trust
//! status each one implies for a platform family. The records arrive already
//! deserialized; everything here checks shape and content only and reports
//! the first violated contract. Callers must treat any rejection as
//! untrusted input.

use crate::provisioning::{CpuSvn, Fmspc, PceId, PceSvn};

use std::fmt::{Display, Formatter};

use anyhow::{bail, ensure, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width in bytes of a component-wise security-version vector, one byte per
/// platform component.
pub const TCB_COMPONENTS_SIZE: usize = 16;

/// Earliest representable `Timestamp::seconds` value (0001-01-01T00:00:00Z).
pub const TIMESTAMP_SECONDS_MIN: i64 = -62_135_596_800;

/// Latest representable `Timestamp::seconds` value (9999-12-31T23:59:59Z).
pub const TIMESTAMP_SECONDS_MAX: i64 = 253_402_300_799;

const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// An instant as an offset in seconds and nanoseconds from the Unix epoch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Timestamp {
    pub seconds: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl Timestamp {
    fn validate(&self) -> Result<()> {
        ensure!(
            (TIMESTAMP_SECONDS_MIN..=TIMESTAMP_SECONDS_MAX).contains(&self.seconds),
            "Timestamp has a \"seconds\" field that is out of range: {}",
            self.seconds
        );
        ensure!(
            (0..NANOS_PER_SECOND).contains(&self.nanos),
            "Timestamp has a \"nanos\" field that is out of range: {}",
            self.nanos
        );
        Ok(())
    }

    /// Converts to a [`DateTime`], or `None` when outside the representable
    /// window.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        self.validate().ok()?;
        DateTime::from_timestamp(self.seconds, self.nanos as u32)
    }
}

/// Component-wise security version of a platform's TCB.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tcb {
    /// One security-version byte per platform component.
    pub components: Option<Vec<u8>>,
    pub pce_svn: Option<PceSvn>,
}

impl Tcb {
    /// Checks the field-presence and width contracts of a security-version
    /// record.
    pub fn validate(&self) -> Result<()> {
        let components = match &self.components {
            None => bail!("Tcb does not have a \"components\" field"),
            Some(components) => components,
        };
        ensure!(
            components.len() == TCB_COMPONENTS_SIZE,
            "Tcb has a \"components\" field with an invalid size: {} bytes",
            components.len()
        );
        match &self.pce_svn {
            None => bail!("Tcb does not have a \"pce_svn\" field"),
            Some(pce_svn) => pce_svn.validate(),
        }
    }
}

/// The same security-version quantity as [`Tcb`], in the raw encoding the
/// platform reports. The two encodings are validated independently and never
/// converted here.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTcb {
    pub cpu_svn: Option<CpuSvn>,
    pub pce_svn: Option<PceSvn>,
}

impl RawTcb {
    /// Checks the field-presence and width contracts of a raw
    /// security-version record.
    pub fn validate(&self) -> Result<()> {
        let cpu_svn = match &self.cpu_svn {
            None => bail!("RawTcb does not have a \"cpu_svn\" field"),
            Some(cpu_svn) => cpu_svn,
        };
        cpu_svn.validate()?;
        match &self.pce_svn {
            None => bail!("RawTcb does not have a \"pce_svn\" field"),
            Some(pce_svn) => pce_svn.validate(),
        }
    }
}

/// Trust status the provisioning authority assigns to a TCB level.
///
/// `Invalid` is the reserved zero value. It exists so a default-constructed
/// record is distinguishable from one deliberately marked with a real status;
/// it never passes validation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KnownStatus {
    #[default]
    Invalid,
    UpToDate,
    OutOfDate,
    Revoked,
    ConfigurationNeeded,
    OutOfDateConfigurationNeeded,
    SwHardeningNeeded,
    ConfigurationAndSwHardeningNeeded,
}

impl Display for KnownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Invalid => "INVALID",
            Self::UpToDate => "UP_TO_DATE",
            Self::OutOfDate => "OUT_OF_DATE",
            Self::Revoked => "REVOKED",
            Self::ConfigurationNeeded => "CONFIGURATION_NEEDED",
            Self::OutOfDateConfigurationNeeded => "OUT_OF_DATE_CONFIGURATION_NEEDED",
            Self::SwHardeningNeeded => "SW_HARDENING_NEEDED",
            Self::ConfigurationAndSwHardeningNeeded => "CONFIGURATION_AND_SW_HARDENING_NEEDED",
        })
    }
}

/// The selected representation of a TCB level's status.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusKind {
    KnownStatus(KnownStatus),
}

/// Status tag of a TCB level. `value` is `None` when the issuing record never
/// selected a representation, which is itself an invalid state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct TcbStatus {
    pub value: Option<StatusKind>,
}

impl TcbStatus {
    fn validate(&self) -> Result<()> {
        match self.value {
            None => bail!("TcbStatus does not have a status variant set"),
            Some(StatusKind::KnownStatus(KnownStatus::Invalid)) => {
                bail!("TcbStatus has a \"known_status\" field with the reserved INVALID value")
            }
            Some(StatusKind::KnownStatus(_)) => Ok(()),
        }
    }
}

/// One row of a TCB-info document: a security-version combination and the
/// trust status it implies.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct TcbLevel {
    pub tcb: Option<Tcb>,
    pub status: Option<TcbStatus>,
}

impl TcbLevel {
    fn validate(&self) -> Result<()> {
        let tcb = match &self.tcb {
            None => bail!("TcbLevel does not have a \"tcb\" field"),
            Some(tcb) => tcb,
        };
        tcb.validate()?;
        match &self.status {
            None => bail!("TcbLevel does not have a \"status\" field"),
            Some(status) => status.validate(),
        }
    }
}

/// The selected schema implementation of a TCB-info document.
///
/// Each schema version is its own variant with its own field contracts; a new
/// version adds a variant and a handler without touching the existing ones.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TcbInfoVariant {
    Impl(TcbInfoImpl),
}

/// The versioned envelope wrapping a TCB-info document. `value` is `None`
/// when no implementation variant was ever selected.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct TcbInfo {
    pub value: Option<TcbInfoVariant>,
}

impl TcbInfo {
    /// Validates the document envelope and every TCB level it carries.
    ///
    /// The first violated contract is the error; a document rejected here
    /// must not feed a trust decision.
    pub fn validate(&self) -> Result<()> {
        match &self.value {
            None => bail!("TcbInfo does not have an implementation variant set"),
            Some(TcbInfoVariant::Impl(info)) => info.validate(),
        }
    }
}

/// Fields of a version-1 TCB-info document.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TcbInfoImpl {
    pub version: Option<u32>,
    pub issue_date: Option<Timestamp>,
    pub next_update: Option<Timestamp>,
    pub fmspc: Option<Fmspc>,
    pub pce_id: Option<PceId>,
    #[serde(default)]
    pub tcb_levels: Vec<TcbLevel>,
}

impl TcbInfoImpl {
    fn validate(&self) -> Result<()> {
        match self.version {
            None => bail!("TcbInfoImpl does not have a \"version\" field"),
            Some(1) => self.validate_v1(),
            Some(version) => bail!("TcbInfoImpl has an unsupported \"version\": {version}"),
        }
    }

    fn validate_v1(&self) -> Result<()> {
        let issue_date = match &self.issue_date {
            None => bail!("TcbInfoImpl does not have an \"issue_date\" field"),
            Some(issue_date) => issue_date,
        };
        let next_update = match &self.next_update {
            None => bail!("TcbInfoImpl does not have a \"next_update\" field"),
            Some(next_update) => next_update,
        };
        let fmspc = match &self.fmspc {
            None => bail!("TcbInfoImpl does not have an \"fmspc\" field"),
            Some(fmspc) => fmspc,
        };
        let pce_id = match &self.pce_id {
            None => bail!("TcbInfoImpl does not have a \"pce_id\" field"),
            Some(pce_id) => pce_id,
        };
        issue_date.validate()?;
        next_update.validate()?;
        fmspc.validate()?;
        pce_id.validate()?;
        ensure!(
            !self.tcb_levels.is_empty(),
            "TcbInfoImpl does not have any \"tcb_levels\" entries"
        );
        for level in &self.tcb_levels {
            level.validate()?;
        }
        Ok(())
    }
}
