//! Topology modes, verbs and the action identifiers handed to the executor.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Replication arrangement between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyMode {
    /// Bidirectional
    MasterMaster,
    /// Unidirectional
    MasterSlave,
}

impl TopologyMode {
    pub fn short_name(&self) -> &'static str {
        match self {
            TopologyMode::MasterMaster => "mm",
            TopologyMode::MasterSlave => "ms",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Setup,
    Status,
    Break,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Setup => "setup",
            Verb::Status => "status",
            Verb::Break => "break",
        }
    }
}

impl FromStr for Verb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "setup" => Ok(Verb::Setup),
            "status" => Ok(Verb::Status),
            "break" => Ok(Verb::Break),
            other => Err(ValidationError::UnknownAction(other.to_string())),
        }
    }
}

/// Mode-qualified action. The mm and ms variants are distinct operations
/// for the executor even though the verbs match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopologyAction {
    MmSetup,
    MmStatus,
    MmBreak,
    MsSetup,
    MsStatus,
    MsBreak,
}

impl TopologyAction {
    pub fn new(mode: TopologyMode, verb: Verb) -> Self {
        match (mode, verb) {
            (TopologyMode::MasterMaster, Verb::Setup) => TopologyAction::MmSetup,
            (TopologyMode::MasterMaster, Verb::Status) => TopologyAction::MmStatus,
            (TopologyMode::MasterMaster, Verb::Break) => TopologyAction::MmBreak,
            (TopologyMode::MasterSlave, Verb::Setup) => TopologyAction::MsSetup,
            (TopologyMode::MasterSlave, Verb::Status) => TopologyAction::MsStatus,
            (TopologyMode::MasterSlave, Verb::Break) => TopologyAction::MsBreak,
        }
    }

    pub fn mode(&self) -> TopologyMode {
        match self {
            TopologyAction::MmSetup | TopologyAction::MmStatus | TopologyAction::MmBreak => {
                TopologyMode::MasterMaster
            }
            TopologyAction::MsSetup | TopologyAction::MsStatus | TopologyAction::MsBreak => {
                TopologyMode::MasterSlave
            }
        }
    }

    pub fn verb(&self) -> Verb {
        match self {
            TopologyAction::MmSetup | TopologyAction::MsSetup => Verb::Setup,
            TopologyAction::MmStatus | TopologyAction::MsStatus => Verb::Status,
            TopologyAction::MmBreak | TopologyAction::MsBreak => Verb::Break,
        }
    }

    /// Value of the executor's `ACTION` key
    pub fn wire_name(&self) -> &'static str {
        match self {
            TopologyAction::MmSetup => "setup",
            TopologyAction::MmStatus => "status",
            TopologyAction::MmBreak => "break",
            TopologyAction::MsSetup => "setup_ms",
            TopologyAction::MsStatus => "status_ms",
            TopologyAction::MsBreak => "break_ms",
        }
    }

    /// Setup and Break change replication state; Status only reads it
    pub fn is_mutating(&self) -> bool {
        !matches!(self.verb(), Verb::Status)
    }
}

impl fmt::Display for TopologyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TopologyAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "setup" => Ok(TopologyAction::MmSetup),
            "status" => Ok(TopologyAction::MmStatus),
            "break" => Ok(TopologyAction::MmBreak),
            "setup_ms" => Ok(TopologyAction::MsSetup),
            "status_ms" => Ok(TopologyAction::MsStatus),
            "break_ms" => Ok(TopologyAction::MsBreak),
            other => Err(ValidationError::UnknownAction(other.to_string())),
        }
    }
}

/// Which dataset is authoritative before master-master replication starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataStrategy {
    KeepA,
    KeepB,
    Clean,
}

impl DataStrategy {
    pub fn wire_name(&self) -> &'static str {
        match self {
            DataStrategy::KeepA => "keepA",
            DataStrategy::KeepB => "keepB",
            DataStrategy::Clean => "clean",
        }
    }
}

impl FromStr for DataStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "keepa" => Ok(DataStrategy::KeepA),
            "keepb" => Ok(DataStrategy::KeepB),
            "clean" => Ok(DataStrategy::Clean),
            _ => Err(ValidationError::InvalidDataStrategy(s.to_string())),
        }
    }
}

/// Which node becomes the master in a master-slave setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsMaster {
    A,
    B,
}

impl MsMaster {
    pub fn wire_name(&self) -> &'static str {
        match self {
            MsMaster::A => "A",
            MsMaster::B => "B",
        }
    }
}

impl FromStr for MsMaster {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(MsMaster::A),
            "B" | "b" => Ok(MsMaster::B),
            _ => Err(ValidationError::InvalidMsMaster(s.to_string())),
        }
    }
}
