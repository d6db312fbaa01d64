//! Run configuration and input validation.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default timeout for every outbound HTTP call.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Aura snapshot gauge choices (gauge address to label).
pub const DEFAULT_AURA_GAUGES_URL: &str =
    "https://raw.githubusercontent.com/aurafinance/aura-contracts/main/tasks/snapshot/gauge_choices.json";

/// Hidden Hand API root.
pub const DEFAULT_HIDDEN_HAND_API: &str = "https://api.hiddenhand.finance";

/// Errors in the configuration a run was started with.
///
/// Always fatal: a run never degrades a bad configuration into "no action".
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Contract address is not a well-formed chain address
    #[error("invalid contract address: {value:?}")]
    InvalidAddress {
        /// The rejected input
        value: String,
    },

    /// A required argument was not supplied
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// Endpoint is not an http(s) URL
    #[error("invalid URL for {field}: {value:?}")]
    InvalidUrl {
        /// Which setting
        field: &'static str,
        /// The rejected input
        value: String,
    },

    /// Timeout of zero seconds
    #[error("http_timeout_secs must be at least 1")]
    ZeroTimeout,

    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`KeeperConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAddress { .. } => "INVALID_CONTRACT_ADDRESS",
            Self::MissingArgument(_) => "MISSING_ARGUMENT",
            Self::InvalidUrl { .. } => "INVALID_URL",
            Self::ZeroTimeout => "INVALID_TIMEOUT",
            Self::Io(_) => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
        }
    }
}

/// Parse a chain address the way wallets accept it.
///
/// `0x` prefix optional, 40 hex digits. All-lowercase and all-uppercase
/// input is accepted as is; mixed case must be a valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Result<Address, ConfigError> {
    let invalid = || ConfigError::InvalidAddress {
        value: value.to_string(),
    };

    let digits = value.strip_prefix("0x").unwrap_or(value);
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());

    if has_upper && has_lower {
        Address::parse_checksummed(format!("0x{}", digits), None).map_err(|_| invalid())
    } else {
        digits.parse().map_err(|_| invalid())
    }
}

/// Arguments injected by the automation network on every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserArgs {
    /// Scheduler contract address
    pub contract_address: Option<String>,
}

impl UserArgs {
    /// Parse from the raw JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Validate and return the contract address.
    pub fn verify(&self) -> Result<Address, ConfigError> {
        let raw = self
            .contract_address
            .as_deref()
            .ok_or(ConfigError::MissingArgument("contractAddress"))?;
        parse_address(raw)
    }
}

/// How the next plan is picked among the due ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Smallest next execution time first, ties by contract order
    #[default]
    EarliestDue,
    /// Fresh random permutation each run, first supported due plan wins
    Shuffled,
}

impl std::str::FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "earliest_due" | "earliest-due" | "earliest" => Ok(Self::EarliestDue),
            "shuffled" | "shuffle" | "random" => Ok(Self::Shuffled),
            other => Err(format!("unknown selection mode: {}", other)),
        }
    }
}

/// Scheduler contract generation, which fixes the plan layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractVersion {
    /// `(hhBriber, gauge, token, amount, interval, nextExec, remainingEpochs)`
    #[default]
    V1,
    /// V1 plus `(createdAt, canSkip, isFixed)`
    V2,
}

impl std::str::FromStr for ContractVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(format!("unknown contract version: {}", other)),
        }
    }
}

/// Keeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeeperConfig {
    /// Scheduler contract address, validated before use
    pub contract_address: Option<String>,

    /// JSON-RPC endpoint of the chain
    pub rpc_url: String,

    /// Timeout applied to every HTTP request
    pub http_timeout_secs: u64,

    /// Plan selection policy
    pub selection: SelectionMode,

    /// Contract generation
    pub contract_version: ContractVersion,

    /// Aura gauge label directory
    pub aura_gauges_url: String,

    /// Hidden Hand API root
    pub hidden_hand_api: String,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            contract_address: None,
            rpc_url: "http://127.0.0.1:8545".to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            selection: SelectionMode::default(),
            contract_version: ContractVersion::default(),
            aura_gauges_url: DEFAULT_AURA_GAUGES_URL.to_string(),
            hidden_hand_api: DEFAULT_HIDDEN_HAND_API.to_string(),
        }
    }
}

impl KeeperConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// HTTP timeout as a duration.
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }

    /// Check the settings the lookup clients depend on.
    pub fn validate_endpoints(&self) -> Result<(), ConfigError> {
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        check_url("rpc_url", &self.rpc_url)?;
        check_url("aura_gauges_url", &self.aura_gauges_url)?;
        check_url("hidden_hand_api", &self.hidden_hand_api)
    }

    /// Validated scheduler contract address.
    pub fn contract(&self) -> Result<Address, ConfigError> {
        UserArgs {
            contract_address: self.contract_address.clone(),
        }
        .verify()
    }

    /// Check every setting a run depends on.
    pub fn validate(&self) -> Result<Address, ConfigError> {
        let contract = self.contract()?;
        self.validate_endpoints()?;
        Ok(contract)
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const BALANCER: &str = "0x7Cdf753b45AB0729bcFe33DC12401E55d28308A9";

    #[test]
    fn test_parse_checksummed_address() {
        let addr = parse_address(BALANCER).unwrap();
        assert_eq!(addr.to_checksum(None), BALANCER);
    }

    #[test]
    fn test_parse_single_case_addresses() {
        let lower = parse_address(&BALANCER.to_lowercase()).unwrap();
        let upper = parse_address(&format!("0x{}", BALANCER[2..].to_uppercase())).unwrap();
        let bare = parse_address(&BALANCER[2..].to_lowercase()).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, bare);
    }

    #[test]
    fn test_reject_bad_checksum() {
        let broken = BALANCER.replacen("7Cdf", "7cdf", 1);
        let err = parse_address(&broken).unwrap_err();
        assert_eq!(err.code(), "INVALID_CONTRACT_ADDRESS");
    }

    #[test]
    fn test_reject_malformed_addresses() {
        let too_long = format!("{}00", BALANCER);
        for bad in ["", "0x", "0x1234", "not an address", too_long.as_str()] {
            assert!(parse_address(bad).is_err(), "accepted {:?}", bad);
        }
        assert!(parse_address("0xZZdf753b45ab0729bcfe33dc12401e55d28308a9").is_err());
    }

    #[test]
    fn test_user_args_verify() {
        let args = UserArgs::from_json(json!({ "contractAddress": BALANCER })).unwrap();
        assert!(args.verify().is_ok());

        let missing = UserArgs::from_json(json!({})).unwrap();
        assert_eq!(missing.verify().unwrap_err().code(), "MISSING_ARGUMENT");

        let bad = UserArgs::from_json(json!({ "contractAddress": "0xdead" })).unwrap();
        assert_eq!(bad.verify().unwrap_err().code(), "INVALID_CONTRACT_ADDRESS");
    }

    #[test]
    fn test_config_defaults_and_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "contract_address": "{}", "selection": "shuffled", "contract_version": "v2" }}"#,
            BALANCER
        )
        .unwrap();

        let config = KeeperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.selection, SelectionMode::Shuffled);
        assert_eq!(config.contract_version, ContractVersion::V2);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.hidden_hand_api, DEFAULT_HIDDEN_HAND_API);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_url() {
        let config = KeeperConfig {
            contract_address: Some(BALANCER.to_string()),
            rpc_url: "localhost:8545".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "INVALID_URL");
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let config = KeeperConfig {
            contract_address: Some(BALANCER.to_string()),
            http_timeout_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
        assert_eq!(err.code(), "INVALID_TIMEOUT");

        let one = KeeperConfig {
            http_timeout_secs: 1,
            ..config
        };
        assert!(one.validate().is_ok());
    }

    #[test]
    fn test_config_parse_error_code() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = KeeperConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("earliest_due".parse::<SelectionMode>().unwrap(), SelectionMode::EarliestDue);
        assert_eq!("Shuffled".parse::<SelectionMode>().unwrap(), SelectionMode::Shuffled);
        assert!("fifo".parse::<SelectionMode>().is_err());
        assert_eq!("v2".parse::<ContractVersion>().unwrap(), ContractVersion::V2);
    }
}
