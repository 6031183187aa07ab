//! Deposit wallet registry.
//!
//! The registry is read from a CSV export whose first column holds the wallet
//! addresses. Addresses are deduplicated (first occurrence wins) and split
//! into fixed-size groups; each receiver instance serves exactly one group and
//! each group gets its own provider webhook.

use itertools::Itertools;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Default number of addresses per group.
pub const DEFAULT_GROUP_SIZE: usize = 100_000;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read wallet file: {0}")]
    Io(#[from] std::io::Error),

    #[error("wallet group size must be greater than zero")]
    InvalidGroupSize,

    #[error("wallet group {index} does not exist (registry has {count} groups)")]
    GroupOutOfRange { index: usize, count: usize },
}

/// The full, ordered list of monitored deposit wallets.
#[derive(Debug, Clone)]
pub struct WalletRegistry {
    addresses: Vec<String>,
    group_size: usize,
}

impl WalletRegistry {
    /// Build a registry from addresses in file order.
    pub fn from_addresses<I, S>(addresses: I, group_size: usize) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if group_size == 0 {
            return Err(RegistryError::InvalidGroupSize);
        }
        let addresses = addresses
            .into_iter()
            .map(Into::into)
            .filter(|address: &String| !address.is_empty())
            .unique()
            .collect();
        Ok(Self {
            addresses,
            group_size,
        })
    }

    /// Parse CSV content: header row skipped, first column taken.
    pub fn from_csv_str(content: &str, group_size: usize) -> Result<Self, RegistryError> {
        let addresses = content.lines().skip(1).filter_map(first_csv_field);
        Self::from_addresses(addresses, group_size)
    }

    /// Read and parse a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>, group_size: usize) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content, group_size)
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Number of groups; the last one may be shorter than `group_size`.
    pub fn group_count(&self) -> usize {
        self.addresses.len().div_ceil(self.group_size)
    }

    /// Get a group by its 1-based index.
    pub fn group(&self, index: usize) -> Result<WalletGroup, RegistryError> {
        let count = self.group_count();
        if index == 0 || index > count {
            return Err(RegistryError::GroupOutOfRange { index, count });
        }
        let start = (index - 1) * self.group_size;
        let end = (start + self.group_size).min(self.addresses.len());
        Ok(WalletGroup::new(index, self.addresses[start..end].to_vec()))
    }

    /// All groups in order.
    pub fn groups(&self) -> impl Iterator<Item = WalletGroup> + '_ {
        self.addresses
            .chunks(self.group_size)
            .enumerate()
            .map(|(i, chunk)| WalletGroup::new(i + 1, chunk.to_vec()))
    }
}

/// One partition of the registry.
///
/// Keeps the ordered address list (sent to the provider when registering the
/// webhook) alongside a hash set for constant-time membership checks.
#[derive(Debug, Clone)]
pub struct WalletGroup {
    name: String,
    addresses: Vec<String>,
    members: HashSet<String>,
}

impl WalletGroup {
    pub fn new(index: usize, addresses: Vec<String>) -> Self {
        let members = addresses.iter().cloned().collect();
        Self {
            name: format!("group{index}"),
            addresses,
            members,
        }
    }

    /// Name used in logs, health responses and log file names.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn contains(&self, address: &str) -> bool {
        self.members.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

fn first_csv_field(line: &str) -> Option<String> {
    let field = line.split(',').next()?.trim().trim_matches('"').trim();
    (!field.is_empty()).then(|| field.to_string())
}
