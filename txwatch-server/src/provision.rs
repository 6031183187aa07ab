//! Webhook provisioning.
//!
//! Registers one Helius webhook per wallet group. Registration is idempotent
//! per URL: any existing webhook pointing at the same URL is deleted first,
//! so re-running after a wallet export change replaces the address list.

use crate::config::LoadedConfig;
use txwatch_core::entities::{WalletGroup, WalletRegistry};
use txwatch_sdk::client::{ClientError, HeliusClient};
use txwatch_sdk::objects::{CreateWebhookRequest, Webhook};
use url::Url;

/// Register the requested `(group, url)` pairs with Helius.
pub async fn run(config: &LoadedConfig, targets: &[(usize, Url)]) -> anyhow::Result<()> {
    let provider = config.require_provider()?;
    tracing::info!(api_key = %mask_secret(&provider.api_key), "Using Helius API key");
    let client = HeliusClient::new(provider.api_key.clone())?;

    let registry = WalletRegistry::from_csv_path(&config.wallets.csv, config.wallets.group_size)
        .map_err(|e| {
            tracing::error!("Failed to load wallets from {:?}: {}", config.wallets.csv, e);
            e
        })?;
    tracing::info!(
        wallets = registry.len(),
        groups = registry.group_count(),
        group_size = config.wallets.group_size,
        "Loaded wallet registry"
    );

    let failed = provision_groups(&client, &registry, targets).await;
    if failed.is_empty() {
        tracing::info!("All webhook registrations successful");
        Ok(())
    } else {
        anyhow::bail!("webhook registration failed for groups {failed:?}")
    }
}

/// Provision each target in order. Returns the indices of the groups that
/// could not be registered.
pub async fn provision_groups(
    client: &HeliusClient,
    registry: &WalletRegistry,
    targets: &[(usize, Url)],
) -> Vec<usize> {
    let mut failed = Vec::new();
    for (index, url) in targets {
        let group = match registry.group(*index) {
            Ok(group) => group,
            Err(e) => {
                tracing::error!(group = index, error = %e, "Cannot provision group");
                failed.push(*index);
                continue;
            }
        };

        match register_group(client, &group, url.as_str()).await {
            Ok(webhook) => tracing::info!(
                group = group.name(),
                webhook_id = %webhook.webhook_id,
                accounts = webhook.account_addresses.len(),
                types = ?webhook.transaction_types,
                webhook_type = ?webhook.webhook_type,
                url = %url,
                "Webhook registered"
            ),
            Err(e) => {
                tracing::error!(group = group.name(), url = %url, error = %e, "Webhook registration failed");
                failed.push(*index);
            }
        }
    }
    failed
}

/// Replace any webhook registered for `url` with one covering `group`.
pub async fn register_group(
    client: &HeliusClient,
    group: &WalletGroup,
    url: &str,
) -> Result<Webhook, ClientError> {
    let existing = client.list_webhooks().await?;
    tracing::debug!(count = existing.len(), "Listed existing webhooks");

    for webhook in existing.iter().filter(|webhook| webhook.webhook_url == url) {
        tracing::info!(webhook_id = %webhook.webhook_id, url, "Deleting webhook with the same URL");
        // A stale webhook that cannot be deleted only causes duplicate
        // deliveries, which the receiver's ledger absorbs.
        if let Err(e) = client.delete_webhook(&webhook.webhook_id).await {
            tracing::warn!(webhook_id = %webhook.webhook_id, error = %e, "Failed to delete webhook");
        }
    }

    let request = CreateWebhookRequest::transfers(url, group.addresses().to_vec());
    client.create_webhook(&request).await
}

/// Show only the edges of a secret in logs.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
