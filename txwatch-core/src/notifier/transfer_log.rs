//! Append-only log of delivered notifications, one file per wallet group.

use super::{Notifier, NotifyError};
use crate::events::TransferNotification;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct TransferLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl TransferLog {
    /// Open (or create) `token_transfers_<group>.log` inside `dir`,
    /// creating `dir` if needed.
    pub async fn open(dir: impl AsRef<Path>, group_name: &str) -> std::io::Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("token_transfers_{group_name}.log"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, text: &str) -> std::io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(text.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }
}

#[async_trait]
impl Notifier for TransferLog {
    async fn notify(&self, notification: &TransferNotification) -> Result<(), NotifyError> {
        self.append(&notification.render_plain()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "transfer-log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TransferEvent;
    use rust_decimal::Decimal;
    use time::OffsetDateTime;

    fn notification(signature: &str) -> TransferNotification {
        TransferNotification::new(
            "RAY",
            TransferEvent {
                mint: "RAY_MINT".into(),
                from_address: "W2".into(),
                to_address: "W1".into(),
                amount: Decimal::new(50, 1),
                signature: signature.into(),
            },
            OffsetDateTime::now_utc(),
        )
    }

    #[tokio::test]
    async fn test_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let log = TransferLog::open(dir.path(), "group1").await.unwrap();
        log.notify(&notification("S1")).await.unwrap();
        drop(log);

        let log = TransferLog::open(dir.path(), "group1").await.unwrap();
        log.notify(&notification("S2")).await.unwrap();

        assert!(log.path().ends_with("token_transfers_group1.log"));
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("Transaction: S1"));
        assert!(content.contains("Transaction: S2"));
        assert!(content.find("S1").unwrap() < content.find("S2").unwrap());
    }
}
