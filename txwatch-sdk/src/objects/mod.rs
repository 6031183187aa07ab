pub mod helius;
pub mod receiver;
pub mod telegram;

pub use helius::{
    CreateWebhookRequest, EnhancedTransaction, EventEntry, TokenTransfer, TransactionType,
    TransferEntry, Webhook, WebhookPayload, WebhookType,
};
pub use receiver::{HealthResponse, HealthStatus, ReceiverResponse};
pub use telegram::{ParseMode, SendMessageRequest, TelegramResponse};
