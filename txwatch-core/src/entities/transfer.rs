use rust_decimal::Decimal;

/// An incoming transfer of a tracked token into a monitored wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub mint: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    /// Signature of the transaction the transfer belongs to.
    pub signature: String,
}
