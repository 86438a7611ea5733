use sha2::{Digest, Sha256};

use crate::domain::transaction::TransactionRecord;

/// Canonical hash input: `merchantId~orderNumber~amount~country~currency`.
pub fn hash_input(record: &TransactionRecord) -> String {
    [
        record.merchant_id.as_str(),
        record.order_number.as_str(),
        record.amount.as_str(),
        record.country.as_str(),
        record.currency.as_str(),
    ]
    .join("~")
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `input`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
