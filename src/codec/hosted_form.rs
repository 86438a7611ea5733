//! Sectioned `merchant_request` plaintext for the hosted-form (WEB/MOBILE) flow.
//!
//! Layout: `txn~pg~card~cust~bill~ship~item~<reserved>~udf`, each section pipe-joined
//! in a fixed field order. The gateway parses positionally, so order is part of the
//! wire contract.

use crate::domain::transaction::TransactionRecord;

pub const SECTION_SEPARATOR: char = '~';
pub const FIELD_SEPARATOR: char = '|';

/// Total `~`-separated sections, including the reserved one.
pub const SECTION_COUNT: usize = 9;

/// Zero-based position of the reserved (`fraud_details`) section, always empty.
pub const RESERVED_SECTION: usize = 7;

/// UDF slots carried by WEB/MOBILE requests; API-channel records carry all seven.
const WEB_UDF_COUNT: usize = 5;

fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| field.as_ref())
        .collect::<Vec<&str>>()
        .join(&FIELD_SEPARATOR.to_string())
}

pub fn encode(record: &TransactionRecord) -> String {
    let txn = join_fields(&[
        &record.aggregator_id,
        &record.merchant_id,
        &record.order_number,
        &record.amount,
        &record.country,
        &record.currency,
        &record.transaction_type,
        &record.success_url,
        &record.failure_url,
        &record.channel,
    ]);

    let pg = &record.payment;
    let pg = join_fields(&[&pg.pg_id, &pg.pay_mode, &pg.scheme_id, &pg.wallet_type]);

    let card = &record.card;
    let card = join_fields(&[
        &card.card_number,
        &card.expiry_month,
        &card.expiry_year,
        &card.cvv,
        &card.card_name,
    ]);

    let cust = &record.customer;
    let cust = join_fields(&[
        &cust.name,
        &cust.email,
        &cust.mobile,
        &cust.unique_id,
        &cust.is_logged_in,
    ]);

    let bill = &record.billing;
    let bill = join_fields(&[
        &bill.address,
        &bill.city,
        &bill.state,
        &bill.country,
        &bill.zip,
    ]);

    let ship = &record.shipping;
    let ship = join_fields(&[
        &ship.address,
        &ship.city,
        &ship.state,
        &ship.country,
        &ship.zip,
        &ship.days,
        &ship.address_count,
    ]);

    let item = &record.item;
    let item = join_fields(&[&item.count, &item.value, &item.category]);

    let udf_count = if record.is_api_channel() {
        record.udf.len()
    } else {
        WEB_UDF_COUNT
    };
    let udf = join_fields(&record.udf[..udf_count]);

    let sections: [&str; SECTION_COUNT] = [
        &txn,
        &pg,
        &card,
        &cust,
        &bill,
        &ship,
        &item,
        "",
        &udf,
    ];
    sections.join(&SECTION_SEPARATOR.to_string())
}
