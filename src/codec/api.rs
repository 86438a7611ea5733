//! JSON `merchantRequest` plaintext for the direct-API flow.
//!
//! Key names are fixed by the gateway and are not a mechanical rename of the record
//! fields. `sucessUrl` is misspelled on the gateway side and must stay that way.

use serde::Serialize;

use crate::domain::transaction::{TransactionRecord, CHANNEL_API};

#[derive(Debug, Serialize)]
pub struct ApiMerchantRequest<'a> {
    pub card_details: CardSection<'a>,
    pub other_details: OtherSection<'a>,
    pub ship_details: ShipSection<'a>,
    pub txn_details: TxnSection<'a>,
    pub item_details: ItemSection<'a>,
    pub cust_details: CustSection<'a>,
    pub pg_details: PgSection<'a>,
    pub bill_details: BillSection<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection<'a> {
    pub card_number: &'a str,
    pub expiry_month: &'a str,
    pub expiry_year: &'a str,
    pub cvv: &'a str,
    pub card_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct OtherSection<'a> {
    pub udf1: &'a str,
    pub udf2: &'a str,
    pub udf3: &'a str,
    pub udf4: &'a str,
    pub udf5: &'a str,
    pub udf6: &'a str,
    pub udf7: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipSection<'a> {
    pub ship_address: &'a str,
    pub ship_city: &'a str,
    pub ship_state: &'a str,
    pub ship_country: &'a str,
    pub ship_zip: &'a str,
    pub ship_days: &'a str,
    pub address_count: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxnSection<'a> {
    pub ag_id: &'a str,
    pub me_id: &'a str,
    pub order_no: &'a str,
    pub amount: &'a str,
    pub country: &'a str,
    pub currency: &'a str,
    pub transaction_type: &'a str,
    #[serde(rename = "sucessUrl")]
    pub success_url: &'a str,
    pub failure_url: &'a str,
    pub channel: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSection<'a> {
    pub item_count: &'a str,
    pub item_value: &'a str,
    pub item_category: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustSection<'a> {
    pub customer_name: &'a str,
    pub email_id: &'a str,
    pub mobile_number: &'a str,
    pub unique_id: &'a str,
    pub is_logged_in: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PgSection<'a> {
    #[serde(rename = "pg_Id")]
    pub pg_id: &'a str,
    pub paymode: &'a str,
    #[serde(rename = "scheme_Id")]
    pub scheme_id: &'a str,
    pub wallet_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSection<'a> {
    pub bill_address: &'a str,
    pub bill_city: &'a str,
    pub bill_state: &'a str,
    pub bill_country: &'a str,
    pub bill_zip: &'a str,
}

impl<'a> From<&'a TransactionRecord> for ApiMerchantRequest<'a> {
    fn from(record: &'a TransactionRecord) -> Self {
        let [udf1, udf2, udf3, udf4, udf5, udf6, udf7] = &record.udf;

        Self {
            card_details: CardSection {
                card_number: &record.card.card_number,
                expiry_month: &record.card.expiry_month,
                expiry_year: &record.card.expiry_year,
                cvv: &record.card.cvv,
                card_name: &record.card.card_name,
            },
            other_details: OtherSection {
                udf1,
                udf2,
                udf3,
                udf4,
                udf5,
                udf6,
                udf7,
            },
            ship_details: ShipSection {
                ship_address: &record.shipping.address,
                ship_city: &record.shipping.city,
                ship_state: &record.shipping.state,
                ship_country: &record.shipping.country,
                ship_zip: &record.shipping.zip,
                ship_days: &record.shipping.days,
                address_count: &record.shipping.address_count,
            },
            txn_details: TxnSection {
                ag_id: &record.aggregator_id,
                me_id: &record.merchant_id,
                order_no: &record.order_number,
                amount: &record.amount,
                country: &record.country,
                currency: &record.currency,
                transaction_type: &record.transaction_type,
                success_url: &record.success_url,
                failure_url: &record.failure_url,
                channel: CHANNEL_API,
            },
            item_details: ItemSection {
                item_count: &record.item.count,
                item_value: &record.item.value,
                item_category: &record.item.category,
            },
            cust_details: CustSection {
                customer_name: &record.customer.name,
                email_id: &record.customer.email,
                mobile_number: &record.customer.mobile,
                unique_id: &record.customer.unique_id,
                is_logged_in: &record.customer.is_logged_in,
            },
            pg_details: PgSection {
                pg_id: &record.payment.pg_id,
                paymode: &record.payment.pay_mode,
                scheme_id: &record.payment.scheme_id,
                wallet_type: &record.payment.wallet_type,
            },
            bill_details: BillSection {
                bill_address: &record.billing.address,
                bill_city: &record.billing.city,
                bill_state: &record.billing.state,
                bill_country: &record.billing.country,
                bill_zip: &record.billing.zip,
            },
        }
    }
}

pub fn encode(record: &TransactionRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ApiMerchantRequest::from(record))
}
