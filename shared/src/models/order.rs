//! Sale order records as returned by the ERP `/orders` endpoint

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::{lenient_datetime, lenient_decimal, lenient_rate, lenient_string};

/// One sale transaction carrying up to one frame/product line and one lens line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(alias = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bill_number: Option<String>,
    #[serde(default)]
    pub store: Option<StoreRef>,
    #[serde(default)]
    pub product: Option<OrderLine>,
    #[serde(default)]
    pub lens: Option<OrderLine>,
    #[serde(default)]
    pub sale: Option<Sale>,
}

impl OrderRecord {
    pub fn store_name(&self) -> Option<&str> {
        self.store.as_ref().and_then(|s| s.name.as_deref())
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.sale.as_ref().and_then(|s| s.customer_name.as_deref())
    }

    pub fn received_amounts(&self) -> &[ReceivedAmount] {
        self.sale
            .as_ref()
            .map(|s| s.received_amount.as_slice())
            .unwrap_or(&[])
    }
}

/// Store reference embedded in a record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreRef {
    #[serde(alias = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// A product or lens line of an order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default, deserialize_with = "lenient_string")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub mrp: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub per_piece_discount: Decimal,
    /// Selling price per piece, tax inclusive
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub per_piece_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub net_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub incentive_amount: Decimal,
    #[serde(default)]
    pub item: Option<LineItem>,
}

impl OrderLine {
    /// Display name of the catalogue item, if any
    pub fn display_name(&self) -> Option<&str> {
        self.item
            .as_ref()
            .and_then(|item| item.display_name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    pub fn brand(&self) -> Option<&str> {
        self.item.as_ref().and_then(|item| item.brand.as_deref())
    }

    pub fn cost_price(&self) -> Decimal {
        self.item.as_ref().map(|i| i.cost_price).unwrap_or_default()
    }

    pub fn per_piece_tax(&self) -> Decimal {
        self.item.as_ref().map(|i| i.per_piece_tax).unwrap_or_default()
    }

    /// GST percentage carried by the item, when the API supplies one
    pub fn tax_rate(&self) -> Option<Decimal> {
        self.item.as_ref().and_then(|i| i.tax_rate)
    }
}

/// Catalogue item referenced by an order line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub cost_price: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub per_piece_tax: Decimal,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub tax_rate: Option<Decimal>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub item_type: Option<String>,
}

/// Parent sale aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_quantity: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_tax: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub net_amount: Decimal,
    #[serde(default)]
    pub received_amount: Vec<ReceivedAmount>,
}

/// One payment towards a sale
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReceivedAmount {
    #[serde(default, deserialize_with = "lenient_string")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Decimal,
}
