//! Report records and their JSON/BSON field mapping.

use mongodb::bson::{Bson, Document};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A coffee order as written by the order-entry service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoffeeOrder {
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "deserialize_record_id",
        skip_serializing_if = "is_blank_id"
    )]
    pub id: Option<String>,
    #[serde(rename = "coffeetype")]
    pub coffee_type: String,
    #[serde(rename = "coffeeqty", deserialize_with = "deserialize_quantity")]
    pub coffee_qty: i64,
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    pub amount: f64,
}

/// An employee's coffee account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAccount {
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "deserialize_record_id",
        skip_serializing_if = "is_blank_id"
    )]
    pub id: Option<String>,
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    pub balance: f64,
    pub name: String,
}

/// Totals over the whole order collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalesTotals {
    pub total_sales: i64,
    pub total_revenue: f64,
}

/// Output field of the quantity sum.
pub const TOTAL_SALES_FIELD: &str = "totalSales";
/// Output field of the amount sum.
pub const TOTAL_REVENUE_FIELD: &str = "totalRevenue";

impl SalesTotals {
    /// Read the totals row produced by the sales aggregation.
    ///
    /// `$sum` yields Int32, Int64 or Double depending on the inputs, so both
    /// fields accept any numeric BSON type. Returns `None` if either field is
    /// missing or not a number.
    pub fn from_document(row: &Document) -> Option<Self> {
        let total_sales = integral_value(row.get(TOTAL_SALES_FIELD)?)?;
        let total_revenue = match row.get(TOTAL_REVENUE_FIELD)? {
            Bson::Int32(n) => f64::from(*n),
            Bson::Int64(n) => *n as f64,
            Bson::Double(n) => *n,
            _ => return None,
        };
        Some(Self {
            total_sales,
            total_revenue,
        })
    }
}

/// The assembled report.
///
/// `total_sales`/`total_revenue` cover every order; `recent_sales` holds only
/// the newest few.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    #[serde(rename = "totalsales")]
    pub total_sales: i64,
    #[serde(rename = "totalrevenue")]
    pub total_revenue: f64,
    #[serde(rename = "recentsales")]
    pub recent_sales: Vec<CoffeeOrder>,
    #[serde(rename = "employeeaccounts")]
    pub employee_accounts: Vec<EmployeeAccount>,
}

/// Whole numbers in any numeric BSON type. Shells store numeric literals as
/// doubles, so `2.0` counts as `2`.
fn integral_value(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        Bson::Double(n) if n.fract() == 0.0 => Some(*n as i64),
        _ => None,
    }
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Bson::deserialize(deserializer)?;
    integral_value(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {value}")))
}

/// Render any `_id` as a string: object ids as hex, numbers in decimal.
fn deserialize_record_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<Bson>::deserialize(deserializer)?;
    Ok(id.and_then(|id| match id {
        Bson::Null => None,
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::String(s) => Some(s),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }))
}

fn is_blank_id(id: &Option<String>) -> bool {
    id.as_deref().map_or(true, str::is_empty)
}
