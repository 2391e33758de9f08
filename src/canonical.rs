//! Canonical schemas.
//!
//! Each standardizer family produces one fixed column set per resource
//! family. The `platform` column is not listed here; the engine always emits
//! it first. Derived metrics follow the mapped fields in declaration order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::{ResourceType, StandardizerKind};

pub const PLATFORM_FIELD: &str = "platform";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// IDs, kept as strings to avoid numeric precision loss.
    Identifier,
    /// Passthrough text.
    Text,
    /// Integer-like counters; default 0.
    Count,
    /// Currency amounts; default 0.0.
    Money,
    /// Non-additive numbers; default null.
    Numeric,
    Date,
    DateTime,
}

impl FieldType {
    /// Summed by the aggregator and zero-filled by the default filler.
    pub fn is_additive(&self) -> bool {
        matches!(self, FieldType::Count | FieldType::Money)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Identifier => "identifier",
            FieldType::Text => "text",
            FieldType::Count => "count",
            FieldType::Money => "money",
            FieldType::Numeric => "numeric",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalField {
    pub name: &'static str,
    pub field_type: FieldType,
}

const fn field(name: &'static str, field_type: FieldType) -> CanonicalField {
    CanonicalField { name, field_type }
}

/// Built-in computed columns. Inputs are canonical field names of the same schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedMetric {
    /// `numerator / denominator * multiplier`, or 0 when the denominator is not positive.
    Ratio {
        name: &'static str,
        numerator: &'static str,
        denominator: &'static str,
        multiplier: f64,
    },
    /// Elapsed hours between two timestamps; null when either is null.
    HoursBetween {
        name: &'static str,
        start: &'static str,
        end: &'static str,
    },
    /// Elapsed whole days between two dates; null when either is null.
    DaysBetween {
        name: &'static str,
        start: &'static str,
        end: &'static str,
    },
    /// Calendar date of a timestamp.
    DateOf {
        name: &'static str,
        source: &'static str,
    },
}

impl DerivedMetric {
    pub fn name(&self) -> &'static str {
        match self {
            DerivedMetric::Ratio { name, .. }
            | DerivedMetric::HoursBetween { name, .. }
            | DerivedMetric::DaysBetween { name, .. }
            | DerivedMetric::DateOf { name, .. } => *name,
        }
    }

    pub fn output_type(&self) -> FieldType {
        match self {
            DerivedMetric::Ratio { .. }
            | DerivedMetric::HoursBetween { .. }
            | DerivedMetric::DaysBetween { .. } => FieldType::Numeric,
            DerivedMetric::DateOf { .. } => FieldType::Date,
        }
    }

    pub fn inputs(&self) -> Vec<&'static str> {
        match self {
            DerivedMetric::Ratio {
                numerator,
                denominator,
                ..
            } => vec![*numerator, *denominator],
            DerivedMetric::HoursBetween { start, end, .. }
            | DerivedMetric::DaysBetween { start, end, .. } => vec![*start, *end],
            DerivedMetric::DateOf { source, .. } => vec![*source],
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DerivedMetric::Ratio {
                numerator,
                denominator,
                multiplier,
                ..
            } if *multiplier != 1.0 => {
                format!("{numerator} / {denominator} * {multiplier}")
            }
            DerivedMetric::Ratio {
                numerator,
                denominator,
                ..
            } => format!("{numerator} / {denominator}"),
            DerivedMetric::HoursBetween { start, end, .. } => format!("hours({end} - {start})"),
            DerivedMetric::DaysBetween { start, end, .. } => format!("days({end} - {start})"),
            DerivedMetric::DateOf { source, .. } => format!("date({source})"),
        }
    }
}

#[derive(Debug)]
pub struct CanonicalSchema {
    pub kind: StandardizerKind,
    pub family: &'static str,
    pub fields: &'static [CanonicalField],
    pub derived: &'static [DerivedMetric],
    /// Field used by the owner-equals filter.
    pub owner_field: Option<&'static str>,
    /// Field used by the status-in-set filter.
    pub status_field: Option<&'static str>,
    /// Field used by the date-range filter when none is configured.
    pub date_field: Option<&'static str>,
    /// Grouping keys used when aggregation is enabled without explicit keys.
    pub default_group_by: &'static [&'static str],
}

impl CanonicalSchema {
    pub fn field(&self, name: &str) -> Option<&CanonicalField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        name == PLATFORM_FIELD || self.field(name).is_some()
    }

    /// Every output column name, `platform` first, then mapped, then derived.
    pub fn column_names(&self) -> Vec<&'static str> {
        std::iter::once(PLATFORM_FIELD)
            .chain(self.fields.iter().map(|f| f.name))
            .chain(self.derived.iter().map(|m| m.name()))
            .collect()
    }
}

use FieldType::{Count, Date, DateTime, Identifier, Money, Numeric, Text};

pub static AD_SPEND: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::AdSpend,
    family: "performance",
    fields: &[
        field("date", Date),
        field("account_id", Identifier),
        field("campaign_id", Identifier),
        field("campaign_name", Text),
        field("ad_group_id", Identifier),
        field("ad_group_name", Text),
        field("ad_id", Identifier),
        field("keyword", Text),
        field("device_type", Text),
        field("currency", Text),
        field("impressions", Count),
        field("clicks", Count),
        field("spend", Money),
        field("conversions", Count),
        field("conversion_value", Money),
    ],
    derived: &[
        DerivedMetric::Ratio {
            name: "ctr",
            numerator: "clicks",
            denominator: "impressions",
            multiplier: 100.0,
        },
        DerivedMetric::Ratio {
            name: "cpc",
            numerator: "spend",
            denominator: "clicks",
            multiplier: 1.0,
        },
        DerivedMetric::Ratio {
            name: "cpa",
            numerator: "spend",
            denominator: "conversions",
            multiplier: 1.0,
        },
        DerivedMetric::Ratio {
            name: "roas",
            numerator: "conversion_value",
            denominator: "spend",
            multiplier: 1.0,
        },
    ],
    owner_field: None,
    status_field: None,
    date_field: Some("date"),
    default_group_by: &["date", "platform", "campaign_id"],
};

pub static CRM_CONTACTS: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::Crm,
    family: "contacts",
    fields: &[
        field("record_id", Identifier),
        field("first_name", Text),
        field("last_name", Text),
        field("full_name", Text),
        field("email", Text),
        field("phone", Text),
        field("company_name", Text),
        field("job_title", Text),
        field("owner_id", Identifier),
        field("status", Text),
        field("source", Text),
        field("created_date", DateTime),
        field("updated_date", DateTime),
    ],
    derived: &[],
    owner_field: Some("owner_id"),
    status_field: Some("status"),
    date_field: Some("created_date"),
    default_group_by: &["platform", "status"],
};

pub static CRM_COMPANIES: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::Crm,
    family: "companies",
    fields: &[
        field("record_id", Identifier),
        field("company_name", Text),
        field("domain", Text),
        field("industry", Text),
        field("employee_count", Numeric),
        field("annual_revenue", Numeric),
        field("country", Text),
        field("city", Text),
        field("owner_id", Identifier),
        field("created_date", DateTime),
        field("updated_date", DateTime),
    ],
    derived: &[],
    owner_field: Some("owner_id"),
    status_field: None,
    date_field: Some("created_date"),
    default_group_by: &["platform", "industry"],
};

pub static CRM_DEALS: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::Crm,
    family: "deals",
    fields: &[
        field("record_id", Identifier),
        field("deal_name", Text),
        field("amount", Money),
        field("currency", Text),
        field("stage", Text),
        field("status", Text),
        field("pipeline", Text),
        field("owner_id", Identifier),
        field("company_id", Identifier),
        field("probability", Numeric),
        field("close_date", Date),
        field("created_date", DateTime),
        field("updated_date", DateTime),
    ],
    derived: &[DerivedMetric::DaysBetween {
        name: "days_to_close",
        start: "created_date",
        end: "close_date",
    }],
    owner_field: Some("owner_id"),
    status_field: Some("status"),
    date_field: Some("close_date"),
    default_group_by: &["platform", "stage"],
};

pub static ECOMMERCE_ORDERS: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::Ecommerce,
    family: "orders",
    fields: &[
        field("order_id", Identifier),
        field("order_number", Text),
        field("customer_id", Identifier),
        field("customer_email", Text),
        field("status", Text),
        field("currency", Text),
        field("subtotal", Money),
        field("tax", Money),
        field("shipping", Money),
        field("discount", Money),
        field("total", Money),
        field("item_count", Count),
        field("created_date", DateTime),
        field("updated_date", DateTime),
    ],
    derived: &[
        DerivedMetric::Ratio {
            name: "average_item_value",
            numerator: "total",
            denominator: "item_count",
            multiplier: 1.0,
        },
        DerivedMetric::Ratio {
            name: "discount_rate",
            numerator: "discount",
            denominator: "subtotal",
            multiplier: 100.0,
        },
    ],
    owner_field: None,
    status_field: Some("status"),
    date_field: Some("created_date"),
    default_group_by: &["platform", "status"],
};

pub static ECOMMERCE_CUSTOMERS: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::Ecommerce,
    family: "customers",
    fields: &[
        field("customer_id", Identifier),
        field("email", Text),
        field("first_name", Text),
        field("last_name", Text),
        field("full_name", Text),
        field("phone", Text),
        field("country", Text),
        field("orders_count", Count),
        field("total_spent", Money),
        field("created_date", DateTime),
        field("updated_date", DateTime),
    ],
    derived: &[DerivedMetric::Ratio {
        name: "average_order_value",
        numerator: "total_spent",
        denominator: "orders_count",
        multiplier: 1.0,
    }],
    owner_field: None,
    status_field: None,
    date_field: Some("created_date"),
    default_group_by: &["platform", "country"],
};

pub static ECOMMERCE_PRODUCTS: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::Ecommerce,
    family: "products",
    fields: &[
        field("product_id", Identifier),
        field("sku", Identifier),
        field("title", Text),
        field("vendor", Text),
        field("category", Text),
        field("price", Money),
        field("inventory_quantity", Count),
        field("status", Text),
        field("created_date", DateTime),
        field("updated_date", DateTime),
    ],
    derived: &[],
    owner_field: None,
    status_field: Some("status"),
    date_field: Some("created_date"),
    default_group_by: &["platform", "category"],
};

pub static EVENTS: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::Events,
    family: "events",
    fields: &[
        field("event_id", Identifier),
        field("event_name", Text),
        field("user_id", Identifier),
        field("anonymous_id", Identifier),
        field("session_id", Identifier),
        field("timestamp", DateTime),
        field("device_type", Text),
        field("country", Text),
        field("city", Text),
        field("page_url", Text),
        field("referrer", Text),
        field("revenue", Money),
        field("properties", Text),
    ],
    derived: &[DerivedMetric::DateOf {
        name: "event_date",
        source: "timestamp",
    }],
    owner_field: None,
    status_field: None,
    date_field: Some("timestamp"),
    default_group_by: &["event_date", "platform", "event_name"],
};

pub static SUPPORT_TICKETS: CanonicalSchema = CanonicalSchema {
    kind: StandardizerKind::Support,
    family: "tickets",
    fields: &[
        field("ticket_id", Identifier),
        field("subject", Text),
        field("description", Text),
        field("status", Text),
        field("priority", Text),
        field("channel", Text),
        field("requester_id", Identifier),
        field("assignee_id", Identifier),
        field("tags", Text),
        field("created_date", DateTime),
        field("updated_date", DateTime),
        field("first_response_date", DateTime),
        field("closed_date", DateTime),
    ],
    derived: &[
        DerivedMetric::HoursBetween {
            name: "resolution_time_hours",
            start: "created_date",
            end: "closed_date",
        },
        DerivedMetric::HoursBetween {
            name: "first_response_time_hours",
            start: "created_date",
            end: "first_response_date",
        },
    ],
    owner_field: Some("assignee_id"),
    status_field: Some("status"),
    date_field: Some("created_date"),
    default_group_by: &["platform", "status"],
};

/// Canonical schema for a kind/resource pair, if the kind produces that resource.
pub fn canonical_schema(
    kind: StandardizerKind,
    resource: ResourceType,
) -> Option<&'static CanonicalSchema> {
    use ResourceType as R;
    use StandardizerKind as K;
    match (kind, resource) {
        (K::AdSpend, R::Campaigns | R::AdGroups | R::Keywords) => Some(&AD_SPEND),
        (K::Crm, R::Contacts) => Some(&CRM_CONTACTS),
        (K::Crm, R::Companies) => Some(&CRM_COMPANIES),
        (K::Crm, R::Deals) => Some(&CRM_DEALS),
        (K::Ecommerce, R::Orders) => Some(&ECOMMERCE_ORDERS),
        (K::Ecommerce, R::Customers) => Some(&ECOMMERCE_CUSTOMERS),
        (K::Ecommerce, R::Products) => Some(&ECOMMERCE_PRODUCTS),
        (K::Events, R::Events) => Some(&EVENTS),
        (K::Support, R::Tickets) => Some(&SUPPORT_TICKETS),
        _ => None,
    }
}
