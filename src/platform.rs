//! Platform and resource identifiers.
//!
//! A [`Platform`] names the vendor a source table was exported from and
//! belongs to exactly one [`StandardizerKind`]. Together with a
//! [`ResourceType`] it selects the mapping table used for resolution.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum StandardizerKind {
    AdSpend,
    Crm,
    Ecommerce,
    Events,
    Support,
}

impl StandardizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardizerKind::AdSpend => "ad_spend",
            StandardizerKind::Crm => "crm",
            StandardizerKind::Ecommerce => "ecommerce",
            StandardizerKind::Events => "events",
            StandardizerKind::Support => "support",
        }
    }
}

impl fmt::Display for StandardizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Platform {
    GoogleAds,
    FacebookAds,
    LinkedinAds,
    TiktokAds,
    MicrosoftAds,
    Salesforce,
    Hubspot,
    Pipedrive,
    Shopify,
    Woocommerce,
    Bigcommerce,
    Segment,
    Amplitude,
    Mixpanel,
    Zendesk,
    Freshdesk,
    Intercom,
}

impl Platform {
    pub const ALL: [Platform; 17] = [
        Platform::GoogleAds,
        Platform::FacebookAds,
        Platform::LinkedinAds,
        Platform::TiktokAds,
        Platform::MicrosoftAds,
        Platform::Salesforce,
        Platform::Hubspot,
        Platform::Pipedrive,
        Platform::Shopify,
        Platform::Woocommerce,
        Platform::Bigcommerce,
        Platform::Segment,
        Platform::Amplitude,
        Platform::Mixpanel,
        Platform::Zendesk,
        Platform::Freshdesk,
        Platform::Intercom,
    ];

    /// Identifier written into the `platform` column of every canonical row.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GoogleAds => "google_ads",
            Platform::FacebookAds => "facebook_ads",
            Platform::LinkedinAds => "linkedin_ads",
            Platform::TiktokAds => "tiktok_ads",
            Platform::MicrosoftAds => "microsoft_ads",
            Platform::Salesforce => "salesforce",
            Platform::Hubspot => "hubspot",
            Platform::Pipedrive => "pipedrive",
            Platform::Shopify => "shopify",
            Platform::Woocommerce => "woocommerce",
            Platform::Bigcommerce => "bigcommerce",
            Platform::Segment => "segment",
            Platform::Amplitude => "amplitude",
            Platform::Mixpanel => "mixpanel",
            Platform::Zendesk => "zendesk",
            Platform::Freshdesk => "freshdesk",
            Platform::Intercom => "intercom",
        }
    }

    pub fn kind(&self) -> StandardizerKind {
        match self {
            Platform::GoogleAds
            | Platform::FacebookAds
            | Platform::LinkedinAds
            | Platform::TiktokAds
            | Platform::MicrosoftAds => StandardizerKind::AdSpend,
            Platform::Salesforce | Platform::Hubspot | Platform::Pipedrive => {
                StandardizerKind::Crm
            }
            Platform::Shopify | Platform::Woocommerce | Platform::Bigcommerce => {
                StandardizerKind::Ecommerce
            }
            Platform::Segment | Platform::Amplitude | Platform::Mixpanel => {
                StandardizerKind::Events
            }
            Platform::Zendesk | Platform::Freshdesk | Platform::Intercom => {
                StandardizerKind::Support
            }
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase().replace('-', "_");
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == needle)
            .ok_or_else(|| ConfigError::UnknownPlatform(value.to_string()))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ResourceType {
    Campaigns,
    AdGroups,
    Keywords,
    Contacts,
    Companies,
    Deals,
    Orders,
    Customers,
    Products,
    Events,
    Tickets,
}

impl ResourceType {
    pub const ALL: [ResourceType; 11] = [
        ResourceType::Campaigns,
        ResourceType::AdGroups,
        ResourceType::Keywords,
        ResourceType::Contacts,
        ResourceType::Companies,
        ResourceType::Deals,
        ResourceType::Orders,
        ResourceType::Customers,
        ResourceType::Products,
        ResourceType::Events,
        ResourceType::Tickets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Campaigns => "campaigns",
            ResourceType::AdGroups => "ad_groups",
            ResourceType::Keywords => "keywords",
            ResourceType::Contacts => "contacts",
            ResourceType::Companies => "companies",
            ResourceType::Deals => "deals",
            ResourceType::Orders => "orders",
            ResourceType::Customers => "customers",
            ResourceType::Products => "products",
            ResourceType::Events => "events",
            ResourceType::Tickets => "tickets",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase().replace('-', "_");
        ResourceType::ALL
            .into_iter()
            .find(|resource| resource.as_str() == needle)
            .ok_or_else(|| ConfigError::UnknownResource(value.to_string()))
    }
}
