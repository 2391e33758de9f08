//! Ad performance exports. REST field names come first, then flattened
//! report aliases.

use super::{FieldMapping, ValueTransform::MicrosToUnits};
use crate::platform::{Platform, ResourceType};

static GOOGLE_ADS_CAMPAIGNS: &[FieldMapping] = fields![
    "date" => [col!("segments_date"), col!("segments.date"), col!("date"), col!("day")],
    "account_id" => [col!("customer_id"), col!("customer.id"), col!("account_id")],
    "campaign_id" => [col!("campaign_id"), col!("campaign.id")],
    "campaign_name" => [col!("campaign_name"), col!("campaign.name")],
    "ad_group_id" => [col!("ad_group_id"), col!("ad_group.id")],
    "ad_group_name" => [col!("ad_group_name"), col!("ad_group.name")],
    "ad_id" => [col!("ad_group_ad_ad_id"), col!("ad_group_ad.ad.id"), col!("ad_id")],
    "device_type" => [col!("segments_device"), col!("segments.device"), col!("device")],
    "currency" => [col!("customer_currency_code"), col!("customer.currency_code"), col!("currency_code")],
    "impressions" => [col!("impressions"), col!("metrics_impressions"), col!("metrics.impressions")],
    "clicks" => [col!("clicks"), col!("metrics_clicks"), col!("metrics.clicks")],
    "spend" => [
        col!("cost_micros", MicrosToUnits),
        col!("metrics_cost_micros", MicrosToUnits),
        col!("metrics.cost_micros", MicrosToUnits),
        col!("cost"),
        col!("spend"),
    ],
    "conversions" => [col!("conversions"), col!("metrics_conversions"), col!("metrics.conversions")],
    "conversion_value" => [
        col!("conversions_value"),
        col!("metrics_conversions_value"),
        col!("metrics.conversions_value"),
        col!("conversion_value"),
    ],
];

static GOOGLE_ADS_KEYWORDS: &[FieldMapping] = fields![
    "date" => [col!("segments_date"), col!("segments.date"), col!("date")],
    "account_id" => [col!("customer_id"), col!("customer.id")],
    "campaign_id" => [col!("campaign_id"), col!("campaign.id")],
    "campaign_name" => [col!("campaign_name"), col!("campaign.name")],
    "ad_group_id" => [col!("ad_group_id"), col!("ad_group.id")],
    "ad_group_name" => [col!("ad_group_name"), col!("ad_group.name")],
    "ad_id" => [col!("ad_group_criterion_criterion_id"), col!("ad_group_criterion.criterion_id")],
    "keyword" => [
        col!("ad_group_criterion_keyword_text"),
        col!("ad_group_criterion.keyword.text"),
        col!("keyword_text"),
        col!("keyword"),
    ],
    "device_type" => [col!("segments_device"), col!("segments.device")],
    "currency" => [col!("customer_currency_code"), col!("currency_code")],
    "impressions" => [col!("impressions"), col!("metrics_impressions")],
    "clicks" => [col!("clicks"), col!("metrics_clicks")],
    "spend" => [
        col!("cost_micros", MicrosToUnits),
        col!("metrics_cost_micros", MicrosToUnits),
        col!("cost"),
    ],
    "conversions" => [col!("conversions"), col!("metrics_conversions")],
    "conversion_value" => [col!("conversions_value"), col!("metrics_conversions_value")],
];

static FACEBOOK_ADS: &[FieldMapping] = fields![
    "date" => [col!("date_start"), col!("date")],
    "account_id" => [col!("account_id")],
    "campaign_id" => [col!("campaign_id")],
    "campaign_name" => [col!("campaign_name")],
    "ad_group_id" => [col!("adset_id")],
    "ad_group_name" => [col!("adset_name")],
    "ad_id" => [col!("ad_id")],
    "device_type" => [col!("device_platform"), col!("impression_device")],
    "currency" => [col!("account_currency"), col!("currency")],
    "impressions" => [col!("impressions")],
    "clicks" => [col!("clicks"), col!("inline_link_clicks")],
    "spend" => [col!("spend")],
    "conversions" => [col!("conversions"), col!("purchases")],
    "conversion_value" => [col!("conversion_values"), col!("purchase_value"), col!("action_values_purchase")],
];

static LINKEDIN_ADS: &[FieldMapping] = fields![
    "date" => [col!("date"), col!("start_date"), col!("day")],
    "account_id" => [col!("account_id"), col!("sponsored_account_id")],
    "campaign_id" => [col!("campaign_id"), col!("sponsored_campaign_id")],
    "campaign_name" => [col!("campaign_name")],
    "ad_group_id" => [col!("campaign_group_id"), col!("sponsored_campaign_group_id")],
    "ad_group_name" => [col!("campaign_group_name")],
    "ad_id" => [col!("creative_id")],
    "currency" => [col!("currency"), col!("currency_code")],
    "impressions" => [col!("impressions")],
    "clicks" => [col!("clicks"), col!("landing_page_clicks")],
    "spend" => [col!("cost_in_local_currency"), col!("cost_in_usd"), col!("spend")],
    "conversions" => [col!("external_website_conversions"), col!("conversions")],
    "conversion_value" => [col!("conversion_value_in_local_currency"), col!("conversion_value")],
];

static TIKTOK_ADS: &[FieldMapping] = fields![
    "date" => [col!("stat_time_day"), col!("date")],
    "account_id" => [col!("advertiser_id")],
    "campaign_id" => [col!("campaign_id")],
    "campaign_name" => [col!("campaign_name")],
    "ad_group_id" => [col!("adgroup_id")],
    "ad_group_name" => [col!("adgroup_name")],
    "ad_id" => [col!("ad_id")],
    "device_type" => [col!("platform"), col!("device")],
    "currency" => [col!("currency")],
    "impressions" => [col!("impressions")],
    "clicks" => [col!("clicks")],
    "spend" => [col!("spend"), col!("cost")],
    "conversions" => [col!("conversion"), col!("conversions")],
    "conversion_value" => [col!("total_purchase_value"), col!("conversion_value")],
];

static MICROSOFT_ADS: &[FieldMapping] = fields![
    "date" => [col!("TimePeriod"), col!("Date"), col!("date")],
    "account_id" => [col!("AccountId"), col!("account_id")],
    "campaign_id" => [col!("CampaignId"), col!("campaign_id")],
    "campaign_name" => [col!("CampaignName"), col!("campaign_name")],
    "ad_group_id" => [col!("AdGroupId")],
    "ad_group_name" => [col!("AdGroupName")],
    "ad_id" => [col!("AdId"), col!("KeywordId")],
    "keyword" => [col!("Keyword")],
    "device_type" => [col!("DeviceType")],
    "currency" => [col!("CurrencyCode")],
    "impressions" => [col!("Impressions"), col!("impressions")],
    "clicks" => [col!("Clicks"), col!("clicks")],
    "spend" => [col!("Spend"), col!("spend")],
    "conversions" => [col!("Conversions"), col!("conversions")],
    "conversion_value" => [col!("Revenue"), col!("ConversionValue")],
];

pub(super) fn fields(
    platform: Platform,
    resource: ResourceType,
) -> Option<&'static [FieldMapping]> {
    use ResourceType as R;
    match (platform, resource) {
        (Platform::GoogleAds, R::Campaigns | R::AdGroups) => Some(GOOGLE_ADS_CAMPAIGNS),
        (Platform::GoogleAds, R::Keywords) => Some(GOOGLE_ADS_KEYWORDS),
        (Platform::FacebookAds, R::Campaigns | R::AdGroups) => Some(FACEBOOK_ADS),
        (Platform::LinkedinAds, R::Campaigns | R::AdGroups) => Some(LINKEDIN_ADS),
        (Platform::TiktokAds, R::Campaigns | R::AdGroups) => Some(TIKTOK_ADS),
        (Platform::MicrosoftAds, R::Campaigns | R::AdGroups | R::Keywords) => Some(MICROSOFT_ADS),
        _ => None,
    }
}
