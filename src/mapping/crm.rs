use super::FieldMapping;
use crate::platform::{Platform, ResourceType};

static SALESFORCE_CONTACTS: &[FieldMapping] = fields![
    "record_id" => [col!("Id"), col!("id")],
    "first_name" => [col!("FirstName"), col!("first_name")],
    "last_name" => [col!("LastName"), col!("last_name")],
    "full_name" => [col!("Name")],
    "email" => [col!("Email"), col!("email")],
    "phone" => [col!("Phone"), col!("MobilePhone")],
    "company_name" => [col!("Account.Name"), col!("AccountName"), col!("Company")],
    "job_title" => [col!("Title")],
    "owner_id" => [col!("OwnerId")],
    "status" => [col!("Status"), col!("Lead_Status__c"), col!("Contact_Status__c")],
    "source" => [col!("LeadSource")],
    "created_date" => [col!("CreatedDate")],
    "updated_date" => [col!("LastModifiedDate"), col!("SystemModstamp")],
];

static SALESFORCE_COMPANIES: &[FieldMapping] = fields![
    "record_id" => [col!("Id"), col!("id")],
    "company_name" => [col!("Name")],
    "domain" => [col!("Website")],
    "industry" => [col!("Industry")],
    "employee_count" => [col!("NumberOfEmployees")],
    "annual_revenue" => [col!("AnnualRevenue")],
    "country" => [col!("BillingCountry"), col!("ShippingCountry")],
    "city" => [col!("BillingCity"), col!("ShippingCity")],
    "owner_id" => [col!("OwnerId")],
    "created_date" => [col!("CreatedDate")],
    "updated_date" => [col!("LastModifiedDate"), col!("SystemModstamp")],
];

static SALESFORCE_DEALS: &[FieldMapping] = fields![
    "record_id" => [col!("Id"), col!("id")],
    "deal_name" => [col!("Name")],
    "amount" => [col!("Amount")],
    "currency" => [col!("CurrencyIsoCode")],
    "stage" => [col!("StageName")],
    "status" => [col!("ForecastCategoryName"), col!("Status__c")],
    "pipeline" => [col!("Pipeline__c"), col!("Type")],
    "owner_id" => [col!("OwnerId")],
    "company_id" => [col!("AccountId")],
    "probability" => [col!("Probability")],
    "close_date" => [col!("CloseDate")],
    "created_date" => [col!("CreatedDate")],
    "updated_date" => [col!("LastModifiedDate"), col!("SystemModstamp")],
];

static HUBSPOT_CONTACTS: &[FieldMapping] = fields![
    "record_id" => [col!("hs_object_id"), col!("id"), col!("vid")],
    "first_name" => [col!("firstname"), col!("properties.firstname"), col!("properties_firstname")],
    "last_name" => [col!("lastname"), col!("properties.lastname"), col!("properties_lastname")],
    "email" => [col!("email"), col!("properties.email"), col!("properties_email")],
    "phone" => [col!("phone"), col!("mobilephone"), col!("properties.phone")],
    "company_name" => [col!("company"), col!("properties.company")],
    "job_title" => [col!("jobtitle"), col!("properties.jobtitle")],
    "owner_id" => [col!("hubspot_owner_id"), col!("properties.hubspot_owner_id")],
    "status" => [col!("hs_lead_status"), col!("lifecyclestage"), col!("properties.lifecyclestage")],
    "source" => [col!("hs_analytics_source"), col!("properties.hs_analytics_source")],
    "created_date" => [col!("createdate"), col!("createdAt"), col!("properties.createdate")],
    "updated_date" => [col!("lastmodifieddate"), col!("updatedAt"), col!("properties.lastmodifieddate")],
];

static HUBSPOT_COMPANIES: &[FieldMapping] = fields![
    "record_id" => [col!("hs_object_id"), col!("id")],
    "company_name" => [col!("name"), col!("properties.name")],
    "domain" => [col!("domain"), col!("properties.domain"), col!("website")],
    "industry" => [col!("industry"), col!("properties.industry")],
    "employee_count" => [col!("numberofemployees"), col!("properties.numberofemployees")],
    "annual_revenue" => [col!("annualrevenue"), col!("properties.annualrevenue")],
    "country" => [col!("country"), col!("properties.country")],
    "city" => [col!("city"), col!("properties.city")],
    "owner_id" => [col!("hubspot_owner_id"), col!("properties.hubspot_owner_id")],
    "created_date" => [col!("createdate"), col!("createdAt")],
    "updated_date" => [col!("hs_lastmodifieddate"), col!("updatedAt")],
];

static HUBSPOT_DEALS: &[FieldMapping] = fields![
    "record_id" => [col!("hs_object_id"), col!("id")],
    "deal_name" => [col!("dealname"), col!("properties.dealname")],
    "amount" => [col!("amount"), col!("properties.amount"), col!("hs_acv")],
    "currency" => [col!("deal_currency_code"), col!("properties.deal_currency_code")],
    "stage" => [col!("dealstage"), col!("properties.dealstage")],
    "status" => [col!("hs_is_closed_won"), col!("hs_deal_stage_probability_shadow")],
    "pipeline" => [col!("pipeline"), col!("properties.pipeline")],
    "owner_id" => [col!("hubspot_owner_id"), col!("properties.hubspot_owner_id")],
    "company_id" => [col!("associatedcompanyid"), col!("associations.companies")],
    "probability" => [col!("hs_deal_stage_probability"), col!("probability")],
    "close_date" => [col!("closedate"), col!("properties.closedate")],
    "created_date" => [col!("createdate"), col!("createdAt")],
    "updated_date" => [col!("hs_lastmodifieddate"), col!("updatedAt")],
];

static PIPEDRIVE_CONTACTS: &[FieldMapping] = fields![
    "record_id" => [col!("id")],
    "first_name" => [col!("first_name")],
    "last_name" => [col!("last_name")],
    "full_name" => [col!("name")],
    "email" => [col!("primary_email"), col!("email"), col!("email.value")],
    "phone" => [col!("phone"), col!("phone.value")],
    "company_name" => [col!("org_name"), col!("org_id.name")],
    "owner_id" => [col!("owner_id"), col!("owner_id.id"), col!("user_id")],
    "status" => [col!("label"), col!("status")],
    "created_date" => [col!("add_time")],
    "updated_date" => [col!("update_time")],
];

static PIPEDRIVE_COMPANIES: &[FieldMapping] = fields![
    "record_id" => [col!("id")],
    "company_name" => [col!("name")],
    "domain" => [col!("website"), col!("domain")],
    "industry" => [col!("industry")],
    "employee_count" => [col!("people_count"), col!("employee_count")],
    "annual_revenue" => [col!("annual_revenue")],
    "country" => [col!("address_country")],
    "city" => [col!("address_locality")],
    "owner_id" => [col!("owner_id"), col!("owner_id.id")],
    "created_date" => [col!("add_time")],
    "updated_date" => [col!("update_time")],
];

static PIPEDRIVE_DEALS: &[FieldMapping] = fields![
    "record_id" => [col!("id")],
    "deal_name" => [col!("title")],
    "amount" => [col!("value"), col!("weighted_value")],
    "currency" => [col!("currency")],
    "stage" => [col!("stage_name"), col!("stage_id")],
    "status" => [col!("status")],
    "pipeline" => [col!("pipeline_name"), col!("pipeline_id")],
    "owner_id" => [col!("user_id"), col!("user_id.id"), col!("owner_id")],
    "company_id" => [col!("org_id"), col!("org_id.value")],
    "probability" => [col!("probability")],
    "close_date" => [col!("close_time"), col!("won_time"), col!("expected_close_date")],
    "created_date" => [col!("add_time")],
    "updated_date" => [col!("update_time")],
];

pub(super) fn fields(
    platform: Platform,
    resource: ResourceType,
) -> Option<&'static [FieldMapping]> {
    match (platform, resource) {
        (Platform::Salesforce, ResourceType::Contacts) => Some(SALESFORCE_CONTACTS),
        (Platform::Salesforce, ResourceType::Companies) => Some(SALESFORCE_COMPANIES),
        (Platform::Salesforce, ResourceType::Deals) => Some(SALESFORCE_DEALS),
        (Platform::Hubspot, ResourceType::Contacts) => Some(HUBSPOT_CONTACTS),
        (Platform::Hubspot, ResourceType::Companies) => Some(HUBSPOT_COMPANIES),
        (Platform::Hubspot, ResourceType::Deals) => Some(HUBSPOT_DEALS),
        (Platform::Pipedrive, ResourceType::Contacts) => Some(PIPEDRIVE_CONTACTS),
        (Platform::Pipedrive, ResourceType::Companies) => Some(PIPEDRIVE_COMPANIES),
        (Platform::Pipedrive, ResourceType::Deals) => Some(PIPEDRIVE_DEALS),
        _ => None,
    }
}
