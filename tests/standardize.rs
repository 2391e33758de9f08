mod common;

use chrono::NaiveDate;
use common::{assert_close, csv_table, json_table, standardize, standardize_with};
use schema_standardizer::{
    ConfigError, SourceTable, Standardizer, StandardizerConfig,
    data::Value,
    metadata::CollectingSink,
    platform::{Platform, ResourceType},
    provider::InMemoryProvider,
};

fn float(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).expect("numeric value")
}

fn text(value: Option<&Value>) -> String {
    value.map(Value::as_display).unwrap_or_default()
}

#[test]
fn google_ads_row_converts_micros_and_computes_ratios() {
    let source = json_table(
        r#"[{"campaign_id": "123", "cost_micros": 2000000, "clicks": 10, "impressions": 200}]"#,
    );
    let output = standardize(Platform::GoogleAds, ResourceType::Campaigns, &source);
    let frame = &output.frame;
    assert_eq!(frame.len(), 1);
    assert_eq!(text(frame.value(0, "platform")), "google_ads");
    assert_eq!(text(frame.value(0, "campaign_id")), "123");
    assert_eq!(float(frame.value(0, "spend")), 2.0);
    assert_eq!(frame.value(0, "clicks"), Some(&Value::Integer(10)));
    assert_eq!(frame.value(0, "impressions"), Some(&Value::Integer(200)));
    assert_eq!(float(frame.value(0, "ctr")), 5.0);
    assert_eq!(float(frame.value(0, "cpc")), 0.2);
    // No conversions: defaulted to zero and the ratio falls back to zero.
    assert_eq!(frame.value(0, "conversions"), Some(&Value::Integer(0)));
    assert_eq!(float(frame.value(0, "cpa")), 0.0);
    assert_eq!(output.metadata.resolved_fields["spend"], "cost_micros");
    assert!(output.metadata.defaulted_fields.contains(&"keyword".to_string()));
}

#[test]
fn zendesk_resolution_time_is_reported_in_hours() {
    let source = json_table(
        r#"[{"id": 42, "status": "solved", "created_at": "2024-01-01T00:00:00", "solved_at": "2024-01-01T05:30:00"}]"#,
    );
    let output = standardize(Platform::Zendesk, ResourceType::Tickets, &source);
    let frame = &output.frame;
    assert_eq!(text(frame.value(0, "ticket_id")), "42");
    assert_eq!(float(frame.value(0, "resolution_time_hours")), 5.5);
    assert_eq!(frame.value(0, "first_response_time_hours"), None);
}

#[test]
fn ratios_divide_before_applying_the_multiplier() {
    let source = json_table(r#"[{"campaign_id": "c1", "clicks": 1, "impressions": 3, "cost": 1.0}]"#);
    let output = standardize(Platform::GoogleAds, ResourceType::Campaigns, &source);
    assert_eq!(float(output.frame.value(0, "ctr")), 1.0 / 3.0 * 100.0);
    assert_eq!(float(output.frame.value(0, "cpc")), 1.0);
}

#[test]
fn shopify_orders_compute_item_value_and_discount_rate() {
    let source = json_table(
        r#"[
            {"id": 1001, "financial_status": "paid", "subtotal_price": "80.00", "total_discounts": "20.00",
             "total_price": "90.00", "line_items_count": 3, "created_at": "2024-04-01T10:00:00Z"},
            {"id": 1002, "financial_status": "pending", "subtotal_price": "0", "total_discounts": "5.00",
             "total_price": "12.00", "line_items_count": 0, "created_at": "2024-04-02T10:00:00Z"}
        ]"#,
    );
    let output = standardize(Platform::Shopify, ResourceType::Orders, &source);
    let frame = &output.frame;
    assert_eq!(text(frame.value(0, "order_id")), "1001");
    assert_eq!(float(frame.value(0, "average_item_value")), 30.0);
    assert_eq!(float(frame.value(0, "discount_rate")), 25.0);
    assert_eq!(float(frame.value(1, "average_item_value")), 0.0);
    assert_eq!(float(frame.value(1, "discount_rate")), 0.0);
}

#[test]
fn shopify_customers_compute_average_order_value() {
    let source = json_table(
        r#"[
            {"id": 7, "email": "a@example.com", "orders_count": 4, "total_spent": "250.00"},
            {"id": 8, "email": "b@example.com", "orders_count": 0, "total_spent": "0.00"},
            {"id": 9, "email": "c@example.com"}
        ]"#,
    );
    let output = standardize(Platform::Shopify, ResourceType::Customers, &source);
    let frame = &output.frame;
    assert_eq!(float(frame.value(0, "average_order_value")), 62.5);
    assert_eq!(float(frame.value(1, "average_order_value")), 0.0);
    assert_eq!(frame.value(2, "orders_count"), Some(&Value::Integer(0)));
    assert_eq!(float(frame.value(2, "average_order_value")), 0.0);
}

#[test]
fn salesforce_deals_count_days_to_close() {
    let source = json_table(
        r#"[
            {"Id": "006A", "Name": "Expansion", "Amount": 5000, "StageName": "Closed Won",
             "CreatedDate": "2024-01-01T09:30:00Z", "CloseDate": "2024-01-31"},
            {"Id": "006B", "Name": "Pilot", "Amount": 800, "StageName": "Prospecting",
             "CreatedDate": "2024-01-05T12:00:00Z"}
        ]"#,
    );
    let output = standardize(Platform::Salesforce, ResourceType::Deals, &source);
    let frame = &output.frame;
    assert_eq!(text(frame.value(0, "record_id")), "006A");
    assert_eq!(float(frame.value(0, "amount")), 5000.0);
    assert_eq!(float(frame.value(0, "days_to_close")), 30.0);
    assert_eq!(frame.value(1, "close_date"), None);
    assert_eq!(frame.value(1, "days_to_close"), None);
}

#[test]
fn hubspot_deals_take_the_date_part_of_close_timestamps() {
    let source = json_table(
        r#"[{"hs_object_id": "9", "dealname": "Renewal", "amount": "1200", "dealstage": "closedwon",
             "createdate": "2024-02-01T08:00:00Z", "closedate": "2024-02-15T17:00:00Z"}]"#,
    );
    let output = standardize(Platform::Hubspot, ResourceType::Deals, &source);
    let frame = &output.frame;
    assert_eq!(
        frame.value(0, "close_date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 2, 15).expect("valid date")))
    );
    assert_eq!(float(frame.value(0, "days_to_close")), 14.0);
}

#[test]
fn aggregation_sums_spend_within_a_group_and_recomputes_ratios() {
    let source = csv_table(
        "segments_date,campaign_id,campaign_name,cost,clicks,impressions\n\
         2024-03-01,c1,Spring,10.0,5,100\n\
         2024-03-01,c1,Spring (copy),15.0,20,400\n\
         2024-03-02,c1,Spring,1.0,1,10\n",
    );
    let mut config = StandardizerConfig::new(Platform::GoogleAds, ResourceType::Campaigns);
    config.aggregate.enabled = true;
    let output = standardize_with(config, &source);
    let frame = &output.frame;
    assert_eq!(frame.len(), 2);
    assert_eq!(float(frame.value(0, "spend")), 25.0);
    assert_eq!(frame.value(0, "clicks"), Some(&Value::Integer(25)));
    assert_close(float(frame.value(0, "ctr")), 5.0);
    assert_close(float(frame.value(0, "cpc")), 1.0);
    assert_eq!(text(frame.value(0, "campaign_name")), "Spring");
    assert_eq!(output.metadata.rows_before, 3);
    assert_eq!(output.metadata.rows_aggregated_into, Some(2));
}

#[test]
fn group_keys_that_are_entirely_null_are_dropped() {
    let source = csv_table("campaign_id,cost\nc1,1\nc1,2\nc2,4\n");
    let mut config = StandardizerConfig::new(Platform::GoogleAds, ResourceType::Campaigns);
    config.aggregate.enabled = true;
    config.aggregate.group_by = vec!["date".into(), "campaign_id".into()];
    let output = standardize_with(config, &source);
    assert_eq!(output.frame.len(), 2);
    assert_close(float(output.frame.value(0, "spend")), 3.0);
    assert_close(float(output.frame.value(1, "spend")), 4.0);
}

#[test]
fn empty_source_yields_every_canonical_column() {
    let output = standardize(Platform::Freshdesk, ResourceType::Tickets, &SourceTable::default());
    assert!(output.frame.is_empty());
    let headers = output.frame.headers();
    assert_eq!(headers.first().map(String::as_str), Some("platform"));
    assert!(headers.iter().any(|h| h == "resolution_time_hours"));
    let csv = output.frame.to_csv_string(b',').unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert_eq!(output.metadata.rows_after, 0);
}

#[test]
fn identical_input_produces_identical_output() {
    let raw = "campaign_id,cost_micros,clicks,impressions\nc1,1500000,3,90\nc2,,0,0\n";
    let first = standardize(Platform::GoogleAds, ResourceType::Campaigns, &csv_table(raw));
    let second = standardize(Platform::GoogleAds, ResourceType::Campaigns, &csv_table(raw));
    assert_eq!(first.frame, second.frame);
    assert_eq!(first.metadata.content_hash, second.metadata.content_hash);
    assert_eq!(
        first.frame.to_csv_string(b',').unwrap(),
        second.frame.to_csv_string(b',').unwrap()
    );
}

#[test]
fn earlier_candidates_win_and_overrides_win_over_both() {
    let source = csv_table("campaign_id,campaign.id,legacy\nprimary,alias,custom\n");
    let output = standardize(Platform::GoogleAds, ResourceType::Campaigns, &source);
    assert_eq!(text(output.frame.value(0, "campaign_id")), "primary");

    let mut config = StandardizerConfig::new(Platform::GoogleAds, ResourceType::Campaigns);
    config
        .field_overrides
        .insert("campaign_id".into(), "legacy".into());
    let output = standardize_with(config, &source);
    assert_eq!(text(output.frame.value(0, "campaign_id")), "custom");
    assert_eq!(output.metadata.resolved_fields["campaign_id"], "legacy");
}

#[test]
fn overrides_naming_missing_columns_fall_back_to_candidates() {
    let source = csv_table("campaign_id\nprimary\n");
    let mut config = StandardizerConfig::new(Platform::GoogleAds, ResourceType::Campaigns);
    config
        .field_overrides
        .insert("campaign_id".into(), "not_there".into());
    let output = standardize_with(config, &source);
    assert_eq!(text(output.frame.value(0, "campaign_id")), "primary");
}

#[test]
fn filters_run_after_derivation_and_combine_with_and() {
    let source = json_table(
        r#"[
            {"id": 1, "status": "open", "assignee_id": 7, "created_at": "2024-02-01T09:00:00", "solved_at": "2024-02-01T10:00:00"},
            {"id": 2, "status": "Pending", "assignee_id": 7, "created_at": "2024-02-03T09:00:00", "solved_at": "2024-02-03T21:00:00"},
            {"id": 3, "status": "solved", "assignee_id": 7, "created_at": "2024-02-02T09:00:00"},
            {"id": 4, "status": "open", "assignee_id": 8, "created_at": "2024-02-02T09:00:00"},
            {"id": 5, "status": "open", "assignee_id": 7, "created_at": "2024-03-01T09:00:00"}
        ]"#,
    );
    let mut config = StandardizerConfig::new(Platform::Zendesk, ResourceType::Tickets);
    config.filters.status = vec!["open".into(), "pending".into()];
    config.filters.owner = Some("7".into());
    config.filters.start_date = Some("2024-02-01".into());
    config.filters.end_date = Some("2024-02-29".into());
    let output = standardize_with(config.clone(), &source);
    let ids = (0..output.frame.len())
        .map(|row| text(output.frame.value(row, "ticket_id")))
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(output.metadata.rows_filtered, 3);

    config.filters.conditions = vec!["resolution_time_hours > 2".into()];
    let output = standardize_with(config, &source);
    assert_eq!(output.frame.len(), 1);
    assert_eq!(text(output.frame.value(0, "ticket_id")), "2");
}

#[test]
fn filters_that_match_nothing_leave_an_empty_frame() {
    let source = csv_table("campaign_id,cost\nc1,5\n");
    let mut config = StandardizerConfig::new(Platform::GoogleAds, ResourceType::Campaigns);
    config.filters.conditions = vec!["spend > 100".into()];
    let output = standardize_with(config, &source);
    assert!(output.frame.is_empty());
    assert!(!output.frame.headers().is_empty());
}

#[test]
fn expressions_extend_the_row_and_survive_aggregation() {
    let source = csv_table(
        "campaign_id,cost,conversions_value\nc1,10,30\nc1,5,0\n",
    );
    let mut config = StandardizerConfig::new(Platform::GoogleAds, ResourceType::Campaigns);
    config.derive = vec!["profit=conversion_value - spend".into()];
    config.aggregate.enabled = true;
    config.aggregate.group_by = vec!["campaign_id".into()];
    let output = standardize_with(config, &source);
    assert_eq!(output.frame.len(), 1);
    assert_close(float(output.frame.value(0, "profit")), 15.0);
    assert_close(float(output.frame.value(0, "roas")), 2.0);
    assert!(output.metadata.derived_fields.contains(&"profit".to_string()));
}

#[test]
fn hubspot_full_name_is_synthesized_from_parts() {
    let source = csv_table("hs_object_id,firstname,lastname\n1, Ada ,Lovelace\n2,,Hopper\n3,,\n");
    let output = standardize(Platform::Hubspot, ResourceType::Contacts, &source);
    let frame = &output.frame;
    assert_eq!(text(frame.value(0, "full_name")), "Ada Lovelace");
    assert_eq!(text(frame.value(1, "full_name")), "Hopper");
    assert_eq!(frame.value(2, "full_name"), None);
}

#[test]
fn freshdesk_codes_become_labels() {
    let source = json_table(
        r#"{"results": [{"id": 9, "status": 4, "priority": 3, "created_at": "2024-01-01T00:00:00Z", "stats": {"resolved_at": "2024-01-02T00:00:00Z"}}]}"#,
    );
    let output = standardize(Platform::Freshdesk, ResourceType::Tickets, &source);
    let frame = &output.frame;
    assert_eq!(text(frame.value(0, "status")), "resolved");
    assert_eq!(text(frame.value(0, "priority")), "high");
    assert_close(float(frame.value(0, "resolution_time_hours")), 24.0);
}

#[test]
fn mixpanel_epoch_seconds_become_timestamps() {
    let source = json_table(r#"[{"event": "signup", "distinct_id": "u1", "time": 1704067200}]"#);
    let output = standardize(Platform::Mixpanel, ResourceType::Events, &source);
    assert_eq!(
        output.frame.value(0, "event_date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
    );
    assert_eq!(text(output.frame.value(0, "timestamp")), "2024-01-01 00:00:00");
}

#[test]
fn unparseable_cells_become_null_without_failing() {
    let source = csv_table("id,total_price,line_items_count,created_at\n1,n/a,two,yesterday\n");
    let output = standardize(Platform::Shopify, ResourceType::Orders, &source);
    let frame = &output.frame;
    // Money and count columns fall back to zero; the datetime stays null.
    assert_close(float(frame.value(0, "total")), 0.0);
    assert_eq!(frame.value(0, "item_count"), Some(&Value::Integer(0)));
    assert_eq!(frame.value(0, "created_date"), None);
    assert_close(float(frame.value(0, "average_item_value")), 0.0);
}

#[test]
fn run_records_metadata_and_rejects_missing_upstream() {
    let mut config = StandardizerConfig::new(Platform::Zendesk, ResourceType::Tickets);
    config.upstream = Some("zendesk_raw".into());
    config.group_name = Some("support".into());
    let standardizer = Standardizer::new(&config).unwrap();

    let provider = InMemoryProvider::new()
        .with_table("zendesk_raw", json_table(r#"[{"id": 1, "status": "open"}]"#));
    let mut sink = CollectingSink::default();
    let frame = standardizer.run(&provider, &mut sink).unwrap();
    assert_eq!(frame.len(), 1);
    assert_eq!(sink.records.len(), 1);
    assert_eq!(sink.records[0].0, "zendesk_tickets");
    assert_eq!(sink.records[0].1.group_name.as_deref(), Some("support"));

    let err = standardizer
        .run(&InMemoryProvider::new(), &mut sink)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingUpstream { .. })
    ));
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let mut config = StandardizerConfig::new(Platform::Shopify, ResourceType::Tickets);
    assert!(matches!(
        Standardizer::new(&config),
        Err(ConfigError::UnsupportedCombination { .. })
    ));

    config.resource = Some(ResourceType::Orders);
    config.derive = vec!["x=missing_field * 2".into()];
    assert!(matches!(
        Standardizer::new(&config),
        Err(ConfigError::InvalidDerive { .. })
    ));

    config.derive = vec!["total=subtotal".into()];
    assert!(matches!(
        Standardizer::new(&config),
        Err(ConfigError::DuplicateColumn { .. })
    ));

    config.derive.clear();
    config.filters.owner = Some("someone".into());
    assert!(matches!(
        Standardizer::new(&config),
        Err(ConfigError::UnknownFilterField { .. })
    ));
}

#[test]
fn normalized_headers_are_matched_against_candidates() {
    let source = csv_table("Campaign ID,Cost Micros,Clicks\nc9,3000000,3\n");
    let mut config = StandardizerConfig::new(Platform::GoogleAds, ResourceType::Campaigns);
    config.normalize_headers = true;
    let output = standardize_with(config, &source);
    assert_eq!(text(output.frame.value(0, "campaign_id")), "c9");
    assert_close(float(output.frame.value(0, "spend")), 3.0);
    assert_close(float(output.frame.value(0, "cpc")), 1.0);
}
