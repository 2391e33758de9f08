use super::{FieldMapping, ValueTransform::EpochSeconds};
use crate::platform::{Platform, ResourceType};

static SEGMENT: &[FieldMapping] = fields![
    "event_id" => [col!("message_id"), col!("messageId"), col!("id")],
    "event_name" => [col!("event"), col!("event_text"), col!("name")],
    "user_id" => [col!("user_id"), col!("userId")],
    "anonymous_id" => [col!("anonymous_id"), col!("anonymousId")],
    "session_id" => [col!("context_session_id"), col!("context.sessionId")],
    "timestamp" => [
        col!("timestamp"),
        col!("original_timestamp"),
        col!("originalTimestamp"),
        col!("sent_at"),
        col!("received_at"),
    ],
    "device_type" => [col!("context_device_type"), col!("context.device.type")],
    "country" => [col!("context_location_country"), col!("context.location.country")],
    "city" => [col!("context_location_city"), col!("context.location.city")],
    "page_url" => [col!("context_page_url"), col!("context.page.url")],
    "referrer" => [col!("context_page_referrer"), col!("context.page.referrer")],
    "revenue" => [col!("revenue"), col!("properties_revenue"), col!("properties.revenue")],
    "properties" => [col!("properties")],
];

static AMPLITUDE: &[FieldMapping] = fields![
    "event_id" => [col!("uuid"), col!("$insert_id"), col!("event_id")],
    "event_name" => [col!("event_type")],
    "user_id" => [col!("user_id")],
    "anonymous_id" => [col!("device_id"), col!("amplitude_id")],
    "session_id" => [col!("session_id")],
    "timestamp" => [col!("event_time"), col!("client_event_time"), col!("server_upload_time")],
    "device_type" => [col!("device_type"), col!("device_family"), col!("platform")],
    "country" => [col!("country")],
    "city" => [col!("city")],
    "page_url" => [col!("event_properties.page_url"), col!("page_url")],
    "referrer" => [col!("event_properties.referrer"), col!("referrer")],
    "revenue" => [col!("revenue"), col!("price")],
    "properties" => [col!("event_properties")],
];

static MIXPANEL: &[FieldMapping] = fields![
    "event_id" => [col!("$insert_id"), col!("insert_id"), col!("properties.$insert_id")],
    "event_name" => [col!("event"), col!("event_name")],
    "user_id" => [col!("$user_id"), col!("distinct_id"), col!("properties.distinct_id")],
    "anonymous_id" => [col!("$device_id"), col!("properties.$device_id")],
    "session_id" => [col!("$session_id"), col!("session_id")],
    "timestamp" => [
        col!("time", EpochSeconds),
        col!("properties.time", EpochSeconds),
        col!("timestamp"),
    ],
    "device_type" => [col!("$device"), col!("$os"), col!("properties.$os")],
    "country" => [col!("mp_country_code"), col!("properties.mp_country_code")],
    "city" => [col!("$city"), col!("properties.$city")],
    "page_url" => [col!("$current_url"), col!("properties.$current_url")],
    "referrer" => [col!("$referrer"), col!("properties.$referrer")],
    "revenue" => [col!("revenue"), col!("properties.revenue")],
    "properties" => [col!("properties")],
];

pub(super) fn fields(
    platform: Platform,
    resource: ResourceType,
) -> Option<&'static [FieldMapping]> {
    match (platform, resource) {
        (Platform::Segment, ResourceType::Events) => Some(SEGMENT),
        (Platform::Amplitude, ResourceType::Events) => Some(AMPLITUDE),
        (Platform::Mixpanel, ResourceType::Events) => Some(MIXPANEL),
        _ => None,
    }
}
