use super::{
    FieldMapping,
    ValueTransform::{EpochSeconds, Lookup},
};
use crate::platform::{Platform, ResourceType};

const FRESHDESK_STATUS: &[(&str, &str)] = &[
    ("2", "open"),
    ("3", "pending"),
    ("4", "resolved"),
    ("5", "closed"),
];

const FRESHDESK_PRIORITY: &[(&str, &str)] = &[
    ("1", "low"),
    ("2", "medium"),
    ("3", "high"),
    ("4", "urgent"),
];

const FRESHDESK_SOURCE: &[(&str, &str)] = &[
    ("1", "email"),
    ("2", "portal"),
    ("3", "phone"),
    ("7", "chat"),
    ("9", "feedback_widget"),
    ("10", "outbound_email"),
];

static ZENDESK: &[FieldMapping] = fields![
    "ticket_id" => [col!("id"), col!("ticket_id")],
    "subject" => [col!("subject"), col!("raw_subject")],
    "description" => [col!("description")],
    "status" => [col!("status")],
    "priority" => [col!("priority")],
    "channel" => [col!("via_channel"), col!("via.channel"), col!("channel")],
    "requester_id" => [col!("requester_id")],
    "assignee_id" => [col!("assignee_id")],
    "tags" => [col!("tags")],
    "created_date" => [col!("created_at")],
    "updated_date" => [col!("updated_at")],
    "first_response_date" => [
        col!("metric_set.first_reply_time_at"),
        col!("first_reply_at"),
        col!("first_response_at"),
    ],
    "closed_date" => [col!("solved_at"), col!("closed_at"), col!("metric_set.solved_at")],
];

static FRESHDESK: &[FieldMapping] = fields![
    "ticket_id" => [col!("id")],
    "subject" => [col!("subject")],
    "description" => [col!("description_text"), col!("description")],
    "status" => [col!("status", Lookup(FRESHDESK_STATUS))],
    "priority" => [col!("priority", Lookup(FRESHDESK_PRIORITY))],
    "channel" => [col!("source", Lookup(FRESHDESK_SOURCE))],
    "requester_id" => [col!("requester_id")],
    "assignee_id" => [col!("responder_id"), col!("agent_id")],
    "tags" => [col!("tags")],
    "created_date" => [col!("created_at")],
    "updated_date" => [col!("updated_at")],
    "first_response_date" => [col!("stats.first_responded_at"), col!("stats_first_responded_at")],
    "closed_date" => [
        col!("stats.resolved_at"),
        col!("stats_resolved_at"),
        col!("stats.closed_at"),
        col!("stats_closed_at"),
    ],
];

static INTERCOM: &[FieldMapping] = fields![
    "ticket_id" => [col!("id"), col!("conversation_id")],
    "subject" => [col!("title"), col!("source.subject"), col!("subject")],
    "description" => [col!("source.body"), col!("body")],
    "status" => [col!("state"), col!("status")],
    "priority" => [col!("priority")],
    "channel" => [col!("source.delivered_as"), col!("source.type"), col!("channel")],
    "requester_id" => [col!("source.author.id"), col!("contacts.id"), col!("user_id")],
    "assignee_id" => [col!("admin_assignee_id"), col!("assignee.id")],
    "tags" => [col!("tags.name"), col!("tags")],
    "created_date" => [col!("created_at", EpochSeconds)],
    "updated_date" => [col!("updated_at", EpochSeconds)],
    "first_response_date" => [
        col!("statistics.first_admin_reply_at", EpochSeconds),
        col!("statistics_first_admin_reply_at", EpochSeconds),
    ],
    "closed_date" => [
        col!("statistics.last_close_at", EpochSeconds),
        col!("statistics_last_close_at", EpochSeconds),
    ],
];

pub(super) fn fields(
    platform: Platform,
    resource: ResourceType,
) -> Option<&'static [FieldMapping]> {
    match (platform, resource) {
        (Platform::Zendesk, ResourceType::Tickets) => Some(ZENDESK),
        (Platform::Freshdesk, ResourceType::Tickets) => Some(FRESHDESK),
        (Platform::Intercom, ResourceType::Tickets) => Some(INTERCOM),
        _ => None,
    }
}
