//! In-memory mock data backing the dashboard panels.
//!
//! These are the collections the risk list, risk register, events
//! timeline and overview alerts render. They are source data: views only
//! ever derive filtered copies.

use crate::record::Record;

struct RiskRow {
    id:         &'static str,
    title:      &'static str,
    category:   &'static str,
    severity:   &'static str,
    status:     &'static str,
    identified: &'static str,
    updated:    &'static str,
    owner:      &'static str,
    details:    &'static str,
    mitigation: &'static str,
    priority:   i64,
}

const RISKS: &[RiskRow] = &[
    RiskRow {
        id: "risk-001",
        title: "Data Security Breach",
        category: "Security",
        severity: "High",
        status: "Active",
        identified: "2024-01-15",
        updated: "2024-02-01",
        owner: "Security Team",
        details: "Potential unauthorized access detected in payment processing system",
        mitigation: "Implementing enhanced encryption and access controls",
        priority: 1,
    },
    RiskRow {
        id: "risk-002",
        title: "Payment Processing Downtime",
        category: "Technical",
        severity: "High",
        status: "Monitoring",
        identified: "2024-01-20",
        updated: "2024-02-03",
        owner: "Technical Operations",
        details: "Intermittent payment processing failures during peak hours",
        mitigation: "Redundant payment gateway implementation in progress",
        priority: 2,
    },
    RiskRow {
        id: "risk-003",
        title: "Chargeback Rate Increase",
        category: "Financial",
        severity: "Medium",
        status: "Active",
        identified: "2024-01-22",
        updated: "2024-01-30",
        owner: "Risk Operations",
        details: "Chargebacks on digital goods transactions trending above network limits",
        mitigation: "Tighten refund policy and add 3-D Secure on high-value orders",
        priority: 3,
    },
    RiskRow {
        id: "risk-004",
        title: "Velocity Rule Gaps",
        category: "Operational",
        severity: "Medium",
        status: "Monitoring",
        identified: "2024-01-25",
        updated: "2024-02-02",
        owner: "Fraud Strategy",
        details: "Multiple transactions in short period not caught by current thresholds",
        mitigation: "Review and adjust velocity rules",
        priority: 4,
    },
    RiskRow {
        id: "risk-005",
        title: "High-Risk Geography Exposure",
        category: "Compliance",
        severity: "Low",
        status: "Resolved",
        identified: "2023-12-05",
        updated: "2024-01-10",
        owner: "Compliance Team",
        details: "Increased activity from restricted countries",
        mitigation: "Geo-blocking rules deployed for sanctioned regions",
        priority: 5,
    },
];

/// Risk register entries.
pub fn risks() -> Vec<Record> {
    RISKS
        .iter()
        .map(|r| {
            Record::new(r.id)
                .with("title", r.title)
                .with("category", r.category)
                .with("severity", r.severity)
                .with("status", r.status)
                .with_date("dateIdentified", r.identified)
                .with_date("lastUpdated", r.updated)
                .with("owner", r.owner)
                .with("details", r.details)
                .with("mitigation", r.mitigation)
                .with("priority", r.priority)
        })
        .collect()
}

/// Timeline events, including those attached to the default risk detail view.
pub fn timeline_events() -> Vec<Record> {
    let rows: [(&str, &str, &str, &str, &str); 5] = [
        ("evt-001", "2024-01-20", "10:00 AM", "Large transaction flagged", "Transaction Alert"),
        ("evt-002", "2024-01-20", "11:30 AM", "Multiple failed login attempts", "Security Alert"),
        ("evt-003", "2024-01-20", "01:00 PM", "Unusual location detected", "Security Alert"),
        ("evt-004", "2023-10-14", "09:15 AM", "Unusual access patterns detected from unknown IP addresses", "Security Alert"),
        ("evt-005", "2023-10-15", "04:40 PM", "Multiple failed login attempts from various locations", "Security Breach"),
    ];
    rows.into_iter()
        .map(|(id, date, time, event, kind)| {
            Record::new(id)
                .with_date("date", date)
                .with("time", time)
                .with("event", event)
                .with("type", kind)
        })
        .collect()
}

/// Recent alerts shown on the overview card.
pub fn recent_alerts() -> Vec<Record> {
    vec![
        Record::new("alert-001")
            .with("type", "Critical")
            .with("message", "Unusual spike in transaction volume detected")
            .with("timestamp", "2024-01-20T14:23:00Z")
            .with("affectedTransactions", 156i64)
            .with("potentialLoss", 23_456i64)
            .with("recommendedAction", "Review and adjust velocity rules"),
        Record::new("alert-002")
            .with("type", "Warning")
            .with("message", "Multiple failed authentication attempts")
            .with("timestamp", "2024-01-20T13:15:00Z")
            .with("affectedTransactions", 89i64)
            .with("potentialLoss", 12_345i64)
            .with("recommendedAction", "Enable additional authentication measures"),
    ]
}
