use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub change: String,
    pub trend_up: bool,
    pub icon: String,     // 'emails', 'attachments', 'threads' or 'storage'
    pub gradient: String, // accent tag, mapped to a color in format
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: String, // 'email', 'attachment', 'thread' or 'oauth'
    pub content: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    pub name: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSummary {
    pub id: u32,
    pub subject: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub timestamp: String,
    pub has_attachments: bool,
    pub thread_count: u32,
    pub preview: String,
    pub status: String,   // 'read' or 'unread'
    pub priority: String, // 'high', 'medium' or 'low'
}

impl EmailSummary {
    pub fn is_unread(&self) -> bool {
        self.status == "unread"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u32,
    pub name: String,
    pub kind: String, // 'pdf', 'spreadsheet', 'image', 'archive', ...
    pub size: String,
    pub drive_link: String,
    pub download_link: String,
    pub email_subject: String,
    pub upload_date: String,
    pub download_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStat {
    pub value: String,
    pub label: String,
    pub accent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthService {
    pub id: String,
    pub name: String,
    pub status: String, // 'connected', 'warning' or 'error'
    pub last_refresh: String,
    pub expires_in: String,
    pub scopes: Vec<String>,
    pub token_health: String,
}

/// Stat cards for the dashboard overview. All dashboard data is synthetic;
/// the shell has no backend to query yet.
pub fn mock_stats() -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Total Emails Archived".into(),
            value: "12,847".into(),
            change: "+24%".into(),
            trend_up: true,
            icon: "emails".into(),
            gradient: "blue-cyan".into(),
        },
        StatCard {
            title: "Attachments Stored".into(),
            value: "3,421".into(),
            change: "+18%".into(),
            trend_up: true,
            icon: "attachments".into(),
            gradient: "purple-pink".into(),
        },
        StatCard {
            title: "Active Threads".into(),
            value: "1,856".into(),
            change: "+12%".into(),
            trend_up: true,
            icon: "threads".into(),
            gradient: "green-emerald".into(),
        },
        StatCard {
            title: "Storage Used".into(),
            value: "47.2 GB".into(),
            change: "+8%".into(),
            trend_up: true,
            icon: "storage".into(),
            gradient: "orange-red".into(),
        },
    ]
}

pub fn mock_activity() -> Vec<ActivityEntry> {
    vec![
        ActivityEntry {
            kind: "email".into(),
            content: "New email from supplier@acme.com archived".into(),
            time: "2 minutes ago".into(),
        },
        ActivityEntry {
            kind: "attachment".into(),
            content: "PDF attachment uploaded to Drive".into(),
            time: "5 minutes ago".into(),
        },
        ActivityEntry {
            kind: "thread".into(),
            content: "Email thread \"Project Proposal\" updated".into(),
            time: "12 minutes ago".into(),
        },
        ActivityEntry {
            kind: "oauth".into(),
            content: "OAuth token refreshed successfully".into(),
            time: "1 hour ago".into(),
        },
    ]
}

pub fn mock_system_status() -> Vec<SystemStatus> {
    vec![
        SystemStatus {
            name: "Gmail API".into(),
            detail: "Connected & Active".into(),
        },
        SystemStatus {
            name: "Google Drive".into(),
            detail: "Syncing Attachments".into(),
        },
        SystemStatus {
            name: "Database".into(),
            detail: "All Services Running".into(),
        },
    ]
}

pub fn mock_emails() -> Vec<EmailSummary> {
    vec![
        EmailSummary {
            id: 1,
            subject: "Project Proposal - Construction Bid".into(),
            sender: "john.contractor@buildtech.com".into(),
            recipients: vec!["bids@company.com".into(), "manager@company.com".into()],
            timestamp: "2024-01-15T10:30:00Z".into(),
            has_attachments: true,
            thread_count: 3,
            preview: "Dear Team, Please find attached our comprehensive proposal for the downtown construction project...".into(),
            status: "read".into(),
            priority: "high".into(),
        },
        EmailSummary {
            id: 2,
            subject: "Re: Equipment Rental Quote Request".into(),
            sender: "quotes@equipmentrental.com".into(),
            recipients: vec!["procurement@company.com".into()],
            timestamp: "2024-01-15T09:15:00Z".into(),
            has_attachments: true,
            thread_count: 5,
            preview: "Thank you for your inquiry regarding heavy machinery rental. We are pleased to provide our competitive rates...".into(),
            status: "unread".into(),
            priority: "medium".into(),
        },
        EmailSummary {
            id: 3,
            subject: "Supplier Certification Documents".into(),
            sender: "legal@supplierco.com".into(),
            recipients: vec!["compliance@company.com".into(), "legal@company.com".into()],
            timestamp: "2024-01-14T16:45:00Z".into(),
            has_attachments: true,
            thread_count: 1,
            preview: "Please find our updated certification documents and compliance reports as requested...".into(),
            status: "read".into(),
            priority: "low".into(),
        },
    ]
}

pub fn mock_attachments() -> Vec<Attachment> {
    vec![
        Attachment {
            id: 1,
            name: "Construction_Proposal_2024.pdf".into(),
            kind: "pdf".into(),
            size: "2.4 MB".into(),
            drive_link: "https://drive.google.com/file/d/example1".into(),
            download_link: "https://drive.google.com/uc?export=download&id=example1".into(),
            email_subject: "Project Proposal - Construction Bid".into(),
            upload_date: "2024-01-15T10:30:00Z".into(),
            download_count: 5,
        },
        Attachment {
            id: 2,
            name: "Equipment_Rental_Rates.xlsx".into(),
            kind: "spreadsheet".into(),
            size: "1.2 MB".into(),
            drive_link: "https://drive.google.com/file/d/example2".into(),
            download_link: "https://drive.google.com/uc?export=download&id=example2".into(),
            email_subject: "Equipment Rental Quote Request".into(),
            upload_date: "2024-01-15T09:15:00Z".into(),
            download_count: 3,
        },
        Attachment {
            id: 3,
            name: "Site_Photos_January.zip".into(),
            kind: "archive".into(),
            size: "15.7 MB".into(),
            drive_link: "https://drive.google.com/file/d/example3".into(),
            download_link: "https://drive.google.com/uc?export=download&id=example3".into(),
            email_subject: "Weekly Site Progress Report".into(),
            upload_date: "2024-01-14T16:45:00Z".into(),
            download_count: 8,
        },
        Attachment {
            id: 4,
            name: "Compliance_Certificate.jpg".into(),
            kind: "image".into(),
            size: "847 KB".into(),
            drive_link: "https://drive.google.com/file/d/example4".into(),
            download_link: "https://drive.google.com/uc?export=download&id=example4".into(),
            email_subject: "Supplier Certification Documents".into(),
            upload_date: "2024-01-14T14:20:00Z".into(),
            download_count: 2,
        },
    ]
}

/// Header stats for the attachment manager.
pub fn mock_attachment_summary() -> Vec<SummaryStat> {
    vec![
        SummaryStat {
            value: "3,421".into(),
            label: "Total Attachments".into(),
            accent: "blue-cyan".into(),
        },
        SummaryStat {
            value: "47.2 GB".into(),
            label: "Storage Used".into(),
            accent: "green-emerald".into(),
        },
        SummaryStat {
            value: "1,247".into(),
            label: "Downloads".into(),
            accent: "orange-red".into(),
        },
    ]
}

pub fn mock_oauth_services() -> Vec<OauthService> {
    vec![
        OauthService {
            id: "gmail".into(),
            name: "Gmail API".into(),
            status: "connected".into(),
            last_refresh: "2024-01-15T10:30:00Z".into(),
            expires_in: "1 hour 23 minutes".into(),
            scopes: vec![
                "https://www.googleapis.com/auth/gmail.readonly".into(),
                "https://www.googleapis.com/auth/gmail.metadata".into(),
            ],
            token_health: "healthy".into(),
        },
        OauthService {
            id: "drive".into(),
            name: "Google Drive API".into(),
            status: "connected".into(),
            last_refresh: "2024-01-15T10:30:00Z".into(),
            expires_in: "1 hour 23 minutes".into(),
            scopes: vec![
                "https://www.googleapis.com/auth/drive.file".into(),
                "https://www.googleapis.com/auth/drive.metadata".into(),
            ],
            token_health: "healthy".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unique_ids<I: Iterator<Item = u32>>(ids: I) {
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            assert!(seen.insert(id), "duplicate id {} in mock dataset", id);
        }
    }

    #[test]
    fn test_mock_ids_unique() {
        assert_unique_ids(mock_emails().iter().map(|e| e.id));
        assert_unique_ids(mock_attachments().iter().map(|a| a.id));

        let services = mock_oauth_services();
        let mut seen = std::collections::HashSet::new();
        for s in &services {
            assert!(seen.insert(s.id.clone()), "duplicate service id {}", s.id);
        }
    }

    #[test]
    fn test_attachment_links_present() {
        for a in mock_attachments() {
            assert!(a.drive_link.starts_with("https://"));
            assert!(a.download_link.starts_with("https://"));
        }
    }
}
