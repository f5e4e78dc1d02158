/// Assignment notifications
///
/// When a reconciliation adds employees to a competence, each affected
/// person gets one email. Planning is pure and separate from delivery:
/// [`assignment_notifications`] turns the added employees into a
/// deduplicated notification list, and [`dispatch`] hands the list to a
/// [`Mailer`] off the request path. Delivery is best-effort; failures
/// are logged and never surface to the API caller.

pub mod mailer;

pub use mailer::{LogMailer, MailError, Mailer, MemoryMailer, SmtpMailer};

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::employee::Employee;

/// One pending assignment email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient address, lowercased
    pub to: String,

    /// Recipient display name
    pub recipient_name: String,

    /// Title of the competence the recipient was assigned
    pub competence_title: String,
}

impl Notification {
    /// Subject line of the email
    pub fn subject(&self) -> String {
        format!("New assignment: {}", self.competence_title)
    }

    /// Plain-text body of the email
    pub fn body(&self) -> String {
        format!(
            "Hello {},\n\nYou have been assigned the competence \"{}\". \
             Log in to SkillTrack to review it and track your progress.\n",
            self.recipient_name, self.competence_title
        )
    }
}

/// Plans the notifications for a set of newly assigned employees
///
/// One notification per distinct email address, compared lowercased. An
/// employee added both individually and through a team expansion is
/// notified once; the first occurrence wins and input order is
/// preserved.
pub fn assignment_notifications(
    added: &[Employee],
    competence_title: &str,
) -> Vec<Notification> {
    let mut seen = HashSet::new();
    let mut notifications = Vec::new();

    for employee in added {
        let address = employee.email.to_lowercase();
        if seen.insert(address.clone()) {
            notifications.push(Notification {
                to: address,
                recipient_name: employee.full_name(),
                competence_title: competence_title.to_string(),
            });
        }
    }

    notifications
}

/// Sends notifications off the request path
///
/// Spawns one task for the whole batch; each failure is logged at
/// `warn` and the rest of the batch still goes out.
pub fn dispatch(mailer: Arc<dyn Mailer>, notifications: Vec<Notification>) {
    if notifications.is_empty() {
        return;
    }

    tokio::spawn(async move {
        for notification in notifications {
            if let Err(err) = mailer.send(&notification).await {
                tracing::warn!(
                    to = %notification.to,
                    error = %err,
                    "assignment notification failed"
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::Role;
    use chrono::Utc;
    use uuid::Uuid;

    fn employee(id: &str, first: &str, email: &str) -> Employee {
        Employee {
            id: id.to_string(),
            company_id: Uuid::new_v4(),
            firstname: first.to_string(),
            lastname: "Doe".to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role: Role::Employee,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn one_notification_per_distinct_address() {
        let added = vec![
            employee("e1", "Ada", "ada@example.com"),
            employee("e2", "Grace", "grace@example.com"),
            employee("e3", "Ada Again", "ADA@Example.com"),
        ];

        let notifications = assignment_notifications(&added, "Rust onboarding");

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].to, "ada@example.com");
        assert_eq!(notifications[0].recipient_name, "Ada Doe");
        assert_eq!(notifications[1].to, "grace@example.com");
    }

    #[test]
    fn first_occurrence_wins_and_order_is_preserved() {
        let added = vec![
            employee("e2", "Grace", "grace@example.com"),
            employee("e1", "Ada", "ada@example.com"),
            employee("e2", "Grace Again", "grace@example.com"),
        ];

        let notifications = assignment_notifications(&added, "SQL basics");

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].recipient_name, "Grace Doe");
        assert_eq!(notifications[1].recipient_name, "Ada Doe");
    }

    #[test]
    fn empty_input_plans_nothing() {
        assert!(assignment_notifications(&[], "anything").is_empty());
    }

    #[test]
    fn subject_and_body_carry_the_competence() {
        let notification = Notification {
            to: "ada@example.com".to_string(),
            recipient_name: "Ada Doe".to_string(),
            competence_title: "Rust onboarding".to_string(),
        };

        assert_eq!(notification.subject(), "New assignment: Rust onboarding");
        assert!(notification.body().contains("Ada Doe"));
        assert!(notification.body().contains("Rust onboarding"));
    }

    #[tokio::test]
    async fn dispatch_delivers_through_the_mailer() {
        let mailer = Arc::new(MemoryMailer::new());
        let notifications = assignment_notifications(
            &[employee("e1", "Ada", "ada@example.com")],
            "Rust onboarding",
        );

        dispatch(mailer.clone(), notifications);

        // The batch runs on a spawned task; poll until it lands.
        for _ in 0..50 {
            if !mailer.sent().await.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
    }
}
