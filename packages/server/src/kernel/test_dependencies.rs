//! Recording mock implementations of the kernel traits.
//!
//! Used by unit tests that exercise side-effect dispatch without a network
//! or database. Each mock records its calls and can be switched to fail.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use crate::domains::audit::NewAuditLog;
use crate::kernel::{BaseAuditRecorder, BaseNotificationService};

/// Notification mock: records (contact, reference, status) tuples.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<(String, String, String)>>,
    pub otp_sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl BaseNotificationService for RecordingNotifier {
    async fn send_status_update(
        &self,
        contact: &str,
        reference: &str,
        status_label: &str,
    ) -> Result<()> {
        if self.fail {
            anyhow::bail!("notification channel down");
        }
        self.sent.lock().unwrap().push((
            contact.to_string(),
            reference.to_string(),
            status_label.to_string(),
        ));
        Ok(())
    }

    async fn send_otp_code(&self, contact: &str, code: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("notification channel down");
        }
        self.otp_sent
            .lock()
            .unwrap()
            .push((contact.to_string(), code.to_string()));
        Ok(())
    }
}

/// Audit mock: records appended entries.
#[derive(Default)]
pub struct RecordingAuditRecorder {
    pub fail: bool,
    pub entries: Mutex<Vec<NewAuditLog>>,
}

impl RecordingAuditRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl BaseAuditRecorder for RecordingAuditRecorder {
    async fn record(&self, entry: NewAuditLog) -> Result<()> {
        if self.fail {
            anyhow::bail!("audit store unavailable");
        }
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}
