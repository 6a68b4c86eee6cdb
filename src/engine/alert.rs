// src/engine/alert.rs

use anyhow::Result;
use log::info;

use crate::config::{Settings, DEFAULT_ALERT_RECIPIENT};

/// Notification transport. Kept deliberately thin; the engine only ever
/// sends one message per online pass.
pub trait Notifier: Send + Sync {
	fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Default transport: writes the alert to the application log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
	fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
		info!("Alert for {}: {} - {}", to, subject, body);
		Ok(())
	}
}

/// An alert goes out iff the pass found at least one vulnerable plugin,
/// alerting is enabled, and the pass was not marked silent (the startup pass
/// is). An empty vulnerable set never alerts, regardless of configuration.
pub fn should_alert(vulnerable: &[String], settings: &Settings, silent: bool) -> bool {
	!vulnerable.is_empty() && settings.alerts_enabled && !silent
}

/// Sends at most one notification summarizing every vulnerable plugin found
/// in the pass. Repeat alerts across passes are not suppressed.
pub fn dispatch(
	vulnerable: &[String],
	settings: &Settings,
	silent: bool,
	notifier: &dyn Notifier,
) -> Result<()> {
	if !should_alert(vulnerable, settings, silent) {
		return Ok(());
	}

	let to = settings
		.alert_recipient
		.as_deref()
		.filter(|recipient| !recipient.is_empty())
		.unwrap_or(DEFAULT_ALERT_RECIPIENT);

	let body = format!(
		"One or more of your installed plugins have a known vulnerability ({}).\n\n\
		 Please update the affected plugins as soon as possible.\n\n\
		 This message was sent automatically by Plugin Vulnerability Checker.",
		vulnerable.join(", ")
	);

	notifier.send(to, "Vulnerability Detected", &body)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	#[derive(Default)]
	pub struct RecordingNotifier {
		pub sent: Mutex<Vec<(String, String, String)>>,
	}

	impl Notifier for RecordingNotifier {
		fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
			self.sent
				.lock()
				.unwrap()
				.push((to.to_string(), subject.to_string(), body.to_string()));
			Ok(())
		}
	}

	fn settings(enabled: bool, recipient: Option<&str>) -> Settings {
		Settings {
			alerts_enabled: enabled,
			alert_recipient: recipient.map(str::to_string),
			..Settings::default()
		}
	}

	fn vulnerable(names: &[&str]) -> Vec<String> {
		names.iter().map(|n| n.to_string()).collect()
	}

	#[test]
	fn alert_requires_vulnerable_set_enabled_flag_and_loud_pass() {
		let found = vulnerable(&["foo"]);
		assert!(should_alert(&found, &settings(true, None), false));
		assert!(!should_alert(&found, &settings(false, None), false));
		assert!(!should_alert(&found, &settings(true, None), true));
		assert!(!should_alert(&[], &settings(true, None), false));
	}

	#[test]
	fn dispatch_sends_one_message_listing_every_vulnerable_plugin() {
		let notifier = RecordingNotifier::default();
		let found = vulnerable(&["foo", "bar"]);

		dispatch(&found, &settings(true, Some("ops@example.com")), false, &notifier).unwrap();

		let sent = notifier.sent.lock().unwrap();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].0, "ops@example.com");
		assert!(sent[0].2.contains("foo, bar"));
	}

	#[test]
	fn dispatch_falls_back_to_default_recipient() {
		let notifier = RecordingNotifier::default();

		dispatch(&vulnerable(&["foo"]), &settings(true, None), false, &notifier).unwrap();
		dispatch(&vulnerable(&["foo"]), &settings(true, Some("")), false, &notifier).unwrap();

		let sent = notifier.sent.lock().unwrap();
		assert_eq!(sent.len(), 2);
		assert_eq!(sent[0].0, DEFAULT_ALERT_RECIPIENT);
		assert_eq!(sent[1].0, DEFAULT_ALERT_RECIPIENT);
	}

	#[test]
	fn silent_or_disabled_dispatch_sends_nothing() {
		let notifier = RecordingNotifier::default();

		dispatch(&vulnerable(&["foo"]), &settings(true, None), true, &notifier).unwrap();
		dispatch(&vulnerable(&["foo"]), &settings(false, None), false, &notifier).unwrap();
		dispatch(&[], &settings(true, None), false, &notifier).unwrap();

		assert!(notifier.sent.lock().unwrap().is_empty());
	}
}
