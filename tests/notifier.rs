#![forbid(unsafe_code)]
use secret_santa::{
    Assignment, EmailTemplate, EnvKeys, FailurePolicy, MailError, MailTransport,
    MailerCredentials, Notifier, NotifyError, Pairing, Participant, Settings,
};
use std::collections::HashMap;

/// Transport factice qui enregistre tout ce qu'on lui demande.
#[derive(Default)]
struct RecordingTransport {
    fail_open: bool,
    fail_for: Option<String>,
    opened: Option<MailerCredentials>,
    closed: usize,
    sent: Vec<(String, String, String)>,
}

impl MailTransport for RecordingTransport {
    fn open(&mut self, credentials: &MailerCredentials) -> Result<(), MailError> {
        if self.fail_open {
            return Err(MailError::Auth("535 bad credentials".into()));
        }
        self.opened = Some(credentials.clone());
        Ok(())
    }

    fn send(&mut self, from: &str, to: &str, message: &str) -> Result<(), MailError> {
        if self.opened.is_none() {
            return Err(MailError::NotConnected);
        }
        if self.fail_for.as_deref() == Some(to) {
            return Err(MailError::Send("550 mailbox unavailable".into()));
        }
        self.sent.push((from.into(), to.into(), message.into()));
        Ok(())
    }

    fn close(&mut self) {
        self.closed += 1;
    }
}

fn settings() -> Settings {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SANTA_MAILER_ACCOUNT_EMAIL", "north.pole@x.org"),
        ("SANTA_MAILER_ACCOUNT_TOKEN", "s3cret"),
        ("SANTA_EMAIL_SIGNOFF_NAME", "Rudolph"),
    ]);
    Settings::from_lookup(&EnvKeys::default(), |k| env.get(k).map(|v| v.to_string())).unwrap()
}

fn pairing() -> Pairing {
    let a = Participant::new("a@x.org", "A");
    let b = Participant::new("b@x.org", "B");
    let c = Participant::new("c@x.org", "C");
    Pairing::new(vec![
        Assignment { santa: a, giftee: "B".into() },
        Assignment { santa: b, giftee: "C".into() },
        Assignment { santa: c, giftee: "A".into() },
    ])
}

fn notifier(policy: FailurePolicy) -> Notifier {
    let template = EmailTemplate::parse("To: {to_email}\n\n{santa} -> {giftee} ({year}) -- {signoff_name}").unwrap();
    Notifier::new(&settings(), template)
        .with_year(2024)
        .with_policy(policy)
}

#[test]
fn sends_one_message_per_santa_in_one_session() {
    let mut transport = RecordingTransport::default();
    let report = notifier(FailurePolicy::Abort)
        .notify_all(&mut transport, &pairing())
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.sent, ["a@x.org", "b@x.org", "c@x.org"]);
    assert_eq!(transport.closed, 1);
    assert_eq!(
        transport.opened,
        Some(MailerCredentials::new("north.pole@x.org", "s3cret"))
    );

    let (from, to, body) = &transport.sent[0];
    assert_eq!(from, "north.pole@x.org");
    assert_eq!(to, "a@x.org");
    assert_eq!(body, "To: a@x.org\n\nA -> B (2024) -- Rudolph");
}

#[test]
fn login_failure_sends_nothing_and_closes_session() {
    let mut transport = RecordingTransport {
        fail_open: true,
        ..Default::default()
    };
    let err = notifier(FailurePolicy::Continue)
        .notify_all(&mut transport, &pairing())
        .unwrap_err();

    assert!(matches!(err, NotifyError::Session(MailError::Auth(_))));
    assert!(transport.sent.is_empty());
    assert_eq!(transport.closed, 1);
}

#[test]
fn abort_policy_stops_at_first_failure() {
    let mut transport = RecordingTransport {
        fail_for: Some("b@x.org".into()),
        ..Default::default()
    };
    let err = notifier(FailurePolicy::Abort)
        .notify_all(&mut transport, &pairing())
        .unwrap_err();

    match err {
        NotifyError::Aborted { recipient, sent, source } => {
            assert_eq!(recipient, "b@x.org");
            assert_eq!(sent, 1);
            assert!(matches!(source, MailError::Send(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.sent.len(), 1);
    assert_eq!(transport.closed, 1);
}

#[test]
fn continue_policy_reports_failures_and_keeps_going() {
    let mut transport = RecordingTransport {
        fail_for: Some("b@x.org".into()),
        ..Default::default()
    };
    let report = notifier(FailurePolicy::Continue)
        .notify_all(&mut transport, &pairing())
        .unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.sent, ["a@x.org", "c@x.org"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].santa, "B");
    assert_eq!(report.failed[0].to, "b@x.org");
    assert_eq!(transport.closed, 1);
}

#[test]
fn prepare_renders_without_touching_transport() {
    let messages = notifier(FailurePolicy::Abort).prepare(&pairing());
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].santa, "C");
    assert_eq!(messages[2].body, "To: c@x.org\n\nC -> A (2024) -- Rudolph");
}

#[test]
fn credentials_debug_hides_token() {
    let creds = MailerCredentials::new("north.pole@x.org", "s3cret");
    let shown = format!("{creds:?}");
    assert!(shown.contains("north.pole@x.org"));
    assert!(!shown.contains("s3cret"));
}
