use tokio::sync::mpsc;
use url::Url;

use crate::{errors::Error, Result};

/// Custom scheme for app-to-app links (`netgains://invite/<id>`).
pub const APP_SCHEME: &str = "netgains";

const INVITE_SEGMENT: &str = "invite";

/// Parameters carried by an invite deep link.
///
/// `id: None` means the link had no identifier segment; the caller shows
/// its own "invalid link" state and must not invoke the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InviteLink {
    pub id: Option<String>,
    pub phone: Option<String>,
    pub invited: bool,
}

/// Parses universal links (`https://<host>/invite/<id>?phone=&invited=`)
/// and custom-scheme links into [`InviteLink`]s.
pub struct LinkParser {
    hosts: Vec<String>,
}

impl LinkParser {
    /// `hosts` is the allowlist of universal-link hosts (from config).
    pub fn new(hosts: Vec<String>) -> Self {
        Self { hosts }
    }

    pub fn parse(&self, raw: &str) -> Result<InviteLink> {
        let url = Url::parse(raw).map_err(|e| Error::InvalidLink(format!("{raw}: {e}")))?;

        let id = match url.scheme() {
            APP_SCHEME => {
                // `netgains://invite/<id>`: the URL host is the "invite" segment.
                if url.host_str() != Some(INVITE_SEGMENT) {
                    return Err(Error::InvalidLink(format!("not an invite link: {raw}")));
                }
                first_path_segment(&url)
            }
            "https" | "http" => {
                let host = url.host_str().unwrap_or_default();
                if !self.hosts.iter().any(|h| h == host) {
                    return Err(Error::InvalidLink(format!("unrecognized host: {host}")));
                }
                let mut segments = url
                    .path_segments()
                    .map(|s| s.filter(|p| !p.is_empty()))
                    .into_iter()
                    .flatten();
                if segments.next() != Some(INVITE_SEGMENT) {
                    return Err(Error::InvalidLink(format!("not an invite link: {raw}")));
                }
                segments.next().map(|s| s.to_string())
            }
            other => {
                return Err(Error::InvalidLink(format!("unsupported scheme: {other}")));
            }
        };

        let mut phone = None;
        let mut invited = false;
        for (k, v) in url.query_pairs() {
            match k.as_ref() {
                "phone" if !v.is_empty() => phone = Some(v.to_string()),
                // Boolean-as-string from the SMS/universal link layer.
                "invited" => invited = matches!(v.as_ref(), "true" | "1"),
                _ => {}
            }
        }

        Ok(InviteLink { id, phone, invited })
    }
}

fn first_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Publisher half of the invite hand-off channel. Clone one per link
/// listener; publishing after the inbox is dropped is a silent no-op.
#[derive(Clone)]
pub struct InviteNotifier {
    tx: mpsc::UnboundedSender<InviteLink>,
}

impl InviteNotifier {
    pub fn publish(&self, link: InviteLink) {
        let _ = self.tx.send(link);
    }
}

/// Consumer half, owned by the navigation controller. Links arrive in
/// publish order; nothing is dropped while the inbox is alive.
pub struct InviteInbox {
    rx: mpsc::UnboundedReceiver<InviteLink>,
}

impl InviteInbox {
    pub async fn recv(&mut self) -> Option<InviteLink> {
        self.rx.recv().await
    }

    /// Non-blocking poll, for callers that check on their own cadence.
    pub fn try_recv(&mut self) -> Option<InviteLink> {
        self.rx.try_recv().ok()
    }
}

/// Typed replacement for the old "pending invite" globals: the deep-link
/// listener publishes, the navigation owner consumes, lifecycle and
/// ordering are explicit.
pub fn invite_channel() -> (InviteNotifier, InviteInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (InviteNotifier { tx }, InviteInbox { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> LinkParser {
        LinkParser::new(vec![
            "netgains.app".to_string(),
            "www.netgains.app".to_string(),
        ])
    }

    #[test]
    fn parses_universal_link_with_query_params() {
        let link = parser()
            .parse("https://netgains.app/invite/abc123?phone=%2B15551234567&invited=true")
            .unwrap();
        assert_eq!(link.id.as_deref(), Some("abc123"));
        assert_eq!(link.phone.as_deref(), Some("+15551234567"));
        assert!(link.invited);
    }

    #[test]
    fn parses_group_invite_id_verbatim() {
        // Classification happens in the resolver, not here.
        let link = parser().parse("https://netgains.app/invite/g-abc123").unwrap();
        assert_eq!(link.id.as_deref(), Some("g-abc123"));
        assert_eq!(link.phone, None);
        assert!(!link.invited);
    }

    #[test]
    fn missing_segment_yields_no_id() {
        let link = parser().parse("https://netgains.app/invite").unwrap();
        assert_eq!(link.id, None);
        let link = parser().parse("https://netgains.app/invite/").unwrap();
        assert_eq!(link.id, None);
    }

    #[test]
    fn parses_custom_scheme() {
        let link = parser().parse("netgains://invite/xyz?invited=1").unwrap();
        assert_eq!(link.id.as_deref(), Some("xyz"));
        assert!(link.invited);
    }

    #[test]
    fn rejects_unknown_host_and_non_invite_paths() {
        assert!(parser().parse("https://evil.example/invite/abc").is_err());
        assert!(parser().parse("https://netgains.app/profile/abc").is_err());
        assert!(parser().parse("mailto:someone@example.com").is_err());
        assert!(parser().parse("not a url").is_err());
    }

    #[test]
    fn invited_flag_only_accepts_true_values() {
        let link = parser()
            .parse("https://netgains.app/invite/abc?invited=false")
            .unwrap();
        assert!(!link.invited);
        let link = parser()
            .parse("https://netgains.app/invite/abc?invited=yes")
            .unwrap();
        assert!(!link.invited);
    }

    #[tokio::test]
    async fn channel_delivers_links_in_publish_order() {
        let (notifier, mut inbox) = invite_channel();
        let a = InviteLink {
            id: Some("a".to_string()),
            phone: None,
            invited: false,
        };
        let b = InviteLink {
            id: Some("b".to_string()),
            phone: None,
            invited: true,
        };
        notifier.publish(a.clone());
        notifier.publish(b.clone());

        assert_eq!(inbox.recv().await, Some(a));
        assert_eq!(inbox.recv().await, Some(b));
        assert_eq!(inbox.try_recv(), None);
    }

    #[test]
    fn publish_after_inbox_drop_is_a_noop() {
        let (notifier, inbox) = invite_channel();
        drop(inbox);
        notifier.publish(InviteLink {
            id: None,
            phone: None,
            invited: false,
        });
    }
}
