//! crates/oslog-logger/src/compose.rs
//! Joins a message and its flattened metadata into an emission payload.

use oslog_sink::{EmissionPayload, Segment};

/// Prefix of every metadata line after the message.
pub const LINE_MARKER: &str = "\n  ▷ ";

/// Builds the payload for one record.
///
/// The message is always the first segment and always public. Public lines
/// follow as one public segment. Private lines follow as one private segment,
/// preceded by their marker as a public segment, so a redacting sink prints
/// `\n  ▷ <private>` in their place.
///
/// ```
/// use oslog_logger::compose;
///
/// let payload = compose(
///     "login",
///     &["pub.user: \"alice\"".to_owned()],
///     &["token: \"x\"".to_owned()],
/// );
/// assert_eq!(payload.joined(), "login\n  ▷ pub.user: \"alice\"\n  ▷ token: \"x\"");
/// assert_eq!(payload.redacted(), "login\n  ▷ pub.user: \"alice\"\n  ▷ <private>");
/// ```
pub fn compose(message: &str, public: &[String], private: &[String]) -> EmissionPayload {
    let mut payload = EmissionPayload::from(Segment::public(message));
    if !public.is_empty() {
        payload.push(Segment::public(block(public)));
    }
    if !private.is_empty() {
        payload.push(Segment::public(LINE_MARKER));
        payload.push(Segment::private(private.join(LINE_MARKER)));
    }
    payload
}

fn block(lines: &[String]) -> String {
    let mut text = String::from(LINE_MARKER);
    text.push_str(&lines.join(LINE_MARKER));
    text
}
