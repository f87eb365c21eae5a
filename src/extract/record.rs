/// Username used when a post has no recoverable author (guest or deleted account)
pub const GUEST_USERNAME: &str = "Gäst/Borttagen";

/// Timestamp used when a post has no heading/metadata element
pub const UNKNOWN_TIMESTAMP: &str = "Okänt datum";

/// Post id used when no identifier could be recovered
pub const MISSING_POST_ID: &str = "N/A";

/// One extracted forum post
///
/// Any field may hold its sentinel or be empty; a record is still written
/// as long as it came from a real post container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub username: String,
    pub registration_date: String,
    pub post_count: String,
    pub timestamp: String,
    pub post_id: String,
    pub permalink: String,
    pub avatar_url: String,
    pub content: String,
}

impl PostRecord {
    /// Fields in output column order
    pub fn to_row(&self) -> [&str; 8] {
        [
            &self.username,
            &self.registration_date,
            &self.post_count,
            &self.timestamp,
            &self.post_id,
            &self.permalink,
            &self.avatar_url,
            &self.content,
        ]
    }

    /// True when the post id was recovered
    pub fn has_post_id(&self) -> bool {
        self.post_id != MISSING_POST_ID
    }

    /// True when the author is the guest/deleted sentinel
    pub fn is_guest(&self) -> bool {
        self.username == GUEST_USERNAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PostRecord {
        PostRecord {
            username: "Kalle".to_string(),
            registration_date: "2010-05".to_string(),
            post_count: "1234".to_string(),
            timestamp: "2023-01-01, 12:00".to_string(),
            post_id: "100".to_string(),
            permalink: "https://www.flashback.org/sp100".to_string(),
            avatar_url: String::new(),
            content: "Hej\nhopp".to_string(),
        }
    }

    #[test]
    fn test_row_order() {
        let record = sample();
        let row = record.to_row();
        assert_eq!(row[0], "Kalle");
        assert_eq!(row[2], "1234");
        assert_eq!(row[4], "100");
        assert_eq!(row[5], "https://www.flashback.org/sp100");
        assert_eq!(row[7], "Hej\nhopp");
    }

    #[test]
    fn test_sentinel_checks() {
        let mut record = sample();
        assert!(record.has_post_id());
        assert!(!record.is_guest());

        record.post_id = MISSING_POST_ID.to_string();
        record.username = GUEST_USERNAME.to_string();
        assert!(!record.has_post_id());
        assert!(record.is_guest());
    }
}
