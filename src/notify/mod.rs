pub mod payload;
pub mod webhook;

pub use payload::NotificationPayload;
pub use webhook::{NotificationSink, RetryingSink, TransportError, WebhookSink};

use crate::models::Characteristics;

/// Business gate: a listing is worth notifying about only if at least two
/// bedrooms are up for rent. Ads whose extraction yielded nothing usable
/// keep the default 0 and are rejected by the same rule.
pub fn passes(carac: &Characteristics) -> bool {
    carac.bedrooms_to_rent >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_below_two_bedrooms() {
        let mut carac = Characteristics::default();
        assert!(!passes(&carac));
        carac.bedrooms_to_rent = 1;
        assert!(!passes(&carac));
    }

    #[test]
    fn accepts_two_or_more_bedrooms() {
        let mut carac = Characteristics {
            bedrooms_to_rent: 2,
            ..Default::default()
        };
        assert!(passes(&carac));
        carac.bedrooms_to_rent = 5;
        assert!(passes(&carac));
    }
}
