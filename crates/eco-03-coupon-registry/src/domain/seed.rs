//! Demo coupons installed on first boot.

use super::entities::Coupon;
use shared_types::{offset_timestamp, Timestamp, DAY_MS};

fn days(n: i64) -> i64 {
    n * DAY_MS as i64
}

/// Demo wallet: two active coupons and one used, expired coupon.
pub fn demo_coupons(now: Timestamp) -> Vec<Coupon> {
    vec![
        Coupon {
            id: "coupon-1".into(),
            brand_name: "EcoGreen".to_string(),
            discount_label: "15%".to_string(),
            code: "ECO4A2B5C".to_string(),
            issued_at: now,
            valid_until: offset_timestamp(now, days(30)),
            used: false,
            used_at: None,
            earned_from: Some("default-3".into()),
        },
        Coupon {
            id: "coupon-2".into(),
            brand_name: "SustainableTech".to_string(),
            discount_label: "20%".to_string(),
            code: "TECH9X8Y7Z".to_string(),
            issued_at: now,
            valid_until: offset_timestamp(now, days(45)),
            used: false,
            used_at: None,
            earned_from: Some("default-4".into()),
        },
        Coupon {
            id: "coupon-3".into(),
            brand_name: "GreenLiving".to_string(),
            discount_label: "10%".to_string(),
            code: "GREEN123ABC".to_string(),
            issued_at: offset_timestamp(now, days(-35)),
            valid_until: offset_timestamp(now, days(-5)),
            used: true,
            used_at: Some(offset_timestamp(now, days(-10))),
            earned_from: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_wallet_shape() {
        let now = 100 * DAY_MS;
        let coupons = demo_coupons(now);
        assert_eq!(coupons.iter().filter(|c| c.is_active(now)).count(), 2);
        assert!(coupons[2].used);
        assert!(coupons[2].is_expired(now));
    }
}
