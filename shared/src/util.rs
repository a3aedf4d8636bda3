/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at fleet scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Generate a wash order number ("WC" + snowflake id)
pub fn order_no() -> String {
    format!("WC{}", snowflake_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_positive() {
        let id = snowflake_id();
        assert!(id > 0);
        // 53 bits max
        assert!(id <= 0x1F_FFFF_FFFF_FFFF);
    }

    #[test]
    fn test_snowflake_id_monotonic_prefix() {
        let a = snowflake_id();
        let b = snowflake_id();
        // Timestamp bits never go backwards
        assert!(b >> 12 >= a >> 12);
    }

    #[test]
    fn test_order_no_format() {
        let no = order_no();
        assert!(no.starts_with("WC"));
        assert!(no[2..].chars().all(|c| c.is_ascii_digit()));
    }
}
