use chrono::{DateTime, Utc};
use rand::Rng;

/// 生成 8 位随机数 (10000000..=99999999)
///
/// 只增加编号的不可预测性，唯一性由序号保证。
pub fn generate_random_suffix() -> u32 {
    rand::thread_rng().gen_range(10_000_000..=99_999_999)
}

/// 订单编号: {前缀}/{YYYYMMDD}/{门店}/{8位随机数}{序号}
pub fn format_order_number(
    prefix: &str,
    store_code: &str,
    now: DateTime<Utc>,
    random_suffix: u32,
    sequence: i64,
) -> String {
    format!(
        "{prefix}/{}/{store_code}/{random_suffix}{sequence}",
        now.format("%Y%m%d")
    )
}
