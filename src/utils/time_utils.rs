// time_utils.rs
//
// 提供時間轉換相關的工具函數，目前用於每日損益日曆的 `YYYY-MM-DD` 日期鍵。

use chrono::{DateTime, Utc};

/// 日期鍵格式
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// 將時間轉換為 UTC 日曆日的日期鍵
pub fn date_key(dt: &DateTime<Utc>) -> String {
    dt.date_naive().format(DATE_KEY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_key_uses_utc_calendar_day() {
        let late = Utc.with_ymd_and_hms(2025, 8, 10, 23, 59, 59).unwrap();
        assert_eq!(date_key(&late), "2025-08-10");

        let next = Utc.with_ymd_and_hms(2025, 8, 11, 0, 0, 0).unwrap();
        assert_eq!(date_key(&next), "2025-08-11");
    }

    #[test]
    fn test_date_key_zero_pads() {
        let early = Utc.with_ymd_and_hms(2024, 2, 3, 8, 0, 0).unwrap();
        assert_eq!(date_key(&early), "2024-02-03");
    }
}
