//! 时间工具函数 — 业务时区转换
//!
//! 报表窗口 (日/周/月) 统一在这里换算为 `[start, end)` Unix millis，
//! repository 层只接收 `i64` 区间。

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// 日期 00:00:00 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 当前业务时区日期
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// 今天的 `[start, end)` 窗口
pub fn today_window(tz: Tz) -> (i64, i64) {
    let today = today(tz);
    let tomorrow = today.succ_opt().unwrap_or(today);
    (day_start_millis(today, tz), day_start_millis(tomorrow, tz))
}

/// 本周 (周一起) 的 `[start, end)` 窗口
pub fn week_window(tz: Tz) -> (i64, i64) {
    let today = today(tz);
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let tomorrow = today.succ_opt().unwrap_or(today);
    (day_start_millis(monday, tz), day_start_millis(tomorrow, tz))
}

/// 本月的 `[start, end)` 窗口
pub fn month_window(tz: Tz) -> (i64, i64) {
    let today = today(tz);
    let first = today.with_day(1).unwrap_or(today);
    let tomorrow = today.succ_opt().unwrap_or(today);
    (day_start_millis(first, tz), day_start_millis(tomorrow, tz))
}

/// Unix millis → HH:MM (业务时区)，用于员工看板上的下单时间
pub fn clock_time(millis: i64, tz: Tz) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.with_timezone(&tz).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_are_ordered() {
        let tz = chrono_tz::Asia::Ho_Chi_Minh;
        for (start, end) in [today_window(tz), week_window(tz), month_window(tz)] {
            assert!(start < end);
        }
        // week and month windows contain today's window
        let (d_start, d_end) = today_window(tz);
        let (w_start, w_end) = week_window(tz);
        assert!(w_start <= d_start && d_end <= w_end);
    }

    #[test]
    fn test_clock_time_formats() {
        let tz = chrono_tz::UTC;
        // 1970-01-01 00:00 UTC
        assert_eq!(clock_time(0, tz), "00:00");
        assert_eq!(clock_time(90 * 60 * 1000, tz), "01:30");
    }
}
