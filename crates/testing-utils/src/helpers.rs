use chrono::{NaiveDate, NaiveDateTime};

/// 构造测试用的参考时间
pub fn reference_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("invalid test date")
}

/// 为测试安装日志输出，重复调用时忽略
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
