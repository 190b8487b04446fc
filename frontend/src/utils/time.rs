use chrono::Utc;

pub fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
