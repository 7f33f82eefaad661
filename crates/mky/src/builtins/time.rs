//! `__time`: wall-clock milliseconds since the Unix epoch.

use chrono::Utc;

use crate::value::Value;

pub(super) fn time() -> Value {
    Value::Integer(Utc::now().timestamp_millis() as f64)
}
