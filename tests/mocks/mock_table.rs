use chrono::{Duration, SecondsFormat, TimeZone, Utc};
use crm_mcp_server::error::{CrmApiError, CrmApiResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Owner stamped on every inserted row.
pub const TEST_USER_ID: &str = "user-1";

/// Rows of one table held as JSON objects, in insertion order.
///
/// Inserts get an id, the owner and increasing timestamps, the way the
/// backend fills column defaults. Updates merge the serialized change set,
/// so skipped fields stay untouched and explicit nulls clear a column.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockTable {
    prefix: &'static str,
    rows: Arc<Mutex<Vec<Map<String, Value>>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    write_error: Arc<Mutex<Option<(u16, String)>>>,
    reads_fail: Arc<Mutex<bool>>,
    inserted: Arc<Mutex<i64>>,
}

#[allow(dead_code)]
impl MockTable {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            rows: Arc::new(Mutex::new(Vec::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            write_error: Arc::new(Mutex::new(None)),
            reads_fail: Arc::new(Mutex::new(false)),
            inserted: Arc::new(Mutex::new(0)),
        }
    }

    /// Store a complete row as-is.
    pub fn seed<T: Serialize>(&self, row: &T) {
        if let Value::Object(map) = serde_json::to_value(row).unwrap() {
            self.rows.lock().unwrap().push(map);
        }
    }

    /// Make every following insert and update fail like the backend would.
    pub fn fail_writes(&self, status: u16, message: &str) {
        *self.write_error.lock().unwrap() = Some((status, message.to_string()));
    }

    /// Make every following read fail as if the connection dropped.
    pub fn fail_reads(&self) {
        *self.reads_fail.lock().unwrap() = true;
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    pub fn reset_call_counts(&self) {
        self.call_counts.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    fn check_writes(&self) -> CrmApiResult<()> {
        match self.write_error.lock().unwrap().clone() {
            Some((status, message)) => Err(CrmApiError::ApiError { status, message }),
            None => Ok(()),
        }
    }

    /// Rows matching `keep`, in insertion order.
    pub fn select<R: DeserializeOwned>(
        &self,
        keep: impl Fn(&Map<String, Value>) -> bool,
    ) -> CrmApiResult<Vec<R>> {
        if *self.reads_fail.lock().unwrap() {
            return Err(CrmApiError::HttpError("connection reset by peer".to_string()));
        }
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|row| keep(row))
            .map(|row| serde_json::from_value(Value::Object(row.clone())).map_err(Into::into))
            .collect()
    }

    /// Every row, newest first.
    pub fn newest_first<R: DeserializeOwned>(&self) -> CrmApiResult<Vec<R>> {
        let mut rows: Vec<R> = self.select(|_| true)?;
        rows.reverse();
        Ok(rows)
    }

    pub fn get<R: DeserializeOwned>(&self, id: &str) -> CrmApiResult<R> {
        self.select(|row| row.get("id").and_then(Value::as_str) == Some(id))?
            .into_iter()
            .next()
            .ok_or_else(|| CrmApiError::NotFound(format!("No matching row in {}", self.prefix)))
    }

    pub fn insert<T: Serialize, R: DeserializeOwned>(&self, rows: &[T]) -> CrmApiResult<Vec<R>> {
        self.check_writes()?;
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut map) = serde_json::to_value(row)? else {
                return Err(CrmApiError::Other("row is not an object".to_string()));
            };
            let n = {
                let mut inserted = self.inserted.lock().unwrap();
                *inserted += 1;
                *inserted
            };
            let stamp = (Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(n))
            .to_rfc3339_opts(SecondsFormat::Millis, true);
            map.insert("id".into(), Value::String(format!("{}-{}", self.prefix, n)));
            map.insert("user_id".into(), Value::String(TEST_USER_ID.into()));
            map.entry("created_at").or_insert(Value::String(stamp.clone()));
            map.entry("updated_at").or_insert(Value::String(stamp));
            stored.push(map.clone());
            self.rows.lock().unwrap().push(map);
        }
        stored
            .into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(Into::into))
            .collect()
    }

    pub fn update<T: Serialize, R: DeserializeOwned>(&self, id: &str, changes: &T) -> CrmApiResult<R> {
        self.check_writes()?;
        let Value::Object(changes) = serde_json::to_value(changes)? else {
            return Err(CrmApiError::Other("changes are not an object".to_string()));
        };
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| CrmApiError::NotFound(format!("No matching row in {}", self.prefix)))?;
        for (key, value) in changes {
            row.insert(key, value);
        }
        Ok(serde_json::from_value(Value::Object(row.clone()))?)
    }

    pub fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.rows
            .lock()
            .unwrap()
            .retain(|row| row.get("id").and_then(Value::as_str) != Some(id));
        Ok(())
    }
}
