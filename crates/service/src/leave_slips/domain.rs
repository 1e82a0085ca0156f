use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Persisted leave slip (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSlip {
    pub id: Uuid,
    pub employee_name: String,
    pub national_id: String,
    pub employee_code: String,
    pub area: String,
    pub position: String,
    pub reason: String,
    pub office_entity: String,
    pub justification: String,
    pub date: NaiveDate,
    pub departure_time: NaiveTime,
    pub return_time: Option<NaiveTime>,
    pub regime: String,
    pub created_at: DateTime<Utc>,
}

/// Creation input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaveSlip {
    pub employee_name: String,
    pub national_id: String,
    pub employee_code: String,
    pub area: String,
    pub position: String,
    pub reason: String,
    pub office_entity: String,
    pub justification: String,
    pub date: NaiveDate,
    pub departure_time: NaiveTime,
    #[serde(default)]
    pub return_time: Option<NaiveTime>,
    pub regime: String,
}

impl NewLeaveSlip {
    pub fn into_slip(self, id: Uuid, created_at: DateTime<Utc>) -> LeaveSlip {
        LeaveSlip {
            id,
            employee_name: self.employee_name,
            national_id: self.national_id,
            employee_code: self.employee_code,
            area: self.area,
            position: self.position,
            reason: self.reason,
            office_entity: self.office_entity,
            justification: self.justification,
            date: self.date,
            departure_time: self.departure_time,
            return_time: self.return_time,
            regime: self.regime,
            created_at,
        }
    }
}

/// Partial update. `None` means "leave unchanged"; for `return_time`,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSlipPatch {
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub employee_code: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub office_entity: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub departure_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "present")]
    pub return_time: Option<Option<NaiveTime>>,
    #[serde(default)]
    pub regime: Option<String>,
}

/// Distinguishes an explicit `null` (present, `Some(None)`) from an absent key.
fn present<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}

impl LeaveSlipPatch {
    /// Names of the fields this patch touches.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.employee_name.is_some() { out.push("employee_name"); }
        if self.national_id.is_some() { out.push("national_id"); }
        if self.employee_code.is_some() { out.push("employee_code"); }
        if self.area.is_some() { out.push("area"); }
        if self.position.is_some() { out.push("position"); }
        if self.reason.is_some() { out.push("reason"); }
        if self.office_entity.is_some() { out.push("office_entity"); }
        if self.justification.is_some() { out.push("justification"); }
        if self.date.is_some() { out.push("date"); }
        if self.departure_time.is_some() { out.push("departure_time"); }
        if self.return_time.is_some() { out.push("return_time"); }
        if self.regime.is_some() { out.push("regime"); }
        out
    }

    pub fn is_empty(&self) -> bool { self.fields().is_empty() }

    /// Overwrite the present fields of `slip`.
    pub fn apply_to(&self, slip: &mut LeaveSlip) {
        if let Some(v) = &self.employee_name { slip.employee_name = v.clone(); }
        if let Some(v) = &self.national_id { slip.national_id = v.clone(); }
        if let Some(v) = &self.employee_code { slip.employee_code = v.clone(); }
        if let Some(v) = &self.area { slip.area = v.clone(); }
        if let Some(v) = &self.position { slip.position = v.clone(); }
        if let Some(v) = &self.reason { slip.reason = v.clone(); }
        if let Some(v) = &self.office_entity { slip.office_entity = v.clone(); }
        if let Some(v) = &self.justification { slip.justification = v.clone(); }
        if let Some(v) = self.date { slip.date = v; }
        if let Some(v) = self.departure_time { slip.departure_time = v; }
        if let Some(v) = self.return_time { slip.return_time = v; }
        if let Some(v) = &self.regime { slip.regime = v.clone(); }
    }
}

/// Employee data projected from the latest slip, used to prefill new slips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePrefill {
    pub employee_name: String,
    pub area: String,
    pub position: String,
    pub regime: String,
    pub national_id: String,
}

impl From<&LeaveSlip> for EmployeePrefill {
    fn from(s: &LeaveSlip) -> Self {
        Self {
            employee_name: s.employee_name.clone(),
            area: s.area.clone(),
            position: s.position.clone(),
            regime: s.regime.clone(),
            national_id: s.national_id.clone(),
        }
    }
}

/// Result of a prefill lookup. A miss is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefillLookup {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<EmployeePrefill>,
}

impl PrefillLookup {
    pub fn hit(slip: &LeaveSlip) -> Self { Self { found: true, message: None, data: Some(slip.into()) } }

    pub fn miss() -> Self {
        Self { found: false, message: Some("no previous leave slips for this national id".into()), data: None }
    }
}
