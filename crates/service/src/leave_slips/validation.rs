use chrono::NaiveDate;
use models::leave_slip as rules;

use super::domain::{LeaveSlip, LeaveSlipPatch, NewLeaveSlip};
use crate::errors::ServiceError;
use crate::validation::Violations;

pub fn validate_new(input: &NewLeaveSlip, today: NaiveDate) -> Result<(), ServiceError> {
    let mut v = Violations::new();
    v.check(rules::validate_employee_name(&input.employee_name));
    v.check(rules::validate_national_id(&input.national_id));
    v.check(rules::validate_employee_code(&input.employee_code));
    v.check(rules::validate_area(&input.area));
    v.check(rules::validate_position(&input.position));
    v.check(rules::validate_reason(&input.reason));
    v.check(rules::validate_office_entity(&input.office_entity));
    v.check(rules::validate_justification(&input.justification));
    v.check(rules::validate_regime(&input.regime));
    v.check(rules::validate_date(input.date, today));
    if let Some(ret) = input.return_time {
        v.check(rules::validate_return_time(input.departure_time, ret));
    }
    v.finish()
}

/// Validate the fields present in `patch`. `merged` is the stored slip with
/// the patch applied; it supplies the other half of the departure/return pair.
pub fn validate_patch(patch: &LeaveSlipPatch, merged: &LeaveSlip, today: NaiveDate) -> Result<(), ServiceError> {
    let mut v = Violations::new();
    v.check_present(patch.employee_name.as_deref(), rules::validate_employee_name);
    v.check_present(patch.national_id.as_deref(), rules::validate_national_id);
    v.check_present(patch.employee_code.as_deref(), rules::validate_employee_code);
    v.check_present(patch.area.as_deref(), rules::validate_area);
    v.check_present(patch.position.as_deref(), rules::validate_position);
    v.check_present(patch.reason.as_deref(), rules::validate_reason);
    v.check_present(patch.office_entity.as_deref(), rules::validate_office_entity);
    v.check_present(patch.justification.as_deref(), rules::validate_justification);
    v.check_present(patch.regime.as_deref(), rules::validate_regime);
    if let Some(date) = patch.date {
        v.check(rules::validate_date(date, today));
    }
    let touches_times = patch.departure_time.is_some() || patch.return_time.is_some();
    if let (true, Some(ret)) = (touches_times, merged.return_time) {
        v.check(rules::validate_return_time(merged.departure_time, ret));
    }
    v.finish()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::errors::FieldError;
    use crate::test_support::sample_slip;

    fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 5, 4).unwrap() }
    fn t(h: u32, m: u32, s: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, s).unwrap() }

    fn fields(r: Result<(), ServiceError>) -> Vec<&'static str> {
        match r {
            Ok(()) => vec![],
            Err(ServiceError::Validation(errs)) => errs.iter().map(|e: &FieldError| e.field).collect(),
            Err(other) => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_new(&sample_slip("A-1", "12345678", today()), today()).is_ok());
    }

    #[test]
    fn return_equal_to_departure_rejected_one_second_later_accepted() {
        let mut input = sample_slip("A-1", "12345678", today());
        input.departure_time = t(9, 0, 0);
        input.return_time = Some(t(9, 0, 0));
        assert_eq!(fields(validate_new(&input, today())), vec!["return_time"]);
        input.return_time = Some(t(9, 0, 1));
        assert!(validate_new(&input, today()).is_ok());
        input.return_time = None;
        assert!(validate_new(&input, today()).is_ok());
    }

    #[test]
    fn national_id_of_seven_or_nine_digits_rejected() {
        for bad in ["1234567", "123456789"] {
            let input = sample_slip("A-1", bad, today());
            assert_eq!(fields(validate_new(&input, today())), vec!["national_id"]);
        }
    }

    #[test]
    fn yesterday_rejected_today_accepted() {
        let yesterday = today().pred_opt().unwrap();
        assert_eq!(fields(validate_new(&sample_slip("A-1", "12345678", yesterday), today())), vec!["date"]);
        assert!(validate_new(&sample_slip("A-1", "12345678", today()), today()).is_ok());
    }

    #[test]
    fn reports_every_failing_field() {
        let mut input = sample_slip("", "1", today());
        input.reason = "no".into();
        assert_eq!(fields(validate_new(&input, today())), vec!["national_id", "employee_code", "reason"]);
    }

    #[test]
    fn patch_compares_against_stored_departure() {
        let mut stored = sample_slip("A-1", "12345678", today()).into_slip(Uuid::new_v4(), Utc::now());
        stored.departure_time = t(10, 0, 0);
        stored.return_time = None;

        let patch = LeaveSlipPatch { return_time: Some(Some(t(9, 30, 0))), ..Default::default() };
        let mut merged = stored.clone();
        patch.apply_to(&mut merged);
        assert_eq!(fields(validate_patch(&patch, &merged, today())), vec!["return_time"]);

        // untouched times are not re-checked
        let patch = LeaveSlipPatch { area: Some("Logistica".into()), ..Default::default() };
        let mut merged = stored.clone();
        patch.apply_to(&mut merged);
        assert!(validate_patch(&patch, &merged, today()).is_ok());
    }

    #[test]
    fn patch_skips_absent_fields_and_checks_present_ones() {
        let stored = sample_slip("A-1", "12345678", today()).into_slip(Uuid::new_v4(), Utc::now());
        let patch = LeaveSlipPatch { national_id: Some("123".into()), justification: Some("short".into()), ..Default::default() };
        let mut merged = stored.clone();
        patch.apply_to(&mut merged);
        assert_eq!(fields(validate_patch(&patch, &merged, today())), vec!["national_id", "justification"]);
    }
}
