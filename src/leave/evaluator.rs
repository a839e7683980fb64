use crate::errors::ApiError;
use crate::leave::report::{DayReport, LeaveDecision, SlotReport};
use crate::leave::store::FacultyDirectory;
use crate::model::{day_of_week::DayOfWeek, leave_application::NewLeaveApplication};
use chrono::NaiveDate;
use futures::future::try_join_all;

/// A validated-shape leave request as submitted by the applicant.
#[derive(Debug, Clone)]
pub struct LeaveRequest {
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

/// Every calendar date from `start` to `end` inclusive.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Evaluate a leave request for `applicant_email`.
///
/// Loads the applicant's schedule once, expands the date range day by day,
/// and asks the directory for replacement candidates per affected class slot.
/// Approval requires every slot on every day to have at least one candidate;
/// only then is the application persisted and the leave counter bumped.
///
/// Slot lookups within a day carry no ordering dependency, so they are
/// dispatched concurrently and merged back in slot order; the decision does
/// not depend on completion order.
pub async fn evaluate<D: FacultyDirectory>(
    directory: &D,
    applicant_email: &str,
    request: LeaveRequest,
) -> Result<LeaveDecision, ApiError> {
    if request.leave_type.trim().is_empty() || request.reason.trim().is_empty() {
        return Err(ApiError::Validation("Missing required fields".into()));
    }

    if request.end_date < request.start_date {
        return Err(ApiError::Validation(
            "End date cannot be earlier than start date".into(),
        ));
    }

    let account_id = directory
        .find_account_id_by_email(applicant_email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // Single query reused across all days in range.
    let schedule = directory.list_schedule(account_id).await?;

    let days = leave_days(request.start_date, request.end_date);
    let mut report = Vec::with_capacity(days.len());
    let mut all_satisfied = true;

    for date in &days {
        let day = DayOfWeek::of(*date);
        let slots: Vec<_> = schedule
            .iter()
            .filter(|entry| entry.day_of_week == day)
            .collect();

        if slots.is_empty() {
            report.push(DayReport {
                date: *date,
                day,
                required: false,
                available_replacements: Vec::new(),
            });
            continue;
        }

        let candidate_lists = try_join_all(
            slots
                .iter()
                .map(|entry| directory.find_replacements(day, entry.start_time, entry.end_time)),
        )
        .await?;

        let available_replacements: Vec<SlotReport> = slots
            .iter()
            .zip(candidate_lists)
            .map(|(entry, replacements)| SlotReport {
                start_time: entry.start_time,
                end_time: entry.end_time,
                replacements,
            })
            .collect();

        let day_report = DayReport {
            date: *date,
            day,
            required: true,
            available_replacements,
        };

        if !day_report.is_satisfied() {
            all_satisfied = false;
        }

        report.push(day_report);
    }

    if !all_satisfied {
        return Ok(LeaveDecision::Rejected { report });
    }

    let application = NewLeaveApplication {
        email: applicant_email.to_string(),
        leave_type: request.leave_type,
        start_date: request.start_date,
        end_date: request.end_date,
        reason: request.reason,
    };

    let application_id = directory
        .record_approved_leave(&application, account_id, days.len() as u32)
        .await?;

    Ok(LeaveDecision::Approved {
        application_id,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schedule::ScheduleEntry;
    use chrono::NaiveTime;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Schedule entry of some other faculty member, visible to the
    /// availability lookup.
    struct RosterEntry {
        username: String,
        day: DayOfWeek,
        start_time: NaiveTime,
        end_time: NaiveTime,
    }

    /// In-memory `FacultyDirectory` mirroring the SQL contract, including the
    /// covering-interval replacement match. Records every call so tests can
    /// assert that validation failures never touch the store.
    #[derive(Default)]
    struct MemoryDirectory {
        accounts: HashMap<String, u64>,
        schedules: HashMap<u64, Vec<ScheduleEntry>>,
        roster: Vec<RosterEntry>,
        calls: Mutex<Vec<&'static str>>,
        approvals: Mutex<Vec<(NewLeaveApplication, u64, u32)>>,
    }

    impl MemoryDirectory {
        fn with_account(email: &str, id: u64) -> Self {
            let mut directory = Self::default();
            directory.accounts.insert(email.to_string(), id);
            directory.schedules.insert(id, Vec::new());
            directory
        }

        fn add_class(&mut self, account_id: u64, day: DayOfWeek, start: (u32, u32), end: (u32, u32)) {
            let entries = self.schedules.entry(account_id).or_default();
            entries.push(ScheduleEntry {
                schedule_id: entries.len() as u64 + 1,
                day_of_week: day,
                start_time: time(start),
                end_time: time(end),
                subject: "Algorithms".into(),
                room_number: "B-204".into(),
            });
        }

        fn add_roster(&mut self, username: &str, day: DayOfWeek, start: (u32, u32), end: (u32, u32)) {
            self.roster.push(RosterEntry {
                username: username.to_string(),
                day,
                start_time: time(start),
                end_time: time(end),
            });
        }

        fn approvals(&self) -> Vec<(NewLeaveApplication, u64, u32)> {
            self.approvals.lock().unwrap().clone()
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl FacultyDirectory for MemoryDirectory {
        async fn find_account_id_by_email(&self, email: &str) -> Result<Option<u64>, ApiError> {
            self.calls.lock().unwrap().push("find_account_id_by_email");
            Ok(self.accounts.get(email).copied())
        }

        async fn list_schedule(&self, account_id: u64) -> Result<Vec<ScheduleEntry>, ApiError> {
            self.calls.lock().unwrap().push("list_schedule");
            Ok(self.schedules.get(&account_id).cloned().unwrap_or_default())
        }

        async fn find_replacements(
            &self,
            day: DayOfWeek,
            slot_start: NaiveTime,
            slot_end: NaiveTime,
        ) -> Result<Vec<String>, ApiError> {
            self.calls.lock().unwrap().push("find_replacements");
            // Same covering-interval semantics as the SQL query.
            Ok(self
                .roster
                .iter()
                .filter(|entry| {
                    entry.day == day
                        && entry.start_time <= slot_start
                        && entry.end_time >= slot_end
                })
                .map(|entry| entry.username.clone())
                .collect())
        }

        async fn record_approved_leave(
            &self,
            application: &NewLeaveApplication,
            account_id: u64,
            days: u32,
        ) -> Result<u64, ApiError> {
            self.calls.lock().unwrap().push("record_approved_leave");
            let mut approvals = self.approvals.lock().unwrap();
            approvals.push((application.clone(), account_id, days));
            Ok(approvals.len() as u64)
        }
    }

    fn time((h, m): (u32, u32)) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(start: NaiveDate, end: NaiveDate) -> LeaveRequest {
        LeaveRequest {
            leave_type: "Casual".into(),
            start_date: start,
            end_date: end,
            reason: "Family function".into(),
        }
    }

    const EMAIL: &str = "jdoe@college.edu";

    // 2026-03-02 is a Monday.
    const Y: i32 = 2026;

    #[test]
    fn leave_days_is_inclusive_on_both_ends() {
        let days = leave_days(date(Y, 3, 2), date(Y, 3, 4));
        assert_eq!(days, vec![date(Y, 3, 2), date(Y, 3, 3), date(Y, 3, 4)]);
    }

    #[test]
    fn leave_days_single_day_range() {
        assert_eq!(leave_days(date(Y, 3, 2), date(Y, 3, 2)), vec![date(Y, 3, 2)]);
    }

    #[test]
    fn leave_days_crosses_month_boundary() {
        let days = leave_days(date(Y, 2, 27), date(Y, 3, 1));
        assert_eq!(
            days,
            vec![date(Y, 2, 27), date(Y, 2, 28), date(Y, 3, 1)]
        );
    }

    #[actix_web::test]
    async fn no_teaching_days_always_approves() {
        let directory = MemoryDirectory::with_account(EMAIL, 1);

        let decision = evaluate(&directory, EMAIL, request(date(Y, 3, 2), date(Y, 3, 4)))
            .await
            .unwrap();

        let report = match decision {
            LeaveDecision::Approved { report, .. } => report,
            other => panic!("expected approval, got {other:?}"),
        };

        assert_eq!(report.len(), 3);
        assert!(report.iter().all(|day| !day.required));
        assert!(report.iter().all(|day| day.available_replacements.is_empty()));

        // Counter bumped by the full day count, not the teaching-day count.
        let approvals = directory.approvals();
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0].2, 3);
        assert_eq!(approvals[0].1, 1);
    }

    #[actix_web::test]
    async fn covered_slot_approves_single_day() {
        let mut directory = MemoryDirectory::with_account(EMAIL, 1);
        directory.add_class(1, DayOfWeek::Monday, (9, 0), (10, 0));
        directory.add_roster("asen", DayOfWeek::Monday, (8, 0), (11, 0));

        let decision = evaluate(&directory, EMAIL, request(date(Y, 3, 2), date(Y, 3, 2)))
            .await
            .unwrap();

        let (application_id, report) = match decision {
            LeaveDecision::Approved {
                application_id,
                report,
            } => (application_id, report),
            other => panic!("expected approval, got {other:?}"),
        };

        assert_eq!(application_id, 1);
        assert_eq!(report.len(), 1);
        assert!(report[0].required);
        assert_eq!(report[0].day, DayOfWeek::Monday);
        assert_eq!(
            report[0].available_replacements[0].replacements,
            vec!["asen".to_string()]
        );

        assert_eq!(directory.approvals()[0].2, 1);
    }

    #[actix_web::test]
    async fn uncovered_slot_rejects_and_persists_nothing() {
        let mut directory = MemoryDirectory::with_account(EMAIL, 1);
        // Class on Tuesday; nobody on the roster covers it.
        directory.add_class(1, DayOfWeek::Tuesday, (9, 0), (10, 0));

        let decision = evaluate(&directory, EMAIL, request(date(Y, 3, 2), date(Y, 3, 3)))
            .await
            .unwrap();

        let report = match decision {
            LeaveDecision::Rejected { report } => report,
            other => panic!("expected rejection, got {other:?}"),
        };

        assert_eq!(report.len(), 2);

        // Monday: no class, never blocks.
        assert_eq!(report[0].day, DayOfWeek::Monday);
        assert!(!report[0].required);

        // Tuesday: required, empty candidate list.
        assert_eq!(report[1].day, DayOfWeek::Tuesday);
        assert!(report[1].required);
        assert!(report[1].available_replacements[0].replacements.is_empty());

        assert!(directory.approvals().is_empty());
        assert!(!directory.calls().contains(&"record_approved_leave"));
    }

    #[actix_web::test]
    async fn one_uncovered_slot_among_many_rejects_the_request() {
        let mut directory = MemoryDirectory::with_account(EMAIL, 1);
        directory.add_class(1, DayOfWeek::Monday, (9, 0), (10, 0));
        directory.add_class(1, DayOfWeek::Monday, (14, 0), (15, 0));
        // Only the morning slot is covered.
        directory.add_roster("asen", DayOfWeek::Monday, (9, 0), (10, 0));

        let decision = evaluate(&directory, EMAIL, request(date(Y, 3, 2), date(Y, 3, 2)))
            .await
            .unwrap();

        let report = match decision {
            LeaveDecision::Rejected { report } => report,
            other => panic!("expected rejection, got {other:?}"),
        };

        // Results merged back in slot order regardless of completion order.
        let slots = &report[0].available_replacements;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start_time, time((9, 0)));
        assert_eq!(slots[0].replacements, vec!["asen".to_string()]);
        assert_eq!(slots[1].start_time, time((14, 0)));
        assert!(slots[1].replacements.is_empty());

        assert!(directory.approvals().is_empty());
    }

    #[actix_web::test]
    async fn end_before_start_fails_before_any_store_access() {
        let directory = MemoryDirectory::with_account(EMAIL, 1);

        let result = evaluate(&directory, EMAIL, request(date(Y, 3, 3), date(Y, 3, 2))).await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(directory.calls().is_empty());
    }

    #[actix_web::test]
    async fn empty_fields_fail_before_any_store_access() {
        let directory = MemoryDirectory::with_account(EMAIL, 1);
        let mut req = request(date(Y, 3, 2), date(Y, 3, 2));
        req.reason = "   ".into();

        let result = evaluate(&directory, EMAIL, req).await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(directory.calls().is_empty());
    }

    #[actix_web::test]
    async fn unknown_applicant_is_not_found() {
        let directory = MemoryDirectory::default();

        let result = evaluate(
            &directory,
            "ghost@college.edu",
            request(date(Y, 3, 2), date(Y, 3, 2)),
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(directory.approvals().is_empty());
    }

    #[actix_web::test]
    async fn schedule_is_loaded_exactly_once_across_days() {
        let mut directory = MemoryDirectory::with_account(EMAIL, 1);
        directory.add_class(1, DayOfWeek::Monday, (9, 0), (10, 0));
        directory.add_roster("asen", DayOfWeek::Monday, (8, 0), (11, 0));

        // A full week touches the Monday class once.
        evaluate(&directory, EMAIL, request(date(Y, 3, 2), date(Y, 3, 8)))
            .await
            .unwrap();

        let loads = directory
            .calls()
            .iter()
            .filter(|c| **c == "list_schedule")
            .count();
        assert_eq!(loads, 1);
    }

    #[actix_web::test]
    async fn covering_match_requires_full_containment_on_the_same_day() {
        let mut directory = MemoryDirectory::with_account(EMAIL, 1);
        directory.add_roster("exact", DayOfWeek::Monday, (9, 0), (10, 0));
        directory.add_roster("partial", DayOfWeek::Monday, (9, 30), (10, 30));
        directory.add_roster("other_day", DayOfWeek::Tuesday, (8, 0), (12, 0));

        let found = directory
            .find_replacements(DayOfWeek::Monday, time((9, 0)), time((10, 0)))
            .await
            .unwrap();

        // Boundary equality counts as covering; partial overlap and other
        // weekdays do not.
        assert_eq!(found, vec!["exact".to_string()]);
    }
}
